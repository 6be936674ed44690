//! Target temperature command.

use serde::Serialize;

use adax_core::{Bridge, Centidegrees, Remote, RoomId, SetpointAck};

use crate::cli::{GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::host::ConsoleHost;
use crate::output;

#[derive(Debug, Serialize)]
struct SetResult {
    room_id: RoomId,
    name: String,
    requested_celsius: f64,
    target_celsius: f64,
}

/// The bridge acknowledges every write; a one-shot command still reports
/// an upstream rejection through its exit code.
fn applied_target(ack: SetpointAck) -> Result<Centidegrees, CliError> {
    Ok(ack.into_result()?)
}

pub async fn handle(
    bridge: &Bridge<Remote, ConsoleHost>,
    args: &SetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Surface poll errors before discovery swallows them.
    bridge.rooms().await?;
    bridge.on_ready().await;

    let accessory = bridge.accessory_for_room(RoomId::new(args.room_id)).await?;
    let target = applied_target(accessory.set_target(args.celsius).await?)?;

    let result = SetResult {
        room_id: accessory.room_id(),
        name: accessory.binding().display_name.clone(),
        requested_celsius: args.celsius,
        target_celsius: target.to_celsius(),
    };
    let out = output::render_single(
        &global.output,
        &result,
        |r| format!("{}: target set to {target}", r.name),
        |r| format!("{:.1}", r.target_celsius),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
