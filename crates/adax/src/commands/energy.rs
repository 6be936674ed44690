//! Energy log of a single room.

use tabled::Tabled;

use adax_core::{Bridge, EnergyLogEntry, Remote, RoomId};

use crate::cli::{EnergyArgs, GlobalOpts};
use crate::error::CliError;
use crate::host::ConsoleHost;
use crate::output;

#[derive(Tabled)]
struct EnergyRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Energy")]
    energy: String,
}

fn row(entry: &EnergyLogEntry) -> EnergyRow {
    EnergyRow {
        from: entry.from.format("%Y-%m-%d %H:%M").to_string(),
        to: entry.to.format("%Y-%m-%d %H:%M").to_string(),
        energy: format!("{:.0} Wh", entry.energy_wh),
    }
}

pub async fn handle(
    bridge: &Bridge<Remote, ConsoleHost>,
    args: &EnergyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = bridge.energy_log(RoomId::new(args.room_id)).await?;

    let out = output::render_list(&global.output, &entries, row, |e| {
        format!("{}\t{}", e.from.to_rfc3339(), e.energy_wh)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
