//! Long-running bridge: restore, discover, keep accessories current.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use adax_core::{Bridge, BridgeConfig, Remote, SharedAccessory, ThermostatState};

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;
use crate::host::{self, ConsoleHost};
use crate::output;

fn host_for(args: &RunArgs, global: &GlobalOpts) -> Result<ConsoleHost, CliError> {
    let color = output::should_color(&global.color);
    if args.no_cache {
        return Ok(ConsoleHost::in_memory(global.quiet, color));
    }
    match args.accessory_cache.clone().or_else(host::default_cache_path) {
        Some(path) => ConsoleHost::persistent(path, global.quiet, color),
        None => {
            warn!("no data directory available, accessories will not be remembered");
            Ok(ConsoleHost::in_memory(global.quiet, color))
        }
    }
}

fn state_line(name: &str, state: &ThermostatState, color: bool) -> String {
    format!(
        "{name}: {:.1} °C, target {:.1} °C, {} ({})",
        state.current_celsius,
        state.target_celsius,
        output::heating_label(state.heating, color),
        state.target_mode,
    )
}

fn spawn_watcher(
    accessory: SharedAccessory<Remote>,
    cancel: CancellationToken,
    quiet: bool,
    color: bool,
) -> JoinHandle<()> {
    let mut rx = accessory.subscribe();
    tokio::spawn(async move {
        let name = accessory.binding().display_name.clone();
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = rx.borrow_and_update().clone();
                    output::print_output(&state_line(&name, &state, color), quiet);
                }
            }
        }
    })
}

pub async fn handle(
    config: &BridgeConfig,
    args: &RunArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let host = Arc::new(host_for(args, global)?);
    let bridge = Bridge::from_config(config, Arc::clone(&host))?;
    let color = output::should_color(&global.color);

    for binding in host.cached_bindings() {
        bridge.restore_accessory(binding).await;
    }

    bridge.on_ready().await;

    let cancel = CancellationToken::new();
    let mut watchers = Vec::new();
    for accessory in bridge.accessories().await {
        output::print_output(
            &state_line(&accessory.binding().display_name, &accessory.state(), color),
            global.quiet,
        );
        if !args.once {
            watchers.push(spawn_watcher(accessory, cancel.clone(), global.quiet, color));
        }
    }

    if args.once {
        return Ok(());
    }

    let refresh = bridge.spawn_refresh_task(cancel.clone());
    info!(
        accessories = watchers.len(),
        poll_interval = %bridge.cache().interval(),
        "bridge running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    cancel.cancel();

    if let Err(err) = refresh.await {
        warn!(error = %err, "refresh task ended abnormally");
    }
    for watcher in watchers {
        let _ = watcher.await;
    }
    Ok(())
}
