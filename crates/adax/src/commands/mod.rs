//! Command dispatch: CLI args -> bridge calls -> output formatting.

pub mod config_cmd;
pub mod energy;
pub mod rooms;
pub mod run;
pub mod set;

use std::sync::Arc;

use adax_core::{Bridge, BridgeConfig, Remote};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::host::ConsoleHost;

/// Dispatch a bridge-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: &BridgeConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(config, &args, global).await,
        Command::Rooms => rooms::handle(&one_shot_bridge(config)?, global).await,
        Command::Energy(args) => energy::handle(&one_shot_bridge(config)?, &args, global).await,
        Command::Set(args) => set::handle(&one_shot_bridge(config)?, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

/// Bridge for commands that run once and exit: nothing is persisted.
fn one_shot_bridge(config: &BridgeConfig) -> Result<Bridge<Remote, ConsoleHost>, CliError> {
    Ok(Bridge::from_config(config, Arc::new(ConsoleHost::ephemeral()))?)
}
