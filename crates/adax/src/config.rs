//! CLI configuration: thin wrapper around `adax_config`.
//!
//! Adds the `--config`, `--dummy` and `--poll-interval` overrides on top
//! of the file and environment layers.

use std::path::PathBuf;

use adax_core::BridgeConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use adax_config::{Config, save_config};

/// Config file in effect: `--config` / `ADAX_CONFIG`, else the platform path.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(adax_config::config_path)
}

/// Load the config file and environment overlay, then apply flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = adax_config::load_config(Some(&config_path(global)))?;

    if global.dummy {
        cfg.dummy_mode = true;
    }
    if let Some(interval) = global.poll_interval {
        cfg.max_poll_interval = interval.as_secs();
    }

    Ok(cfg)
}

/// Resolve credentials and build the core bridge config.
pub fn bridge_config(global: &GlobalOpts) -> Result<BridgeConfig, CliError> {
    let cfg = load(global)?;
    Ok(adax_config::to_bridge_config(&cfg)?)
}
