//! Clap derive structures for the `adax` CLI.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// adax -- expose Adax WiFi heaters as thermostats
#[derive(Debug, Parser)]
#[command(
    name = "adax",
    version,
    about = "Bridge Adax WiFi heaters to smart-home thermostats",
    long_about = "Polls the Adax cloud for rooms, keeps one thermostat accessory per room\n\
        in sync with it, and forwards target temperature changes upstream.\n\n\
        Use --dummy to try everything against two built-in rooms.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "ADAX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Use built-in dummy rooms instead of the cloud
    #[arg(long, global = true)]
    pub dummy: bool,

    /// Maximum snapshot age, e.g. `90` or `2m` (minimum 1s)
    #[arg(long, global = true, value_parser = parse_interval)]
    pub poll_interval: Option<Duration>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ADAX_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

fn parse_interval(raw: &str) -> Result<Duration, String> {
    if let Ok(secs) = raw.trim().parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the bridge until interrupted
    Run(RunArgs),

    /// List rooms with their temperatures
    #[command(alias = "ls")]
    Rooms,

    /// Show the energy log of a room
    Energy(EnergyArgs),

    /// Set the target temperature of a room
    Set(SetArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// File where registered accessories are remembered between runs
    #[arg(long, conflicts_with = "no_cache")]
    pub accessory_cache: Option<PathBuf>,

    /// Do not load or save registered accessories
    #[arg(long)]
    pub no_cache: bool,

    /// Exit after discovery and the first refresh
    #[arg(long)]
    pub once: bool,
}

#[derive(Debug, Args)]
pub struct EnergyArgs {
    /// Room id (see `adax rooms`)
    pub room_id: i64,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Room id (see `adax rooms`)
    pub room_id: i64,

    /// Target in °C. Clamped to 5-30 and rounded to 0.5.
    #[arg(allow_negative_numbers = true)]
    pub celsius: f64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Show the effective configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the API secret in the system keyring
    SetSecret {
        /// Read the secret from this environment variable instead of prompting
        #[arg(long)]
        from_env: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn interval_accepts_seconds_and_humantime() {
        assert_eq!(parse_interval("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval("2m").unwrap(), Duration::from_secs(120));
        assert!(parse_interval("soon").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
