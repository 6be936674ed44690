//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use adax_config::ConfigError;
use adax_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Adax cloud at {url}")]
    #[diagnostic(
        code(adax::connection_failed),
        help(
            "Check your network connection.\n\
             To try the bridge offline, run with --dummy."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to the Adax cloud timed out")]
    #[diagnostic(
        code(adax::timeout),
        help("Raise `timeout` in the config file or try again later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(adax::auth_failed),
        help(
            "Verify client_id and the API secret generated in the Adax app\n\
             (Account > Remote API). Store the secret with: adax config set-secret"
        )
    )]
    AuthFailed { message: String },

    // ── Upstream ─────────────────────────────────────────────────────
    #[error("Rate limited by the Adax cloud")]
    #[diagnostic(
        code(adax::rate_limited),
        help("Retry after {retry_after_secs}s, or raise --poll-interval.")
    )]
    RateLimited { retry_after_secs: u64 },

    #[error("Adax cloud error: {message}")]
    #[diagnostic(code(adax::upstream))]
    Upstream { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(adax::not_found),
        help("Run: adax {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(adax::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(adax::config),
        help("Check the file shown by: adax config path")
    )]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(adax::io))]
    Io(#[from] std::io::Error),

    #[error("Could not write accessory cache: {0}")]
    #[diagnostic(code(adax::cache))]
    Cache(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::RateLimited { retry_after_secs } => {
                CliError::RateLimited { retry_after_secs }
            }

            CoreError::Upstream { message, status } => CliError::Upstream {
                message: match status {
                    Some(code) => format!("HTTP {code}: {message}"),
                    None => message,
                },
            },

            CoreError::InvalidResponse { message } => CliError::Upstream { message },

            CoreError::RoomNotFound { room_id } => CliError::NotFound {
                resource_type: "room".into(),
                identifier: room_id.to_string(),
                list_command: "rooms".into(),
            },

            CoreError::AccessoryNotFound { identity } => CliError::NotFound {
                resource_type: "accessory".into(),
                identifier: identity,
                list_command: "rooms".into(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use adax_core::RoomId;

    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (CoreError::Timeout, exit_code::TIMEOUT),
            (
                CoreError::AuthenticationFailed {
                    message: "invalid_grant".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::RoomNotFound {
                    room_id: RoomId::new(3),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::ConnectionFailed {
                    url: "https://api-1.adax.no".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::ValidationFailed {
                    message: "NaN".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::Upstream {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }
}
