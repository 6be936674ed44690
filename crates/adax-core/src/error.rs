// ── Core error types ──
//
// User-facing errors from adax-core. Consumers never see raw HTTP status
// codes or JSON decode failures; the `From<adax_api::Error>` impl folds
// transport-layer errors into domain variants.
//
// `CoreError` is `Clone` because one failed fetch is fanned out to every
// caller awaiting the same in-flight poll.

use thiserror::Error;

use crate::model::RoomId;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the Adax cloud at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to the Adax cloud timed out")]
    Timeout,

    #[error("Rate limited by the Adax cloud -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Upstream errors (wrapped, not exposed raw) ───────────────────
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected response from the Adax cloud: {message}")]
    InvalidResponse { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Room {room_id} is not in the latest snapshot")]
    RoomNotFound { room_id: RoomId },

    #[error("No accessory bound with identity {identity}")]
    AccessoryNotFound { identity: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// `true` when the failure came from talking to the cloud rather than
    /// from local state or input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::AuthenticationFailed { .. }
                | Self::Timeout
                | Self::RateLimited { .. }
                | Self::Upstream { .. }
                | Self::InvalidResponse { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<adax_api::Error> for CoreError {
    fn from(err: adax_api::Error) -> Self {
        match err {
            adax_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            adax_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Upstream {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            adax_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            adax_api::Error::ClientBuild(message) => CoreError::Config { message },
            adax_api::Error::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            adax_api::Error::Api { status, message } => CoreError::Upstream {
                message,
                status: Some(status),
            },
            adax_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
