// ── Core error types ──
//
// User-facing errors from mirrorctl-core. Consumers never see reqwest
// errors or JSON parse failures directly. The `From<mirrorctl_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach mirror: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Failed to connect to mirror")]
    ModulesUnavailable,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Module not found: {identifier}")]
    NotFound { identifier: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by mirror: {message}")]
    Rejected { message: String },

    #[error("Already in progress: {operation}")]
    Busy { operation: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code. `0` when no response arrived.
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status behind this error, when one is known.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::ConnectionFailed { .. } | Self::ModulesUnavailable => Some(0),
            _ => None,
        }
    }

    /// Returns `true` if the mirror could not be reached.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::ModulesUnavailable)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<mirrorctl_api::Error> for CoreError {
    fn from(err: mirrorctl_api::Error) -> Self {
        match err {
            mirrorctl_api::Error::Network { message } => CoreError::ConnectionFailed { reason: message },
            mirrorctl_api::Error::Http {
                status: 404, message, ..
            } => CoreError::Api {
                message: format!("{message} (the remote-control module may not support this endpoint)"),
                status: Some(404),
            },
            mirrorctl_api::Error::Http { status, message, body } => {
                // Prefer the mirror's own explanation when it sent one.
                let detail = body
                    .as_ref()
                    .and_then(|b| b.get("message"))
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned);
                let message = match detail {
                    Some(detail) => format!("{message}: {detail}"),
                    None => message,
                };
                CoreError::Api {
                    message,
                    status: Some(status),
                }
            }
            mirrorctl_api::Error::Rejected { message } => CoreError::Rejected { message },
            mirrorctl_api::Error::InvalidUrl(message) => CoreError::Config {
                message: format!("Invalid URL: {message}"),
            },
            mirrorctl_api::Error::Configuration(message) => CoreError::Config { message },
            mirrorctl_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("Unexpected response from mirror: {message}"),
                status: None,
            },
        }
    }
}
