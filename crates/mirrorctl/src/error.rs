//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use mirrorctl_config::ConfigError;
use mirrorctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to mirror at {url}")]
    #[diagnostic(
        code(mirrorctl::connection_failed),
        help(
            "Check that MagicMirror is running with MMM-Remote-Control loaded\n\
             and that this machine is on its ipWhitelist.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Module '{identifier}' not found")]
    #[diagnostic(
        code(mirrorctl::not_found),
        help("Run: mirrorctl modules list to see active modules")
    )]
    NotFound { identifier: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    #[diagnostic(code(mirrorctl::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("The mirror rejected the request: {message}")]
    #[diagnostic(
        code(mirrorctl::rejected),
        help("If the mirror has an apiKey set, pass it with --api-key or store it via: mirrorctl config init")
    )]
    Rejected { message: String },

    #[error("{operation} is already in progress")]
    #[diagnostic(code(mirrorctl::busy))]
    Busy { operation: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mirrorctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mirrorctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mirrorctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(mirrorctl::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(mirrorctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────

    #[error("Internal error: {0}")]
    #[diagnostic(code(mirrorctl::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(mirrorctl::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::ProfileNotFound { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the mirror URL on connection failures.
    #[must_use]
    pub fn with_url(self, mirror_url: &str) -> Self {
        match self {
            Self::ConnectionFailed { reason, .. } => Self::ConnectionFailed {
                url: mirror_url.to_owned(),
                reason,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

const UNKNOWN_URL: &str = "(configured mirror)";

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed {
                url: UNKNOWN_URL.into(),
                reason,
            },

            CoreError::ModulesUnavailable => CliError::ConnectionFailed {
                url: UNKNOWN_URL.into(),
                reason: "the active module listing could not be loaded".into(),
            },

            CoreError::NotFound { identifier } => CliError::NotFound { identifier },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Busy { operation } => CliError::Busy { operation },

            CoreError::Api { message, status } => CliError::ApiError { message, status },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => {
                let cfg = mirrorctl_config::load_config_or_default();
                let available: Vec<_> = cfg.profiles.keys().cloned().collect();
                CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                }
            }
            other => CliError::Config(Box::new(other)),
        }
    }
}
