use thiserror::Error;

/// Top-level error type for the `mirrorctl-api` crate.
///
/// Every call to the remote-control module fails in one of these ways.
/// `mirrorctl-core` maps them into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── HTTP ────────────────────────────────────────────────────────
    /// The mirror answered with a non-2xx status.
    ///
    /// `body` carries the parsed JSON body when the mirror sent one.
    #[error("{message} (HTTP {status})")]
    Http {
        status: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure,
    /// cross-origin block, request timeout).
    #[error("{message}")]
    Network { message: String },

    /// The base URL or a path built from it is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed.
    #[error("Client configuration error: {0}")]
    Configuration(String),

    // ── Envelope ────────────────────────────────────────────────────
    /// The mirror answered 2xx but reported `success: false`.
    #[error("Request rejected by mirror: {message}")]
    Rejected { message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Wrap a reqwest failure that produced no usable response.
    pub(crate) fn network(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Network error: request timed out".to_owned()
        } else {
            format!("Network error: {err}")
        };
        Self::Network { message }
    }

    /// HTTP status of the failure. Network failures report `0`,
    /// everything that never reached the wire reports `None`.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network { .. } => Some(0),
            _ => None,
        }
    }

    /// Returns `true` if the mirror could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns `true` if the mirror answered with a non-2xx status.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// Returns `true` if the API key was missing or refused.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401 | 403, .. })
    }
}
