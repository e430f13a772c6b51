use thiserror::Error;

/// Top-level error type for the `backoffice-api` crate.
///
/// Every operation against the backend fails with [`Error::RequestFailed`]:
/// HTTP error statuses, network failures, and malformed bodies are all
/// normalized into a human-readable message before the caller sees them.
/// The remaining variants only occur while constructing clients.
#[derive(Debug, Error)]
pub enum Error {
    // ── Operations ──────────────────────────────────────────────────
    /// The request did not succeed. `message` is the server-supplied
    /// `message` when one was sent, otherwise a fixed per-operation fallback.
    #[error("{message}")]
    RequestFailed { message: String },

    // ── Construction ────────────────────────────────────────────────
    /// Base URL or resource path could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying HTTP client could not be built (TLS material, etc.)
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl Error {
    pub(crate) fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: message.into(),
        }
    }

    /// The human-readable failure message.
    pub fn message(&self) -> String {
        match self {
            Self::RequestFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this error came from an operation rather than
    /// from client construction.
    pub fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }
}
