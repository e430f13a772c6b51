// ── Core error types ──
//
// What store callers see. Operation failures keep the API message
// verbatim so the UI can show it as-is.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A store operation failed; `message` is what the server said, or
    /// the operation's fixed fallback.
    #[error("{message}")]
    RequestFailed { message: String },

    /// A store was looked up outside any scope that provides it.
    #[error("{resource} store used outside of a scope that provides it")]
    ScopeMisuse { resource: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The message a UI would display.
    pub fn message(&self) -> String {
        match self {
            Self::RequestFailed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<backoffice_api::Error> for CoreError {
    fn from(err: backoffice_api::Error) -> Self {
        match err {
            backoffice_api::Error::RequestFailed { message } => Self::RequestFailed { message },
            backoffice_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            backoffice_api::Error::Client(message) => Self::Config { message },
        }
    }
}
