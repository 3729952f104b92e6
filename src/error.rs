use crate::transport::TransportError;
use thiserror::Error;

/// Unified error type for the Infuzu client.
///
/// Each variant corresponds to one failure cause; there is no catch-all.
/// `Api` and `Transport` are deliberately distinct: an `Api` error means the
/// server answered with a non-success status, while `Transport` means the
/// request never completed at all. The distinction matters for callers that
/// implement their own retry policy on top of this client.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key available, or the version file is missing or malformed.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A schema invariant was violated, either on request construction or on
    /// response parsing.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The server responded with a non-success HTTP status.
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never reached or never returned from the server.
    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),
}

impl Error {
    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation {
            message: msg.into(),
        }
    }

    /// HTTP status code for `Api` errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request failed before a server response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
