//! Remote client error types.

use thiserror::Error;

/// Errors from the remote task service.
///
/// `Unavailable` is transient: the background engine skips the cycle and
/// tries again on the next tick.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure, timeout, auth rejection, rate limiting or 5xx.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// The service rejected the request.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// The response body did not match the expected resource shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// No stored token at startup, or an authorization code rejected during
    /// login. Run `godo auth login`.
    #[error("not authenticated: {0}")]
    NotAuthenticated(String),
}

impl RemoteError {
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub(crate) fn not_found(kind: &str, id: &str) -> Self {
        Self::Api {
            status: 404,
            message: format!("{kind} {id} not found"),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}
