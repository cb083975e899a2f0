//! Shared HTTP response helpers.
//!
//! Auth rejection (401/403), rate limiting (429) and server errors are
//! transient and map to [`RemoteError::Unavailable`]; every other
//! non-success status is [`RemoteError::Api`].

use crate::error::RemoteError;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success.
pub async fn check_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let code = status.as_u16();
    let message = resp.text().await.unwrap_or_default();
    if matches!(code, 401 | 403 | 429) || status.is_server_error() {
        return Err(RemoteError::Unavailable(format!("HTTP {code}: {message}")));
    }
    Err(RemoteError::Api {
        status: code,
        message,
    })
}
