//! Error types for the GLM API client.
//!
//! Defines [`GlmError`] with variants for rate limiting, API errors and
//! network-layer failures. Uses `thiserror` to derive `Display` and `Error`
//! from the `#[error(...)]` attributes.

use thiserror::Error;

/// Errors that can occur when talking to the GLM API.
#[derive(Debug, Error)]
pub enum GlmError {
    /// The server returned HTTP 429 (rate limit).
    /// `retry_after_ms` says how long to wait before trying again.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Error returned by the API (e.g. 401 invalid key, 500 internal error).
    /// Carries the HTTP status code and the error message from the body.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Underlying network failure (DNS, connection refused, timeout) or a
    /// malformed response body. Wraps the original `reqwest` error via `#[from]`.
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
