//! Shared failure type for external lookup services

use thiserror::Error;

/// Longest response body excerpt kept in logs and errors
pub const BODY_EXCERPT_CHARS: usize = 200;

/// A lookup attempt that produced no definitive answer
///
/// Not-found is not an error: lookups report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Non-success, non-404 HTTP status
    #[error("API error {0}: {1}")]
    Status(u16, String),

    /// Request never completed (connect, timeout, TLS, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Transport(e.to_string())
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of a response body
pub fn body_excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
