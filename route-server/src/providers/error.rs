//! Provider error types.
//!
//! These errors never cross the engine boundary: every provider absorbs
//! them at its own edge and degrades to synthetic data instead.

use crate::limiter::RateLimitError;

/// Errors from an upstream segment or routing API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response parsed but lacked the data we need
    #[error("missing data in response: {0}")]
    MissingData(String),

    /// Could not acquire a rate-limit permit in time
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    /// No upstream client is configured for this provider
    #[error("no upstream configured: {0}")]
    NotConfigured(&'static str),
}
