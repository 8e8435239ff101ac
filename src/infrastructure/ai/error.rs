//! AI backend error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while asking the AI backend for slugs.
///
/// None of these ever reaches an API client: the suggestion service
/// replaces any failure with the heuristic fallback.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl AiError {
    /// Short machine label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::RateLimited { .. } => "rate_limited",
            AiError::ApiError { .. } => "api_error",
            AiError::Network(_) => "network",
            AiError::InvalidResponse(_) => "invalid_response",
            AiError::Timeout(_) => "timeout",
        }
    }
}
