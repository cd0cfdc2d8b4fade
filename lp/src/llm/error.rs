//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a model call
#[derive(Debug, Error)]
pub enum LlmError {
    /// 429; `retry_after` is the server's hint, when it sent one
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Classify a non-success HTTP response
    pub fn from_status(status: u16, message: String, retry_after: Option<Duration>) -> Self {
        match status {
            429 => LlmError::RateLimited { retry_after },
            _ => LlmError::ApiError { status, message },
        }
    }

    /// The one rule the clients use to decide whether another attempt is worth it
    ///
    /// Throttling, overload (5xx, 529), request timeouts (408) and transport
    /// failures are transient. Auth, quota and malformed requests are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } | LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::ApiError { status, .. } => matches!(status, 408 | 500..=599),
            LlmError::InvalidResponse(_) | LlmError::Json(_) => false,
        }
    }

    /// Server-provided delay before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> LlmError {
        LlmError::from_status(status, String::new(), None)
    }

    #[test]
    fn test_transient_statuses_retry() {
        for status in [408, 429, 500, 502, 503, 504, 529] {
            assert!(api(status).is_retryable(), "{status} should retry");
        }
    }

    #[test]
    fn test_client_errors_do_not_retry() {
        for status in [400, 401, 403, 404, 422] {
            assert!(!api(status).is_retryable(), "{status} should not retry");
        }
        assert!(!LlmError::InvalidResponse("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_timeout_retries() {
        assert!(LlmError::Timeout(Duration::from_secs(30)).is_retryable());
    }

    #[test]
    fn test_429_keeps_hint_only_when_sent() {
        let hinted = LlmError::from_status(429, String::new(), Some(Duration::from_secs(7)));
        assert_eq!(hinted.retry_after(), Some(Duration::from_secs(7)));

        // No header means plain exponential backoff, not an invented delay
        assert_eq!(api(429).retry_after(), None);
        assert!(matches!(api(429), LlmError::RateLimited { .. }));
        assert_eq!(api(503).retry_after(), None);
    }
}
