//! Bounded exponential backoff shared by the HTTP clients

use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::config::LlmConfig;

/// Longest we will ever sleep between attempts, even if the server asks for more
const MAX_BACKOFF_MS: u64 = 30_000;

/// Retry policy derived from LLM config
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff_ms: config.initial_backoff_ms,
        }
    }

    /// Delay before `attempt` (1-based), honoring a server hint when present
    ///
    /// Doubles per attempt with up to 25% jitter, capped at `MAX_BACKOFF_MS`.
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let exp = self
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let base = match retry_after {
            Some(hint) => exp.max(hint.as_millis() as u64),
            None => exp,
        }
        .min(MAX_BACKOFF_MS);

        let jitter = if base >= 4 { rand::rng().random_range(0..=base / 4) } else { 0 };
        let delay = (base + jitter).min(MAX_BACKOFF_MS);
        debug!(attempt, delay_ms = delay, "RetryPolicy::delay: computed");
        Duration::from_millis(delay)
    }

    /// Longest a single `complete` can take: every attempt hitting its
    /// timeout plus the largest possible sleep before each retry
    pub fn worst_case(&self, attempt_timeout: Duration) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        attempt_timeout
            .saturating_mul(attempts)
            .saturating_add(Duration::from_millis(MAX_BACKOFF_MS).saturating_mul(self.max_retries))
    }
}

/// Parse a `retry-after` header given in whole seconds
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
