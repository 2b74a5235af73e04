//! Retry with exponential backoff for DBLP requests.

use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total time to spend on retries (including delays)
    pub max_total_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            max_total_time: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// A single attempt, no retries
    pub fn disabled() -> Self {
        Self::default().max_attempts(1)
    }

    /// Backoff delay before retry number `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powf(attempt.saturating_sub(1) as f64);
        Duration::from_secs_f64(exp.min(self.max_delay.as_secs_f64()))
    }
}

/// Errors worth retrying
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Connection failures
    Network,
    /// Request timed out
    Timeout,
    /// HTTP 429, with the server's Retry-After seconds when given
    RateLimit(Option<u64>),
    /// HTTP 5xx
    ServerError,
}

impl TransientError {
    /// Classify a SourceError
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::RateLimit(retry_after) => Some(TransientError::RateLimit(*retry_after)),
            SourceError::Network(msg) if msg.to_lowercase().contains("timed out") => {
                Some(TransientError::Timeout)
            }
            SourceError::Network(_) => Some(TransientError::Network),
            SourceError::Server { .. } => Some(TransientError::ServerError),
            _ => None,
        }
    }

    /// Minimum delay the server asked for, if any
    pub fn recommended_delay(&self) -> Option<Duration> {
        match self {
            TransientError::RateLimit(Some(seconds)) => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}

/// Execute an async operation, retrying transient failures
///
/// Permanent errors are returned immediately. Transient errors are retried
/// until `max_attempts` or `max_total_time` is exhausted, and the last error
/// is returned.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let mut total_elapsed = Duration::ZERO;

    loop {
        attempts += 1;

        let error = match timeout(config.max_total_time, operation()).await {
            Ok(Ok(result)) => {
                if attempts > 1 {
                    tracing::info!(
                        "Request succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Ok(Err(error)) => error,
            Err(_) => SourceError::Network("request timed out".to_string()),
        };

        let Some(transient) = TransientError::from_source_error(&error) else {
            return Err(error);
        };

        let mut delay = config.backoff_delay(attempts);
        if let Some(floor) = transient.recommended_delay() {
            delay = delay.max(floor);
        }
        total_elapsed += delay;

        if attempts >= config.max_attempts || total_elapsed >= config.max_total_time {
            tracing::warn!("Request failed after {} attempts: {}", attempts, error);
            return Err(error);
        }

        tracing::debug!(
            "Transient error on attempt {}: {:?}, retrying in {:?}",
            attempts,
            transient,
            delay
        );
        sleep(delay).await;
    }
}
