//! Backoff for idempotent catalog reads.
//!
//! Only list/get requests go through here. Renames and deletes are never
//! retried: a retry after a lost acknowledgement would fail against the
//! already-moved file.

use crate::config::{NetworkConfig, SyncConfig};
use crate::error::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff with jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NetworkConfig::LIST_MAX_ATTEMPTS,
            base_delay: NetworkConfig::LIST_RETRY_BASE_DELAY,
            max_delay: NetworkConfig::LIST_RETRY_MAX_DELAY,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.list_max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Single attempt, no delay.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before retrying after the 0-indexed `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_secs_f64() * 2f64.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let secs = if self.jitter {
            let factor = rand::rng().random_range(0.5..1.5);
            (capped * factor).min(self.max_delay.as_secs_f64())
        } else {
            capped
        };
        Duration::from_secs_f64(secs)
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the policy runs out of attempts.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} attempts", what, attempt + 1);
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt + 1 < max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {:?}",
                    what,
                    attempt + 1,
                    max_attempts,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
