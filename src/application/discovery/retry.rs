use crate::config::DiscoverySettings;
use crate::constants::{DEFAULT_ATTEMPT_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS};
use async_trait::async_trait;
use std::time::Duration;

/// Flat retry budget applied to every tool-server address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
    /// Bound for one connect-and-list attempt
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &DiscoverySettings) -> Self {
        Self {
            delay: settings.retry_delay(),
            max_attempts: settings.max_attempts,
            attempt_timeout: settings.attempt_timeout(),
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
        }
    }
}

/// Suspension primitive used between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
