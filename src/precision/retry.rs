use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use super::{build, source::MetadataSource, PrecisionResult, PrecisionTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    // Total number of fetches, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    // Exponential backoff, attempt 0 is the delay after the first failure
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);

        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Build the precision table, retrying transport failures with backoff.
///
/// Parse errors are never retried: the exchange answered, and answered
/// with something unusable.
pub async fn build_with_retry<S>(source: &S, policy: &RetryPolicy) -> PrecisionResult<PrecisionTable>
where
    S: MetadataSource + Sync,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match build(source).await {
            Err(e) if e.is_fetch() && attempt + 1 < attempts => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    "exchange metadata attempt {}/{} failed: {}, retrying in {:?}",
                    attempt + 1,
                    attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
