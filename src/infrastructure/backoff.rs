use std::time::Duration;
use tokio::time::sleep;

use crate::types::constants::{RECONNECT_BASE_DELAY, RECONNECT_MAX_DELAY};

/// Capped exponential backoff policy for reconnection delays.
///
/// The attempt counter itself lives with the connection state so it can be
/// reset on every successful open; this struct only computes delays.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// Delay before reconnect attempt `n`: `min(base * 2^n, max)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self
            .base
            .as_millis()
            .saturating_mul(u128::from(factor))
            .min(self.max.as_millis());
        Duration::from_millis(delay as u64)
    }

    /// Sleep for the delay of the given attempt.
    pub async fn wait(&self, attempt: u32) {
        sleep(self.delay(attempt)).await;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(RECONNECT_BASE_DELAY),
            Duration::from_millis(RECONNECT_MAX_DELAY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_double_until_cap() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(0), Duration::from_millis(1_000));
        assert_eq!(backoff.delay(1), Duration::from_millis(2_000));
        assert_eq!(backoff.delay(2), Duration::from_millis(4_000));
        assert_eq!(backoff.delay(3), Duration::from_millis(8_000));
        assert_eq!(backoff.delay(4), Duration::from_millis(16_000));
        assert_eq!(backoff.delay(5), Duration::from_millis(30_000));
        assert_eq!(backoff.delay(6), Duration::from_millis(30_000));
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let backoff = Backoff::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..40 {
            let delay = backoff.delay(attempt);
            assert!(delay >= previous);
            previous = delay;
        }
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let backoff = Backoff::default();
        assert_eq!(backoff.delay(u32::MAX), Duration::from_millis(30_000));
    }
}
