//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// No computed delay is ever shorter than this.
pub const MIN_DELAY: Duration = Duration::from_millis(100);

/// Fraction of the delay used as the jitter range in either direction.
const JITTER_RATIO: f64 = 0.1;

/// Delay calculator: `min(base * exponential_base^attempt, max)`, optionally jittered.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base_delay_secs: f64,
    max_delay_secs: f64,
    exponential_base: f64,
    jitter: bool,
}

impl ExponentialBackoff {
    pub fn new(base_delay_secs: f64, max_delay_secs: f64, exponential_base: f64, jitter: bool) -> Self {
        Self {
            base_delay_secs,
            max_delay_secs,
            exponential_base,
            jitter,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.base_delay_secs,
            config.max_delay_secs,
            config.exponential_base,
            config.jitter,
        )
    }

    /// Delay to wait after the zero-based `attempt`.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base_delay_secs * self.exponential_base.powi(exponent);
        // Overflow to inf or NaN from odd inputs saturates at the cap.
        let mut delay = if raw.is_finite() {
            raw.min(self.max_delay_secs)
        } else {
            self.max_delay_secs
        };

        if self.jitter {
            let range = delay * JITTER_RATIO;
            if range > 0.0 {
                delay += rand::thread_rng().gen_range(-range..=range);
            }
        }

        let secs = if delay.is_finite() {
            delay.max(MIN_DELAY.as_secs_f64())
        } else {
            MIN_DELAY.as_secs_f64()
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let backoff = ExponentialBackoff::new(1.0, 60.0, 2.0, false);
        assert_eq!(backoff.calculate_delay(0), Duration::from_secs(1));
        assert_eq!(backoff.calculate_delay(1), Duration::from_secs(2));
        assert_eq!(backoff.calculate_delay(2), Duration::from_secs(4));
        assert_eq!(backoff.calculate_delay(10), Duration::from_secs(60));
    }

    #[test]
    fn test_monotonic_without_jitter() {
        let backoff = ExponentialBackoff::new(0.25, 20.0, 1.5, false);
        let mut previous = Duration::ZERO;
        for attempt in 0..40 {
            let delay = backoff.calculate_delay(attempt);
            assert!(delay >= previous, "attempt {} went backwards", attempt);
            previous = delay;
        }
        assert_eq!(previous, Duration::from_secs(20));
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let backoff = ExponentialBackoff::new(1.0, 30.0, 2.0, true);
        for attempt in [0, 1, 2, 3, 4, 5, 6, 50, u32::MAX] {
            for _ in 0..200 {
                let delay = backoff.calculate_delay(attempt).as_secs_f64();
                assert!(delay >= 0.1);
                assert!(delay <= 30.0 * 1.1 + 1e-6, "{} exceeded cap", delay);
            }
        }
    }

    #[test]
    fn test_floor_applies() {
        let backoff = ExponentialBackoff::new(0.001, 1.0, 1.0, false);
        assert_eq!(backoff.calculate_delay(3), MIN_DELAY);
    }

    #[test]
    fn test_huge_cap_saturates_instead_of_panicking() {
        let backoff = ExponentialBackoff::new(1.0, 1e20, 2.0, false);
        assert_eq!(backoff.calculate_delay(80), Duration::MAX);
        assert_eq!(backoff.calculate_delay(u32::MAX), Duration::MAX);

        let backoff = ExponentialBackoff::new(1.0, f64::MAX, 2.0, true);
        assert_eq!(backoff.calculate_delay(2000), Duration::MAX);
    }
}
