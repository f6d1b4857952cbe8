//! Reconnection backoff policy.

use std::time::Duration;

use crate::error::LinkError;

/// Configuration for exponential backoff between reconnection attempts.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the first reconnection attempt.
    pub min_delay: Duration,
    /// Maximum delay between reconnection attempts.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each attempt.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(60_000),
            multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound violates the backoff contract.
    pub fn validate(&self) -> Result<(), LinkError> {
        if self.min_delay.is_zero() {
            return Err(LinkError::InvalidConfig(
                "min_delay must be positive".to_string(),
            ));
        }
        if self.min_delay > self.max_delay {
            return Err(LinkError::InvalidConfig(
                "min_delay must not exceed max_delay".to_string(),
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(LinkError::InvalidConfig(
                "multiplier must be a finite value >= 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Deterministic backoff delay generator.
///
/// The current delay always stays within `[min_delay, max_delay]`; the
/// sequence produced by repeated [`advance`](Self::advance) calls is
/// non-decreasing and converges to `max_delay` (or stays at `min_delay`
/// when the multiplier is exactly 1).
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    config: BackoffConfig,
    current: Duration,
}

impl BackoffPolicy {
    /// Create a policy from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: BackoffConfig) -> Result<Self, LinkError> {
        config.validate()?;
        let current = config.min_delay;
        Ok(Self { config, current })
    }

    /// Delay to wait before the next attempt.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        self.current
    }

    /// Grow the delay for the following attempt.
    pub fn advance(&mut self) {
        let grown = (self.current.as_millis() as f64 * self.config.multiplier) as u64;
        self.current =
            Duration::from_millis(grown).clamp(self.config.min_delay, self.config.max_delay);
    }

    /// Reset the delay to `min_delay` for a fresh reconnect cycle.
    pub fn reset(&mut self) {
        self.current = self.config.min_delay;
    }
}
