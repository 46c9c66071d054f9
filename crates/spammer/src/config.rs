//! Configuration for a spammer run.

use std::time::Duration;

/// Configuration for the workload generator.
///
/// Immutable once the generator is constructed. `post_cap` and
/// `timeout_secs` accept negative values to mean "disabled", matching
/// the lifecycle described on [`crate::Spammer`].
#[derive(Clone, Debug)]
pub struct SpammerConfig {
    /// Number of threads to create on the test board.
    pub thread_count: usize,

    /// Number of simulated users to provision.
    pub user_count: usize,

    /// Maximum number of posts this generator will create; negative
    /// disables the cap.
    pub post_cap: i64,

    /// Minimum pause between actions, in whole seconds.
    pub min_interval_secs: u64,

    /// Maximum pause between actions, in whole seconds.
    pub max_interval_secs: u64,

    /// Stop the generator after this many seconds; negative disables
    /// the auto-stop.
    pub timeout_secs: i64,

    /// RNG seed for reproducible runs; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl SpammerConfig {
    /// Create a configuration with default sizing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of threads on the test board.
    pub fn with_thread_count(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Set the number of simulated users.
    pub fn with_user_count(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    /// Set the post cap (negative disables).
    pub fn with_post_cap(mut self, cap: i64) -> Self {
        self.post_cap = cap;
        self
    }

    /// Set the inclusive pause bounds, in seconds.
    pub fn with_intervals(mut self, min_secs: u64, max_secs: u64) -> Self {
        self.min_interval_secs = min_secs;
        self.max_interval_secs = max_secs;
        self
    }

    /// Set the auto-stop timeout, in seconds (negative disables).
    pub fn with_timeout(mut self, secs: i64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_count == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.user_count == 0 {
            return Err(ConfigError::NoUsers);
        }
        if self.min_interval_secs > self.max_interval_secs {
            return Err(ConfigError::IntervalsReversed {
                min: self.min_interval_secs,
                max: self.max_interval_secs,
            });
        }
        Ok(())
    }

    /// Whether the post cap is enabled.
    pub fn post_cap_enabled(&self) -> bool {
        self.post_cap >= 0
    }

    /// The auto-stop timeout, if enabled.
    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.timeout_secs)
            .ok()
            .map(Duration::from_secs)
    }

    /// Upper pause bound as a duration; also bounds stop requests.
    pub fn max_interval(&self) -> Duration {
        Duration::from_secs(self.max_interval_secs)
    }
}

impl Default for SpammerConfig {
    fn default() -> Self {
        Self {
            thread_count: 5,
            user_count: 5,
            post_cap: -1,
            min_interval_secs: 1,
            max_interval_secs: 10,
            timeout_secs: -1,
            seed: None,
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The board must have at least one thread.
    #[error("thread_count must be at least 1")]
    NoThreads,

    /// The user pool must have at least one member.
    #[error("user_count must be at least 1")]
    NoUsers,

    /// The pause bounds are reversed.
    #[error("min_interval ({min}s) exceeds max_interval ({max}s)")]
    IntervalsReversed {
        /// Configured minimum, in seconds.
        min: u64,
        /// Configured maximum, in seconds.
        max: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SpammerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reversed_intervals_rejected() {
        let config = SpammerConfig::new().with_intervals(10, 2);
        assert_eq!(
            config.validate(),
            Err(ConfigError::IntervalsReversed { min: 10, max: 2 })
        );
    }

    #[test]
    fn test_equal_intervals_accepted() {
        assert!(SpammerConfig::new().with_intervals(3, 3).validate().is_ok());
    }

    #[test]
    fn test_zero_sizing_rejected() {
        assert_eq!(
            SpammerConfig::new().with_thread_count(0).validate(),
            Err(ConfigError::NoThreads)
        );
        assert_eq!(
            SpammerConfig::new().with_user_count(0).validate(),
            Err(ConfigError::NoUsers)
        );
    }

    #[test]
    fn test_negative_knobs_disable_features() {
        let config = SpammerConfig::new().with_post_cap(-1).with_timeout(-1);
        assert!(!config.post_cap_enabled());
        assert_eq!(config.timeout(), None);

        let config = SpammerConfig::new().with_post_cap(0).with_timeout(0);
        assert!(config.post_cap_enabled());
        assert_eq!(config.timeout(), Some(Duration::from_secs(0)));
    }
}
