//! Auto-save controller tuning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default debounce delay in milliseconds.
const fn default_delay_ms() -> u64 {
    30_000
}

/// Default grace period before `saved` reverts to `idle`.
const fn default_idle_revert_ms() -> u64 {
    2_000
}

const fn default_max_auto_retries() -> u32 {
    5
}

const fn default_retry_transient() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AutoSaveConfig {
    /// Quiet period after the last edit before the pending batch is sent.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// How long the `saved` status lingers before reverting to `idle`.
    #[serde(default = "default_idle_revert_ms")]
    pub idle_revert_ms: u64,

    /// Re-arm the debounce timer after a transient save failure.
    #[serde(default = "default_retry_transient")]
    pub retry_transient: bool,

    /// Consecutive transient failures after which automatic retries stop.
    /// `0` retries forever.
    #[serde(default = "default_max_auto_retries")]
    pub max_auto_retries: u32,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            idle_revert_ms: default_idle_revert_ms(),
            retry_transient: default_retry_transient(),
            max_auto_retries: default_max_auto_retries(),
        }
    }
}

impl AutoSaveConfig {
    /// Config with a custom debounce delay and defaults elsewhere.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub const fn idle_revert(&self) -> Duration {
        Duration::from_millis(self.idle_revert_ms)
    }

    /// Whether another automatic retry is allowed after `failures` consecutive failures.
    #[must_use]
    pub const fn allows_auto_retry(&self, failures: u32) -> bool {
        self.retry_transient && (self.max_auto_retries == 0 || failures < self.max_auto_retries)
    }

    /// Reject values the controller cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `delay_ms` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "autosave.delay_ms".into(),
                reason: "debounce delay must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AutoSaveConfig::default();
        assert_eq!(config.delay(), Duration::from_secs(30));
        assert_eq!(config.idle_revert(), Duration::from_secs(2));
        assert!(config.retry_transient);
        assert_eq!(config.max_auto_retries, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_delay_is_invalid() {
        let config = AutoSaveConfig {
            delay_ms: 0,
            ..AutoSaveConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "autosave.delay_ms"
        ));
    }

    #[test]
    fn retry_ceiling() {
        let config = AutoSaveConfig::default();
        assert!(config.allows_auto_retry(4));
        assert!(!config.allows_auto_retry(5));

        let unlimited = AutoSaveConfig {
            max_auto_retries: 0,
            ..AutoSaveConfig::default()
        };
        assert!(unlimited.allows_auto_retry(1_000));

        let disabled = AutoSaveConfig {
            retry_transient: false,
            ..AutoSaveConfig::default()
        };
        assert!(!disabled.allows_auto_retry(0));
    }
}
