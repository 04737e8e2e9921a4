//! # Poller Configuration

use crate::domain::errors::PollError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Default overall deadline (one minute).
pub const DEFAULT_DEADLINE_MS: u64 = 60_000;
/// Default first wait between status calls (one second).
pub const DEFAULT_INITIAL_WAIT_MS: u64 = 1_000;
/// Default growth factor of the wait.
pub const DEFAULT_BACKOFF: f64 = 1.5;
/// Method queried for the state of a deferred call.
pub const DEFAULT_STATUS_METHOD: &str = "async.status";
/// Smallest wait between status calls.
pub const MIN_WAIT_MS: u64 = 1;

/// Backoff and deadline settings.
///
/// Deserializing runs [`PollerConfig::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PollerConfigFields")]
pub struct PollerConfig {
    /// Total time allowed before giving up, in milliseconds.
    pub deadline_ms: u64,

    /// Wait after the first unfinished status, in milliseconds.
    pub initial_wait_ms: u64,

    /// Multiplier applied to the wait after every unfinished status.
    pub backoff: f64,

    /// Status method name.
    pub status_method: String,
}

/// Unchecked wire form of [`PollerConfig`].
#[derive(Deserialize)]
struct PollerConfigFields {
    deadline_ms: u64,
    initial_wait_ms: u64,
    backoff: f64,
    status_method: String,
}

impl TryFrom<PollerConfigFields> for PollerConfig {
    type Error = PollError;

    fn try_from(fields: PollerConfigFields) -> Result<Self, Self::Error> {
        let config = PollerConfig {
            deadline_ms: fields.deadline_ms,
            initial_wait_ms: fields.initial_wait_ms,
            backoff: fields.backoff,
            status_method: fields.status_method,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            deadline_ms: DEFAULT_DEADLINE_MS,
            initial_wait_ms: DEFAULT_INITIAL_WAIT_MS,
            backoff: DEFAULT_BACKOFF,
            status_method: DEFAULT_STATUS_METHOD.to_string(),
        }
    }
}

impl PollerConfig {
    /// Short deadline for tests.
    pub fn for_testing() -> Self {
        Self {
            deadline_ms: 2_000,
            initial_wait_ms: 100,
            ..Self::default()
        }
    }

    /// Read overrides from the environment.
    ///
    /// - `OC_POLL_DEADLINE_MS`
    /// - `OC_POLL_INITIAL_WAIT_MS`
    /// - `OC_POLL_BACKOFF` (finite, at least 1.0)
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(deadline) = env_parse::<u64>("OC_POLL_DEADLINE_MS") {
            config.deadline_ms = deadline;
        }
        if let Some(wait) = env_parse::<u64>("OC_POLL_INITIAL_WAIT_MS") {
            if wait >= MIN_WAIT_MS {
                config.initial_wait_ms = wait;
            } else {
                warn!(wait, "Ignoring zero OC_POLL_INITIAL_WAIT_MS");
            }
        }
        if let Some(backoff) = env_parse::<f64>("OC_POLL_BACKOFF") {
            if valid_backoff(backoff) {
                config.backoff = backoff;
            } else {
                warn!(backoff, "Ignoring OC_POLL_BACKOFF below 1.0");
            }
        }

        config
    }

    /// Check that waits start above zero and never shrink.
    ///
    /// A zero deadline is allowed: the poller then makes no status call.
    pub fn validate(&self) -> Result<(), PollError> {
        if self.initial_wait_ms < MIN_WAIT_MS {
            return Err(PollError::InvalidConfig(format!(
                "initial_wait_ms must be at least {MIN_WAIT_MS}"
            )));
        }
        if !valid_backoff(self.backoff) {
            return Err(PollError::InvalidConfig(format!(
                "backoff must be a finite number of at least 1.0, got {}",
                self.backoff
            )));
        }
        if self.status_method.is_empty() {
            return Err(PollError::InvalidConfig("status_method is empty".to_string()));
        }
        Ok(())
    }

    /// Deadline as a duration.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// First wait as a duration.
    pub fn initial_wait(&self) -> Duration {
        Duration::from_millis(self.initial_wait_ms)
    }
}

fn valid_backoff(backoff: f64) -> bool {
    backoff.is_finite() && backoff >= 1.0
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = std::env::var(name).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(name, %value, "Ignoring unparseable environment value");
            None
        }
    }
}
