use crate::PlayerOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and embed options of a [`Player`](crate::Player).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub refresh_interval: Duration,
    pub bootstrap_retry_delay: Duration,
    /// `None` keeps retrying until the widget library shows up.
    pub max_bootstrap_attempts: Option<u32>,
    pub options: PlayerOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            refresh_interval: Duration::from_millis(500),
            bootstrap_retry_delay: Duration::from_millis(100),
            max_bootstrap_attempts: None,
            options: PlayerOptions::default(),
        }
    }
}

impl SessionConfig {
    /// Sets how often current time and duration are re-read while ready.
    pub fn refresh_interval(self, refresh_interval: Duration) -> Self {
        SessionConfig {
            refresh_interval,
            ..self
        }
    }

    /// Sets the delay between player creation attempts while the widget library loads.
    pub fn bootstrap_retry_delay(self, bootstrap_retry_delay: Duration) -> Self {
        SessionConfig {
            bootstrap_retry_delay,
            ..self
        }
    }

    /// Gives up on a session after `attempts` failed creation attempts.
    pub fn max_bootstrap_attempts(self, attempts: u32) -> Self {
        SessionConfig {
            max_bootstrap_attempts: Some(attempts),
            ..self
        }
    }

    pub fn options(self, options: PlayerOptions) -> Self {
        SessionConfig { options, ..self }
    }
}
