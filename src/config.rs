use std::time::Duration;

use derive_ex::derive_ex;
use serde::{Deserialize, Serialize};

use crate::ConfigError;


/// Settle delays of the transition pipeline and the auto-play interval, in milliseconds.
///
/// Missing JSON fields fall back to the defaults.
#[derive_ex(Default)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Wait after `hide()` before the index changes.
    #[default(300)]
    pub exit_settle_ms: u64,
    /// Wait after the index changes before `show()`.
    #[default(150)]
    pub enter_settle_ms: u64,
    /// Wait after `show()` before scrolling.
    #[default(200)]
    pub scroll_settle_ms: u64,
    #[default(5000)]
    pub auto_play_interval_ms: u64,
}

impl Timings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let timings: Self = serde_json::from_str(json)?;
        timings.validate()?;
        Ok(timings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_play_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }

    pub fn exit_settle(&self) -> Duration {
        Duration::from_millis(self.exit_settle_ms)
    }
    pub fn enter_settle(&self) -> Duration {
        Duration::from_millis(self.enter_settle_ms)
    }
    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }
    pub fn auto_play_interval(&self) -> Duration {
        Duration::from_millis(self.auto_play_interval_ms)
    }

    /// Time from a transition request until the controller is idle again.
    pub fn transition_total(&self) -> Duration {
        self.exit_settle() + self.enter_settle() + self.scroll_settle()
    }
}
