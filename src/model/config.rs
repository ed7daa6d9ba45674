use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between marking a task for deletion and removing it
    #[serde(default = "default_delete_grace_ms")]
    pub delete_grace_ms: u64,
    /// Delay before a submitted task is inserted (input stays disabled)
    #[serde(default = "default_add_delay_ms")]
    pub add_delay_ms: u64,
    /// How often the time-of-day label is recomputed
    #[serde(default = "default_time_of_day_poll_secs")]
    pub time_of_day_poll_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            delete_grace_ms: default_delete_grace_ms(),
            add_delay_ms: default_add_delay_ms(),
            time_of_day_poll_secs: default_time_of_day_poll_secs(),
        }
    }
}

impl TimingConfig {
    pub fn delete_grace(&self) -> Duration {
        Duration::from_millis(self.delete_grace_ms)
    }

    pub fn add_delay(&self) -> Duration {
        Duration::from_millis(self.add_delay_ms)
    }

    pub fn time_of_day_poll(&self) -> Duration {
        Duration::from_secs(self.time_of_day_poll_secs.max(1))
    }
}

fn default_delete_grace_ms() -> u64 {
    300
}

fn default_add_delay_ms() -> u64 {
    200
}

fn default_time_of_day_poll_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive for the log file, e.g. "info" or "tick=debug".
    /// `TICK_LOG` in the environment takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Palette overrides by name, e.g. `accent = "#FF6B6B"`. Applied on top
    /// of both the light and dark palettes.
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
