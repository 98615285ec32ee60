//! Form behavior configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default quiescence window before a recompute, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// When the healthy weight range is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Show the range only together with a BMI score
    #[default]
    WithBmi,
    /// Show the range as soon as the height fields are valid
    FromHeight,
}

/// Form configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub range_policy: RangePolicy,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            range_policy: RangePolicy::default(),
        }
    }
}

impl FormConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
