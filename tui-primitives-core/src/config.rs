//! Runtime configuration for the coordinators
//!
//! Loaded from JSON. Missing fields fall back to defaults, and user
//! keybindings are merged over [`Keybindings::defaults`].
//!
//! ```json
//! {
//!   "search_debounce": 500,
//!   "keybindings": { "surface": { "close": ["esc", "q"] } }
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keybindings::{KeyContext, Keybindings};
use crate::search::DEFAULT_SEARCH_DEBOUNCE;

/// Delay used to stand in for "after the next paint".
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(16);

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimitiveConfig {
    /// Idle time after which the type-ahead query resets
    #[serde(with = "millis")]
    pub search_debounce: Duration,
    /// Delay before deferred focus moves run
    #[serde(with = "millis")]
    pub frame_delay: Duration,
    /// Key to command mapping per context
    pub keybindings: Keybindings<KeyContext>,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            frame_delay: DEFAULT_FRAME_DELAY,
            keybindings: Keybindings::defaults(),
        }
    }
}

impl PrimitiveConfig {
    /// Parse a JSON config, merging keybindings over the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.keybindings = Keybindings::merge(Keybindings::defaults(), config.keybindings);
        config.keybindings.validate()?;
        tracing::debug!(
            search_debounce_ms = config.search_debounce.as_millis() as u64,
            frame_delay_ms = config.frame_delay.as_millis() as u64,
            "Loaded primitive config"
        );
        Ok(config)
    }

    /// Builder: override the search debounce.
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Builder: override the frame delay.
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
