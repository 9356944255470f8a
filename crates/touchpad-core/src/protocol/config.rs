//! Tunables received from the host after the handshake.
//!
//! The host sends exactly one JSON object per connection:
//!
//! ```json
//! {"moveSpeed": 1.5, "scrollSpeed": 1, "mouseMoveSpeed": 1,
//!  "mouseScrollSpeed": 1, "updateRate": 30}
//! ```
//!
//! Unknown fields are ignored so newer hosts can add settings without
//! breaking older clients.  Missing speed fields default to `1.0` and a
//! missing `updateRate` means "unthrottled".

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Speed multipliers and emission rate distributed to the translators and
/// the batcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Multiplier for single-finger touch motion.
    #[serde(default = "default_speed")]
    pub move_speed: f64,
    /// Multiplier for two-finger touch scrolling.
    #[serde(default = "default_speed")]
    pub scroll_speed: f64,
    /// Multiplier for relative mouse motion.
    #[serde(default = "default_speed")]
    pub mouse_move_speed: f64,
    /// Multiplier for mouse wheel deltas.
    #[serde(default = "default_speed")]
    pub mouse_scroll_speed: f64,
    /// Emission ceiling in cycles per second; `0` (or less) is unthrottled.
    #[serde(default)]
    pub update_rate: f64,
}

fn default_speed() -> f64 {
    1.0
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            move_speed: default_speed(),
            scroll_speed: default_speed(),
            mouse_move_speed: default_speed(),
            mouse_scroll_speed: default_speed(),
            update_rate: 0.0,
        }
    }
}

impl RemoteConfig {
    /// Parses the host's config message.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if `text` is not a JSON
    /// object with numeric fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Delay between throttled emission cycles, or `None` when unthrottled.
    ///
    /// Rates that are zero, negative or not finite are all treated as
    /// unthrottled.
    pub fn emission_interval(&self) -> Option<Duration> {
        if self.update_rate.is_finite() && self.update_rate > 0.0 {
            Some(Duration::from_nanos((1e9 / self.update_rate).round() as u64))
        } else {
            None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
