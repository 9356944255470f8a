//! Typed raw device events.
//!
//! These are the inputs of the translation pipeline.  They serialize as
//! internally tagged JSON so recorded sessions can be replayed:
//!
//! ```json
//! {"type":"touch_start","touches":[{"id":0,"x":120,"y":300}]}
//! {"type":"wheel","dx":0,"dy":3,"mode":"line"}
//! {"type":"key","key":"ArrowLeft","shift":true}
//! {"type":"virtual_key","key":"volume_up"}
//! ```

use serde::{Deserialize, Serialize};

use crate::protocol::keys::LogicalKey;

/// One raw event from a local input device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// Fingers touched down.  `touches` lists only the changed contacts.
    TouchStart { touches: Vec<TouchPoint> },
    /// Fingers moved.
    TouchMove { touches: Vec<TouchPoint> },
    /// Fingers lifted.
    TouchEnd { touches: Vec<TouchPoint> },
    /// The platform aborted the contacts (treated like [`DeviceEvent::TouchEnd`]).
    TouchCancel { touches: Vec<TouchPoint> },
    /// New snapshot of the pressed mouse buttons (bit 0 left, 1 right, 2 middle).
    PointerButtons { buttons: u8 },
    /// Relative mouse motion in device units.
    PointerMove { dx: f64, dy: f64 },
    /// Mouse wheel deltas.
    Wheel {
        dx: f64,
        dy: f64,
        #[serde(default)]
        mode: WheelMode,
    },
    /// Physical key press.
    Key(KeyEvent),
    /// On-screen shortcut button for a logical key (media, volume, ...).
    VirtualKey { key: LogicalKey },
    /// Text typed into the on-screen text box.
    VirtualText { text: String },
}

/// One contact point within a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Platform identifier, stable for the lifetime of the contact.
    pub id: i64,
    /// Page position in CSS pixels.
    pub x: f64,
    pub y: f64,
    /// Whether the contact landed on the touchpad surface.  Only consulted
    /// when the contact would start a new gesture session.
    #[serde(default = "default_on_surface")]
    pub on_surface: bool,
}

fn default_on_surface() -> bool {
    true
}

impl TouchPoint {
    /// A contact on the touchpad surface.
    pub fn new(id: i64, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            on_surface: true,
        }
    }
}

/// Granularity of wheel deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// A physical key press with its modifier state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name: a single character for printable keys, otherwise a name
    /// such as `"Enter"` or `"ArrowLeft"`.
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    /// Part of an input-method composition sequence.
    #[serde(default)]
    pub composing: bool,
}

impl KeyEvent {
    /// An unmodified key press.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}
