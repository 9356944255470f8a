//! Input translation pipeline.
//!
//! ```text
//! DeviceEvent ─┬─▶ GestureRecognizer ─┐
//!              ├─▶ PointerTranslator ─┼─▶ InputSink (InputBatcher) ─▶ Command outbox
//!              └─▶ KeyTranslator ─────┘
//! ```
//!
//! The three translators emit *intents* through the [`InputSink`] trait.
//! [`InputBatcher`] is the production sink; tests substitute a mock.

pub mod acceleration;
pub mod batcher;
pub mod events;
pub mod gesture;
pub mod keyboard;
pub mod pointer;

pub use acceleration::AccelerationCurve;
pub use batcher::InputBatcher;
pub use events::{DeviceEvent, KeyEvent, TouchPoint, WheelMode};
pub use gesture::GestureRecognizer;
pub use keyboard::{KeyOutcome, KeyTranslator};
pub use pointer::PointerTranslator;

use crate::protocol::keys::{LogicalKey, PointerButton};

/// Receiver of primitive input intents.
///
/// Motion and scroll deltas are real-valued; the sink decides how and when
/// they become whole units on the wire.
#[cfg_attr(test, mockall::automock)]
pub trait InputSink {
    /// Relative pointer motion.
    fn pointer_move(&mut self, dx: f64, dy: f64);

    /// Scroll delta.  `finish` marks the end of the current scroll gesture.
    fn pointer_scroll(&mut self, dh: f64, dv: f64, finish: bool);

    /// Button press or release.
    fn pointer_button(&mut self, button: PointerButton, pressed: bool);

    /// Logical key press.
    fn keyboard_key(&mut self, key: LogicalKey);

    /// Literal text.
    fn keyboard_text(&mut self, text: &str);
}
