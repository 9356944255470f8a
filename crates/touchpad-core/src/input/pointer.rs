//! Mouse (pointer device) translation.
//!
//! Unlike touch, a mouse already speaks in buttons and relative deltas.
//! The translator only has to scale deltas by the host's mouse speeds and
//! turn button-mask snapshots into individual press/release transitions.

use tracing::trace;

use crate::input::events::WheelMode;
use crate::input::InputSink;
use crate::protocol::config::RemoteConfig;
use crate::protocol::keys::PointerButton;

/// Pixels per wheel "line" when the device reports line-granular deltas.
pub const LINE_HEIGHT_PX: f64 = 20.0;

/// Buttons tracked in the mask, bit `i` ↔ [`PointerButton`] index `i`.
const TRACKED_BUTTONS: [PointerButton; 3] = [
    PointerButton::Left,
    PointerButton::Right,
    PointerButton::Middle,
];

/// Translates raw mouse events into pointer intents.
#[derive(Debug, Clone)]
pub struct PointerTranslator {
    held: u8,
    move_speed: f64,
    scroll_speed: f64,
}

impl Default for PointerTranslator {
    fn default() -> Self {
        Self {
            held: 0,
            move_speed: 1.0,
            scroll_speed: 1.0,
        }
    }
}

impl PointerTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the host's mouse speeds.
    pub fn configure(&mut self, config: &RemoteConfig) {
        self.move_speed = config.mouse_move_speed;
        self.scroll_speed = config.mouse_scroll_speed;
    }

    /// Currently held button mask.
    pub fn held_buttons(&self) -> u8 {
        self.held
    }

    /// Diffs `mask` against the held buttons and emits one button intent
    /// per changed bit, lowest bit first.  Bits above the third are ignored.
    pub fn buttons_changed(&mut self, mask: u8, sink: &mut impl InputSink) {
        for button in TRACKED_BUTTONS {
            let bit = 1u8 << button.index();
            let pressed = mask & bit != 0;
            if (self.held & bit != 0) != pressed {
                trace!(?button, pressed, "button transition");
                sink.pointer_button(button, pressed);
            }
        }
        self.held = mask & 0b111;
    }

    /// Forwards relative motion scaled by the mouse-move speed.
    pub fn moved(&mut self, dx: f64, dy: f64, sink: &mut impl InputSink) {
        sink.pointer_move(dx * self.move_speed, dy * self.move_speed);
    }

    /// Forwards a wheel tick scaled by the mouse-scroll speed.
    ///
    /// Page-granular deltas carry no usable pixel distance and are dropped.
    pub fn wheel(&mut self, dx: f64, dy: f64, mode: WheelMode, sink: &mut impl InputSink) {
        let factor = match mode {
            WheelMode::Pixel => 1.0,
            WheelMode::Line => LINE_HEIGHT_PX,
            WheelMode::Page => {
                trace!("ignoring page-granular wheel event");
                return;
            }
        };
        let scale = factor * self.scroll_speed;
        sink.pointer_scroll(dx * scale, dy * scale, true);
    }

    /// Forgets the held buttons without emitting releases.
    pub fn reset(&mut self) {
        self.held = 0;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MockInputSink;
    use mockall::predicate::eq;
    use mockall::Sequence;

    #[test]
    fn test_button_mask_diff_emits_one_event_per_changed_bit() {
        // Arrange
        let mut pointer = PointerTranslator::new();
        let mut sink = MockInputSink::new();
        let mut seq = Sequence::new();
        sink.expect_pointer_button()
            .with(eq(PointerButton::Left), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ());
        sink.expect_pointer_button()
            .with(eq(PointerButton::Middle), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ());
        sink.expect_pointer_button()
            .with(eq(PointerButton::Left), eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ());

        // Act
        pointer.buttons_changed(0b101, &mut sink);
        pointer.buttons_changed(0b100, &mut sink);

        // Assert
        assert_eq!(pointer.held_buttons(), 0b100);
    }

    #[test]
    fn test_unchanged_mask_emits_nothing() {
        let mut pointer = PointerTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_pointer_button().never();
        pointer.buttons_changed(0, &mut sink);
        pointer.buttons_changed(0b1000, &mut sink);
    }

    #[test]
    fn test_motion_is_scaled_by_mouse_move_speed() {
        let mut pointer = PointerTranslator::new();
        pointer.configure(&RemoteConfig {
            mouse_move_speed: 2.5,
            move_speed: 9.0,
            ..RemoteConfig::default()
        });
        let mut sink = MockInputSink::new();
        sink.expect_pointer_move()
            .with(eq(5.0), eq(-2.5))
            .times(1)
            .returning(|_, _| ());
        pointer.moved(2.0, -1.0, &mut sink);
    }

    #[test]
    fn test_line_wheel_uses_line_height_and_finishes() {
        let mut pointer = PointerTranslator::new();
        pointer.configure(&RemoteConfig {
            mouse_scroll_speed: 0.5,
            ..RemoteConfig::default()
        });
        let mut sink = MockInputSink::new();
        sink.expect_pointer_scroll()
            .with(eq(0.0), eq(30.0), eq(true))
            .times(1)
            .returning(|_, _, _| ());
        pointer.wheel(0.0, 3.0, WheelMode::Line, &mut sink);
    }

    #[test]
    fn test_pixel_wheel_is_forwarded_unscaled_by_default() {
        let mut pointer = PointerTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_pointer_scroll()
            .with(eq(-4.0), eq(7.0), eq(true))
            .times(1)
            .returning(|_, _, _| ());
        pointer.wheel(-4.0, 7.0, WheelMode::Pixel, &mut sink);
    }

    #[test]
    fn test_page_wheel_is_dropped() {
        let mut pointer = PointerTranslator::new();
        let mut sink = MockInputSink::new();
        sink.expect_pointer_scroll().never();
        pointer.wheel(0.0, 1.0, WheelMode::Page, &mut sink);
    }
}
