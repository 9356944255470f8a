//! Multi-touch gesture recognition.
//!
//! A touchscreen has no buttons, so every intent has to be read from
//! finger count, distance and timing.  The recognizer tracks one *gesture
//! session* from the first finger down to the last finger up:
//!
//! | Gesture                                   | Result                        |
//! |-------------------------------------------|-------------------------------|
//! | 1 finger, short and still                 | left click (deferred release) |
//! | 2 fingers, short and still                | right click                   |
//! | 3 fingers, short and still                | middle click                  |
//! | 1 finger moving                           | pointer move                  |
//! | tap, then touch again within the timeout  | drag (left button held)       |
//! | 2 fingers moving                          | scroll, inverted (natural)    |
//! | 3+ fingers moving                         | nothing                       |
//!
//! A session counts as *moved* (and can no longer be a click) once any
//! finger travels past the threshold for the current finger count, once
//! more fingers are down than the threshold table covers, or once the
//! session outlives [`TOUCH_TIMEOUT`].
//!
//! # Deferred release
//!
//! A one-finger tap presses the left button immediately but releases it
//! only after [`TOUCH_TIMEOUT`].  If a finger comes down again before
//! then, the release is cancelled and the session becomes a drag; the
//! button is released when that session ends.

use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::input::acceleration::AccelerationCurve;
use crate::input::events::TouchPoint;
use crate::input::InputSink;
use crate::protocol::config::RemoteConfig;
use crate::protocol::keys::PointerButton;
use crate::time::{Clock, TimerSlot};

/// Movement (in pixels) above which a session stops being a tap, indexed
/// by active finger count minus one.
pub const TOUCH_MOVE_THRESHOLD: [f64; 3] = [10.0, 15.0, 15.0];

/// Longest tap, and the deferred-release / drag window after it.
pub const TOUCH_TIMEOUT: Duration = Duration::from_millis(250);

/// One finger currently on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchRecord {
    id: i64,
    x: f64,
    y: f64,
    start_x: f64,
    start_y: f64,
    last_event: Duration,
}

impl TouchRecord {
    fn new(touch: &TouchPoint, now: Duration) -> Self {
        Self {
            id: touch.id,
            x: touch.x,
            y: touch.y,
            start_x: touch.x,
            start_y: touch.y,
            last_event: now,
        }
    }
}

/// State spanning first finger down → all fingers up.
#[derive(Debug, Default)]
struct GestureSession {
    start: Duration,
    moved: bool,
    released_count: usize,
    dragging: bool,
    drag_release: TimerSlot,
    /// When a finger last lifted; motion is suppressed shortly after.
    last_release: Option<Duration>,
}

/// Turns touch events into pointer, scroll and button intents.
pub struct GestureRecognizer {
    clock: Rc<dyn Clock>,
    move_speed: f64,
    scroll_speed: f64,
    acceleration: AccelerationCurve,
    touches: Vec<TouchRecord>,
    session: GestureSession,
}

impl GestureRecognizer {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            move_speed: 1.0,
            scroll_speed: 1.0,
            acceleration: AccelerationCurve::default(),
            touches: Vec::new(),
            session: GestureSession::default(),
        }
    }

    /// Replaces the acceleration curve.
    pub fn with_acceleration(mut self, curve: AccelerationCurve) -> Self {
        self.acceleration = curve;
        self
    }

    /// Applies the host's touch speeds.
    pub fn configure(&mut self, config: &RemoteConfig) {
        self.move_speed = config.move_speed;
        self.scroll_speed = config.scroll_speed;
    }

    /// Number of fingers currently tracked.
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.dragging
    }

    /// Deadline of the pending drag-release, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.session.drag_release.deadline()
    }

    /// Releases the left button if the drag-release deadline has passed.
    ///
    /// Returns `true` if the release fired.
    pub fn fire_due(&mut self, sink: &mut impl InputSink) -> bool {
        if !self.session.drag_release.take_if_due(self.clock.now()) {
            return false;
        }
        debug!("tap not followed by a touch: releasing left button");
        sink.pointer_button(PointerButton::Left, false);
        true
    }

    /// Drops all tracked fingers and cancels the drag-release timer.
    pub fn reset(&mut self) {
        if self.session.drag_release.cancel() {
            debug!("drag-release timer cancelled");
        }
        self.touches.clear();
        self.session = GestureSession::default();
    }

    /// Handles fingers touching down.
    ///
    /// A finger that would start a new session is accepted only if it landed
    /// on the touchpad surface; fingers joining a running session are always
    /// accepted.  Returns `true` if any finger was accepted.
    pub fn touch_start(&mut self, touches: &[TouchPoint], sink: &mut impl InputSink) -> bool {
        let now = self.clock.now();
        if self.touches.is_empty() {
            self.session.start = now;
            self.session.moved = false;
            self.session.released_count = 0;
        }

        let mut accepted = false;
        for touch in touches {
            if self.touches.is_empty() && !touch.on_surface {
                continue;
            }
            accepted = true;
            let record = TouchRecord::new(touch, now);
            // The platform may report the same contact twice.
            match self.touches.iter().position(|t| t.id == touch.id) {
                Some(i) => self.touches[i] = record,
                None => self.touches.push(record),
            }
        }
        if !accepted {
            return false;
        }

        self.session.last_release = None;
        if self.session.drag_release.cancel() {
            debug!("touch within tap timeout: dragging");
            self.session.dragging = true;
        }
        sink.pointer_scroll(0.0, 0.0, true);
        true
    }

    /// Handles fingers lifting or being cancelled.
    ///
    /// Returns `true` if any of the fingers was being tracked.
    pub fn touch_end(&mut self, touches: &[TouchPoint], sink: &mut impl InputSink) -> bool {
        let now = self.clock.now();
        let mut found = false;
        for touch in touches {
            if let Some(i) = self.touches.iter().position(|t| t.id == touch.id) {
                self.touches.remove(i);
                self.session.released_count += 1;
                found = true;
            }
        }
        if !found {
            return false;
        }

        self.session.last_release = Some(now);
        sink.pointer_scroll(0.0, 0.0, true);
        if self.session.released_count > TOUCH_MOVE_THRESHOLD.len() {
            self.session.moved = true;
        }

        if self.touches.is_empty() && self.session.released_count >= 1 {
            if self.session.dragging {
                self.session.dragging = false;
                sink.pointer_button(PointerButton::Left, false);
            }
            let elapsed = now.saturating_sub(self.session.start);
            if !self.session.moved && elapsed < TOUCH_TIMEOUT {
                self.click(sink, now);
            }
            self.session.released_count = 0;
        }
        true
    }

    /// Handles fingers moving.
    ///
    /// Returns `true` if any of the fingers was being tracked.
    pub fn touch_move(&mut self, touches: &[TouchPoint], sink: &mut impl InputSink) -> bool {
        let now = self.clock.now();
        let count = self.touches.len();
        let session_age = now.saturating_sub(self.session.start);
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut found = false;

        for touch in touches {
            let Some(i) = self.touches.iter().position(|t| t.id == touch.id) else {
                continue;
            };
            found = true;
            let record = &mut self.touches[i];

            if !self.session.moved {
                let distance =
                    (touch.x - record.start_x).hypot(touch.y - record.start_y);
                if count > TOUCH_MOVE_THRESHOLD.len()
                    || distance > TOUCH_MOVE_THRESHOLD[count - 1]
                    || session_age >= TOUCH_TIMEOUT
                {
                    self.session.moved = true;
                }
            }

            let dx = touch.x - record.x;
            let dy = touch.y - record.y;
            let elapsed = now.saturating_sub(record.last_event);
            sum_x += dx * self.acceleration.multiplier(axis_speed(dx, elapsed));
            sum_y += dy * self.acceleration.multiplier(axis_speed(dy, elapsed));
            record.x = touch.x;
            record.y = touch.y;
            record.last_event = now;
        }
        if !found {
            return false;
        }

        let quiet = self
            .session
            .last_release
            .is_some_and(|t| now.saturating_sub(t) < TOUCH_TIMEOUT);
        if self.session.moved && !quiet {
            if count == 1 || self.session.dragging {
                sink.pointer_move(sum_x * self.move_speed, sum_y * self.move_speed);
            } else if count == 2 {
                sink.pointer_scroll(
                    -sum_x * self.scroll_speed,
                    -sum_y * self.scroll_speed,
                    false,
                );
            }
        }
        true
    }

    /// Emits the click for a still, short session.
    fn click(&mut self, sink: &mut impl InputSink, now: Duration) {
        let button = match self.session.released_count {
            1 => PointerButton::Left,
            2 => PointerButton::Right,
            3 => PointerButton::Middle,
            _ => return,
        };
        debug!(?button, fingers = self.session.released_count, "tap");
        sink.pointer_button(button, true);
        if button == PointerButton::Left {
            self.session.drag_release.arm(now + TOUCH_TIMEOUT);
        } else {
            sink.pointer_button(button, false);
        }
    }
}

/// Speed along one axis in pixels per second.
fn axis_speed(delta: f64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        delta.abs() / secs
    } else if delta == 0.0 {
        0.0
    } else {
        f64::INFINITY
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
