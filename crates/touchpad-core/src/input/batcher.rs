//! Motion/scroll accumulation and rate-limited emission.
//!
//! Touch and mouse events can arrive far faster than is useful to transmit.
//! The batcher sums real-valued deltas and, once per *emission cycle*,
//! sends only the whole-unit part.  The fractional remainder stays in the
//! accumulator for the next cycle, so sub-pixel motion is delayed but never
//! lost.
//!
//! With a positive update rate, a cycle that emitted something arms the
//! emission timer for `1 / rate` seconds later; intents that arrive while
//! the timer is armed only update the sums and are picked up when it fires.
//! With a rate of zero every intent runs a cycle synchronously.
//!
//! Buttons, keys and text bypass the accumulators and are queued
//! immediately, in call order.

use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::input::InputSink;
use crate::protocol::command::Command;
use crate::protocol::config::RemoteConfig;
use crate::protocol::keys::{LogicalKey, PointerButton};
use crate::time::{Clock, TimerSlot};

/// Accumulates intents and queues wire commands.
pub struct InputBatcher {
    clock: Rc<dyn Clock>,
    /// Delay between throttled cycles; `None` means unthrottled.
    interval: Option<Duration>,

    move_x_sum: f64,
    move_y_sum: f64,
    scroll_h_sum: f64,
    scroll_v_sum: f64,
    /// A caller asked to finish the scroll gesture since the last cycle.
    scroll_finish_requested: bool,
    /// The last scroll command sent was an in-progress (`s`) delta.
    scrolling: bool,

    emission: TimerSlot,
    outbox: VecDeque<Command>,
    closed: bool,
}

impl InputBatcher {
    /// Creates an unthrottled batcher.
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            interval: None,
            move_x_sum: 0.0,
            move_y_sum: 0.0,
            scroll_h_sum: 0.0,
            scroll_v_sum: 0.0,
            scroll_finish_requested: false,
            scrolling: false,
            emission: TimerSlot::default(),
            outbox: VecDeque::new(),
            closed: false,
        }
    }

    /// Applies the host's update rate.
    pub fn configure(&mut self, config: &RemoteConfig) {
        self.interval = config.emission_interval();
        debug!(interval = ?self.interval, "batcher configured");
    }

    /// Deadline of the pending emission cycle, if one is scheduled.
    pub fn deadline(&self) -> Option<Duration> {
        self.emission.deadline()
    }

    /// Runs the scheduled cycle if its deadline has passed.
    ///
    /// Returns `true` if a cycle ran.
    pub fn fire_due(&mut self) -> bool {
        if self.closed || !self.emission.take_if_due(self.clock.now()) {
            return false;
        }
        self.start_cycle(true);
        true
    }

    /// Removes and returns every queued command, oldest first.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, Command> {
        self.outbox.drain(..)
    }

    /// Motion not yet emitted, `(x, y)`.  Always within `(-1, 1)` after a
    /// cycle.
    pub fn move_residual(&self) -> (f64, f64) {
        (self.move_x_sum, self.move_y_sum)
    }

    /// Scroll not yet emitted, `(h, v)`.
    pub fn scroll_residual(&self) -> (f64, f64) {
        (self.scroll_h_sum, self.scroll_v_sum)
    }

    /// Stops the batcher for good: cancels the emission timer, discards
    /// queued commands and residual deltas, and ignores later intents.
    pub fn close(&mut self) {
        if self.emission.cancel() {
            debug!("emission timer cancelled on close");
        }
        self.closed = true;
        self.outbox.clear();
        self.move_x_sum = 0.0;
        self.move_y_sum = 0.0;
        self.scroll_h_sum = 0.0;
        self.scroll_v_sum = 0.0;
        self.scroll_finish_requested = false;
        self.scrolling = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn push(&mut self, command: Command) {
        trace!(%command, "queued");
        self.outbox.push_back(command);
    }

    fn start_cycle(&mut self, from_timer: bool) {
        if self.emission.is_armed() && !from_timer {
            // The pending cycle will pick up the new sums.
            return;
        }
        let emitted = self.emit_cycle();
        if let (true, Some(interval)) = (emitted, self.interval) {
            self.emission.arm(self.clock.now() + interval);
        }
    }

    /// Flushes whole units from the accumulators.  Returns `true` if a
    /// move or scroll delta was emitted.
    ///
    /// A finish request is consumed by every cycle, including one that sends
    /// nothing because no scroll is in progress.  It is not carried over to
    /// the next gesture, so that gesture's first delta goes out as `s`.
    fn emit_cycle(&mut self) -> bool {
        let mut emitted = false;

        let dx = self.move_x_sum.trunc();
        let dy = self.move_y_sum.trunc();
        if dx != 0.0 || dy != 0.0 {
            self.push(Command::Move {
                dx: dx as i64,
                dy: dy as i64,
            });
            self.move_x_sum -= dx;
            self.move_y_sum -= dy;
            emitted = true;
        }

        let dh = self.scroll_h_sum.trunc();
        let dv = self.scroll_v_sum.trunc();
        if dh != 0.0 || dv != 0.0 {
            let finish = self.scroll_finish_requested;
            self.push(Command::Scroll {
                dh: dh as i64,
                dv: dv as i64,
                finish,
            });
            self.scroll_h_sum -= dh;
            self.scroll_v_sum -= dv;
            self.scrolling = !finish;
            emitted = true;
        } else if self.scroll_finish_requested && self.scrolling {
            self.push(Command::ScrollEnd);
            self.scrolling = false;
        }
        // A finish request is satisfied by this cycle whether or not a
        // scroll was in progress.
        self.scroll_finish_requested = false;

        emitted
    }
}

impl InputSink for InputBatcher {
    fn pointer_move(&mut self, dx: f64, dy: f64) {
        if self.closed {
            return;
        }
        self.move_x_sum += dx;
        self.move_y_sum += dy;
        self.start_cycle(false);
    }

    fn pointer_scroll(&mut self, dh: f64, dv: f64, finish: bool) {
        if self.closed {
            return;
        }
        self.scroll_h_sum += dh;
        self.scroll_v_sum += dv;
        self.scroll_finish_requested |= finish;
        self.start_cycle(false);
    }

    fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        if !self.closed {
            self.push(Command::Button { button, pressed });
        }
    }

    fn keyboard_key(&mut self, key: LogicalKey) {
        if !self.closed {
            self.push(Command::Key(key));
        }
    }

    fn keyboard_text(&mut self, text: &str) {
        if !self.closed {
            self.push(Command::Text(text.to_string()));
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
