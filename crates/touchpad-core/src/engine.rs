//! The assembled input pipeline.
//!
//! [`InputEngine`] owns one of each translator plus the batcher they all
//! feed, routes [`DeviceEvent`]s to the right translator and exposes the
//! timers to whoever drives it.  It performs no I/O: the caller drains
//! [`InputEngine::drain_outbox`] and sends each command over the channel.
//!
//! # Driving the engine
//!
//! ```text
//! loop {
//!     wait for: device event | channel message | next_deadline()
//!     dispatch(event) / configure(config) / fire_due_timers()
//!     for command in drain_outbox() { send(command) }
//! }
//! ```
//!
//! Events arriving before [`InputEngine::configure`] are dropped: nothing
//! may be sent until the handshake has finished and the host's config has
//! arrived.

use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, info};

use crate::input::{
    DeviceEvent, GestureRecognizer, InputBatcher, InputSink, KeyOutcome, KeyTranslator,
    PointerTranslator,
};
use crate::protocol::command::Command;
use crate::protocol::config::RemoteConfig;
use crate::protocol::keys::LogicalKey;
use crate::time::Clock;

/// Routes device events through the translators into the batcher.
pub struct InputEngine {
    clock: Rc<dyn Clock>,
    batcher: InputBatcher,
    gesture: GestureRecognizer,
    pointer: PointerTranslator,
    keyboard: KeyTranslator,
    config: Option<RemoteConfig>,
}

impl InputEngine {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            batcher: InputBatcher::new(Rc::clone(&clock)),
            gesture: GestureRecognizer::new(Rc::clone(&clock)),
            pointer: PointerTranslator::new(),
            keyboard: KeyTranslator::new(),
            config: None,
            clock,
        }
    }

    /// Distributes the host's tunables and starts accepting events.
    pub fn configure(&mut self, config: RemoteConfig) {
        self.batcher.configure(&config);
        self.gesture.configure(&config);
        self.pointer.configure(&config);
        info!(?config, "input engine configured");
        self.config = Some(config);
    }

    /// The active config, once received.
    pub fn config(&self) -> Option<&RemoteConfig> {
        self.config.as_ref()
    }

    /// Whether events are being translated.
    pub fn is_active(&self) -> bool {
        self.config.is_some() && !self.batcher.is_closed()
    }

    /// Gates physical keyboard capture.
    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard.set_enabled(enabled);
    }

    /// Translates one device event.
    ///
    /// Returns `true` if the event was consumed (anything a local UI should
    /// not also act on).  Key events left to the local UI, unknown touches
    /// and every event before configuration return `false`.
    pub fn dispatch(&mut self, event: &DeviceEvent) -> bool {
        if !self.is_active() {
            debug!("dropping device event: engine not active");
            return false;
        }
        let sink = &mut self.batcher;
        match event {
            DeviceEvent::TouchStart { touches } => self.gesture.touch_start(touches, sink),
            DeviceEvent::TouchMove { touches } => self.gesture.touch_move(touches, sink),
            DeviceEvent::TouchEnd { touches } | DeviceEvent::TouchCancel { touches } => {
                self.gesture.touch_end(touches, sink)
            }
            DeviceEvent::PointerButtons { buttons } => {
                self.pointer.buttons_changed(*buttons, sink);
                true
            }
            DeviceEvent::PointerMove { dx, dy } => {
                self.pointer.moved(*dx, *dy, sink);
                true
            }
            DeviceEvent::Wheel { dx, dy, mode } => {
                self.pointer.wheel(*dx, *dy, *mode, sink);
                true
            }
            DeviceEvent::Key(key) => self.keyboard.key_event(key, sink) == KeyOutcome::Forwarded,
            DeviceEvent::VirtualKey { key } => {
                sink.keyboard_key(*key);
                true
            }
            DeviceEvent::VirtualText { text } => {
                let text = unix_line_endings(text);
                if !text.is_empty() {
                    sink.keyboard_text(&text);
                }
                true
            }
        }
    }

    /// Sends a logical key directly (on-screen shortcut buttons).
    pub fn send_key(&mut self, key: LogicalKey) {
        if self.is_active() {
            self.batcher.keyboard_key(key);
        }
    }

    /// Sends literal text directly (on-screen text box).
    pub fn send_text(&mut self, text: &str) {
        let text = unix_line_endings(text);
        if self.is_active() && !text.is_empty() {
            self.batcher.keyboard_text(&text);
        }
    }

    /// Earliest pending timer deadline across all components.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.gesture.deadline(), self.batcher.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires every timer whose deadline has passed, earliest first.
    ///
    /// Returns how many fired.
    pub fn fire_due_timers(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        loop {
            let gesture = self.gesture.deadline().filter(|d| *d <= now);
            let batch = self.batcher.deadline().filter(|d| *d <= now);
            let ran = match (gesture, batch) {
                (Some(g), Some(b)) if b < g => self.batcher.fire_due(),
                (Some(_), _) => self.gesture.fire_due(&mut self.batcher),
                (None, Some(_)) => self.batcher.fire_due(),
                (None, None) => break,
            };
            if !ran {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Removes queued wire commands, oldest first.
    pub fn drain_outbox(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.batcher.drain()
    }

    /// Stops translation for good and cancels every timer.
    pub fn shutdown(&mut self) {
        self.gesture.reset();
        self.pointer.reset();
        self.batcher.close();
        debug!("input engine shut down");
    }
}

/// The host expects `\n` line breaks whatever the text box produced.
fn unix_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
