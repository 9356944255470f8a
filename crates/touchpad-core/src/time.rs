//! Monotonic time and single-shot timer slots.
//!
//! All gesture and batching logic is synchronous.  Deferred work (the
//! drag-release and the throttled emission cycle) is expressed as a
//! [`TimerSlot`] holding an optional deadline; whoever drives the engine
//! sleeps until [`crate::InputEngine::next_deadline`] and then calls
//! [`crate::InputEngine::fire_due_timers`].  This keeps every component
//! testable with a [`ManualClock`] and no async runtime.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Source of monotonic time, measured from an arbitrary origin.
pub trait Clock {
    /// Current time since the clock's origin.
    fn now(&self) -> Duration;
}

/// A clock that only moves when told to.  Cloned handles share one time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Jumps to an absolute time.  Going backwards is not checked.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A single-shot timer: either idle or armed with one deadline.
///
/// Arming an armed slot replaces its deadline, so at most one firing is
/// ever outstanding per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Duration>,
}

impl TimerSlot {
    pub fn arm(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    /// Disarms the slot.  Returns `true` if it was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Disarms and returns `true` if the deadline has been reached.
    pub fn take_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_handles_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(40));
        assert_eq!(other.now(), Duration::from_millis(40));
    }

    #[test]
    fn test_timer_slot_fires_once_at_deadline() {
        // Arrange
        let mut slot = TimerSlot::default();
        slot.arm(Duration::from_millis(100));

        // Act / Assert
        assert!(!slot.take_if_due(Duration::from_millis(99)));
        assert!(slot.take_if_due(Duration::from_millis(100)));
        assert!(!slot.take_if_due(Duration::from_millis(200)));
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_rearming_replaces_deadline() {
        let mut slot = TimerSlot::default();
        slot.arm(Duration::from_millis(10));
        slot.arm(Duration::from_millis(30));
        assert_eq!(slot.deadline(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_cancel_reports_previous_state() {
        let mut slot = TimerSlot::default();
        assert!(!slot.cancel());
        slot.arm(Duration::ZERO);
        assert!(slot.cancel());
    }
}
