//! Runtime clock for the input engine.

use std::time::Duration;

use tokio::time::Instant;
use touchpad_core::Clock;

/// Monotonic clock backed by tokio's `Instant`, so paused-time tests move
/// it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Converts an engine deadline back into a tokio instant.
    pub fn instant_at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
