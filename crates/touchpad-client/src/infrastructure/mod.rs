//! Infrastructure layer for touchpad-client.
//!
//! Everything that touches the outside world: the WebSocket to the host,
//! the device-event input, and the runtime clock.
//!
//! # What does NOT belong here?
//!
//! - Gesture recognition or batching (that is `touchpad-core`)
//! - Deciding what to do with events (that is the application layer)

pub mod channel;
pub mod clock;
pub mod event_source;

// Re-export the primary entry points so the application layer can use
// them concisely.
pub use channel::{ChannelAuthenticator, ChannelNotice};
pub use clock::TokioClock;
pub use event_source::JsonLinesSource;
