//! # touchpad-core
//!
//! Input translation and wire protocol for a remote touchpad client.
//!
//! This crate has no I/O and no async runtime.  It turns raw device events
//! (touches, mouse motion, key presses) into the short text commands a
//! remote host understands, and holds the per-connection handshake state.
//! The `touchpad-client` crate supplies the WebSocket and the event loop.
//!
//! # Architecture overview (for beginners)
//!
//! ```text
//! DeviceEvent ──▶ GestureRecognizer / PointerTranslator / KeyTranslator
//!                                  │
//!                                  ▼
//!                            InputBatcher ──▶ Command ──▶ "m3;-1", "b0;1", ...
//! ```
//!
//! - **`protocol`** – The handshake (`ChannelSession`, `challenge_response`),
//!   the host's tunables (`RemoteConfig`) and the command grammar
//!   (`Command`, `LogicalKey`, `PointerButton`).
//!
//! - **`input`** – The translators.  The gesture recognizer reads intent
//!   from finger count, distance and timing; the batcher coalesces motion
//!   into whole pixels and throttles it to the host's update rate.
//!
//! - **`time`** – A `Clock` trait and single-shot `TimerSlot`s, so timing
//!   logic runs (and is tested) without sleeping.
//!
//! - **`engine`** – `InputEngine`, the assembled pipeline.

pub mod engine;
pub mod input;
pub mod protocol;
pub mod time;

// Re-export the most-used types at the crate root so callers can write
// `touchpad_core::InputEngine` instead of `touchpad_core::engine::InputEngine`.
pub use engine::InputEngine;
pub use input::{DeviceEvent, InputSink, KeyEvent, TouchPoint, WheelMode};
pub use protocol::{
    challenge_response, ChannelError, ChannelEvent, ChannelSession, ChannelState, Command,
    CommandParseError, LogicalKey, PointerButton, RemoteConfig,
};
pub use time::{Clock, ManualClock, TimerSlot};
