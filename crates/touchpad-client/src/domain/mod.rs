//! Domain layer for touchpad-client.
//!
//! Pure types with no I/O beyond reading the settings file: where to
//! connect, with which secret, and where device events come from.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio` or WebSocket types
//! - Gesture or protocol logic (that lives in `touchpad-core`)

pub mod config;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::ClientSettings` instead of the longer path.
pub use config::{ClientSettings, ConfigError, EventInput, SettingsFile, ShareTarget};
