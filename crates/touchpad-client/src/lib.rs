//! touchpad-client library crate.
//!
//! Drives a remote host's pointer and keyboard over an authenticated
//! WebSocket, using the gesture recognition and wire protocol from
//! `touchpad-core`.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! device events (JSON lines)
//!         ↓
//! [touchpad-client]
//!   ├── domain/           ClientSettings, share-URL parsing, settings file
//!   ├── application/      The session loop
//!   └── infrastructure/
//!         ├── channel/      Authenticated WebSocket (tokio-tungstenite)
//!         ├── event_source/ Paced JSON-lines reader
//!         └── clock/        tokio-backed engine clock
//!         ↓
//! remote host (text commands over WebSocket)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no async and no networking.
//! - `application` depends on `domain`, `infrastructure` and `touchpad-core`.
//! - `infrastructure` owns every socket, file and timer.

/// Domain layer: settings and share-URL types.
pub mod domain;

/// Application layer: the session loop.
pub mod application;

/// Infrastructure layer: WebSocket channel, event source, clock.
pub mod infrastructure;
