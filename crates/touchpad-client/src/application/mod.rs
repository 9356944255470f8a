//! Application layer for touchpad-client.
//!
//! Orchestrates one session: waits for the handshake, feeds device events
//! into the input engine and forwards what it produces.  It knows *what*
//! to do; the infrastructure layer knows *how* to talk to the host.

pub mod session;

pub use session::{run_session, SessionOptions, SessionOutcome};
