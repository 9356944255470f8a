//! Challenge-response handshake and per-connection channel state.
//!
//! # Handshake (for beginners)
//!
//! Client and host share a secret out-of-band (it is part of the URL the
//! host prints as a QR code).  The secret itself never crosses the wire:
//!
//! ```text
//! Host                                  Client
//! ────                                  ──────
//! send challenge (random text)  ──────▶
//!                               ◀──────  base64(HMAC-SHA256(secret, challenge))
//! send config JSON              ──────▶
//!                               ◀──────  m/s/S/b/k/t commands ...
//! ```
//!
//! Because the challenge changes on every connection, a captured response
//! is useless against the next one.
//!
//! [`ChannelSession`] is the transport-independent half of the channel: it
//! consumes inbound text and tells the caller what to send or deliver.  The
//! WebSocket half lives in the client crate.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::protocol::command::Command;
use crate::protocol::config::RemoteConfig;

type HmacSha256 = Hmac<Sha256>;

/// Computes the handshake reply for `challenge`.
///
/// The result is the standard (padded) base64 encoding of
/// `HMAC-SHA256(key = secret, message = challenge)`.
///
/// # Examples
///
/// ```rust
/// use touchpad_core::protocol::challenge_response;
///
/// assert_eq!(
///     challenge_response("s3cr3t", "abc123"),
///     "Boi2w+Ie6BRKhhklYGXkIhrulXuXOQj7HdyZ4QIanbk="
/// );
/// ```
pub fn challenge_response(secret: &str, challenge: &str) -> String {
    // HMAC is defined for keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(challenge.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Errors raised by the channel state machine.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The post-handshake config message was not valid JSON.  Fatal: the
    /// session is closed when this is returned.
    #[error("malformed config message: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    /// A command was sent before the config arrived.
    #[error("channel is not ready: handshake or config still pending")]
    NotReady,

    /// The channel was used after it closed.
    #[error("channel is closed")]
    Closed,
}

/// Handshake progress of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Connected; waiting for the host's challenge.
    AwaitingChallenge,
    /// Reply sent; waiting for the config object.
    AwaitingConfig,
    /// Config received; commands may be sent.
    Ready,
    /// Terminal.  Nothing may be sent or received.
    Closed,
}

/// What the caller must do with an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Send this text back as the handshake reply.
    HandshakeReply(String),
    /// The config arrived; distribute it to the translators.
    ConfigReceived(RemoteConfig),
    /// A repeated config object after the channel became ready.  The first
    /// config stays in effect for the life of the connection.
    ConfigIgnored,
}

/// Per-connection channel state.
///
/// Created when the transport opens, discarded when it closes.  A fresh
/// connection always needs a fresh `ChannelSession` and a fresh handshake.
pub struct ChannelSession {
    id: Uuid,
    secret: String,
    state: ChannelState,
    authenticated: bool,
    config: Option<RemoteConfig>,
}

impl fmt::Debug for ChannelSession {
    // The secret is deliberately left out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("authenticated", &self.authenticated)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChannelSession {
    /// Starts a session for a newly opened connection.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            secret: secret.into(),
            state: ChannelState::AwaitingChallenge,
            authenticated: false,
            config: None,
        }
    }

    /// Connection identifier used in log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// `true` once the handshake reply has been produced.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// `true` once the config has arrived and the channel is open.
    pub fn is_ready(&self) -> bool {
        self.state == ChannelState::Ready
    }

    /// The config received on this connection, if any.
    pub fn config(&self) -> Option<&RemoteConfig> {
        self.config.as_ref()
    }

    /// Processes one inbound text message.
    ///
    /// The first message is always treated as the challenge, whatever it
    /// contains.  Every later message must be a JSON config object.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::MalformedConfig`] if a config message does not
    ///   parse.  The session is closed before returning.
    /// - [`ChannelError::Closed`] if the session already closed.
    pub fn on_message(&mut self, text: &str) -> Result<ChannelEvent, ChannelError> {
        match self.state {
            ChannelState::Closed => Err(ChannelError::Closed),
            ChannelState::AwaitingChallenge => {
                self.state = ChannelState::AwaitingConfig;
                self.authenticated = true;
                debug!(session = %self.id, "answering handshake challenge");
                Ok(ChannelEvent::HandshakeReply(challenge_response(
                    &self.secret,
                    text,
                )))
            }
            ChannelState::AwaitingConfig | ChannelState::Ready => {
                let config = match RemoteConfig::from_json(text) {
                    Ok(config) => config,
                    Err(e) => {
                        self.state = ChannelState::Closed;
                        return Err(ChannelError::MalformedConfig(e));
                    }
                };
                if self.state == ChannelState::Ready {
                    warn!(session = %self.id, "ignoring repeated config message");
                    return Ok(ChannelEvent::ConfigIgnored);
                }
                info!(session = %self.id, ?config, "channel ready");
                self.state = ChannelState::Ready;
                self.config = Some(config);
                Ok(ChannelEvent::ConfigReceived(config))
            }
        }
    }

    /// Encodes `command` for transmission.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::NotReady`] before the config has arrived.
    /// - [`ChannelError::Closed`] after the session closed.
    pub fn encode_outbound(&self, command: &Command) -> Result<String, ChannelError> {
        match self.state {
            ChannelState::Ready => Ok(command.to_string()),
            ChannelState::Closed => Err(ChannelError::Closed),
            ChannelState::AwaitingChallenge | ChannelState::AwaitingConfig => {
                error!(session = %self.id, state = ?self.state, %command, "command sent before channel was ready");
                Err(ChannelError::NotReady)
            }
        }
    }

    /// Marks the session closed.
    ///
    /// Returns `true` only on the first call, so the caller raises its
    /// "closed" notification exactly once.
    pub fn close(&mut self) -> bool {
        if self.state == ChannelState::Closed {
            return false;
        }
        info!(session = %self.id, "channel closed");
        self.state = ChannelState::Closed;
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
