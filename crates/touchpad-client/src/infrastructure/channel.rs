//! WebSocket transport for the authenticated command channel.
//!
//! [`ChannelAuthenticator`] owns the WebSocket and a
//! [`touchpad_core::ChannelSession`].  It answers the host's challenge on
//! its own; the caller only ever sees the config arriving and, eventually,
//! the channel closing.
//!
//! # Lifecycle
//!
//! ```text
//! open() ──▶ next_event(): challenge → reply (internal)
//!            next_event(): config    → ChannelNotice::Config
//!            send(command) ...
//!            next_event():            → ChannelNotice::Closed   (exactly once)
//! ```
//!
//! A malformed config closes the socket and is returned as an error; the
//! channel is then closed for good and no `Closed` notice follows.

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use touchpad_core::{ChannelError, ChannelEvent, ChannelSession, Command, RemoteConfig};

/// What the channel reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelNotice {
    /// The host's config arrived; the channel is now ready for commands.
    Config(RemoteConfig),
    /// The connection ended.  Reported once.
    Closed,
}

/// An authenticated WebSocket connection to the host.
pub struct ChannelAuthenticator<S = MaybeTlsStream<TcpStream>> {
    ws: WebSocketStream<S>,
    session: ChannelSession,
    closed: bool,
}

impl ChannelAuthenticator {
    /// Connects to `endpoint` and prepares to answer the challenge.
    ///
    /// Only plain `ws://` endpoints are supported; `wss://` fails here.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection or the WebSocket upgrade fails.
    pub async fn open(endpoint: &Url, secret: &str) -> anyhow::Result<Self> {
        let (ws, response) = connect_async(endpoint.as_str())
            .await
            .with_context(|| format!("failed to connect to {endpoint}"))?;
        debug!(status = %response.status(), "WebSocket upgrade complete");
        let channel = Self::from_stream(ws, secret);
        info!(session = %channel.session_id(), %endpoint, "connected");
        Ok(channel)
    }
}

impl<S> ChannelAuthenticator<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-upgraded WebSocket.
    pub fn from_stream(ws: WebSocketStream<S>, secret: &str) -> Self {
        Self {
            ws,
            session: ChannelSession::new(secret),
            closed: false,
        }
    }

    /// Connection identifier for log lines.
    pub fn session_id(&self) -> Uuid {
        self.session.id()
    }

    pub fn is_ready(&self) -> bool {
        !self.closed && self.session.is_ready()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Waits for the next thing the owner must act on.
    ///
    /// The challenge is answered internally.  Repeated configs are ignored.
    /// This method is cancel-safe: a message is fully handled before the
    /// next `await` on the socket.
    ///
    /// # Errors
    ///
    /// - The config was malformed (the socket is closed first).
    /// - The handshake reply could not be sent.
    /// - Called again after [`ChannelNotice::Closed`] was reported.
    pub async fn next_event(&mut self) -> anyhow::Result<ChannelNotice> {
        loop {
            if self.closed {
                return Err(ChannelError::Closed.into());
            }
            let frame = match self.ws.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    return Ok(self.mark_closed("stream ended"));
                }
                Some(Err(e)) => {
                    warn!(session = %self.session.id(), "WebSocket error: {e}");
                    return Ok(self.mark_closed("transport error"));
                }
            };

            let text = match frame {
                WsMessage::Text(text) => text,
                WsMessage::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => text,
                    Err(_) => {
                        warn!(session = %self.session.id(), "ignoring non-UTF-8 binary frame");
                        continue;
                    }
                },
                WsMessage::Close(frame) => {
                    debug!(session = %self.session.id(), ?frame, "close frame received");
                    return Ok(self.mark_closed("closed by host"));
                }
                // Pongs are queued by tungstenite and flushed on the next write.
                WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
            };

            match self.session.on_message(&text) {
                Ok(ChannelEvent::HandshakeReply(reply)) => {
                    self.ws
                        .send(WsMessage::Text(reply))
                        .await
                        .context("failed to send handshake reply")?;
                }
                Ok(ChannelEvent::ConfigReceived(config)) => {
                    return Ok(ChannelNotice::Config(config));
                }
                Ok(ChannelEvent::ConfigIgnored) => {}
                Err(e @ ChannelError::MalformedConfig(_)) => {
                    self.closed = true;
                    if let Err(close_err) = self.ws.close(None).await {
                        debug!("close after malformed config failed: {close_err}");
                    }
                    return Err(anyhow::Error::new(e).context("host sent an invalid config"));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Sends one command.
    ///
    /// # Errors
    ///
    /// Fails before the channel is ready, after it closed, or if the
    /// socket write fails.
    pub async fn send(&mut self, command: &Command) -> anyhow::Result<()> {
        self.send_all(std::slice::from_ref(command)).await
    }

    /// Sends several commands in order with a single flush.
    ///
    /// # Errors
    ///
    /// Same as [`ChannelAuthenticator::send`].
    pub async fn send_all(&mut self, commands: &[Command]) -> anyhow::Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        if self.closed {
            return Err(ChannelError::Closed.into());
        }
        for command in commands {
            let text = self.session.encode_outbound(command)?;
            debug!(session = %self.session.id(), %command, "send");
            self.ws
                .feed(WsMessage::Text(text))
                .await
                .context("failed to queue command")?;
        }
        self.ws.flush().await.context("failed to send commands")
    }

    /// Closes the connection from this side.
    ///
    /// Returns `true` if this call closed it, `false` if it was already
    /// closed.  No `Closed` notice is produced for a local close.
    pub async fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        self.session.close();
        if let Err(e) = self.ws.close(None).await {
            debug!("WebSocket close failed: {e}");
        }
        true
    }

    fn mark_closed(&mut self, reason: &str) -> ChannelNotice {
        self.closed = true;
        self.session.close();
        info!(session = %self.session.id(), reason, "connection closed");
        ChannelNotice::Closed
    }
}
