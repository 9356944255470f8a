//! The client session loop.
//!
//! One task, one thread.  A single `select!` multiplexes everything that
//! can happen:
//!
//! ```text
//!            ┌──────────── Ctrl+C / shutdown ──────────────┐
//!            │                                             ▼
//! channel ──▶ config ──▶ InputEngine::configure          stop
//! source  ──▶ DeviceEvent ──▶ InputEngine::dispatch
//! timer   ──▶ InputEngine::fire_due_timers
//!                 │
//!                 └──▶ drain_outbox ──▶ channel.send_all
//! ```
//!
//! The source is only polled once the channel is ready, so nothing can
//! reach the host before the handshake and config are complete.  Because
//! every branch runs to completion before the next `select!`, the engine is
//! never touched concurrently and needs no locks.

use std::future::Future;
use std::rc::Rc;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use touchpad_core::{Command, InputEngine};

use crate::infrastructure::{ChannelAuthenticator, ChannelNotice, JsonLinesSource, TokioClock};

/// Behaviour switches for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// End the session once the source is exhausted and pending timers
    /// have fired.  Otherwise stay connected until the host closes.
    pub close_on_eof: bool,
    /// Forward physical key events.
    pub keyboard_enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            close_on_eof: true,
            keyboard_enabled: true,
        }
    }
}

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The host closed the connection.
    HostClosed,
    /// The event source ran dry and `close_on_eof` was set.
    SourceExhausted,
    /// The shutdown future completed (Ctrl+C).
    Interrupted,
}

/// Runs one connection from handshake to close.
///
/// The engine's timers are cancelled and the channel is closed (if the
/// host has not already closed it) whatever the outcome.
///
/// # Errors
///
/// Returns an error if the host sent an invalid config, the event input
/// failed, or a send failed.
pub async fn run_session<S>(
    channel: &mut ChannelAuthenticator<S>,
    source: &mut JsonLinesSource,
    options: SessionOptions,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<SessionOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let clock = TokioClock::new();
    let mut engine = InputEngine::new(Rc::new(clock));
    engine.set_keyboard_enabled(options.keyboard_enabled);

    let result = drive(&mut engine, clock, channel, source, options, shutdown).await;

    engine.shutdown();
    if channel.close().await {
        debug!(session = %channel.session_id(), "closed connection from client side");
    }
    match &result {
        Ok(outcome) => info!(session = %channel.session_id(), ?outcome, "session ended"),
        Err(e) => info!(session = %channel.session_id(), "session failed: {e:#}"),
    }
    result
}

async fn drive<S>(
    engine: &mut InputEngine,
    clock: TokioClock,
    channel: &mut ChannelAuthenticator<S>,
    source: &mut JsonLinesSource,
    options: SessionOptions,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<SessionOutcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tokio::pin!(shutdown);
    let mut source_open = true;

    loop {
        if !source_open && options.close_on_eof && engine.next_deadline().is_none() {
            return Ok(SessionOutcome::SourceExhausted);
        }

        let ready = channel.is_ready();
        let deadline = engine.next_deadline().map(|d| clock.instant_at(d));

        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("shutdown requested");
                return Ok(SessionOutcome::Interrupted);
            }

            notice = channel.next_event() => match notice? {
                ChannelNotice::Config(config) => engine.configure(config),
                ChannelNotice::Closed => return Ok(SessionOutcome::HostClosed),
            },

            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                engine.fire_due_timers();
            }

            event = source.next_event(), if ready && source_open => match event? {
                Some(event) => {
                    engine.dispatch(&event);
                }
                None => {
                    debug!("device events exhausted");
                    source_open = false;
                }
            },
        }

        let commands: Vec<Command> = engine.drain_outbox().collect();
        channel
            .send_all(&commands)
            .await
            .context("failed to forward input")?;
    }
}
