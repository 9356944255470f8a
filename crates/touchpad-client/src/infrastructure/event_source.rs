//! Device events read as JSON lines.
//!
//! One [`DeviceEvent`] per line, optionally delayed relative to the
//! previous line with `after_ms`, so recorded gestures replay with their
//! original timing:
//!
//! ```text
//! # tap, then a two-finger scroll
//! {"type":"touch_start","touches":[{"id":0,"x":100,"y":100}]}
//! {"after_ms":60,"type":"touch_end","touches":[{"id":0,"x":100,"y":100}]}
//! {"after_ms":500,"type":"touch_start","touches":[{"id":1,"x":0,"y":0},{"id":2,"x":40,"y":0}]}
//! {"after_ms":16,"type":"touch_move","touches":[{"id":1,"x":0,"y":12},{"id":2,"x":40,"y":12}]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  A line that does
//! not parse is logged and skipped; it never ends the session.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use touchpad_core::DeviceEvent;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    /// Delay after the previous event.
    pub after: Duration,
    pub event: DeviceEvent,
}

/// Parses one script line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns the JSON error for anything else that is not a device event.
pub fn parse_line(line: &str) -> Result<Option<ScriptedEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut value: serde_json::Value = serde_json::from_str(line)?;
    let after_ms = value
        .as_object_mut()
        .and_then(|fields| fields.remove("after_ms"))
        .map(serde_json::from_value::<u64>)
        .transpose()?
        .unwrap_or(0);
    let event = serde_json::from_value(value)?;
    Ok(Some(ScriptedEvent {
        after: Duration::from_millis(after_ms),
        event,
    }))
}

type BoxedReader = Box<dyn AsyncBufRead + Unpin>;

/// Paced reader of JSON-lines device events.
pub struct JsonLinesSource {
    lines: Lines<BoxedReader>,
    /// Parsed event waiting for its release time.
    pending: Option<(Instant, DeviceEvent)>,
    /// Release time of the previous event; pacing is relative to it.
    last_release: Option<Instant>,
    line_no: usize,
}

impl JsonLinesSource {
    pub fn new(reader: impl AsyncBufRead + Unpin + 'static) -> Self {
        let reader: BoxedReader = Box::new(reader);
        Self {
            lines: reader.lines(),
            pending: None,
            last_release: None,
            line_no: 0,
        }
    }

    /// Reads events from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Reads events from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open event script {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }

    /// Returns the next event once its delay has elapsed, or `None` at end
    /// of input.
    ///
    /// Cancel-safe: an event whose delay is still running is kept and
    /// returned by the next call.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading the underlying input fails.
    pub async fn next_event(&mut self) -> anyhow::Result<Option<DeviceEvent>> {
        loop {
            if let Some(due) = self.pending.as_ref().map(|(due, _)| *due) {
                sleep_until(due).await;
                if let Some((due, event)) = self.pending.take() {
                    self.last_release = Some(due);
                    return Ok(Some(event));
                }
            }

            let Some(line) = self
                .lines
                .next_line()
                .await
                .context("failed to read device events")?
            else {
                debug!(lines = self.line_no, "event source exhausted");
                return Ok(None);
            };
            self.line_no += 1;

            match parse_line(&line) {
                Ok(Some(scripted)) => {
                    let base = self.last_release.unwrap_or_else(Instant::now);
                    self.pending = Some((base + scripted.after, scripted.event));
                }
                Ok(None) => {}
                Err(e) => warn!(line = self.line_no, "skipping invalid device event: {e}"),
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
