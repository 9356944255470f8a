//! Remote touchpad client: entry point.
//!
//! Connects to a touchpad host, proves knowledge of the shared secret and
//! replays device events (touches, mouse, keys) from a JSON-lines source as
//! pointer and keyboard commands.
//!
//! # Usage
//!
//! ```text
//! touchpad-client [OPTIONS] [URL]
//!
//! Arguments:
//!   [URL]                  Share URL printed by the host, e.g. http://10.0.0.7:38841/#secret
//!
//! Options:
//!   --secret <SECRET>      Shared secret (overrides the URL fragment)
//!   --config <PATH>        TOML settings file
//!   --source <PATH>        JSON-lines event script, "-" for stdin
//!   --keep-open            Stay connected after the source ends
//!   --no-keyboard          Do not forward physical key events
//!   --log-level <LEVEL>    Log level when RUST_LOG is unset
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                  |
//! |-------------------|------------------------------|
//! | `TOUCHPAD_URL`    | Share URL                    |
//! | `TOUCHPAD_SECRET` | Shared secret                |
//! | `RUST_LOG`        | Full `tracing` filter        |
//!
//! Command-line flags win over the settings file, which wins over defaults.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use touchpad_client::application::{run_session, SessionOptions};
use touchpad_client::domain::{ClientSettings, ConfigError, EventInput, SettingsFile};
use touchpad_client::infrastructure::{ChannelAuthenticator, JsonLinesSource};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote touchpad client.
#[derive(Debug, Parser)]
#[command(
    name = "touchpad-client",
    about = "Drive a remote host's pointer and keyboard over an authenticated WebSocket",
    version
)]
struct Cli {
    /// Share URL printed by the host.
    ///
    /// The fragment (after `#`) carries the shared secret.
    #[arg(env = "TOUCHPAD_URL")]
    url: Option<String>,

    /// Shared secret; overrides the URL fragment.
    #[arg(long, env = "TOUCHPAD_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// TOML settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines event script, or `-` for stdin.
    #[arg(long)]
    source: Option<String>,

    /// Stay connected after the event source is exhausted.
    #[arg(long)]
    keep_open: bool,

    /// Do not forward physical key events.
    #[arg(long)]
    no_keyboard: bool,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Merges the flags over the settings file.
    ///
    /// # Errors
    ///
    /// Fails if no URL is given anywhere, the URL is invalid, or no secret
    /// is available.
    fn into_settings(self, file: Option<SettingsFile>) -> anyhow::Result<ClientSettings> {
        let file = file.unwrap_or_default();

        let url = self
            .url
            .or(file.connection.url)
            .ok_or(ConfigError::MissingUrl)?;
        let secret = self.secret.or(file.connection.secret);
        let mut settings = ClientSettings::new(&url, secret)
            .with_context(|| "cannot use the share URL")?;

        settings.source =
            EventInput::parse(self.source.as_deref().unwrap_or(&file.input.source));
        settings.close_on_eof = file.input.close_on_eof && !self.keep_open;
        settings.keyboard_enabled = file.input.keyboard && !self.no_keyboard;
        settings.log_level = self.log_level.unwrap_or(file.logging.level);
        Ok(settings)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// The engine is single-threaded (`Rc` shared clock, no locks), so the
/// runtime is `current_thread`.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let file = cli
        .config
        .take()
        .map(|path| SettingsFile::load(&path))
        .transpose()
        .context("failed to load settings file")?;
    let settings = cli.into_settings(file)?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins when set; otherwise the configured level applies.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    info!(endpoint = %settings.endpoint, source = %settings.source, "touchpad client starting");

    let mut source = match &settings.source {
        EventInput::Stdin => JsonLinesSource::stdin(),
        EventInput::File(path) => JsonLinesSource::open(path).await?,
    };
    let mut channel = ChannelAuthenticator::open(&settings.endpoint, &settings.secret).await?;

    let options = SessionOptions {
        close_on_eof: settings.close_on_eof,
        keyboard_enabled: settings.keyboard_enabled,
    };
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let outcome = run_session(&mut channel, &mut source, options, shutdown).await?;
    info!(?outcome, "touchpad client stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://10.0.0.7:38841/#abc";

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["touchpad-client", URL]);

        // Assert
        assert_eq!(cli.url.as_deref(), Some(URL));
        assert!(!cli.keep_open);
        assert!(!cli.no_keyboard);
        assert_eq!(cli.source, None);
    }

    #[test]
    fn test_into_settings_from_url_only() {
        let settings = Cli::parse_from(["touchpad-client", URL])
            .into_settings(None)
            .unwrap();

        assert_eq!(settings.endpoint.as_str(), "ws://10.0.0.7:38841/ws");
        assert_eq!(settings.secret, "abc");
        assert_eq!(settings.source, EventInput::Stdin);
        assert!(settings.close_on_eof);
        assert!(settings.keyboard_enabled);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_flags_override_settings_file() {
        // Arrange
        let file = SettingsFile::from_toml_str(
            r#"
            [connection]
            url = "http://file-host:1/#filesecret"
            [input]
            source = "from-file.jsonl"
            [logging]
            level = "warn"
            "#,
        )
        .unwrap();
        let cli = Cli::parse_from([
            "touchpad-client",
            "--secret",
            "flagsecret",
            "--source",
            "gestures.jsonl",
            "--keep-open",
            "--no-keyboard",
            "--log-level",
            "debug",
        ]);

        // Act
        let settings = cli.into_settings(Some(file)).unwrap();

        // Assert
        assert_eq!(settings.endpoint.host_str(), Some("file-host"));
        assert_eq!(settings.secret, "flagsecret");
        assert_eq!(
            settings.source,
            EventInput::File(PathBuf::from("gestures.jsonl"))
        );
        assert!(!settings.close_on_eof);
        assert!(!settings.keyboard_enabled);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_settings_file_values_apply_without_flags() {
        let file = SettingsFile::from_toml_str(
            r#"
            [input]
            close_on_eof = false
            keyboard = false
            "#,
        )
        .unwrap();

        let settings = Cli::parse_from(["touchpad-client", URL])
            .into_settings(Some(file))
            .unwrap();

        assert!(!settings.close_on_eof);
        assert!(!settings.keyboard_enabled);
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let cli = Cli {
            url: None,
            secret: None,
            config: None,
            source: None,
            keep_open: false,
            no_keyboard: false,
            log_level: None,
        };

        let err = cli.into_settings(None).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingUrl)
        ));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = Cli::parse_from(["touchpad-client", "http://host:1/"]).into_settings(None);
        assert!(result.is_err());
    }
}
