//! Local client settings and the host's share URL.
//!
//! The host prints (and shows as a QR code) a URL such as
//!
//! ```text
//! http://192.168.1.20:38841/#Pq0VpxN5yKGb1kUf
//! ```
//!
//! The part after `#` is the shared secret.  Browsers never send the
//! fragment to the server, so the secret stays out of request lines.  The
//! client derives the WebSocket endpoint from the same URL by resolving
//! `ws` against it and switching `http` → `ws` (`https` → `wss`).
//!
//! # Settings file (for beginners)
//!
//! Every setting can come from the command line, an environment variable,
//! or an optional TOML file.  Explicit flags win over the file.
//!
//! ```toml
//! [connection]
//! url = "http://192.168.1.20:38841/#Pq0VpxN5yKGb1kUf"
//!
//! [input]
//! source = "gestures.jsonl"   # "-" reads stdin
//! close_on_eof = true
//! keyboard = true
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Missing sections and fields fall back to the defaults listed on each
//! field (`#[serde(default = "...")]`).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Error type for settings and share-URL handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`SettingsFile`].
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The share URL could not be parsed at all.
    #[error("invalid share URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The share URL uses a scheme that has no WebSocket equivalent.
    #[error("unsupported URL scheme {0:?}: expected http, https, ws or wss")]
    UnsupportedScheme(String),

    /// The share URL has no host.
    #[error("share URL has no host")]
    MissingHost,

    /// Neither the URL fragment nor an explicit option supplied a secret.
    #[error("no secret: add it to the URL after '#' or pass --secret")]
    MissingSecret,

    /// No share URL was given anywhere.
    #[error("no host URL: pass it as an argument or set [connection] url")]
    MissingUrl,
}

// ── Share URL ─────────────────────────────────────────────────────────────────

/// WebSocket endpoint plus the secret carried in the share URL's fragment.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareTarget {
    pub endpoint: Url,
    pub secret: Option<String>,
}

impl fmt::Debug for ShareTarget {
    // Keep the secret out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareTarget")
            .field("endpoint", &self.endpoint.as_str())
            .field("has_secret", &self.secret.is_some())
            .finish()
    }
}

impl ShareTarget {
    /// Parses a share URL.
    ///
    /// `http`/`https` URLs are page URLs: the endpoint is `ws` resolved
    /// against them.  `ws`/`wss` URLs are taken as the endpoint itself.
    /// In both cases a non-empty fragment becomes the secret.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidUrl`], [`ConfigError::UnsupportedScheme`] or
    /// [`ConfigError::MissingHost`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use touchpad_client::domain::ShareTarget;
    ///
    /// let target = ShareTarget::parse("http://10.0.0.7:8080/#abc").unwrap();
    /// assert_eq!(target.endpoint.as_str(), "ws://10.0.0.7:8080/ws");
    /// assert_eq!(target.secret.as_deref(), Some("abc"));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let page = Url::parse(input.trim()).map_err(|source| ConfigError::InvalidUrl {
            url: input.to_string(),
            source,
        })?;
        if page.host_str().is_none() {
            return Err(ConfigError::MissingHost);
        }
        let secret = page
            .fragment()
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let (mut endpoint, scheme) = match page.scheme() {
            "http" => (resolve_ws(&page, input)?, "ws"),
            "https" => (resolve_ws(&page, input)?, "wss"),
            "ws" | "wss" => (page.clone(), page.scheme()),
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };
        let scheme = scheme.to_string();
        // http(s) and ws(s) are all "special" schemes, so switching between
        // them is always permitted.
        endpoint
            .set_scheme(&scheme)
            .map_err(|()| ConfigError::UnsupportedScheme(scheme.clone()))?;
        endpoint.set_fragment(None);

        Ok(Self { endpoint, secret })
    }
}

fn resolve_ws(page: &Url, input: &str) -> Result<Url, ConfigError> {
    page.join("ws").map_err(|source| ConfigError::InvalidUrl {
        url: input.to_string(),
        source,
    })
}

// ── Settings file schema ──────────────────────────────────────────────────────

/// Contents of the optional TOML settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SettingsFile {
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectionSection {
    /// Share URL printed by the host.
    pub url: Option<String>,
    /// Overrides the secret in the URL fragment.
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSection {
    /// Path of a JSON-lines event script, or `"-"` for stdin.
    #[serde(default = "default_source")]
    pub source: String,
    /// Close the connection when the source runs dry.
    #[serde(default = "default_true")]
    pub close_on_eof: bool,
    /// Forward physical key events.
    #[serde(default = "default_true")]
    pub keyboard: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_source() -> String {
    "-".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            close_on_eof: default_true(),
            keyboard: default_true(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SettingsFile {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or wrong field types.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// if it is not valid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

// ── Resolved settings ─────────────────────────────────────────────────────────

/// Where device events come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventInput {
    Stdin,
    File(PathBuf),
}

impl EventInput {
    /// `"-"` means stdin; anything else is a path.
    pub fn parse(value: &str) -> Self {
        match value {
            "-" => Self::Stdin,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for EventInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("stdin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything the client needs to run one session.
#[derive(Clone)]
pub struct ClientSettings {
    pub endpoint: Url,
    pub secret: String,
    pub source: EventInput,
    pub close_on_eof: bool,
    pub keyboard_enabled: bool,
    pub log_level: String,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("endpoint", &self.endpoint.as_str())
            .field("source", &self.source)
            .field("close_on_eof", &self.close_on_eof)
            .field("keyboard_enabled", &self.keyboard_enabled)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl ClientSettings {
    /// Builds settings for `share_url`, with `secret` overriding the URL
    /// fragment, and defaults for everything else.
    ///
    /// # Errors
    ///
    /// Any [`ShareTarget::parse`] error, or [`ConfigError::MissingSecret`]
    /// if no secret is available from either place.
    pub fn new(share_url: &str, secret: Option<String>) -> Result<Self, ConfigError> {
        let target = ShareTarget::parse(share_url)?;
        let secret = secret
            .or(target.secret)
            .ok_or(ConfigError::MissingSecret)?;
        let input = InputSection::default();
        Ok(Self {
            endpoint: target.endpoint,
            secret,
            source: EventInput::parse(&input.source),
            close_on_eof: input.close_on_eof,
            keyboard_enabled: input.keyboard,
            log_level: default_log_level(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_share_url_becomes_ws_endpoint() {
        // Arrange / Act
        let target = ShareTarget::parse("http://192.168.1.20:38841/#Pq0VpxN5").unwrap();

        // Assert
        assert_eq!(target.endpoint.as_str(), "ws://192.168.1.20:38841/ws");
        assert_eq!(target.secret.as_deref(), Some("Pq0VpxN5"));
    }

    #[test]
    fn test_https_share_url_becomes_wss_endpoint() {
        let target = ShareTarget::parse("https://pad.example.org/#s").unwrap();
        assert_eq!(target.endpoint.as_str(), "wss://pad.example.org/ws");
    }

    #[test]
    fn test_share_url_under_a_path_resolves_relative() {
        let target = ShareTarget::parse("http://host:1/touchpad/#s").unwrap();
        assert_eq!(target.endpoint.as_str(), "ws://host:1/touchpad/ws");
    }

    #[test]
    fn test_ws_url_is_used_verbatim_without_fragment() {
        let target = ShareTarget::parse("ws://127.0.0.1:9000/ws#k").unwrap();
        assert_eq!(target.endpoint.as_str(), "ws://127.0.0.1:9000/ws");
        assert_eq!(target.secret.as_deref(), Some("k"));
    }

    #[test]
    fn test_empty_fragment_is_no_secret() {
        let target = ShareTarget::parse("http://host:1/#").unwrap();
        assert_eq!(target.secret, None);
    }

    #[test]
    fn test_unsupported_scheme_is_rejected() {
        let err = ShareTarget::parse("ftp://host/#s").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_garbage_url_is_rejected() {
        assert!(matches!(
            ShareTarget::parse("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_debug_output_hides_secret() {
        let target = ShareTarget::parse("http://host:1/#topsecret").unwrap();
        assert!(!format!("{target:?}").contains("topsecret"));

        let settings = ClientSettings::new("http://host:1/#topsecret", None).unwrap();
        assert!(!format!("{settings:?}").contains("topsecret"));
    }

    #[test]
    fn test_explicit_secret_overrides_fragment() {
        let settings = ClientSettings::new("http://host:1/#frag", Some("flag".into())).unwrap();
        assert_eq!(settings.secret, "flag");
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        assert!(matches!(
            ClientSettings::new("http://host:1/", None),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn test_client_settings_defaults() {
        let settings = ClientSettings::new("http://host:1/#s", None).unwrap();
        assert_eq!(settings.source, EventInput::Stdin);
        assert!(settings.close_on_eof);
        assert!(settings.keyboard_enabled);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_empty_settings_file_uses_defaults() {
        let file = SettingsFile::from_toml_str("").unwrap();
        assert_eq!(file, SettingsFile::default());
        assert_eq!(file.input.source, "-");
        assert_eq!(file.logging.level, "info");
    }

    #[test]
    fn test_settings_file_partial_sections() {
        // Arrange
        let text = r#"
            [connection]
            url = "http://10.0.0.2:5000/#abc"

            [input]
            close_on_eof = false
        "#;

        // Act
        let file = SettingsFile::from_toml_str(text).unwrap();

        // Assert
        assert_eq!(file.connection.url.as_deref(), Some("http://10.0.0.2:5000/#abc"));
        assert!(!file.input.close_on_eof);
        assert!(file.input.keyboard);
        assert_eq!(file.input.source, "-");
    }

    #[test]
    fn test_settings_file_wrong_type_is_parse_error() {
        let err = SettingsFile::from_toml_str("[input]\nkeyboard = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SettingsFile::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_event_input_parse() {
        assert_eq!(EventInput::parse("-"), EventInput::Stdin);
        assert_eq!(
            EventInput::parse("a.jsonl"),
            EventInput::File(PathBuf::from("a.jsonl"))
        );
        assert_eq!(EventInput::Stdin.to_string(), "stdin");
    }
}
