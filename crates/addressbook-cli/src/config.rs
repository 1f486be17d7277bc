// crates/addressbook-cli/src/config.rs
// ============================================================================
// Module: Walkthrough Configuration
// Description: Resolves base URL, output format, locale, and log level.
// Purpose: Merge command-line overrides with environment defaults.
// Dependencies: addressbook-client, thiserror, tracing
// ============================================================================

//! ## Overview
//! Configuration is resolved in a fixed order: command-line flag, then
//! environment variable, then built-in default. With nothing set the
//! walkthrough targets `http://localhost:8081` and pretty-prints replies.
//! Invalid environment values are rejected rather than ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use addressbook_client::ClientConfig;
use addressbook_client::Credentials;
use addressbook_client::Url;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::i18n::Locale;
use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable selecting the server port.
pub const PORT_ENV: &str = "ADDRESSBOOK_PORT";
/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "ADDRESSBOOK_FORMAT";
/// Environment variable selecting the output language.
pub const LANG_ENV: &str = "ADDRESSBOOK_LANG";
/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "ADDRESSBOOK_LOG";
/// Server port used when none is configured.
pub const DEFAULT_PORT: u16 = 8081;
/// Server host the walkthrough targets.
pub const DEFAULT_HOST: &str = "localhost";
/// Log level used when none (or an unparseable one) is configured.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How reply bodies are rendered in the transcript.
///
/// # Invariants
/// - [`OutputFormat::Pretty`] is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON re-serialized with sorted keys and four-space indentation.
    #[default]
    Pretty,
    /// Body text exactly as received.
    Raw,
}

impl OutputFormat {
    /// Returns the canonical format label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Raw => "raw",
        }
    }

    /// Parses a format label (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

/// Category of a configuration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// Port is not a number in `1..=65535`.
    Port,
    /// Output format label is unknown.
    Format,
    /// Locale label is unknown.
    Locale,
    /// Base URL does not parse.
    BaseUrl,
    /// Timeout is zero.
    Timeout,
}

/// Configuration error carrying a localized message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConfigError {
    /// Failure category.
    kind: ConfigErrorKind,
    /// Human-readable error message.
    message: String,
}

impl ConfigError {
    /// Constructs a new [`ConfigError`].
    const fn new(kind: ConfigErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
        }
    }

    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ConfigErrorKind {
        self.kind
    }
}

/// Environment values relevant to the walkthrough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// Raw `ADDRESSBOOK_PORT` value.
    pub port: Option<String>,
    /// Raw `ADDRESSBOOK_FORMAT` value.
    pub format: Option<String>,
}

impl EnvSnapshot {
    /// Reads the relevant variables from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            port: std::env::var(PORT_ENV).ok(),
            format: std::env::var(FORMAT_ENV).ok(),
        }
    }
}

/// Command-line overrides; `None` defers to the environment or default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Output format flag.
    pub format: Option<OutputFormat>,
    /// Port flag.
    pub port: Option<u16>,
    /// Full base URL flag; replaces host and port.
    pub base_url: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Account credentials for registration and token issuance.
    pub credentials: Credentials,
}

/// Fully resolved walkthrough configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Server base URL.
    pub base_url: Url,
    /// Reply rendering mode.
    pub format: OutputFormat,
    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
    /// Account credentials.
    pub credentials: Credentials,
}

impl DemoConfig {
    /// Resolves overrides against the environment snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any flag or environment value is invalid.
    pub fn resolve(overrides: ConfigOverrides, env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let base_url = match overrides.base_url {
            Some(raw) => parse_base_url(&raw)?,
            None => base_url_for_port(resolve_port(overrides.port, env.port.as_deref())?)?,
        };
        let format = resolve_format(overrides.format, env.format.as_deref())?;
        let timeout = match overrides.timeout_ms {
            Some(0) => {
                return Err(ConfigError::new(
                    ConfigErrorKind::Timeout,
                    t!("config.timeout.invalid", value = 0),
                ));
            }
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };
        Ok(Self {
            base_url,
            format,
            timeout,
            credentials: overrides.credentials,
        })
    }

    /// Builds the client configuration for this walkthrough.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone());
        config.timeout = self.timeout;
        config
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves the server port from a flag, the environment, or the default.
///
/// # Errors
///
/// Returns [`ConfigError`] when the environment value is not a port in `1..=65535`.
pub fn resolve_port(flag: Option<u16>, env_value: Option<&str>) -> Result<u16, ConfigError> {
    if let Some(port) = flag {
        return validate_port(port, &port.to_string(), "--port");
    }
    let Some(value) = env_value else {
        return Ok(DEFAULT_PORT);
    };
    let port = value.trim().parse::<u16>().map_err(|_| invalid_port(PORT_ENV, value))?;
    validate_port(port, value, PORT_ENV)
}

/// Rejects port zero.
fn validate_port(port: u16, raw: &str, source: &str) -> Result<u16, ConfigError> {
    if port == 0 { Err(invalid_port(source, raw)) } else { Ok(port) }
}

/// Builds the invalid-port error.
fn invalid_port(source: &str, value: &str) -> ConfigError {
    ConfigError::new(ConfigErrorKind::Port, t!("config.port.invalid", env = source, value = value))
}

/// Resolves the output format from a flag, the environment, or the default.
///
/// # Errors
///
/// Returns [`ConfigError`] when the environment value is not a known format.
pub fn resolve_format(
    flag: Option<OutputFormat>,
    env_value: Option<&str>,
) -> Result<OutputFormat, ConfigError> {
    if let Some(format) = flag {
        return Ok(format);
    }
    env_value.map_or(Ok(OutputFormat::default()), |value| {
        OutputFormat::parse(value).ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::Format,
                t!("config.format.invalid", env = FORMAT_ENV, value = value),
            )
        })
    })
}

/// Resolves the output locale from a flag, the environment, or English.
///
/// # Errors
///
/// Returns [`ConfigError`] when the environment value is not a supported locale.
pub fn resolve_locale(
    flag: Option<Locale>,
    env_value: Option<&str>,
) -> Result<Locale, ConfigError> {
    if let Some(locale) = flag {
        return Ok(locale);
    }
    if let Some(value) = env_value {
        return Locale::parse(value).ok_or_else(|| {
            ConfigError::new(
                ConfigErrorKind::Locale,
                t!("i18n.lang.invalid_env", env = LANG_ENV, value = value),
            )
        });
    }
    Ok(Locale::En)
}

/// Builds `http://localhost:<port>`.
///
/// # Errors
///
/// Returns [`ConfigError`] when the URL cannot be constructed.
pub fn base_url_for_port(port: u16) -> Result<Url, ConfigError> {
    parse_base_url(&format!("http://{DEFAULT_HOST}:{port}"))
}

/// Parses a base URL supplied on the command line.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|err| {
        ConfigError::new(
            ConfigErrorKind::BaseUrl,
            t!("config.base_url.invalid", value = raw, error = err),
        )
    })
}

/// Parses a log level, falling back to [`DEFAULT_LOG_LEVEL`].
#[must_use]
pub fn log_level_from(value: Option<&str>) -> LevelFilter {
    value.and_then(|raw| raw.trim().parse().ok()).unwrap_or(DEFAULT_LOG_LEVEL)
}
