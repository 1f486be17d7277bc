// crates/addressbook-cli/src/main.rs
// ============================================================================
// Module: Address Book Demo Entry Point
// Description: Command-line front end for the address book walkthrough.
// Purpose: Resolve configuration, run the walkthrough, and map failures to exit codes.
// Dependencies: addressbook-cli, addressbook-client, clap, thiserror, tracing-subscriber
// ============================================================================

//! ## Overview
//! `addressbook-demo` runs the full address book walkthrough against a server
//! on `localhost` and prints a transcript to stdout. Diagnostics and log
//! output go to stderr. Any failure ends the process with a non-zero status.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::process::ExitCode;

use addressbook_cli::config::ConfigOverrides;
use addressbook_cli::config::DemoConfig;
use addressbook_cli::config::EnvSnapshot;
use addressbook_cli::config::LANG_ENV;
use addressbook_cli::config::LOG_ENV;
use addressbook_cli::config::OutputFormat;
use addressbook_cli::config::log_level_from;
use addressbook_cli::config::resolve_locale;
use addressbook_cli::i18n::Locale;
use addressbook_cli::i18n::set_locale;
use addressbook_cli::t;
use addressbook_cli::transcript::Transcript;
use addressbook_cli::walkthrough::Walkthrough;
use addressbook_client::AddressBookClient;
use addressbook_client::Credentials;
use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use thiserror::Error;
use tracing::info;
use tracing::level_filters::LevelFilter;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "addressbook-demo", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Preferred output language (overrides `ADDRESSBOOK_LANG`).
    #[arg(long, value_enum, value_name = "LANG")]
    lang: Option<LangArg>,
    /// Reply rendering (overrides `ADDRESSBOOK_FORMAT`).
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<FormatArg>,
    /// Server port on localhost (overrides `ADDRESSBOOK_PORT`).
    #[arg(long, value_name = "PORT", conflicts_with = "base_url")]
    port: Option<u16>,
    /// Full server base URL, replacing host and port.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Per-request timeout in milliseconds (no timeout when omitted).
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
    /// Username to register and authenticate.
    #[arg(long, value_name = "NAME")]
    username: Option<String>,
    /// Password to register and authenticate.
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,
    /// Email address to register.
    #[arg(long, value_name = "EMAIL")]
    email: Option<String>,
}

impl Cli {
    /// Collects flag values that override environment and defaults.
    fn overrides(&self) -> ConfigOverrides {
        let defaults = Credentials::default();
        ConfigOverrides {
            format: self.format.map(Into::into),
            port: self.port,
            base_url: self.base_url.clone(),
            timeout_ms: self.timeout_ms,
            credentials: Credentials {
                username: self.username.clone().unwrap_or(defaults.username),
                password: self.password.clone().unwrap_or(defaults.password),
                email: self.email.clone().unwrap_or(defaults.email),
            },
        }
    }
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

/// Supported reply rendering selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum FormatArg {
    /// Sorted keys with four-space indentation.
    Pretty,
    /// Body text exactly as received.
    Raw,
}

/// Converts CLI language selections into locales.
impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

/// Converts CLI format selections into output formats.
impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pretty => Self::Pretty,
            FormatArg::Raw => Self::Raw,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Resolves configuration and runs the walkthrough.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing(log_level_from(std::env::var(LOG_ENV).ok().as_deref()));

    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang.map(Into::into), env_lang.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = DemoConfig::resolve(cli.overrides(), &EnvSnapshot::from_process())
        .map_err(|err| CliError::new(err.to_string()))?;
    let client = AddressBookClient::new(config.client_config())
        .map_err(|err| CliError::new(t!("client.init_failed", error = err)))?;
    info!(
        base_url = %config.base_url,
        format = config.format.as_str(),
        locale = locale.as_str(),
        "configuration resolved"
    );

    let transcript = Transcript::new(std::io::stdout().lock(), config.format);
    let mut walkthrough = Walkthrough::new(client, config.credentials, transcript);
    walkthrough.run().map_err(|err| CliError::new(t!("walkthrough.failed", error = err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Installs the stderr log subscriber.
fn init_tracing(level: LevelFilter) {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
