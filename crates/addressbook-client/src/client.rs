// crates/addressbook-client/src/client.rs
// ============================================================================
// Module: Address Book HTTP Client
// Description: Blocking client that sends address book requests.
// Purpose: Attach session credentials, enforce limits, and fail fast.
// Dependencies: reqwest, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`AddressBookClient`] sends [`ApiRequest`] values to a single base URL and
//! returns the fully read reply. Once a [`BearerToken`] is installed every
//! request carries it in the `Authorization` header; before that no
//! credentials are sent. Any non-success status aborts with
//! [`ClientError::Status`].
//!
//! Security posture: server replies are untrusted; bodies are size-limited
//! and tokens never appear in logs or `Debug` output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;
use std::time::Instant;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::reply::ApiReply;
use crate::request::ApiRequest;
use crate::types::BearerToken;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default maximum reply body size accepted by the client.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = concat!("addressbook-demo/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Client configuration.
///
/// # Invariants
/// - `base_url` uses the `http` or `https` scheme and can act as a base.
/// - A path on `base_url` is kept as a prefix for every route.
/// - `timeout = None` waits indefinitely for each reply.
/// - `max_response_bytes` is a hard upper bound on reply bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (for example `http://localhost:8081` or
    /// `http://host:8081/addressbook/`).
    pub base_url: Url,
    /// Optional per-request timeout.
    pub timeout: Option<Duration>,
    /// Maximum reply size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl ClientConfig {
    /// Builds a configuration with default limits for `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Address book client errors.
///
/// # Invariants
/// - Variants are stable for CLI error mapping and tests.
/// - `body` payloads are untrusted server text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("address book client config error: {0}")]
    Config(String),
    /// Transport error (connect, send, or read failure).
    #[error("address book transport error: {0}")]
    Transport(String),
    /// Server replied with a non-success status.
    #[error("{method} {path} returned http status {status}: {body}")]
    Status {
        /// Request method label.
        method: &'static str,
        /// Request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Trimmed reply body.
        body: String,
    },
    /// Reply size exceeds limits.
    #[error("address book reply exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Actual (or advertised) size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
    /// JSON encoding or decoding error.
    #[error("address book json error: {0}")]
    Json(String),
    /// A field needed for chaining is absent from the reply.
    #[error("reply from {path} is missing field `{field}`")]
    MissingField {
        /// Missing field name.
        field: &'static str,
        /// Request path that produced the reply.
        path: String,
    },
    /// A field needed for chaining has the wrong shape.
    #[error("field `{field}` in reply from {path} is not {expected}")]
    FieldType {
        /// Offending field name.
        field: &'static str,
        /// Request path that produced the reply.
        path: String,
        /// Description of the expected shape.
        expected: &'static str,
    },
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking address book client.
///
/// # Invariants
/// - Requests are sent one at a time and each reply is fully read.
/// - `bearer_token` is `None` until [`AddressBookClient::install_token`] runs.
pub struct AddressBookClient {
    /// Reqwest client instance.
    client: Client,
    /// Server base URL.
    base_url: Url,
    /// Session token attached to requests once installed.
    bearer_token: Option<BearerToken>,
    /// Reply size limit in bytes.
    max_response_bytes: usize,
}

impl std::fmt::Debug for AddressBookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressBookClient")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("max_response_bytes", &self.max_response_bytes)
            .finish_non_exhaustive()
    }
}

impl AddressBookClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the base URL is unusable and
    /// [`ClientError::Transport`] when the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        match config.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::Config(format!("unsupported base url scheme: {other}")));
            }
        }
        if config.base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base url cannot be joined with paths: {}",
                config.base_url
            )));
        }
        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let prefix = format!("{}/", base_url.path());
            base_url.set_path(&prefix);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            bearer_token: None,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the server base URL, normalized to end with `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Installs the session token; every later request carries it.
    pub fn install_token(&mut self, token: BearerToken) {
        self.bearer_token = Some(token);
    }

    /// Returns the installed session token, if any.
    #[must_use]
    pub const fn bearer_token(&self) -> Option<&BearerToken> {
        self.bearer_token.as_ref()
    }

    /// Sends `request` and returns the fully read reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the request cannot be sent, the reply is
    /// oversized, or the server answers with a non-success status.
    pub fn execute(&self, request: &ApiRequest) -> Result<ApiReply, ClientError> {
        let url = self.url_for(request.path())?;
        let headers = self.headers(request.payload().is_some())?;
        let mut builder = self.client.request(request.method().to_reqwest(), url).headers(headers);
        if let Some(payload) = request.payload() {
            let body = serde_json::to_vec(payload).map_err(|err| {
                ClientError::Json(format!("payload serialization failed: {err}"))
            })?;
            builder = builder.body(body);
        }

        let started = Instant::now();
        let mut response = builder.send().map_err(|err| {
            ClientError::Transport(format!(
                "{} {} failed: {err}",
                request.method().as_str(),
                request.path()
            ))
        })?;
        let status = response.status();
        let body = read_response_limited(&mut response, self.max_response_bytes)?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(
            method = request.method().as_str(),
            path = request.path(),
            status = status.as_u16(),
            elapsed_ms,
            authenticated = self.bearer_token.is_some(),
            "address book request completed"
        );

        if !status.is_success() {
            warn!(
                method = request.method().as_str(),
                path = request.path(),
                status = status.as_u16(),
                "address book request rejected"
            );
            let preview = String::from_utf8_lossy(&body);
            return Err(ClientError::Status {
                method: request.method().as_str(),
                path: request.path().to_string(),
                status: status.as_u16(),
                body: preview.trim().to_string(),
            });
        }
        Ok(ApiReply::new(request.method(), request.path(), status.as_u16(), body))
    }

    /// Resolves a route path beneath the base URL path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the path cannot be joined.
    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::Config(format!("invalid request path {path}: {err}")))
    }

    /// Builds request headers, attaching the bearer token when installed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the token is not a valid header value.
    fn headers(&self, has_body: bool) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = &self.bearer_token {
            let mut header = HeaderValue::from_str(&token.header_value())
                .map_err(|_| ClientError::Config("invalid bearer token header".to_string()))?;
            header.set_sensitive(true);
            headers.insert(AUTHORIZATION, header);
        }
        Ok(headers)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a reply body while enforcing a hard byte limit.
///
/// # Errors
///
/// Returns [`ClientError`] when the body exceeds `max_bytes`, cannot be read,
/// or is shorter than its advertised length.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, ClientError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ClientError::Config("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(ClientError::ResponseTooLarge {
            actual: usize::try_from(expected).unwrap_or(usize::MAX),
            limit: max_bytes,
        });
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|err| ClientError::Transport(format!("failed to read reply: {err}")))?;
    if buf.len() > max_bytes {
        return Err(ClientError::ResponseTooLarge {
            actual: buf.len(),
            limit: max_bytes,
        });
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| ClientError::Transport("invalid reply length".to_string()))?;
        if buf.len() < expected {
            return Err(ClientError::Transport("reply truncated".to_string()));
        }
    }
    Ok(buf)
}
