// crates/addressbook-cli/src/transcript.rs
// ============================================================================
// Module: Walkthrough Transcript
// Description: Narrates requests and replies to an output stream.
// Purpose: Keep transcript formatting separate from request sequencing.
// Dependencies: addressbook-client, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Transcript`] writes one line per narration event: a step heading, the
//! request being sent (with its JSON payload when present), and the reply
//! received. Steps are separated by a blank line. Reply bodies are rendered
//! according to [`OutputFormat`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;

use addressbook_client::ApiMethod;
use addressbook_client::ApiReply;
use addressbook_client::ApiRequest;
use addressbook_client::ClientError;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::config::OutputFormat;
use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Indentation used for pretty-printed replies.
const PRETTY_INDENT: &[u8] = b"    ";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while narrating a step.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Reply body could not be rendered in the selected format.
    #[error(transparent)]
    Render(#[from] ClientError),
    /// Writing to the output stream failed.
    #[error(transparent)]
    Output(#[from] io::Error),
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// Line-oriented narration sink.
pub struct Transcript<W: Write> {
    /// Destination stream.
    out: W,
    /// Reply rendering mode.
    format: OutputFormat,
    /// Whether a step has already been narrated.
    started: bool,
}

impl<W: Write> Transcript<W> {
    /// Creates a transcript writing to `out`.
    pub const fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            started: false,
        }
    }

    /// Returns the reply rendering mode.
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Consumes the transcript, returning the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Starts a new step, separating it from the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the stream rejects the write.
    pub fn heading(&mut self, heading: &str) -> io::Result<()> {
        if self.started {
            writeln!(self.out)?;
        }
        self.started = true;
        self.line(heading)
    }

    /// Writes a single line.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the stream rejects the write.
    pub fn line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    /// Narrates an outgoing request.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the stream rejects the write.
    pub fn request(&mut self, request: &ApiRequest) -> io::Result<()> {
        self.line(&describe_request(request))
    }

    /// Narrates a received reply.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError`] when the body cannot be rendered or written.
    pub fn reply(&mut self, reply: &ApiReply) -> Result<(), TranscriptError> {
        let body = render_reply(reply, self.format)?;
        self.line(&t!("reply.received", body = body))?;
        Ok(())
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the flush fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Describes a request as a localized transcript line.
#[must_use]
pub fn describe_request(request: &ApiRequest) -> String {
    let path = request.path();
    let payload = request.payload().map(|payload| inline_json(payload, request.field_order()));
    match (request.method(), payload) {
        (ApiMethod::Get, None) => t!("request.get", path = path),
        (ApiMethod::Get, Some(payload)) => {
            t!("request.get.payload", path = path, payload = payload)
        }
        (ApiMethod::Post, None) => t!("request.post", path = path),
        (ApiMethod::Post, Some(payload)) => {
            t!("request.post.payload", path = path, payload = payload)
        }
        (ApiMethod::Delete, None) => t!("request.delete", path = path),
        (ApiMethod::Delete, Some(payload)) => {
            t!("request.delete.payload", path = path, payload = payload)
        }
    }
}

/// Renders `value` on one line with `", "` and `": "` separators.
///
/// Top-level object keys listed in `order` come first, in that order.
#[must_use]
pub fn inline_json(value: &Value, order: &[&str]) -> String {
    match value {
        Value::Object(map) => {
            let rest = map.keys().map(String::as_str).filter(|key| !order.contains(key));
            let fields: Vec<String> = order
                .iter()
                .copied()
                .chain(rest)
                .filter_map(|key| {
                    let field = map.get(key)?;
                    let label = Value::String(key.to_string());
                    Some(format!("{label}: {}", inline_json(field, &[])))
                })
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(|item| inline_json(item, &[])).collect();
            format!("[{}]", items.join(", "))
        }
        scalar => scalar.to_string(),
    }
}

/// Renders a reply body for the transcript.
///
/// Blank bodies are rendered verbatim in both modes.
///
/// # Errors
///
/// Returns [`ClientError::Json`] when pretty mode meets a non-JSON body.
pub fn render_reply(reply: &ApiReply, format: OutputFormat) -> Result<String, ClientError> {
    match format {
        OutputFormat::Raw => Ok(reply.text().into_owned()),
        OutputFormat::Pretty if reply.is_blank() => Ok(reply.text().into_owned()),
        OutputFormat::Pretty => pretty_json(&reply.json_value()?),
    }
}

/// Serializes `value` with sorted keys and four-space indentation.
///
/// # Errors
///
/// Returns [`ClientError::Json`] when serialization fails.
pub fn pretty_json(value: &Value) -> Result<String, ClientError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| ClientError::Json(format!("failed to render reply: {err}")))?;
    String::from_utf8(buf)
        .map_err(|err| ClientError::Json(format!("failed to render reply: {err}")))
}
