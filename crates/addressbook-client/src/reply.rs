// crates/addressbook-client/src/reply.rs
// ============================================================================
// Module: Address Book Replies
// Description: Successful reply bodies and typed field extraction.
// Purpose: Pull the `token` and `id` values needed to chain requests.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`ApiReply`] holds the raw body of a successful reply. The body is only
//! parsed as JSON when a caller asks for it, so empty bodies (deletions and
//! membership changes) stay usable as plain text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ClientError;
use crate::request::ApiMethod;
use crate::types::BearerToken;
use crate::types::ResourceId;
use crate::types::TokenGrant;
use crate::types::User;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A fully read, successful reply.
///
/// # Invariants
/// - `status` is a 2xx code.
/// - `body` is bounded by the client's size limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    /// Method of the request that produced this reply.
    method: ApiMethod,
    /// Path of the request that produced this reply.
    path: String,
    /// HTTP status code.
    status: u16,
    /// Raw reply body.
    body: Vec<u8>,
}

impl ApiReply {
    /// Wraps a reply body.
    #[must_use]
    pub fn new(method: ApiMethod, path: impl Into<String>, status: u16, body: Vec<u8>) -> Self {
        Self {
            method,
            path: path.into(),
            status,
            body,
        }
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` when the body is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Parses the body as an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Json`] when the body is not valid JSON.
    pub fn json_value(&self) -> Result<Value, ClientError> {
        serde_json::from_slice(&self.body).map_err(|err| {
            ClientError::Json(format!("invalid json reply from {}: {err}", self.route()))
        })
    }

    /// Decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Json`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.body).map_err(|err| {
            ClientError::Json(format!("unexpected reply from {}: {err}", self.route()))
        })
    }

    /// Returns a top-level field of a JSON object reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Json`] when the body is not a JSON object and
    /// [`ClientError::MissingField`] when the field is absent.
    pub fn field(&self, field: &'static str) -> Result<Value, ClientError> {
        let Value::Object(mut map) = self.json_value()? else {
            let route = self.route();
            return Err(ClientError::Json(format!("reply from {route} is not a json object")));
        };
        map.remove(field).ok_or_else(|| ClientError::MissingField {
            field,
            path: self.path.clone(),
        })
    }

    /// Extracts the `id` of a newly created resource.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when `id` is absent or not a non-negative integer.
    pub fn created_id(&self) -> Result<ResourceId, ClientError> {
        let value = self.field("id")?;
        ResourceId::from_json(&value).ok_or_else(|| ClientError::FieldType {
            field: "id",
            path: self.path.clone(),
            expected: "a non-negative integer",
        })
    }

    /// Decodes a token grant, requiring a non-empty `token`.
    ///
    /// The embedded `user` record is optional; a malformed one is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when `token` is absent or not a non-empty string.
    pub fn token_grant(&self) -> Result<TokenGrant, ClientError> {
        let token = match self.field("token")? {
            Value::String(token) => BearerToken::new(token),
            _ => None,
        };
        let token = token.ok_or_else(|| ClientError::FieldType {
            field: "token",
            path: self.path.clone(),
            expected: "a non-empty string",
        })?;
        let user =
            self.field("user").ok().and_then(|value| serde_json::from_value::<User>(value).ok());
        Ok(TokenGrant {
            token,
            user,
        })
    }

    /// Extracts the session `token` from a token grant.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when `token` is absent or not a non-empty string.
    pub fn bearer_token(&self) -> Result<BearerToken, ClientError> {
        self.token_grant().map(|grant| grant.token)
    }

    /// Method and path label used in error messages.
    fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}
