// crates/addressbook-client/src/types.rs
// ============================================================================
// Module: Address Book Types
// Description: Identifiers, credentials, and wire records for the API.
// Purpose: Give the values threaded between requests a typed shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Run-scoped values the walkthrough carries forward (identifiers and the
//! bearer token) plus the records the server returns. Wire field names follow
//! the server's JSON (`userID` rather than `user_id`).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Server-assigned identifier for a contact or contact-list.
///
/// # Invariants
/// - Only values obtained from a server reply are used in later requests.
/// - Serializes as a JSON integer; deserializes from an integer or a string
///   of ASCII digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ResourceIdRepr", into = "u64")]
pub struct ResourceId(u64);

impl ResourceId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Reads an identifier from a JSON value, accepting integers and digit strings.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_u64().map(Self),
            Value::String(text) => parse_digits(text).map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ResourceId> for u64 {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

/// Accepted JSON encodings of a [`ResourceId`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceIdRepr {
    /// Plain JSON integer.
    Number(u64),
    /// Digit string.
    Text(String),
}

impl TryFrom<ResourceIdRepr> for ResourceId {
    type Error = String;

    fn try_from(repr: ResourceIdRepr) -> Result<Self, Self::Error> {
        match repr {
            ResourceIdRepr::Number(value) => Ok(Self(value)),
            ResourceIdRepr::Text(text) => {
                parse_digits(&text).map(Self).ok_or_else(|| format!("invalid identifier: {text}"))
            }
        }
    }
}

/// Parses a non-empty string of ASCII digits.
fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Opaque session credential issued by `POST /api/user/token`.
///
/// # Invariants
/// - Never empty.
/// - `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a token string, rejecting empty values.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() { None } else { Some(Self(token)) }
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the full `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Account credentials used for registration and token issuance.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Account email address (registration only).
    pub email: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "user".to_string(),
            password: "password".to_string(),
            email: "some@email.com".to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// Fields submitted when creating a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Email address.
    pub email: String,
}

impl ContactDraft {
    /// Builds a draft from borrowed field values.
    #[must_use]
    pub fn new(name: &str, surname: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Records
// ============================================================================

/// Contact record returned by the contact routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact identifier.
    pub id: ResourceId,
    /// Owning user identifier.
    #[serde(rename = "userID", default)]
    pub user_id: Option<u64>,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Email address.
    pub email: String,
}

/// Contact-list record returned by the contact-list routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    /// Contact-list identifier.
    pub id: ResourceId,
    /// Owning user identifier.
    #[serde(rename = "userID", default)]
    pub user_id: Option<u64>,
    /// Contact-list name.
    pub name: String,
}

/// Account record embedded in a token grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: u64,
    /// Account username.
    pub username: String,
    /// Account email address.
    pub email: String,
}

/// Decoded reply of `POST /api/user/token`.
///
/// # Invariants
/// - `token` is non-empty and redacted in `Debug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Issued session token.
    pub token: BearerToken,
    /// Account the token was issued for, when the reply describes it.
    pub user: Option<User>,
}
