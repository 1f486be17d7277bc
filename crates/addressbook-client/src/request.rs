// crates/addressbook-client/src/request.rs
// ============================================================================
// Module: Address Book Requests
// Description: Typed descriptions of every address book route.
// Purpose: Keep route paths and payload shapes in one place.
// Dependencies: reqwest, serde_json
// ============================================================================

//! ## Overview
//! An [`ApiRequest`] is a method, a path relative to the server base URL, and
//! an optional JSON payload. Constructors exist for each route the
//! walkthrough touches so callers never assemble paths by hand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::Method;
use serde_json::Value;
use serde_json::json;

use crate::types::ContactDraft;
use crate::types::Credentials;
use crate::types::ResourceId;

// ============================================================================
// SECTION: Routes
// ============================================================================

/// User registration route.
pub const USER_PATH: &str = "/api/user";
/// Token issuance route.
pub const TOKEN_PATH: &str = "/api/user/token";
/// Contact collection route.
pub const CONTACT_PATH: &str = "/api/contact";
/// Contact-list collection route.
pub const CONTACT_LIST_PATH: &str = "/api/contact-list";
/// Contact-list search route.
pub const CONTACT_LIST_SEARCH_PATH: &str = "/api/contact-list/search";

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP methods used by the address book API.
///
/// # Invariants
/// - Variants are stable for transcript rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    /// Read a resource or collection.
    Get,
    /// Create a resource or submit a query.
    Post,
    /// Remove a resource or membership.
    Delete,
}

impl ApiMethod {
    /// Returns the canonical method label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Returns the matching reqwest method.
    #[must_use]
    pub fn to_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request against the address book API.
///
/// # Invariants
/// - `path` is absolute (starts with `/`) and relative to the server base URL.
/// - `field_order` lists payload keys in the order the route declares them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Request method.
    method: ApiMethod,
    /// Route path.
    path: String,
    /// Optional JSON body.
    payload: Option<Value>,
    /// Declared order of top-level payload keys.
    field_order: &'static [&'static str],
}

impl ApiRequest {
    /// Builds a request without a body.
    #[must_use]
    pub fn new(method: ApiMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            field_order: &[],
        }
    }

    /// Builds a request carrying a JSON body.
    #[must_use]
    pub fn with_payload(method: ApiMethod, path: impl Into<String>, payload: Value) -> Self {
        Self {
            method,
            path: path.into(),
            payload: Some(payload),
            field_order: &[],
        }
    }

    /// Builds a request whose payload keys have a declared display order.
    fn with_fields(
        method: ApiMethod,
        path: impl Into<String>,
        field_order: &'static [&'static str],
        payload: Value,
    ) -> Self {
        Self {
            field_order,
            ..Self::with_payload(method, path, payload)
        }
    }

    /// Returns the request method.
    #[must_use]
    pub const fn method(&self) -> ApiMethod {
        self.method
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Returns the declared order of top-level payload keys.
    ///
    /// Keys missing from this list follow in map order.
    #[must_use]
    pub const fn field_order(&self) -> &'static [&'static str] {
        self.field_order
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// `POST /api/user` with username, password, and email.
    #[must_use]
    pub fn register_user(credentials: &Credentials) -> Self {
        Self::with_fields(
            ApiMethod::Post,
            USER_PATH,
            &["username", "password", "email"],
            json!({
                "username": credentials.username,
                "password": credentials.password,
                "email": credentials.email,
            }),
        )
    }

    /// `POST /api/user/token` with username and password.
    #[must_use]
    pub fn create_token(credentials: &Credentials) -> Self {
        Self::with_fields(
            ApiMethod::Post,
            TOKEN_PATH,
            &["username", "password"],
            json!({
                "username": credentials.username,
                "password": credentials.password,
            }),
        )
    }

    // ------------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------------

    /// `POST /api/contact`.
    #[must_use]
    pub fn create_contact(draft: &ContactDraft) -> Self {
        Self::with_fields(
            ApiMethod::Post,
            CONTACT_PATH,
            &["name", "surname", "email"],
            json!({
                "name": draft.name,
                "surname": draft.surname,
                "email": draft.email,
            }),
        )
    }

    /// `GET /api/contact`.
    #[must_use]
    pub fn list_contacts() -> Self {
        Self::new(ApiMethod::Get, CONTACT_PATH)
    }

    /// `GET /api/contact/{id}`.
    #[must_use]
    pub fn get_contact(id: ResourceId) -> Self {
        Self::new(ApiMethod::Get, format!("{CONTACT_PATH}/{id}"))
    }

    /// `DELETE /api/contact/{id}`.
    #[must_use]
    pub fn delete_contact(id: ResourceId) -> Self {
        Self::new(ApiMethod::Delete, format!("{CONTACT_PATH}/{id}"))
    }

    // ------------------------------------------------------------------------
    // Contact-lists
    // ------------------------------------------------------------------------

    /// `POST /api/contact-list`.
    #[must_use]
    pub fn create_contact_list(name: &str) -> Self {
        Self::with_payload(ApiMethod::Post, CONTACT_LIST_PATH, json!({ "name": name }))
    }

    /// `GET /api/contact-list`.
    #[must_use]
    pub fn list_contact_lists() -> Self {
        Self::new(ApiMethod::Get, CONTACT_LIST_PATH)
    }

    /// `GET /api/contact-list/{id}`.
    #[must_use]
    pub fn get_contact_list(id: ResourceId) -> Self {
        Self::new(ApiMethod::Get, format!("{CONTACT_LIST_PATH}/{id}"))
    }

    /// `DELETE /api/contact-list/{id}`.
    #[must_use]
    pub fn delete_contact_list(id: ResourceId) -> Self {
        Self::new(ApiMethod::Delete, format!("{CONTACT_LIST_PATH}/{id}"))
    }

    /// `POST /api/contact-list/search`.
    #[must_use]
    pub fn search_contact_lists(term: &str) -> Self {
        Self::with_payload(ApiMethod::Post, CONTACT_LIST_SEARCH_PATH, json!({ "term": term }))
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    /// `POST /api/contact-list/{list}/contact` with the contact id.
    #[must_use]
    pub fn add_to_contact_list(list: ResourceId, contact: ResourceId) -> Self {
        Self::with_payload(ApiMethod::Post, membership_path(list), json!({ "id": contact }))
    }

    /// `GET /api/contact-list/{list}/contact`.
    #[must_use]
    pub fn list_contact_list_members(list: ResourceId) -> Self {
        Self::new(ApiMethod::Get, membership_path(list))
    }

    /// `DELETE /api/contact-list/{list}/contact` with the contact id.
    #[must_use]
    pub fn remove_from_contact_list(list: ResourceId, contact: ResourceId) -> Self {
        Self::with_payload(ApiMethod::Delete, membership_path(list), json!({ "id": contact }))
    }
}

/// Builds the membership route for a contact-list.
fn membership_path(list: ResourceId) -> String {
    format!("{CONTACT_LIST_PATH}/{list}/contact")
}
