// crates/addressbook-client/src/lib.rs
// ============================================================================
// Module: Address Book Client
// Description: Blocking HTTP client for the address book REST API.
// Purpose: Describe, send, and decode the requests the walkthrough issues.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate wraps the address book HTTP surface: user registration, token
//! issuance, contact and contact-list CRUD, contact-list search, and list
//! membership. Requests are described by [`ApiRequest`] values, sent by
//! [`AddressBookClient`], and returned as [`ApiReply`] values that expose
//! typed extraction of the `token` and `id` fields used for chaining.
//!
//! Invariants:
//! - The `Authorization` header is attached only after a token is installed.
//! - Non-success statuses, oversized bodies, and missing fields fail fast.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod reply;
pub mod request;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::AddressBookClient;
pub use client::ClientConfig;
pub use client::ClientError;
pub use client::DEFAULT_MAX_RESPONSE_BYTES;
pub use reply::ApiReply;
pub use request::ApiMethod;
pub use request::ApiRequest;
pub use types::BearerToken;
pub use types::Contact;
pub use types::ContactDraft;
pub use types::ContactList;
pub use types::Credentials;
pub use types::ResourceId;
pub use types::TokenGrant;
pub use types::User;

/// URL type used for [`ClientConfig::base_url`].
pub use reqwest::Url;
