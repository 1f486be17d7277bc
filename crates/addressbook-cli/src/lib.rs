// crates/addressbook-cli/src/lib.rs
// ============================================================================
// Module: Address Book Walkthrough Library
// Description: Shared configuration, transcript, and runner for the demo CLI.
// Purpose: Expose the walkthrough so binaries and tests drive the same code.
// Dependencies: addressbook-client, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! The walkthrough exercises every address book endpoint in a fixed order,
//! chaining the token and resource ids from earlier replies into later
//! requests. Each step is narrated to a [`transcript::Transcript`] in the
//! selected locale.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod i18n;
pub mod transcript;
pub mod walkthrough;
