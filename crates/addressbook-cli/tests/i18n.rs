// crates/addressbook-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog through the public API.
// Purpose: Ensure transcript strings route through stable i18n helpers.
// Dependencies: addressbook-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the public i18n surface:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](addressbook_cli::t) macro formats placeholders correctly.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use addressbook_cli::i18n::Locale;
use addressbook_cli::i18n::MessageArg;
use addressbook_cli::i18n::current_locale;
use addressbook_cli::i18n::translate;
use addressbook_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/api/contact");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/api/contact");
}

/// Confirms English is used until a locale is selected.
#[test]
fn default_locale_is_english() {
    assert_eq!(current_locale(), Locale::En);
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let result = translate("step.contact_list.get", vec![MessageArg::new("id", "3")]);
    assert_eq!(result, "Fetching single contact-list with ID of 3");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the t! macro formats named arguments.
#[test]
fn t_macro_formats_message() {
    let rendered = t!("step.membership.add", contact = 2, list = 1);
    assert_eq!(rendered, "Adding contact ID 2 to contact-list ID 1");
    let version = t!("main.version", version = "0.1.0");
    assert_eq!(version, "addressbook-demo 0.1.0");
}
