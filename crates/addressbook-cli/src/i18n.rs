// crates/addressbook-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize transcript and diagnostic strings for localization.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! Every line the walkthrough prints comes from a small translation catalog.
//! All runtime output should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "addressbook-demo {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    (
        "config.port.invalid",
        "Invalid value for {env}: {value}. Expected a port number between 1 and 65535.",
    ),
    ("config.format.invalid", "Invalid value for {env}: {value}. Expected 'pretty' or 'raw'."),
    ("config.base_url.invalid", "Invalid base URL {value}: {error}"),
    ("config.timeout.invalid", "Invalid timeout {value}: must be at least 1 millisecond."),
    ("client.init_failed", "Failed to initialize the address book client: {error}"),
    ("walkthrough.failed", "Walkthrough aborted: {error}"),
    ("step.user.create", "Creating a user"),
    ("step.token.create", "Creating a token"),
    (
        "step.token.extracted",
        "Extracted token and using it in Authorization header for all subsequent requests: \
         {token}",
    ),
    ("step.contact.create", "Creating a contact"),
    ("step.contact.create_another", "Creating another contact"),
    ("step.contact.list", "Fetching all contacts"),
    ("step.contact.get", "Fetching single contact with ID of {id}"),
    ("step.contact.delete", "Deleting a contact with ID of {id}"),
    ("step.contact_list.create", "Creating a contact-list"),
    ("step.contact_list.create_another", "Creating another contact-list"),
    ("step.contact_list.list", "Fetching all contact-lists"),
    ("step.contact_list.get", "Fetching single contact-list with ID of {id}"),
    ("step.contact_list.delete", "Deleting a contact-list with ID of {id}"),
    ("step.contact_list.search", "Conducting search on contact-lists"),
    ("step.contact_list.search_another", "Conducting another search on contact-lists"),
    ("step.membership.add", "Adding contact ID {contact} to contact-list ID {list}"),
    ("step.membership.list", "Listing contacts of contact-list ID {list}"),
    ("step.membership.remove", "Deleting contact ID {contact} from contact-list ID {list}"),
    ("request.get", "GETing {path}"),
    ("request.get.payload", "GETing to {path} with payload: {payload}"),
    ("request.post", "POSTing to {path}"),
    ("request.post.payload", "POSTing to {path} with payload: {payload}"),
    ("request.delete", "DELETEing {path}"),
    ("request.delete.payload", "DELETEing to {path} with payload: {payload}"),
    ("reply.received", "Received reply: {body}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    ("i18n.disclaimer.machine_translated", "Note: non-English output is machine-translated."),
];

/// Static Catalan catalog entries.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "addressbook-demo {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    (
        "config.port.invalid",
        "Valor no vàlid per a {env}: {value}. S'esperava un número de port entre 1 i 65535.",
    ),
    ("config.format.invalid", "Valor no vàlid per a {env}: {value}. S'esperava 'pretty' o 'raw'."),
    ("config.base_url.invalid", "URL base no vàlida {value}: {error}"),
    ("config.timeout.invalid", "Temps d'espera no vàlid {value}: ha de ser d'almenys 1 mil·lisegon."),
    ("client.init_failed", "No s'ha pogut inicialitzar el client de l'agenda: {error}"),
    ("walkthrough.failed", "Recorregut interromput: {error}"),
    ("step.user.create", "Creant un usuari"),
    ("step.token.create", "Creant un token"),
    (
        "step.token.extracted",
        "S'ha extret el token i s'utilitzarà a la capçalera Authorization per a totes les \
         peticions següents: {token}",
    ),
    ("step.contact.create", "Creant un contacte"),
    ("step.contact.create_another", "Creant un altre contacte"),
    ("step.contact.list", "Obtenint tots els contactes"),
    ("step.contact.get", "Obtenint el contacte amb ID {id}"),
    ("step.contact.delete", "Esborrant el contacte amb ID {id}"),
    ("step.contact_list.create", "Creant una llista de contactes"),
    ("step.contact_list.create_another", "Creant una altra llista de contactes"),
    ("step.contact_list.list", "Obtenint totes les llistes de contactes"),
    ("step.contact_list.get", "Obtenint la llista de contactes amb ID {id}"),
    ("step.contact_list.delete", "Esborrant la llista de contactes amb ID {id}"),
    ("step.contact_list.search", "Fent una cerca a les llistes de contactes"),
    ("step.contact_list.search_another", "Fent una altra cerca a les llistes de contactes"),
    (
        "step.membership.add",
        "Afegint el contacte amb ID {contact} a la llista de contactes amb ID {list}",
    ),
    ("step.membership.list", "Llistant els contactes de la llista de contactes amb ID {list}"),
    (
        "step.membership.remove",
        "Esborrant el contacte amb ID {contact} de la llista de contactes amb ID {list}",
    ),
    ("request.get", "Enviant GET a {path}"),
    ("request.get.payload", "Enviant GET a {path} amb payload: {payload}"),
    ("request.post", "Enviant POST a {path}"),
    ("request.post.payload", "Enviant POST a {path} amb payload: {payload}"),
    ("request.delete", "Enviant DELETE a {path}"),
    ("request.delete.payload", "Enviant DELETE a {path} amb payload: {payload}"),
    ("reply.received", "Resposta rebuda: {body}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the raw catalog entries for the requested locale.
#[must_use]
pub fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
#[must_use]
pub fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    translate_for(current_locale(), key, args)
}

/// Translates `key` for an explicit locale while substituting `args`.
#[must_use]
pub fn translate_for(locale: Locale, key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
