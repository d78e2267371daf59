//! Input canonicalization.
//!
//! Each scoring path was trained on a specific canonical form, so each has
//! its own transformation here:
//! - [`ensure_scheme`] - structural URL parsing (feature extraction)
//! - [`link_text`] - URL text fed to the link vectorizer
//! - [`clean_text`] - email bodies and document text
//! - [`clean_domain`] - email sender domains
//!
//! None of these can fail; any string (including the empty string) maps to
//! some canonical string.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_SCHEME_PREFIX;

static SCHEME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://").expect("scheme pattern is a valid regex")
});

static NON_URL_CHAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9./]").expect("URL character pattern is a valid regex")
});

static EMBEDDED_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"http\S+").expect("embedded URL pattern is a valid regex")
});

static NON_LETTER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z\s]").expect("letter pattern is a valid regex")
});

static WHITESPACE_RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("whitespace pattern is a valid regex")
});

/// Canonical forms a raw string can be brought into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum Canonicalization {
    /// Scheme inserted, case preserved. Used for structural features.
    Structural,
    /// Lower-cased, scheme stripped, reduced to `[a-z0-9./]`.
    LinkText,
}

impl Canonicalization {
    /// Applies this canonicalization to `raw`.
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Canonicalization::Structural => ensure_scheme(raw),
            Canonicalization::LinkText => link_text(raw),
        }
    }
}

/// Prepends `http://` unless `raw` already starts with `http` (any case).
///
/// # Examples
///
/// ```
/// use phish_scan::normalize::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com/login"), "http://example.com/login");
/// assert_eq!(ensure_scheme("HTTPS://Example.com"), "HTTPS://Example.com");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let has_http_prefix = raw
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));
    if has_http_prefix {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{raw}")
    }
}

/// Canonical form of a URL for the link-text vectorizer.
///
/// Lower-cases, removes every `http://`/`https://` occurrence, then drops
/// anything outside `[a-zA-Z0-9./]`.
pub fn link_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_scheme = SCHEME_PATTERN.replace_all(&lowered, "");
    NON_URL_CHAR_PATTERN
        .replace_all(&without_scheme, "")
        .into_owned()
}

/// Canonical form of free text (email bodies, document text).
///
/// Lower-cases, removes `http...` runs, keeps only ASCII letters and
/// whitespace, then collapses whitespace runs to one space and trims.
pub fn clean_text(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let without_urls = EMBEDDED_URL_PATTERN.replace_all(&lowered, "");
    let letters_only = NON_LETTER_PATTERN.replace_all(&without_urls, "");
    WHITESPACE_RUN_PATTERN
        .replace_all(&letters_only, " ")
        .trim()
        .to_string()
}

/// Canonical form of an email sender domain: lower-cased, `www.` removed.
pub fn clean_domain(raw: &str) -> String {
    raw.to_lowercase().replace("www.", "").trim().to_string()
}
