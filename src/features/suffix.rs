//! Public-suffix lookup for the `suspicious_tld` feature.
//!
//! Uses the compiled-in Public Suffix List from `psl`. Only the ICANN section
//! counts: when a host falls under a privately operated suffix (for example a
//! hosting provider's `*.example.ru` entry) the lookup walks up to the ICANN
//! suffix above it.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::SUSPICIOUS_TLDS;

static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9+\-.]+:)?//").expect("scheme prefix pattern is a valid regex")
});

/// Returns true if the ICANN public suffix of `url`'s host is denylisted.
///
/// IP literals and hosts without a known suffix are never suspicious.
pub fn suspicious_tld(url: &str) -> bool {
    icann_suffix(url).is_some_and(|suffix| SUSPICIOUS_TLDS.contains(&suffix.as_str()))
}

/// ICANN public suffix of the host in `url`, if any.
pub(crate) fn icann_suffix(url: &str) -> Option<String> {
    let host = extraction_host(url)?;
    if host.parse::<Ipv4Addr>().is_ok() {
        return None;
    }
    // no percent-decoding or IDNA mapping: `%2e` is not a label separator
    lookup_icann(&host)
}

/// Host as the suffix extractor sees it.
///
/// Strips an optional `scheme://`, cuts at the first `/`, `?` or `#`, drops
/// userinfo and port, lower-cases, and removes trailing dots. Bracketed
/// (IPv6) hosts yield `None`.
fn extraction_host(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let after_scheme = match SCHEME_PREFIX.find(trimmed) {
        Some(prefix) => &trimmed[prefix.end()..],
        None => trimmed,
    };

    let netloc = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_and_port = netloc.rsplit_once('@').map_or(netloc, |(_, hp)| hp);
    if host_and_port.starts_with('[') {
        return None;
    }
    let host = host_and_port
        .split(':')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

fn lookup_icann(domain: &str) -> Option<String> {
    let mut candidate = domain.to_string();
    loop {
        let suffix = psl::suffix(candidate.as_bytes())?;
        if !suffix.is_known() {
            return None;
        }
        let text = std::str::from_utf8(suffix.as_bytes()).ok()?.to_string();
        match suffix.typ() {
            Some(psl::Type::Icann) => return Some(text),
            // private rule: retry with the suffix one label up
            _ => {
                let (_, parent) = text.split_once('.')?;
                candidate = parent.to_string();
            }
        }
    }
}
