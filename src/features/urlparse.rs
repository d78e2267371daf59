//! Netloc/path splitting compatible with the training-time URL parser.
//!
//! The classifier was fitted on features computed from a generic
//! `scheme://netloc/path;params?query#fragment` split that keeps userinfo and
//! port inside the netloc and performs no host normalization. `url::Url`
//! normalizes hosts, paths and backslashes, which would shift `has_ip`,
//! `is_valid` and `num_subdirs` for exactly the odd URLs phishers produce, so
//! the split is done by hand here.

use std::net::Ipv6Addr;

use thiserror::Error;

/// Characters allowed in a URL scheme.
fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// A URL split into the components features are computed from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SplitUrl {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
}

/// Ways the split can fail. Callers map these to a zero feature value.
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum UrlParseError {
    #[error("unbalanced brackets in netloc '{0}'")]
    UnbalancedBrackets(String),

    #[error("invalid bracketed host in netloc '{0}'")]
    InvalidBracketedHost(String),
}

/// Splits `url` into scheme, netloc and path.
///
/// Leading control characters and spaces are dropped and tabs/newlines are
/// removed before splitting. `;params` after the last path segment are not
/// part of the returned path.
pub(crate) fn urlparse(url: &str) -> Result<SplitUrl, UrlParseError> {
    let cleaned: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();
    let mut rest = cleaned.as_str();

    let mut scheme = String::new();
    if let Some(colon) = rest.find(':') {
        let candidate = &rest[..colon];
        let starts_alpha = candidate
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        if starts_alpha && candidate.chars().all(is_scheme_char) {
            scheme = candidate.to_ascii_lowercase();
            rest = &rest[colon + 1..];
        }
    }

    let mut netloc = "";
    if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes
            .find(['/', '?', '#'])
            .unwrap_or(after_slashes.len());
        netloc = &after_slashes[..end];
        rest = &after_slashes[end..];
        check_brackets(netloc)?;
    }

    // fragment, then query
    if let Some(hash) = rest.find('#') {
        rest = &rest[..hash];
    }
    if let Some(question) = rest.find('?') {
        rest = &rest[..question];
    }

    let path = if uses_params(&scheme) {
        strip_params(rest)
    } else {
        rest
    };

    Ok(SplitUrl {
        scheme,
        netloc: netloc.to_string(),
        path: path.to_string(),
    })
}

fn uses_params(scheme: &str) -> bool {
    matches!(
        scheme,
        "" | "ftp"
            | "hdl"
            | "prospero"
            | "http"
            | "imap"
            | "https"
            | "shttp"
            | "rtsp"
            | "rtsps"
            | "rtspu"
            | "sip"
            | "sips"
            | "mms"
            | "sftp"
            | "tel"
    )
}

/// Drops `;params` from the last path segment.
fn strip_params(path: &str) -> &str {
    let search_from = path.rfind('/').unwrap_or(0);
    match path[search_from..].find(';') {
        Some(offset) => &path[..search_from + offset],
        None => path,
    }
}

fn check_brackets(netloc: &str) -> Result<(), UrlParseError> {
    let has_open = netloc.contains('[');
    let has_close = netloc.contains(']');
    if has_open != has_close {
        return Err(UrlParseError::UnbalancedBrackets(netloc.to_string()));
    }
    if !has_open {
        return Ok(());
    }

    let host_and_port = netloc.rsplit_once('@').map_or(netloc, |(_, hp)| hp);
    let invalid = || UrlParseError::InvalidBracketedHost(netloc.to_string());
    let host = match host_and_port.split_once('[') {
        Some((before, bracketed)) => {
            if !before.is_empty() {
                return Err(invalid());
            }
            let (host, port) = bracketed.split_once(']').unwrap_or((bracketed, ""));
            if !port.is_empty() && !port.starts_with(':') {
                return Err(invalid());
            }
            host
        }
        // brackets only in the userinfo; the real host must still be IPv6
        None => host_and_port.split(':').next().unwrap_or(""),
    };
    if is_ip_future(host) {
        return Ok(());
    }
    let address = host.split_once('%').map_or(host, |(addr, _zone)| addr);
    address
        .parse::<Ipv6Addr>()
        .map(|_| ())
        .map_err(|_| invalid())
}

/// `vX.anything` literals reserved for future address formats.
fn is_ip_future(host: &str) -> bool {
    let Some(body) = host.strip_prefix('v') else {
        return false;
    };
    let Some((version, address)) = body.split_once('.') else {
        return false;
    };
    !version.is_empty() && version.chars().all(|c| c.is_ascii_hexdigit()) && !address.is_empty()
}
