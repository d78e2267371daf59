//! Lexical/structural URL features.
//!
//! [`extract`] is the single place feature vectors are computed, for every
//! scan flow. The vector layout is defined by [`Feature`]: variants are
//! declared in lexicographic name order and a variant's discriminant is its
//! index. The numeric classifier was fitted on exactly this layout.
//!
//! Individual feature functions never fail. When the URL cannot be split,
//! `has_ip`, `is_valid` and `num_subdirs` are 0.

mod suffix;
mod urlparse;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::trace;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter as EnumIterMacro, IntoStaticStr};

use crate::normalize::ensure_scheme;

pub use suffix::suspicious_tld;

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").expect("dotted quad pattern is a valid regex")
});

/// A single feature, in vector order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, EnumCountMacro, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    /// Occurrences of `@`
    CountAt,
    /// Occurrences of `.`
    CountDots,
    /// Occurrences of `-`
    CountHyphen,
    /// Shannon entropy of the character distribution, in bits
    Entropy,
    /// 1 if the URL starts with `https://`
    HasHttps,
    /// 1 if the netloc is a dotted-quad IPv4 literal
    HasIp,
    /// 1 if the netloc contains a `.`
    IsValid,
    /// Number of non-empty path segments
    NumSubdirs,
    /// 1 if the public suffix is denylisted
    SuspiciousTld,
    /// Length in characters
    UrlLength,
}

impl Feature {
    /// Snake-case name used by the training tooling.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Position of this feature in a [`FeatureVector`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Fixed-order numeric summary of a URL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; Feature::COUNT]);

impl FeatureVector {
    /// Number of values in every vector.
    pub const LEN: usize = Feature::COUNT;

    /// The all-zero vector.
    pub fn zeros() -> Self {
        FeatureVector([0.0; Feature::COUNT])
    }

    /// Builds a vector from raw values already in [`Feature`] order.
    pub fn from_values(values: [f64; Feature::COUNT]) -> Self {
        FeatureVector(values)
    }

    /// Value of one feature.
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Values in vector order.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// `(name, value)` pairs in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Feature::iter().map(move |feature| (feature.name(), self.get(feature)))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Self::LEN))?;
        for (name, value) in self.named() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Computes the feature vector for a raw URL.
///
/// Empty input yields [`FeatureVector::zeros`]. Anything else is first given
/// a scheme by [`ensure_scheme`]; every feature is then computed on that
/// string. Pure: the same input always yields the same vector.
///
/// # Examples
///
/// ```
/// use phish_scan::{extract, Feature};
///
/// let vector = extract("https://www.google.com");
/// assert_eq!(vector.get(Feature::HasHttps), 1.0);
/// assert_eq!(vector.get(Feature::SuspiciousTld), 0.0);
/// assert_eq!(vector.get(Feature::IsValid), 1.0);
/// ```
pub fn extract(raw: &str) -> FeatureVector {
    if raw.is_empty() {
        return FeatureVector::zeros();
    }
    let url = ensure_scheme(raw);

    let mut values = [0.0; Feature::COUNT];
    for feature in Feature::iter() {
        values[feature.index()] = compute(feature, &url);
    }
    let vector = FeatureVector(values);
    trace!("Features for {url}: {vector:?}");
    vector
}

fn compute(feature: Feature, url: &str) -> f64 {
    match feature {
        Feature::CountAt => count_char(url, '@') as f64,
        Feature::CountDots => count_char(url, '.') as f64,
        Feature::CountHyphen => count_char(url, '-') as f64,
        Feature::Entropy => entropy(url),
        // scheme check after case folding; `has_https` itself is literal
        Feature::HasHttps => flag(has_https(&url.to_lowercase())),
        Feature::HasIp => flag(has_ip(url)),
        Feature::IsValid => flag(is_valid(url)),
        Feature::NumSubdirs => num_subdirs(url) as f64,
        Feature::SuspiciousTld => flag(suspicious_tld(url)),
        Feature::UrlLength => url.chars().count() as f64,
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn count_char(url: &str, needle: char) -> usize {
    url.chars().filter(|&c| c == needle).count()
}

/// Shannon entropy (base 2) of the character distribution; 0 for `""`.
pub fn entropy(text: &str) -> f64 {
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    let mut total = 0usize;
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    -counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

/// True if `url` starts with the literal, lower-case `https://`.
pub fn has_https(url: &str) -> bool {
    url.starts_with("https://")
}

/// True if the netloc of `url` is a dotted-quad IPv4 literal.
///
/// The netloc includes userinfo and port, so `user@1.2.3.4` and `1.2.3.4:80`
/// do not count.
pub fn has_ip(url: &str) -> bool {
    urlparse::urlparse(url)
        .map(|parts| DOTTED_QUAD.is_match(&parts.netloc))
        .unwrap_or(false)
}

/// True if the netloc of `url` contains a `.`.
///
/// Re-prefixes `http://` unless `url` starts with a literal lower-case
/// `http`, so `HTTP://x.com` is checked as `http://HTTP://x.com` (netloc
/// `HTTP:`) and is not valid.
pub fn is_valid(url: &str) -> bool {
    let candidate = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("http://{url}")
    };
    urlparse::urlparse(&candidate)
        .map(|parts| parts.netloc.contains('.'))
        .unwrap_or(false)
}

/// Number of non-empty `/`-separated segments in the path of `url`.
pub fn num_subdirs(url: &str) -> usize {
    urlparse::urlparse(url)
        .map(|parts| parts.path.split('/').filter(|s| !s.is_empty()).count())
        .unwrap_or(0)
}
