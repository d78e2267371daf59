//! TF-IDF vectorizers for the text scoring paths.
//!
//! Word tokens are runs of two or more word characters between word
//! boundaries. A term's weight is `tf * idf`, where `tf` is the raw count (or
//! `1 + ln(count)` with `sublinear_tf`), and the row is then normalized.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error_handling::ArtifactError;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"));

/// Turns some input into a fixed-width numeric row.
pub trait Vectorizer: Send + Sync {
    /// What the vectorizer consumes.
    type Input: ?Sized;

    /// Width of every produced row.
    fn width(&self) -> usize;

    /// Vectorizes one input.
    fn transform(&self, input: &Self::Input) -> Vec<f64>;
}

/// Row normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Euclidean norm
    L2,
    /// Sum of absolute values
    L1,
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// A fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    /// Lower-case input before tokenizing
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Row normalization, `null` for none
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Inclusive range of word n-gram lengths
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    /// Checks vocabulary/idf consistency.
    pub fn validate(&self, name: &str) -> Result<(), ArtifactError> {
        let width = self.idf.len();
        if width == 0 {
            return Err(ArtifactError::shape(name, "empty vocabulary"));
        }
        if self.vocabulary.len() != width {
            return Err(ArtifactError::shape(
                name,
                format!(
                    "{} vocabulary terms but {} idf weights",
                    self.vocabulary.len(),
                    width
                ),
            ));
        }
        let out_of_range = self
            .vocabulary
            .iter()
            .find(|(_, index)| **index >= width);
        if let Some((term, index)) = out_of_range {
            return Err(ArtifactError::shape(
                name,
                format!("term '{term}' maps to column {index} of {width}"),
            ));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::shape(
                name,
                format!("invalid ngram range ({min_n}, {max_n})"),
            ));
        }
        Ok(())
    }

    fn terms(&self, text: &str) -> Vec<String> {
        let prepared = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&prepared)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }
}

impl Vectorizer for TfidfVectorizer {
    type Input = str;

    fn width(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Vec<f64> {
        let mut row = vec![0.0_f64; self.width()];
        for term in self.terms(text) {
            if let Some(&column) = self.vocabulary.get(&term) {
                row[column] += 1.0;
            }
        }
        for (column, value) in row.iter_mut().enumerate() {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * self.idf[column];
            }
        }

        let norm = match self.norm {
            Some(Norm::L2) => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|v| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }
        row
    }
}

/// Cleaned inputs of the email scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailFields {
    /// Cleaned message body
    pub text: String,
    /// Cleaned sender domain
    pub domain: String,
}

/// Two TF-IDF vectorizers whose rows are concatenated: body then domain.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailVectorizer {
    /// Vectorizer for the message body
    pub text: TfidfVectorizer,
    /// Vectorizer for the sender domain
    pub domain: TfidfVectorizer,
}

impl EmailVectorizer {
    /// Validates both halves.
    pub fn validate(&self, name: &str) -> Result<(), ArtifactError> {
        self.text.validate(&format!("{name} (text)"))?;
        self.domain.validate(&format!("{name} (domain)"))
    }
}

impl Vectorizer for EmailVectorizer {
    type Input = EmailFields;

    fn width(&self) -> usize {
        self.text.width() + self.domain.width()
    }

    fn transform(&self, input: &EmailFields) -> Vec<f64> {
        let mut row = self.text.transform(&input.text);
        row.extend(self.domain.transform(&input.domain));
        row
    }
}
