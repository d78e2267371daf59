//! phish_scan library: phishing scoring for URLs, QR codes, emails and documents
//!
//! Every flow reduces its input to either a fixed-order numeric
//! [`FeatureVector`] or a cleaned text string, hands it to an externally
//! trained classifier, and turns the result into a [`Verdict`].
//!
//! # Example
//!
//! ```no_run
//! use phish_scan::initialization::init_scan_context;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = init_scan_context(Path::new("./models"))?;
//! let verdict = context.scan_url("http://login-paypal-secure.xyz/account")?;
//! println!("{} ({})", verdict.label, verdict.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! The scoring artifacts are loaded once into a [`ScanContext`], which is
//! immutable and can be shared freely between threads.

#![warn(missing_docs)]

pub mod config;
mod decode;
mod error_handling;
mod features;
pub mod initialization;
pub mod normalize;
mod scan;
mod scoring;
mod verdict;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use decode::decode_qr;
pub use error_handling::{
    ArtifactError, DecodeError, ErrorCategory, ErrorPayload, InitializationError, ScanError,
};
pub use features::{
    entropy, extract, has_https, has_ip, is_valid, num_subdirs, suspicious_tld, Feature,
    FeatureVector,
};
pub use scan::{CommandTextExtractor, Flow, ScanContext, TextExtractor, UploadKind};
pub use scoring::{
    Classification, Classifier, DecisionTree, EmailFields, EmailVectorizer, GradientBoosting,
    LogisticRegression, Norm, RandomForest, StandardScaler, TextPipeline, TextScorer,
    TfidfVectorizer, UrlScorer, VectorScorer, Vectorizer,
};
pub use verdict::{ExtractedContent, Label, LabelVocabulary, ScanOutcome, Verdict};
