//! Configuration constants.
//!
//! This module defines the fixed tables the scanners rely on: the TLD
//! denylist, upload allow-lists and the on-disk artifact layout.

/// Public suffixes that mark a URL as suspicious.
pub const SUSPICIOUS_TLDS: &[&str] = &["xyz", "top", "club", "gdn", "loan", "info", "biz", "ru"];

/// Scheme prepended to URLs that do not start with `http`.
pub const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// File suffixes accepted by the QR scanner (matched case-insensitively).
pub const QR_IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Extensions accepted by the document scanner (matched case-insensitively).
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Number of decimals kept in reported confidences.
pub const CONFIDENCE_DECIMALS: usize = 3;

/// Message reported when an image contains no decodable QR code.
pub const NO_QR_CODE_MESSAGE: &str = "No QR code detected";

/// Placeholder substituted with the temporary file path in extractor commands.
pub const EXTRACTOR_PATH_PLACEHOLDER: &str = "{path}";

// Artifact layout, relative to the model directory

/// Classifier for the URL feature vector (shared by the URL and QR flows).
pub const QR_MODEL_FILE: &str = "qr_model.json";
/// Scaler applied to the URL feature vector.
pub const QR_SCALER_FILE: &str = "scaler.json";
/// Classifier for link text.
pub const LINK_MODEL_FILE: &str = "link_model.json";
/// TF-IDF vectorizer for link text.
pub const LINK_VECTORIZER_FILE: &str = "link_vectorizer.json";
/// Classifier for emails.
pub const EMAIL_MODEL_FILE: &str = "email_model.json";
/// Body and sender-domain vectorizers for emails.
pub const EMAIL_VECTORIZER_FILE: &str = "email_vectorizer.json";
/// Classifier for document text.
pub const DOC_MODEL_FILE: &str = "doc_model.json";
/// TF-IDF vectorizer for document text.
pub const DOC_VECTORIZER_FILE: &str = "doc_vectorizer.json";

/// Default model directory when neither the CLI nor the environment sets one.
pub const DEFAULT_MODEL_DIR: &str = "./models";
