//! Verdicts returned to callers.
//!
//! Field names match the JSON the scanners have always produced:
//! `prediction`, `confidence`, and optionally `qr_content` or
//! `extracted_text`. A QR scan that finds no code is not an error and
//! serializes as `{"error": "No QR code detected"}`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use strum_macros::{Display, EnumIter};

use crate::config::NO_QR_CODE_MESSAGE;
use crate::scoring::Classification;

/// Human-readable verdict label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum Label {
    /// The legitimate class
    Legit,
    /// Non-legitimate URL, link or QR payload
    Phishing,
    /// Non-legitimate email or document
    Fake,
}

/// Which word a flow uses for the non-legitimate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum LabelVocabulary {
    /// URL, link-text and QR flows
    Phishing,
    /// Email and document flows
    Fake,
}

impl LabelVocabulary {
    /// Maps a classification onto this vocabulary.
    pub fn label(&self, classification: &Classification) -> Label {
        if classification.is_legit() {
            Label::Legit
        } else {
            match self {
                LabelVocabulary::Phishing => Label::Phishing,
                LabelVocabulary::Fake => Label::Fake,
            }
        }
    }
}

/// Original content echoed back with a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedContent {
    /// Payload decoded from a QR code
    QrContent(String),
    /// Text extracted from a document (trimmed)
    ExtractedText(String),
}

/// A labeled, confidence-scored classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Verdict label
    #[serde(rename = "prediction")]
    pub label: Label,
    /// Probability of the predicted class, rounded to three decimals
    pub confidence: f64,
    /// Content the verdict was computed from, for QR and document scans
    #[serde(flatten)]
    pub extracted: Option<ExtractedContent>,
}

impl Verdict {
    /// Builds a verdict from a classification.
    pub fn new(classification: Classification, vocabulary: LabelVocabulary) -> Self {
        Verdict {
            label: vocabulary.label(&classification),
            confidence: classification.confidence,
            extracted: None,
        }
    }

    /// Attaches the content the verdict was computed from.
    pub fn with_content(mut self, content: ExtractedContent) -> Self {
        self.extracted = Some(content);
        self
    }
}

/// Successful result of a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The input was scored.
    Verdict(Verdict),
    /// The image was valid but contained no readable QR code.
    NoQrCode,
}

impl ScanOutcome {
    /// The verdict, if the input was scored.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            ScanOutcome::Verdict(verdict) => Some(verdict),
            ScanOutcome::NoQrCode => None,
        }
    }
}

impl From<Verdict> for ScanOutcome {
    fn from(verdict: Verdict) -> Self {
        ScanOutcome::Verdict(verdict)
    }
}

impl Serialize for ScanOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScanOutcome::Verdict(verdict) => verdict.serialize(serializer),
            ScanOutcome::NoQrCode => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", NO_QR_CODE_MESSAGE)?;
                map.end()
            }
        }
    }
}
