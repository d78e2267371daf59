//! Scan flows.
//!
//! A [`ScanContext`] owns every loaded scorer and is built once at startup.
//! It is immutable afterwards, so one context can be shared by reference
//! across any number of concurrent callers.
//!
//! | flow | input path | vocabulary |
//! |---|---|---|
//! | [`ScanContext::scan_url`] | feature vector | Phishing |
//! | [`ScanContext::scan_link`] | link text | Phishing |
//! | [`ScanContext::scan_qr`] | decoded payload, feature vector | Phishing |
//! | [`ScanContext::scan_email`] | cleaned body and sender domain | Fake |
//! | [`ScanContext::scan_document`] | extracted text | Fake |

mod extractor;
mod upload;

use std::path::Path;

use log::{debug, info};
use strum_macros::{Display, EnumIter};

use crate::config::{
    DOC_MODEL_FILE, DOC_VECTORIZER_FILE, EMAIL_MODEL_FILE, EMAIL_VECTORIZER_FILE, LINK_MODEL_FILE,
    LINK_VECTORIZER_FILE, QR_MODEL_FILE, QR_SCALER_FILE,
};
use crate::decode::decode_qr;
use crate::error_handling::{ArtifactError, ScanError};
use crate::features::extract;
use crate::normalize::{clean_domain, clean_text, link_text};
use crate::scoring::{
    EmailFields, EmailVectorizer, TextPipeline, TextScorer, TfidfVectorizer, UrlScorer,
    VectorScorer,
};
use crate::verdict::{ExtractedContent, LabelVocabulary, ScanOutcome, Verdict};

pub use extractor::{CommandTextExtractor, TextExtractor};
pub use upload::UploadKind;

/// The scan flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Flow {
    /// URL submitted directly
    Url,
    /// URL scored from its link text
    Link,
    /// URL embedded in a QR image
    Qr,
    /// Email body and sender domain
    Email,
    /// Uploaded PDF or DOCX
    Document,
}

impl Flow {
    /// Label vocabulary used by this flow.
    pub fn vocabulary(&self) -> LabelVocabulary {
        match self {
            Flow::Url | Flow::Link | Flow::Qr => LabelVocabulary::Phishing,
            Flow::Email | Flow::Document => LabelVocabulary::Fake,
        }
    }
}

/// Every scorer the flows need.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub(crate) url: UrlScorer,
    pub(crate) link: TextPipeline<TfidfVectorizer>,
    pub(crate) email: TextPipeline<EmailVectorizer>,
    pub(crate) document: TextPipeline<TfidfVectorizer>,
}

impl ScanContext {
    /// Loads and validates every artifact under `model_dir`.
    ///
    /// Fails on the first missing, unreadable or inconsistent artifact.
    pub fn load(model_dir: &Path) -> Result<Self, ArtifactError> {
        info!("Loading scoring artifacts from {}", model_dir.display());
        Ok(ScanContext {
            url: UrlScorer::load(model_dir, QR_SCALER_FILE, QR_MODEL_FILE)?,
            link: TextPipeline::<TfidfVectorizer>::load(
                model_dir,
                LINK_VECTORIZER_FILE,
                LINK_MODEL_FILE,
            )?,
            email: TextPipeline::<EmailVectorizer>::load(
                model_dir,
                EMAIL_VECTORIZER_FILE,
                EMAIL_MODEL_FILE,
            )?,
            document: TextPipeline::<TfidfVectorizer>::load(
                model_dir,
                DOC_VECTORIZER_FILE,
                DOC_MODEL_FILE,
            )?,
        })
    }

    /// Scores a URL from its structural features.
    pub fn scan_url(&self, raw: &str) -> Result<Verdict, ScanError> {
        require_url(raw)?;
        Ok(self.score_url(raw))
    }

    /// Scores a URL from its link text.
    pub fn scan_link(&self, raw: &str) -> Result<Verdict, ScanError> {
        require_url(raw)?;
        let text = link_text(raw);
        debug!("link text: {}", text);
        let classification = self.link.classify_text(text.as_str());
        Ok(Verdict::new(classification, Flow::Link.vocabulary()))
    }

    /// Decodes a QR image and scores its payload as a URL.
    ///
    /// The filename is checked before any decoding. A valid image without a
    /// readable code yields [`ScanOutcome::NoQrCode`].
    pub fn scan_qr(&self, filename: &str, bytes: &[u8]) -> Result<ScanOutcome, ScanError> {
        UploadKind::QrImage.check(filename)?;
        let Some(payload) = decode_qr(bytes)? else {
            info!("No QR code found in {}", filename);
            return Ok(ScanOutcome::NoQrCode);
        };
        debug!("QR payload from {}: {}", filename, payload);
        let verdict = self
            .score_url(&payload)
            .with_content(ExtractedContent::QrContent(payload));
        Ok(verdict.into())
    }

    /// Scores an email from its body and sender domain.
    pub fn scan_email(&self, text: &str, sender_domain: &str) -> Result<Verdict, ScanError> {
        let fields = EmailFields {
            text: clean_text(text),
            domain: clean_domain(sender_domain),
        };
        let classification = self.email.classify_text(&fields);
        Ok(Verdict::new(classification, Flow::Email.vocabulary()))
    }

    /// Extracts the text of an uploaded PDF or DOCX and scores it.
    ///
    /// The upload is staged in a temporary file that is removed before this
    /// returns, whether extraction succeeds or not.
    pub fn scan_document(
        &self,
        filename: &str,
        bytes: &[u8],
        extractor: &dyn TextExtractor,
    ) -> Result<Verdict, ScanError> {
        let extension = UploadKind::Document.check(filename)?;
        let staged = upload::stage(bytes, &extension)?;
        let text = extractor.extract_text(staged.path());
        drop(staged);
        let text = text?;
        debug!("Extracted {} characters from {}", text.len(), filename);

        let classification = self.document.classify_text(clean_text(&text).as_str());
        Ok(Verdict::new(classification, Flow::Document.vocabulary())
            .with_content(ExtractedContent::ExtractedText(text.trim().to_string())))
    }

    fn score_url(&self, raw: &str) -> Verdict {
        let features = extract(raw);
        debug!("features for {}: {:?}", raw, features.as_slice());
        Verdict::new(self.url.classify(&features), Flow::Url.vocabulary())
    }
}

fn require_url(raw: &str) -> Result<(), ScanError> {
    if raw.trim().is_empty() {
        return Err(ScanError::InvalidInput("URL must not be empty".to_string()));
    }
    Ok(())
}
