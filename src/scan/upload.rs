//! Upload allow-lists and request-scoped staging of uploaded bytes.

use std::io::Write;

use log::debug;
use strum_macros::{Display, EnumIter};
use tempfile::NamedTempFile;

use crate::config::{DOCUMENT_EXTENSIONS, QR_IMAGE_SUFFIXES};
use crate::error_handling::ScanError;

/// Kinds of uploaded files the scanners accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum UploadKind {
    /// PNG or JPEG image expected to hold a QR code
    QrImage,
    /// PDF or DOCX document
    Document,
}

impl UploadKind {
    /// Checks `filename` against the allow-list for this kind.
    ///
    /// Returns the lower-cased extension (without the dot) on success.
    pub fn check(&self, filename: &str) -> Result<String, ScanError> {
        let lowered = filename.to_lowercase();
        match self {
            UploadKind::QrImage => QR_IMAGE_SUFFIXES
                .iter()
                .find(|suffix| lowered.ends_with(*suffix))
                .map(|suffix| suffix.trim_start_matches('.').to_string())
                .ok_or_else(|| {
                    ScanError::InvalidInput(
                        "Only PNG and JPG/JPEG images are supported".to_string(),
                    )
                }),
            UploadKind::Document => {
                // text after the last dot; a name without one is its own extension
                let extension = lowered.rsplit('.').next().unwrap_or_default();
                if DOCUMENT_EXTENSIONS.contains(&extension) {
                    Ok(extension.to_string())
                } else {
                    Err(ScanError::InvalidInput(
                        "Only PDF or DOCX files are supported".to_string(),
                    ))
                }
            }
        }
    }
}

/// Writes `bytes` to a temporary file ending in `.{extension}`.
///
/// The file is removed when the returned handle is dropped.
pub(crate) fn stage(bytes: &[u8], extension: &str) -> Result<NamedTempFile, ScanError> {
    let mut file = tempfile::Builder::new()
        .prefix("phish_scan_")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .map_err(ScanError::Staging)?;
    file.write_all(bytes).map_err(ScanError::Staging)?;
    file.flush().map_err(ScanError::Staging)?;
    debug!("Staged {} bytes at {}", bytes.len(), file.path().display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_suffixes() {
        assert_eq!(UploadKind::QrImage.check("code.png").expect("png"), "png");
        assert_eq!(UploadKind::QrImage.check("CODE.JPG").expect("jpg"), "jpg");
        assert_eq!(UploadKind::QrImage.check("a.b.jpeg").expect("jpeg"), "jpeg");
        assert!(UploadKind::QrImage.check("notes.txt").is_err());
        assert!(UploadKind::QrImage.check("png").is_err());
        assert!(UploadKind::QrImage.check("image.png.txt").is_err());
    }

    #[test]
    fn test_document_extensions() {
        assert_eq!(UploadKind::Document.check("letter.PDF").expect("pdf"), "pdf");
        assert_eq!(UploadKind::Document.check("a.tar.docx").expect("docx"), "docx");
        assert!(UploadKind::Document.check("letter.doc").is_err());
        assert!(UploadKind::Document.check("letter.pdf.exe").is_err());
        assert!(UploadKind::Document.check("").is_err());
    }

    #[test]
    fn test_rejection_is_invalid_input() {
        let err = UploadKind::Document.check("notes.txt").unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Only PDF or DOCX files are supported");
    }

    #[test]
    fn test_staged_file_is_removed_on_drop() {
        let staged = stage(b"%PDF-1.4", "pdf").expect("stages");
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(std::fs::read(&path).expect("readable"), b"%PDF-1.4");
        drop(staged);
        assert!(!path.exists());
    }
}
