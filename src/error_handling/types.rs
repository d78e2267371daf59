//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
///
/// Any of these means the process must not serve scans.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// A scoring artifact could not be loaded or is malformed.
    #[error("Scoring artifact error: {0}")]
    ArtifactError(#[from] ArtifactError),
}

/// Failures while loading an exported model, scaler or vectorizer.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The artifact file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not valid JSON for its expected schema.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but its dimensions are inconsistent.
    #[error("Malformed artifact {name}: {reason}")]
    Shape {
        /// Artifact name (usually the file name)
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ArtifactError {
    pub(crate) fn shape(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ArtifactError::Shape {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Failures while decoding a QR image.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes are not an image the decoder understands.
    #[error("Failed to decode QR: {0}")]
    Image(#[from] image::ImageError),

    /// A code was found but its payload is not valid UTF-8 text.
    #[error("Failed to decode QR: payload is not valid UTF-8")]
    Payload,
}

/// Errors surfaced by a scan flow.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The request was rejected before the pipeline ran.
    #[error("{0}")]
    InvalidInput(String),

    /// The QR image could not be opened or decoded.
    #[error("QR scan failed: {0}")]
    Decode(#[from] DecodeError),

    /// The document could not be turned into text.
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The uploaded bytes could not be staged on disk.
    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),
}

/// Caller-facing categories of scan failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorCategory {
    /// The caller sent something the scanners do not accept (4xx).
    InvalidInput,
    /// The input was accepted but could not be processed (5xx).
    ProcessingFailure,
}

impl ErrorCategory {
    /// Returns a human-readable string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "Invalid input",
            ErrorCategory::ProcessingFailure => "Processing failure",
        }
    }

    /// HTTP-equivalent status code for the category.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::InvalidInput => 400,
            ErrorCategory::ProcessingFailure => 500,
        }
    }

    /// Process exit code used by the CLI for the category.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::InvalidInput => 2,
            ErrorCategory::ProcessingFailure => 3,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error body handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    /// HTTP-equivalent status code
    pub status: u16,
    /// Reason string
    pub detail: String,
}

impl ScanError {
    /// Categorizes the error for the caller.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::InvalidInput(_) => ErrorCategory::InvalidInput,
            ScanError::Decode(_) | ScanError::Extraction(_) | ScanError::Staging(_) => {
                ErrorCategory::ProcessingFailure
            }
        }
    }

    /// Builds the structured payload for this error.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            status: self.category().status_code(),
            detail: self.to_string(),
        }
    }
}
