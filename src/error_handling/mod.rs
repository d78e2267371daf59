//! Error handling.
//!
//! Errors are split into:
//! - **Initialization**: logger or scoring artifacts unavailable (fatal)
//! - **Invalid input**: rejected at the boundary before any processing
//! - **Processing failures**: decode or text extraction failed
//!
//! "No QR code found" is not an error; see [`crate::ScanOutcome`].

mod types;

// Re-export public API
pub use types::{
    ArtifactError, DecodeError, ErrorCategory, ErrorPayload, InitializationError, ScanError,
};
