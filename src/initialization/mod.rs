//! Application initialization and resource setup.
//!
//! This module provides the startup steps that must succeed before any scan
//! is served:
//! - Logger
//! - Scoring context (every exported model, scaler and vectorizer)
//!
//! All initialization functions return proper error types for error handling.

mod logger;

use std::path::Path;

use log::info;

use crate::error_handling::InitializationError;
use crate::scan::ScanContext;
use crate::scoring::Vectorizer;

// Re-export public API
pub use logger::init_logger_with;

/// Loads the scoring context from a model directory.
///
/// Thin wrapper around [`ScanContext::load`] that logs what was loaded. Any
/// error here is fatal: the caller must not accept scans without it.
pub fn init_scan_context(model_dir: &Path) -> Result<ScanContext, InitializationError> {
    let context = ScanContext::load(model_dir)?;
    info!(
        "Loaded scoring artifacts from {} ({} link terms, {} email terms, {} document terms)",
        model_dir.display(),
        context.link.vectorizer().width(),
        context.email.vectorizer().width(),
        context.document.vectorizer().width(),
    );
    Ok(context)
}
