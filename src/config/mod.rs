//! Application configuration and constants.
//!
//! This module provides:
//! - Fixed tables (feature order, TLD denylist, upload allow-lists)
//! - The on-disk artifact layout
//! - Library configuration and CLI option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
