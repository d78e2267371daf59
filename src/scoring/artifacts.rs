//! Reading exported artifacts from the model directory.

use std::fs;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;

use crate::error_handling::ArtifactError;

/// Reads and deserializes `dir/file`.
pub(crate) fn read_artifact<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ArtifactError> {
    let path = dir.join(file);
    let raw = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
        path: path.clone(),
        source,
    })?;
    debug!("Read {} ({} bytes)", path.display(), raw.len());
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse { path, source })
}
