//! Standardization applied to feature vectors before the numeric classifier.

use serde::Deserialize;

use crate::error_handling::ArtifactError;

/// Per-feature `(x - mean) / scale`, as fitted on the training set.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature standard deviation (zero-variance features already 1.0)
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Number of features the scaler was fitted on.
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Checks that means and scales line up and are usable.
    pub fn validate(&self, name: &str) -> Result<(), ArtifactError> {
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactError::shape(
                name,
                format!(
                    "{} means but {} scales",
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(ArtifactError::shape(name, "non-finite mean"));
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(ArtifactError::shape(name, "scale must be finite and non-zero"));
        }
        Ok(())
    }

    /// Standardizes `values`. `values` must have [`StandardScaler::width`] entries.
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }
}
