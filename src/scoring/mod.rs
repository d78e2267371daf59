//! Scorer adapters around the externally trained classifiers.
//!
//! Two scoring paths share the [`Classification`] contract:
//! - numeric: [`FeatureVector`] -> [`StandardScaler`] -> [`Classifier`] ([`UrlScorer`])
//! - text: cleaned string -> [`Vectorizer`] -> [`Classifier`] ([`TextPipeline`])
//!
//! Every pipeline is validated when it is built, so classification itself
//! cannot fail.

mod artifacts;
mod model;
mod scaler;
mod vectorizer;

use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::config::CONFIDENCE_DECIMALS;
use crate::error_handling::ArtifactError;
use crate::features::FeatureVector;

pub(crate) use artifacts::read_artifact;
pub use model::{Classifier, DecisionTree, GradientBoosting, LogisticRegression, RandomForest};
pub use scaler::StandardScaler;
pub use vectorizer::{EmailFields, EmailVectorizer, Norm, TfidfVectorizer, Vectorizer};

/// Label value the classifiers use for legitimate inputs.
pub const LEGIT_LABEL: i64 = 1;

/// Output of a classifier for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    /// Predicted class
    pub label: i64,
    /// Probability of the predicted class, rounded to three decimals
    pub confidence: f64,
}

impl Classification {
    /// Builds a classification, rounding `probability`.
    pub fn new(label: i64, probability: f64) -> Self {
        Classification {
            label,
            confidence: round_confidence(probability),
        }
    }

    /// True when the label is the legitimate class.
    pub fn is_legit(&self) -> bool {
        self.label == LEGIT_LABEL
    }
}

/// Rounds a probability to the reported number of decimals.
///
/// Rounds from the exact binary value, so `0.1235` (stored as
/// `0.12349999...`) becomes `0.123`.
pub fn round_confidence(probability: f64) -> f64 {
    format!("{:.*}", CONFIDENCE_DECIMALS, probability)
        .parse()
        .unwrap_or(probability)
}

/// Scores feature vectors.
pub trait VectorScorer: Send + Sync {
    /// Classifies one feature vector.
    fn classify(&self, features: &FeatureVector) -> Classification;
}

/// Scores already-cleaned text inputs.
pub trait TextScorer<I: ?Sized>: Send + Sync {
    /// Classifies one cleaned input.
    fn classify_text(&self, input: &I) -> Classification;
}

/// Numeric path: scaler then classifier.
#[derive(Debug, Clone)]
pub struct UrlScorer {
    scaler: StandardScaler,
    model: Classifier,
}

impl UrlScorer {
    /// Validates the pair and checks that both expect a full feature vector.
    pub fn new(scaler: StandardScaler, model: Classifier) -> Result<Self, ArtifactError> {
        scaler.validate("scaler")?;
        model.validate("url model")?;
        if scaler.width() != FeatureVector::LEN {
            return Err(ArtifactError::shape(
                "scaler",
                format!(
                    "fitted on {} features, expected {}",
                    scaler.width(),
                    FeatureVector::LEN
                ),
            ));
        }
        if model.n_features() != FeatureVector::LEN {
            return Err(ArtifactError::shape(
                "url model",
                format!(
                    "expects {} features, expected {}",
                    model.n_features(),
                    FeatureVector::LEN
                ),
            ));
        }
        Ok(UrlScorer { scaler, model })
    }

    /// Loads `scaler_file` and `model_file` from `dir`.
    pub fn load(dir: &Path, scaler_file: &str, model_file: &str) -> Result<Self, ArtifactError> {
        let scaler = read_artifact(dir, scaler_file)?;
        let model = read_artifact(dir, model_file)?;
        Self::new(scaler, model)
    }
}

impl VectorScorer for UrlScorer {
    fn classify(&self, features: &FeatureVector) -> Classification {
        let scaled = self.scaler.transform(features.as_slice());
        let result = self.model.classify(&scaled);
        debug!(
            "URL classifier: label={} confidence={}",
            result.label, result.confidence
        );
        result
    }
}

/// Text path: vectorizer then classifier.
#[derive(Debug, Clone)]
pub struct TextPipeline<V> {
    vectorizer: V,
    model: Classifier,
}

impl<V: Vectorizer> TextPipeline<V> {
    /// Checks that the model consumes exactly the vectorizer's row width.
    ///
    /// The vectorizer must already be validated.
    pub fn new(name: &str, vectorizer: V, model: Classifier) -> Result<Self, ArtifactError> {
        model.validate(name)?;
        if model.n_features() != vectorizer.width() {
            return Err(ArtifactError::shape(
                name,
                format!(
                    "model expects {} features but vectorizer produces {}",
                    model.n_features(),
                    vectorizer.width()
                ),
            ));
        }
        Ok(TextPipeline { vectorizer, model })
    }

    /// The fitted vectorizer.
    pub fn vectorizer(&self) -> &V {
        &self.vectorizer
    }
}

impl TextPipeline<TfidfVectorizer> {
    /// Loads a single-vectorizer text pipeline from `dir`.
    pub fn load(dir: &Path, vectorizer_file: &str, model_file: &str) -> Result<Self, ArtifactError> {
        let vectorizer: TfidfVectorizer = read_artifact(dir, vectorizer_file)?;
        vectorizer.validate(vectorizer_file)?;
        let model = read_artifact(dir, model_file)?;
        Self::new(model_file, vectorizer, model)
    }
}

impl TextPipeline<EmailVectorizer> {
    /// Loads the email pipeline from `dir`.
    pub fn load(dir: &Path, vectorizer_file: &str, model_file: &str) -> Result<Self, ArtifactError> {
        let vectorizer: EmailVectorizer = read_artifact(dir, vectorizer_file)?;
        vectorizer.validate(vectorizer_file)?;
        let model = read_artifact(dir, model_file)?;
        Self::new(model_file, vectorizer, model)
    }
}

impl<V: Vectorizer> TextScorer<V::Input> for TextPipeline<V> {
    fn classify_text(&self, input: &V::Input) -> Classification {
        let row = self.vectorizer.transform(input);
        self.model.classify(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract;

    fn logistic(coef: Vec<f64>, intercept: f64) -> Classifier {
        Classifier::LogisticRegression(LogisticRegression {
            classes: vec![0, 1],
            coef,
            intercept,
        })
    }

    fn identity_scaler(width: usize) -> StandardScaler {
        StandardScaler {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.98765), 0.988);
        assert_eq!(round_confidence(0.5), 0.5);
        assert_eq!(round_confidence(1.0), 1.0);
        assert_eq!(round_confidence(0.0004), 0.0);
    }

    #[test]
    fn test_round_confidence_uses_exact_binary_value() {
        // both are stored just below the halfway point
        assert_eq!(round_confidence(0.1235), 0.123);
        assert_eq!(round_confidence(0.0045), 0.004);
        // stored just above
        assert_eq!(round_confidence(0.9995), 1.0);
    }

    #[test]
    fn test_url_scorer_rejects_wrong_width() {
        let err = UrlScorer::new(identity_scaler(9), logistic(vec![0.0; 10], 0.0)).unwrap_err();
        assert!(err.to_string().contains("fitted on 9 features"));

        let err = UrlScorer::new(identity_scaler(10), logistic(vec![0.0; 4], 0.0)).unwrap_err();
        assert!(err.to_string().contains("expects 4 features"));
    }

    #[test]
    fn test_url_scorer_applies_scaler_first() {
        // only has_https (index 4) matters; scaler centers it on 0.5
        let mut coef = vec![0.0; 10];
        coef[4] = 10.0;
        let mut scaler = identity_scaler(10);
        scaler.mean[4] = 0.5;
        let scorer = UrlScorer::new(scaler, logistic(coef, 0.0)).expect("valid scorer");

        let secure = scorer.classify(&extract("https://example.com"));
        assert!(secure.is_legit());
        assert_eq!(secure.confidence, 0.993);

        let plain = scorer.classify(&extract("http://example.com"));
        assert!(!plain.is_legit());
        assert_eq!(plain.label, 0);
    }

    #[test]
    fn test_text_pipeline_rejects_width_mismatch() {
        let vectorizer = TfidfVectorizer {
            vocabulary: [("paypal".to_string(), 0)].into_iter().collect(),
            idf: vec![1.0],
            lowercase: true,
            norm: Some(Norm::L2),
            sublinear_tf: false,
            ngram_range: (1, 1),
        };
        let err = TextPipeline::new("link_model.json", vectorizer, logistic(vec![1.0, 1.0], 0.0))
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("model expects 2 features but vectorizer produces 1"));
    }

    #[test]
    fn test_text_pipeline_classifies() {
        let vectorizer = TfidfVectorizer {
            vocabulary: [("paypal".to_string(), 0), ("google".to_string(), 1)]
                .into_iter()
                .collect(),
            idf: vec![1.0, 1.0],
            lowercase: true,
            norm: Some(Norm::L2),
            sublinear_tf: false,
            ngram_range: (1, 1),
        };
        let pipeline = TextPipeline::new("link", vectorizer, logistic(vec![-4.0, 4.0], 0.0))
            .expect("valid pipeline");
        assert_eq!(pipeline.classify_text("google.com").label, 1);
        assert_eq!(pipeline.classify_text("paypal.verify.xyz").label, 0);
        assert_eq!(pipeline.vectorizer().width(), 2);
    }
}
