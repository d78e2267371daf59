//! Exported classifiers.
//!
//! The training tooling exports fitted models as JSON. Three model families
//! are understood, all binary:
//! - `logistic_regression`: `sigmoid(coef · x + intercept)`
//! - `random_forest`: mean of per-tree leaf class distributions
//! - `gradient_boosting`: `sigmoid(init + learning_rate * Σ tree(x))`
//!
//! Trees use the usual flat node arrays: a node is a leaf when its left child
//! is negative, otherwise samples with `x[feature] <= threshold` go left.

use serde::Deserialize;

use crate::error_handling::ArtifactError;
use crate::scoring::Classification;

/// A fitted binary classifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Binary logistic regression.
    LogisticRegression(LogisticRegression),
    /// Random forest of classification trees.
    RandomForest(RandomForest),
    /// Binary gradient-boosted regression trees with log-loss.
    GradientBoosting(GradientBoosting),
}

/// Logistic regression weights.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    /// Class labels, negative class first
    pub classes: Vec<i64>,
    /// One weight per input feature
    pub coef: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

/// Random forest.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    /// Class labels, in the column order of the leaf values
    pub classes: Vec<i64>,
    /// Expected input width
    pub n_features: usize,
    /// Fitted trees
    pub trees: Vec<DecisionTree>,
}

/// Gradient boosting for binary log-loss.
#[derive(Debug, Clone, Deserialize)]
pub struct GradientBoosting {
    /// Class labels, negative class first
    pub classes: Vec<i64>,
    /// Expected input width
    pub n_features: usize,
    /// Initial raw prediction (log-odds of the positive class)
    pub init: f64,
    /// Shrinkage applied to every tree
    pub learning_rate: f64,
    /// Regression trees; leaf values have a single column
    pub trees: Vec<DecisionTree>,
}

/// One tree in flat array form.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    /// Left child per node, negative for leaves
    pub children_left: Vec<i64>,
    /// Right child per node, negative for leaves
    pub children_right: Vec<i64>,
    /// Split feature per node (ignored for leaves)
    pub feature: Vec<i64>,
    /// Split threshold per node (ignored for leaves)
    pub threshold: Vec<f64>,
    /// Per-node values: class counts/fractions, or a single regression value
    pub value: Vec<Vec<f64>>,
}

impl Classifier {
    /// Number of input values the model expects.
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LogisticRegression(model) => model.coef.len(),
            Classifier::RandomForest(model) => model.n_features,
            Classifier::GradientBoosting(model) => model.n_features,
        }
    }

    /// Class labels in probability order.
    pub fn classes(&self) -> &[i64] {
        match self {
            Classifier::LogisticRegression(model) => &model.classes,
            Classifier::RandomForest(model) => &model.classes,
            Classifier::GradientBoosting(model) => &model.classes,
        }
    }

    /// Checks internal consistency. Called once at load time so that
    /// [`Classifier::predict_proba`] can index without bounds surprises.
    pub fn validate(&self, name: &str) -> Result<(), ArtifactError> {
        let shape = |reason: String| ArtifactError::shape(name, reason);
        if self.classes().len() != 2 {
            return Err(shape(format!(
                "expected 2 classes, found {}",
                self.classes().len()
            )));
        }
        match self {
            Classifier::LogisticRegression(model) => {
                if model.coef.is_empty() {
                    return Err(shape("logistic regression has no coefficients".into()));
                }
                if !model.intercept.is_finite() || model.coef.iter().any(|w| !w.is_finite()) {
                    return Err(shape("non-finite logistic regression weight".into()));
                }
            }
            Classifier::RandomForest(model) => {
                if model.trees.is_empty() {
                    return Err(shape("random forest has no trees".into()));
                }
                for (i, tree) in model.trees.iter().enumerate() {
                    tree.validate(model.n_features, 2)
                        .map_err(|reason| shape(format!("tree {i}: {reason}")))?;
                }
            }
            Classifier::GradientBoosting(model) => {
                if !model.init.is_finite() || !model.learning_rate.is_finite() {
                    return Err(shape("non-finite boosting parameter".into()));
                }
                for (i, tree) in model.trees.iter().enumerate() {
                    tree.validate(model.n_features, 1)
                        .map_err(|reason| shape(format!("tree {i}: {reason}")))?;
                }
            }
        }
        Ok(())
    }

    /// Class probabilities for one input, in [`Classifier::classes`] order.
    ///
    /// `x` must have [`Classifier::n_features`] values.
    pub fn predict_proba(&self, x: &[f64]) -> [f64; 2] {
        match self {
            Classifier::LogisticRegression(model) => {
                let z = model
                    .coef
                    .iter()
                    .zip(x)
                    .map(|(w, v)| w * v)
                    .sum::<f64>()
                    + model.intercept;
                binary(sigmoid(z))
            }
            Classifier::RandomForest(model) => {
                let mut totals = [0.0; 2];
                for tree in &model.trees {
                    let leaf = tree.leaf_value(x);
                    let sum: f64 = leaf.iter().sum();
                    if sum > 0.0 {
                        totals[0] += leaf[0] / sum;
                        totals[1] += leaf[1] / sum;
                    }
                }
                let n = model.trees.len() as f64;
                [totals[0] / n, totals[1] / n]
            }
            Classifier::GradientBoosting(model) => {
                let raw = model.init
                    + model.learning_rate
                        * model
                            .trees
                            .iter()
                            .map(|tree| tree.leaf_value(x)[0])
                            .sum::<f64>();
                binary(sigmoid(raw))
            }
        }
    }

    /// Most probable class and its probability.
    ///
    /// Ties go to the first class.
    pub fn classify(&self, x: &[f64]) -> Classification {
        let proba = self.predict_proba(x);
        let best = if proba[1] > proba[0] { 1 } else { 0 };
        Classification::new(self.classes()[best], proba[best])
    }
}

impl DecisionTree {
    fn validate(&self, n_features: usize, value_width: usize) -> Result<(), String> {
        let nodes = self.children_left.len();
        if nodes == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != nodes
            || self.feature.len() != nodes
            || self.threshold.len() != nodes
            || self.value.len() != nodes
        {
            return Err("node arrays differ in length".to_string());
        }
        for node in 0..nodes {
            if self.value[node].len() != value_width {
                return Err(format!(
                    "node {node} has {} values, expected {value_width}",
                    self.value[node].len()
                ));
            }
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left < 0 {
                continue;
            }
            // children are stored after their parent, which also rules out cycles
            for child in [left, right] {
                if child <= node as i64 || child as usize >= nodes {
                    return Err(format!("node {node} has invalid child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {node} splits on invalid feature {feature}"));
            }
        }
        Ok(())
    }

    fn leaf_value(&self, x: &[f64]) -> &[f64] {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left < 0 {
                return &self.value[node];
            }
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn binary(positive: f64) -> [f64; 2] {
    [1.0 - positive, positive]
}
