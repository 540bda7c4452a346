//! Binary logistic-regression classifier.
//!
//! Training is deterministic: weights start at zero and full-batch gradient
//! descent runs a fixed number of epochs, so the same inputs always train to
//! the same decision boundary. Features are standardized internally; the
//! standardization parameters are part of the serialized artifact so scoring
//! round-trips exactly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ModelError;

/// Default gradient-descent step size.
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Default number of full-batch epochs.
pub const DEFAULT_EPOCHS: usize = 200;

/// Logistic regression over a fixed-width feature space.
///
/// Class 1 is the "fake" class; [`predict_proba`](Self::predict_proba)
/// returns its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
    feature_means: Vec<f64>,
    feature_scales: Vec<f64>,
}

impl LogisticRegression {
    /// Fits a classifier on `features` (rows) and `labels`
    /// (`true` = class 1).
    pub fn fit(
        features: &[Vec<f32>],
        labels: &[bool],
        learning_rate: f64,
        epochs: usize,
    ) -> Result<Self, ModelError> {
        if features.is_empty() {
            return Err(ModelError::Training {
                reason: "no training rows".to_string(),
            });
        }
        if features.len() != labels.len() {
            return Err(ModelError::Training {
                reason: format!(
                    "row/label count mismatch: {} rows, {} labels",
                    features.len(),
                    labels.len()
                ),
            });
        }

        let width = features[0].len();
        if width == 0 {
            return Err(ModelError::Training {
                reason: "feature rows are empty".to_string(),
            });
        }
        if let Some(bad) = features.iter().find(|row| row.len() != width) {
            return Err(ModelError::DimensionMismatch {
                expected: width,
                actual: bad.len(),
            });
        }

        let (feature_means, feature_scales) = standardization_params(features, width);
        let standardized: Vec<Vec<f64>> = features
            .iter()
            .map(|row| standardize(row, &feature_means, &feature_scales))
            .collect();

        let n = features.len() as f64;
        let mut weights = vec![0.0f64; width];
        let mut bias = 0.0f64;

        for _ in 0..epochs {
            let mut weight_grad = vec![0.0f64; width];
            let mut bias_grad = 0.0f64;

            for (row, &label) in standardized.iter().zip(labels.iter()) {
                let z = dot(&weights, row) + bias;
                let error = sigmoid(z) - if label { 1.0 } else { 0.0 };
                for (g, x) in weight_grad.iter_mut().zip(row.iter()) {
                    *g += error * x;
                }
                bias_grad += error;
            }

            for (w, g) in weights.iter_mut().zip(weight_grad.iter()) {
                *w -= learning_rate * g / n;
            }
            bias -= learning_rate * bias_grad / n;
        }

        debug!(
            rows = features.len(),
            width, epochs, "classifier fitted"
        );

        Ok(Self {
            weights,
            bias,
            feature_means,
            feature_scales,
        })
    }

    /// Probability of class 1 (fake) for each feature row.
    pub fn predict_proba(&self, features: &[Vec<f32>]) -> Result<Vec<f32>, ModelError> {
        features
            .iter()
            .map(|row| {
                if row.len() != self.weights.len() {
                    return Err(ModelError::DimensionMismatch {
                        expected: self.weights.len(),
                        actual: row.len(),
                    });
                }
                let standardized = standardize(row, &self.feature_means, &self.feature_scales);
                let z = dot(&self.weights, &standardized) + self.bias;
                Ok(sigmoid(z) as f32)
            })
            .collect()
    }

    /// Width of the feature space this classifier was fitted on.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }
}

fn standardization_params(features: &[Vec<f32>], width: usize) -> (Vec<f64>, Vec<f64>) {
    let n = features.len() as f64;

    let mut means = vec![0.0f64; width];
    for row in features {
        for (m, v) in means.iter_mut().zip(row.iter()) {
            *m += f64::from(*v);
        }
    }
    for m in &mut means {
        *m /= n;
    }

    let mut scales = vec![0.0f64; width];
    for row in features {
        for ((s, v), m) in scales.iter_mut().zip(row.iter()).zip(means.iter()) {
            let d = f64::from(*v) - m;
            *s += d * d;
        }
    }
    for s in &mut scales {
        *s = (*s / n).sqrt();
        if *s < 1e-12 {
            *s = 1.0;
        }
    }

    (means, scales)
}

fn standardize(row: &[f32], means: &[f64], scales: &[f64]) -> Vec<f64> {
    row.iter()
        .zip(means.iter().zip(scales.iter()))
        .map(|(v, (m, s))| (f64::from(*v) - m) / s)
        .collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
