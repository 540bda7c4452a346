//! Perturbation-based, model-agnostic feature attribution.
//!
//! [`explain`] estimates each feature's contribution to the model output by
//! sampling coalition masks over the feature vector: masked-out features are
//! replaced with the background column mean, and a feature's attribution is
//! the difference between the mean model output over samples where it was
//! kept and samples where it was dropped. The sample budget bounds the
//! number of model evaluations and is the pipeline's implicit cost control.
//!
//! When no background is supplied one is synthesized by replicating the row
//! itself five times. That baseline has zero variance, so every perturbed
//! row equals the input and attributions collapse toward zero — a known
//! fidelity limitation, kept for contract compatibility, not a proper
//! baseline. Callers wanting faithful attributions must pass a
//! representative background.

mod error;


pub use error::ExplainError;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_BACKGROUND_REPLICAS, DEFAULT_EXPLAINER_SEED, DEFAULT_SAMPLE_BUDGET,
    TOP_K_ATTRIBUTIONS,
};

/// Tunables for one explanation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplainerConfig {
    /// Number of perturbation samples (model evaluations) to spend.
    pub sample_budget: usize,
    /// Rows synthesized when no background is supplied.
    pub background_replicas: usize,
    /// RNG seed; fixed by default so output is reproducible per deployment.
    pub seed: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            background_replicas: DEFAULT_BACKGROUND_REPLICAS,
            seed: DEFAULT_EXPLAINER_SEED,
        }
    }
}

/// Top feature attributions, ranked by descending absolute contribution.
/// `indices[i]` pairs with `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributions {
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

impl Attributions {
    /// Number of attributed dimensions.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no dimensions were attributed.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Attributes the model output for `row` to individual feature dimensions.
///
/// `predict_proba` is evaluated on a matrix of `config.sample_budget`
/// perturbed rows and must return one output per row. Returns the top
/// [`TOP_K_ATTRIBUTIONS`] dimensions by absolute attribution.
pub fn explain<F>(
    predict_proba: F,
    row: &[f32],
    background: Option<&[Vec<f32>]>,
    config: &ExplainerConfig,
) -> Result<Attributions, ExplainError>
where
    F: Fn(&[Vec<f32>]) -> Result<Vec<f32>, ExplainError>,
{
    if row.is_empty() {
        return Err(ExplainError::EmptyRow);
    }
    if config.sample_budget == 0 {
        return Err(ExplainError::InvalidConfig {
            reason: "sample_budget must be non-zero".to_string(),
        });
    }

    let width = row.len();

    let synthesized;
    let background: &[Vec<f32>] = match background {
        Some(rows) => {
            if rows.is_empty() {
                return Err(ExplainError::EmptyBackground);
            }
            if let Some(bad) = rows.iter().find(|r| r.len() != width) {
                return Err(ExplainError::BackgroundMismatch {
                    expected: width,
                    actual: bad.len(),
                });
            }
            rows
        }
        None => {
            synthesized = vec![row.to_vec(); config.background_replicas.max(1)];
            &synthesized
        }
    };

    let baseline = column_means(background, width);

    debug!(
        width,
        budget = config.sample_budget,
        background_rows = background.len(),
        "sampling feature attributions"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut masks = Vec::with_capacity(config.sample_budget);
    let mut perturbed = Vec::with_capacity(config.sample_budget);

    for _ in 0..config.sample_budget {
        let mask: Vec<bool> = (0..width).map(|_| rng.random_bool(0.5)).collect();
        let sample: Vec<f32> = mask
            .iter()
            .zip(row.iter().zip(baseline.iter()))
            .map(|(&keep, (&value, &base))| if keep { value } else { base })
            .collect();
        masks.push(mask);
        perturbed.push(sample);
    }

    let outputs = predict_proba(&perturbed)?;
    if outputs.len() != config.sample_budget {
        return Err(ExplainError::Evaluation {
            reason: format!(
                "expected {} outputs, got {}",
                config.sample_budget,
                outputs.len()
            ),
        });
    }

    let contributions = marginal_contributions(&masks, &outputs, width);
    Ok(top_attributions(&contributions))
}

fn column_means(rows: &[Vec<f32>], width: usize) -> Vec<f32> {
    let mut means = vec![0.0f64; width];
    for r in rows {
        for (m, v) in means.iter_mut().zip(r.iter()) {
            *m += f64::from(*v);
        }
    }
    let n = rows.len() as f64;
    means.into_iter().map(|m| (m / n) as f32).collect()
}

/// Per feature: mean output over samples where the feature was kept minus
/// mean output over samples where it was dropped. Features unseen on either
/// side attribute zero.
fn marginal_contributions(masks: &[Vec<bool>], outputs: &[f32], width: usize) -> Vec<f32> {
    let mut kept_sum = vec![0.0f64; width];
    let mut kept_count = vec![0u32; width];
    let mut dropped_sum = vec![0.0f64; width];
    let mut dropped_count = vec![0u32; width];

    for (mask, &output) in masks.iter().zip(outputs.iter()) {
        let output = f64::from(output);
        for (j, &keep) in mask.iter().enumerate() {
            if keep {
                kept_sum[j] += output;
                kept_count[j] += 1;
            } else {
                dropped_sum[j] += output;
                dropped_count[j] += 1;
            }
        }
    }

    (0..width)
        .map(|j| {
            if kept_count[j] == 0 || dropped_count[j] == 0 {
                return 0.0;
            }
            let kept = kept_sum[j] / f64::from(kept_count[j]);
            let dropped = dropped_sum[j] / f64::from(dropped_count[j]);
            (kept - dropped) as f32
        })
        .collect()
}

fn top_attributions(contributions: &[f32]) -> Attributions {
    let mut order: Vec<usize> = (0..contributions.len()).collect();
    order.sort_by(|&a, &b| {
        contributions[b]
            .abs()
            .partial_cmp(&contributions[a].abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    order.truncate(TOP_K_ATTRIBUTIONS);

    let values = order.iter().map(|&i| contributions[i]).collect();
    Attributions {
        indices: order,
        values,
    }
}
