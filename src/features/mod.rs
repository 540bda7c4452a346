//! Behavioral/temporal feature derivation and feature-matrix assembly.
//!
//! Column order is a system-lifetime contract: embedding columns first, then
//! behavioral, then temporal. Training, scoring and explanation all read the
//! same layout; reordering it invalidates every persisted classifier.


use crate::constants::BEHAVIORAL_WIDTH;

/// Behavioral column names, in feature order.
pub const BEHAVIORAL_COLUMNS: [&str; BEHAVIORAL_WIDTH] =
    ["verified", "account_age_days", "text_len", "word_count"];

/// One request's inputs to behavioral/temporal feature derivation.
///
/// `text` is expected to be normalized already; missing metadata falls back
/// to `verified = false` and `account_age_days = 0`.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorRecord<'a> {
    pub text: &'a str,
    pub verified: Option<bool>,
    pub account_age_days: Option<u32>,
}

impl<'a> BehaviorRecord<'a> {
    /// Creates a record with no metadata.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            verified: None,
            account_age_days: None,
        }
    }
}

/// Derives the behavioral columns for each record.
pub fn behavioral(records: &[BehaviorRecord<'_>]) -> Vec<Vec<f32>> {
    records
        .iter()
        .map(|record| {
            vec![
                if record.verified.unwrap_or(false) { 1.0 } else { 0.0 },
                record.account_age_days.unwrap_or(0) as f32,
                record.text.chars().count() as f32,
                record.text.split_whitespace().count() as f32,
            ]
        })
        .collect()
}

/// Derives the temporal columns for each record.
///
/// Reserved for burst / inter-arrival signals; currently produces no columns.
pub fn temporal(records: &[BehaviorRecord<'_>]) -> Vec<Vec<f32>> {
    records.iter().map(|_| Vec::new()).collect()
}

/// Horizontally concatenates the feature blocks: embedding columns first,
/// then behavioral, then temporal.
///
/// Missing cells and non-finite values are written as `0.0`. When the
/// embedding matrix is empty, the behavioral + temporal columns alone form
/// the feature matrix.
pub fn assemble(
    embedding: &[Vec<f32>],
    behavioral: &[Vec<f32>],
    temporal: &[Vec<f32>],
) -> Vec<Vec<f32>> {
    let embedding_width = embedding.first().map_or(0, Vec::len);
    let behavioral_width = behavioral.first().map_or(0, Vec::len);
    let temporal_width = temporal.first().map_or(0, Vec::len);

    let rows = embedding.len().max(behavioral.len()).max(temporal.len());
    let mut matrix = Vec::with_capacity(rows);

    for i in 0..rows {
        let mut row = Vec::with_capacity(embedding_width + behavioral_width + temporal_width);
        push_block(&mut row, embedding.get(i), embedding_width);
        push_block(&mut row, behavioral.get(i), behavioral_width);
        push_block(&mut row, temporal.get(i), temporal_width);
        matrix.push(row);
    }

    matrix
}

fn push_block(row: &mut Vec<f32>, values: Option<&Vec<f32>>, width: usize) {
    for j in 0..width {
        let v = values.and_then(|r| r.get(j)).copied().unwrap_or(0.0);
        row.push(if v.is_finite() { v } else { 0.0 });
    }
}
