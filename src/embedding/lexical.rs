//! Sparse lexical embedding: a TF-IDF vectorizer over unigrams and bigrams.
//!
//! The vocabulary is capped at [`MAX_VOCAB_TERMS`] terms, selected by corpus
//! frequency with a lexicographic tie-break so fitting is fully deterministic.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_VOCAB_TERMS;

use super::error::EmbeddingError;

/// Fitted TF-IDF state: term list (sorted), smoothed IDF weights, and the
/// fitted flag. Serializes as the lexical half of the embedder artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    terms: Vec<String>,
    idf: Vec<f32>,
    fitted: bool,
}

impl TfidfVectorizer {
    /// Creates an unfitted vectorizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a vocabulary has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Output width: the vocabulary size (0 until fitted).
    pub fn width(&self) -> usize {
        self.terms.len()
    }

    /// Builds the vocabulary and IDF weights from `corpus`.
    ///
    /// Terms are lowercased runs of word characters at least two characters
    /// long, plus bigrams of adjacent terms. The top [`MAX_VOCAB_TERMS`] by
    /// total corpus frequency are kept (ties broken lexicographically) and
    /// indexed in sorted term order. IDF is smoothed:
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit(&mut self, corpus: &[String]) -> Result<(), EmbeddingError> {
        if corpus.is_empty() {
            return Err(EmbeddingError::EmptyCorpus);
        }

        let mut corpus_freq: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u32> = HashMap::new();

        for text in corpus {
            let doc_terms = tokenize(text);
            let mut seen: HashSet<&str> = HashSet::with_capacity(doc_terms.len());
            for term in &doc_terms {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, u64)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(MAX_VOCAB_TERMS);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let docs = corpus.len() as f32;
        let idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f32;
                ((1.0 + docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        self.terms = terms;
        self.idf = idf;
        self.fitted = true;
        Ok(())
    }

    /// Transforms `texts` into L2-normalized TF-IDF rows of fixed width.
    pub fn transform(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if !self.fitted {
            return Err(EmbeddingError::NotFitted);
        }

        Ok(texts.iter().map(|text| self.transform_one(text)).collect())
    }

    fn transform_one(&self, text: &str) -> Vec<f32> {
        let mut row = vec![0.0f32; self.terms.len()];

        for term in tokenize(text) {
            if let Ok(i) = self.terms.binary_search(&term) {
                row[i] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }

        let norm: f32 = row.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }

        row
    }
}

/// Splits `text` into lowercase word tokens (two or more word characters)
/// and appends bigrams of adjacent tokens.
fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let unigrams: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .collect();

    let mut terms: Vec<String> = unigrams.iter().map(|t| (*t).to_string()).collect();
    for pair in unigrams.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

#[cfg(test)]
pub(crate) fn tokenize_for_tests(text: &str) -> Vec<String> {
    tokenize(text)
}
