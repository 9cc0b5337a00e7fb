//! Candidate classification
//!
//! Learns what this document's real page numbers look like (where they sit
//! on the page, how large they print) from the first inference pass, then
//! filters candidates in the second pass. Two interchangeable models sit
//! behind one trait; features are standardized with the saved training
//! statistics.

mod features;
mod logistic;
mod naive_bayes;

pub use features::{feature_vector, FEATURE_DIM};
pub use logistic::LogisticRegression;
pub use naive_bayes::GaussianNaiveBayes;

// ============================================================
// Classifier Interface
// ============================================================

/// Which model the run trains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    NaiveBayes,
    LogisticRegression,
}

/// Binary classifier over standardized feature vectors
pub trait Classifier {
    /// Fit on rows `x` with labels `y` (0 or 1). Both classes are present;
    /// the caller rejects underdetermined training sets.
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]);

    /// `(p_false, p_true)` for one row
    fn predict_proba(&self, x: &[f64]) -> (f64, f64);
}

/// Construct the selected model
pub fn build_classifier(kind: ClassifierKind) -> Box<dyn Classifier> {
    match kind {
        ClassifierKind::NaiveBayes => Box::new(GaussianNaiveBayes::new()),
        ClassifierKind::LogisticRegression => Box::new(LogisticRegression::new()),
    }
}

// ============================================================
// Standardization
// ============================================================

/// Per-feature mean and population standard deviation saved from training
#[derive(Debug, Clone)]
pub struct Standardizer {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl Standardizer {
    /// Fit on raw integer feature rows
    pub fn fit(rows: &[[i64; FEATURE_DIM]]) -> Self {
        let n = rows.len() as f64;
        let mut mean = vec![0.0; FEATURE_DIM];
        for row in rows {
            for (m, &v) in mean.iter_mut().zip(row.iter()) {
                *m += v as f64;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut std = vec![0.0; FEATURE_DIM];
        for row in rows {
            for ((s, &v), &m) in std.iter_mut().zip(row.iter()).zip(mean.iter()) {
                *s += (v as f64 - m) * (v as f64 - m);
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n).sqrt();
            // A constant feature stays centered but unscaled
            if *s == 0.0 {
                *s = 1.0;
            }
        }

        Self { mean, std }
    }

    /// Standardize one raw feature row
    pub fn transform(&self, row: &[i64; FEATURE_DIM]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(&v, (&m, &s))| (v as f64 - m) / s)
            .collect()
    }
}

// ============================================================
// Trained Filter
// ============================================================

/// A trained model plus its standardizer, ready to score observations
pub struct TrainedFilter {
    standardizer: Standardizer,
    model: Box<dyn Classifier>,
}

impl TrainedFilter {
    /// Train the selected model on raw feature rows. The caller guarantees
    /// both labels occur.
    pub fn train(kind: ClassifierKind, rows: &[[i64; FEATURE_DIM]], labels: &[u8]) -> Self {
        let standardizer = Standardizer::fit(rows);
        let x: Vec<Vec<f64>> = rows.iter().map(|r| standardizer.transform(r)).collect();
        let mut model = build_classifier(kind);
        model.fit(&x, labels);
        Self {
            standardizer,
            model,
        }
    }

    /// `(p_false, p_true)` for one raw feature row
    pub fn score(&self, row: &[i64; FEATURE_DIM]) -> (f64, f64) {
        self.model.predict_proba(&self.standardizer.transform(row))
    }
}
