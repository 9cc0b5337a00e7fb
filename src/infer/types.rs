//! Inference core types
//!
//! Candidates, per-page geometry, sequences, and the engine error set.

use crate::hocr::{BBox, HocrError, WordObservation};
use crate::scandata::ScandataError;
use crate::scheme::{SchemeError, SchemeId};
use std::rc::Rc;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Negative observations sampled per page as classifier training material
pub const NEGATIVES_PER_PAGE: usize = 10;

/// Transition cost into (and out of) a page's none state
pub const TRELLIS_NONE_COST: f64 = 2.0;

/// Cost returned for an edge that was never established
pub const TRELLIS_MISSING_COST: f64 = TRELLIS_NONE_COST + 1.0;

/// Global seed; every random draw in a run derives from it
pub const GLOBAL_SEED: u64 = 42;

/// Sequence parking threshold for the first, unfiltered pass
pub const PASS1_DENSITY_THRESHOLD: f64 = 0.3;

/// Sequence parking threshold for the classifier-filtered pass
pub const PASS2_DENSITY_THRESHOLD: f64 = 0.05;

// ============================================================
// Error Types
// ============================================================

/// Inference error types
#[derive(Debug, Error)]
pub enum InferError {
    #[error(transparent)]
    Scheme(#[from] SchemeError),

    #[error("Candidate scheme does not match sequence scheme")]
    SchemeMismatch,

    #[error("Synthetic candidate must not carry an observation")]
    SyntheticWithObservation,

    #[error("Classifier training needs both positive and negative examples")]
    TrainingUnderdetermined,

    #[error(transparent)]
    Hocr(#[from] HocrError),

    #[error(transparent)]
    Scandata(#[from] ScandataError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InferError>;

// ============================================================
// Core Data Structures
// ============================================================

/// A word deemed syntactically consistent with some numbering scheme, or a
/// synthesized stand-in for a missing one.
#[derive(Debug, Clone)]
pub struct PageNumberCandidate {
    /// Printed form
    pub value: String,
    /// Integer valuation under `scheme`
    pub num_value: i64,
    /// Handle into the scheme registry
    pub scheme: SchemeId,
    /// True for gap-filled values with no OCR backing
    pub synthetic: bool,
    /// The underlying observation; `None` iff `synthetic`
    pub observation: Option<Rc<WordObservation>>,
    /// Classifier output `(p_false, p_true)`, assigned at most once
    pub prob: Option<(f64, f64)>,
}

impl PageNumberCandidate {
    /// Checked constructor enforcing the synthetic/observation invariant
    pub fn new(
        value: String,
        num_value: i64,
        scheme: SchemeId,
        synthetic: bool,
        observation: Option<Rc<WordObservation>>,
        prob: Option<(f64, f64)>,
    ) -> Result<Self> {
        if synthetic == observation.is_some() {
            return Err(InferError::SyntheticWithObservation);
        }
        Ok(Self {
            value,
            num_value,
            scheme,
            synthetic,
            observation,
            prob,
        })
    }

    /// Candidate backed by an OCR observation
    pub fn observed(
        value: String,
        num_value: i64,
        scheme: SchemeId,
        observation: Rc<WordObservation>,
        prob: Option<(f64, f64)>,
    ) -> Self {
        Self {
            value,
            num_value,
            scheme,
            synthetic: false,
            observation: Some(observation),
            prob,
        }
    }

    /// Gap-filled candidate with no OCR backing
    pub fn synthesized(value: String, num_value: i64, scheme: SchemeId) -> Self {
        Self {
            value,
            num_value,
            scheme,
            synthetic: true,
            observation: None,
            prob: None,
        }
    }
}

/// Per-page geometry shared by the feature extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct PageInfo {
    /// Page dimensions (width, height)
    pub dimensions: (i64, i64),
    /// Union of all word bboxes on the page
    pub content_bbox: BBox,
}

/// A same-scheme, integer-consecutive run of candidates across increasing
/// page indices.
#[derive(Debug, Clone)]
pub struct Sequence {
    /// Scheme shared by every entry
    pub scheme: SchemeId,
    /// `(effective page index, candidate)` pairs, strictly increasing pages
    pub entries: Vec<(usize, PageNumberCandidate)>,
}

impl Sequence {
    /// Open a run with its first entry
    pub fn open(page: usize, candidate: PageNumberCandidate) -> Self {
        Self {
            scheme: candidate.scheme,
            entries: vec![(page, candidate)],
        }
    }

    /// Append an entry; the candidate must share the sequence scheme
    pub fn push(&mut self, page: usize, candidate: PageNumberCandidate) -> Result<()> {
        if candidate.scheme != self.scheme {
            return Err(InferError::SchemeMismatch);
        }
        self.entries.push((page, candidate));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Page index of the first entry
    pub fn start_page(&self) -> usize {
        self.entries.first().map(|(p, _)| *p).unwrap_or(0)
    }

    /// Numeric value of the first entry
    pub fn start_value(&self) -> i64 {
        self.entries.first().map(|(_, c)| c.num_value).unwrap_or(0)
    }

    /// `(page, value)` of the last entry
    pub fn tail(&self) -> Option<(usize, i64)> {
        self.entries.last().map(|(p, c)| (*p, c.num_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeRegistry;

    fn obs(text: &str) -> Rc<WordObservation> {
        Rc::new(WordObservation {
            bbox: BBox::new(0, 0, 10, 10),
            text: text.to_string(),
            fontsize: 10,
            confidence: 90,
        })
    }

    #[test]
    fn test_candidate_invariant_enforced() {
        let registry = SchemeRegistry::new();
        let arabic = registry.match_word("5").unwrap();

        // Synthetic with an observation is rejected
        let bad = PageNumberCandidate::new("5".into(), 5, arabic, true, Some(obs("5")), None);
        assert!(matches!(bad, Err(InferError::SyntheticWithObservation)));

        // Observed without an observation is rejected too
        let bad = PageNumberCandidate::new("5".into(), 5, arabic, false, None, None);
        assert!(matches!(bad, Err(InferError::SyntheticWithObservation)));

        let ok = PageNumberCandidate::new("5".into(), 5, arabic, false, Some(obs("5")), None);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_sequence_scheme_mismatch() {
        let registry = SchemeRegistry::new();
        let arabic = registry.match_word("5").unwrap();
        let roman = registry.match_word("v").unwrap();

        let mut seq = Sequence::open(0, PageNumberCandidate::observed("5".into(), 5, arabic, obs("5"), None));
        let err = seq.push(1, PageNumberCandidate::observed("vi".into(), 6, roman, obs("vi"), None));
        assert!(matches!(err, Err(InferError::SchemeMismatch)));

        let ok = seq.push(1, PageNumberCandidate::observed("6".into(), 6, arabic, obs("6"), None));
        assert!(ok.is_ok());
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.tail(), Some((1, 6)));
    }

    #[test]
    fn test_sequence_start_accessors() {
        let registry = SchemeRegistry::new();
        let arabic = registry.match_word("5").unwrap();
        let seq = Sequence::open(3, PageNumberCandidate::observed("8".into(), 8, arabic, obs("8"), None));
        assert_eq!(seq.start_page(), 3);
        assert_eq!(seq.start_value(), 8);
    }
}
