//! Page number inference engine
//!
//! Two passes over the document. Pass 1 extracts every syntactic candidate,
//! groups them into runs, fills gaps, and picks a best path through the
//! trellis; that output becomes training material for a geometric
//! classifier. Pass 2 repeats the pipeline with the classifier screening
//! candidates, at a lower parking threshold and a cheaper in-run cost, and
//! its path is the final per-page assignment.
//!
//! # Example
//!
//! ```rust,no_run
//! use hocr_pagenum::hocr::HocrParser;
//! use hocr_pagenum::infer::{infer_page_numbers, InferenceOptions};
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! let options = InferenceOptions::default();
//! let result = infer_page_numbers(
//!     || HocrParser::open(Path::new("book_hocr.html")).map_err(Into::into),
//!     &HashSet::new(),
//!     &options,
//! )
//! .unwrap();
//! println!("document confidence: {:.2}", result.confidence);
//! ```

mod confidence;
mod edge_fill;
mod extract;
mod sequence;
mod trellis;
mod types;

pub use confidence::{document_confidence, seqoffset};
pub use edge_fill::opportunistic_fill;
pub use extract::{extract_candidates, ExtractOutput, PrefilterFn};
pub use sequence::{enumerate_sequences, fill_gaps};
pub use trellis::{best_path, build_trellis, Trellis, TrellisState};
pub use types::{
    InferError, PageInfo, PageNumberCandidate, Result, Sequence, GLOBAL_SEED, NEGATIVES_PER_PAGE,
    PASS1_DENSITY_THRESHOLD, PASS2_DENSITY_THRESHOLD, TRELLIS_MISSING_COST, TRELLIS_NONE_COST,
};

use crate::classify::{feature_vector, ClassifierKind, TrainedFilter, FEATURE_DIM};
use crate::hocr::{self, OcrPage, WordObservation};
use crate::scheme::SchemeRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// In-sequence cost numerator for the unfiltered pass
const PASS1_SEQ_FACTOR: f64 = 3.0;

/// In-sequence cost numerator for the filtered pass
const PASS2_SEQ_FACTOR: f64 = 1.0;

// ============================================================
// Options & Result
// ============================================================

/// Engine configuration
#[derive(Debug, Clone)]
pub struct InferenceOptions {
    /// Which classifier pass 2 trains
    pub classifier: ClassifierKind,
    /// Run the classifier-filtered second pass
    pub two_pass: bool,
    /// Sequence parking threshold for pass 1
    pub pass1_threshold: f64,
    /// Sequence parking threshold for pass 2
    pub pass2_threshold: f64,
    /// Back-fill and forward-fill towards the document edges
    pub opportunistic_fill: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::NaiveBayes,
            two_pass: true,
            pass1_threshold: PASS1_DENSITY_THRESHOLD,
            pass2_threshold: PASS2_DENSITY_THRESHOLD,
            opportunistic_fill: false,
        }
    }
}

/// Everything a run produces
pub struct InferenceResult {
    /// Final per-page assignment, one entry per kept page
    pub assigned: Vec<Option<PageNumberCandidate>>,
    /// Page geometry per kept page
    pub page_infos: Vec<PageInfo>,
    /// Physical leaf number per kept page
    pub leaf_nums: Vec<usize>,
    /// The final assignment regrouped into runs
    pub refined: Vec<Sequence>,
    /// Document confidence in [0, 1]
    pub confidence: f64,
    /// False when training was skipped and pass 1 stands
    pub classifier_trained: bool,
    /// Scheme registry for resolving candidate handles
    pub registry: SchemeRegistry,
}

// ============================================================
// Driver
// ============================================================

/// One pass: extract, enumerate, fill, solve
fn run_pass<I>(
    pages: I,
    skip: &HashSet<usize>,
    registry: &mut SchemeRegistry,
    rng: &mut StdRng,
    filter: Option<&PrefilterFn<'_>>,
    threshold: f64,
    seq_factor: f64,
) -> Result<(ExtractOutput, Vec<Option<PageNumberCandidate>>)>
where
    I: IntoIterator<Item = hocr::Result<OcrPage>>,
{
    let extracted = extract_candidates(pages, skip, registry, rng, filter)?;
    let sequences = enumerate_sequences(&extracted.page_matches, registry, threshold)?;
    let sequences = fill_gaps(sequences, registry);
    let trellis = build_trellis(extracted.page_count(), &sequences, seq_factor);
    let path = best_path(&trellis);
    Ok((extracted, path))
}

/// Build the training set from a pass-1 path: chosen observed candidates are
/// positives; the sampled non-matches of those same pages are negatives.
fn train_filter(
    kind: ClassifierKind,
    path: &[Option<PageNumberCandidate>],
    extracted: &ExtractOutput,
) -> Result<TrainedFilter> {
    let mut rows: Vec<[i64; FEATURE_DIM]> = Vec::new();
    let mut labels: Vec<u8> = Vec::new();

    for (page, assigned) in path.iter().enumerate() {
        let Some(candidate) = assigned else { continue };
        if candidate.synthetic {
            continue;
        }
        let Some(observation) = &candidate.observation else {
            continue;
        };
        let info = &extracted.page_infos[page];
        rows.push(feature_vector(observation, info, page));
        labels.push(1);
        for negative in &extracted.page_non_matches[page] {
            rows.push(feature_vector(negative, info, page));
            labels.push(0);
        }
    }

    if !labels.contains(&1) || !labels.contains(&0) {
        return Err(InferError::TrainingUnderdetermined);
    }
    Ok(TrainedFilter::train(kind, &rows, &labels))
}

/// Regroup a per-page assignment into runs
fn refine_sequences(
    assigned: &[Option<PageNumberCandidate>],
    registry: &SchemeRegistry,
    threshold: f64,
) -> Result<Vec<Sequence>> {
    let singletons: Vec<Vec<PageNumberCandidate>> = assigned
        .iter()
        .map(|c| c.iter().cloned().collect())
        .collect();
    enumerate_sequences(&singletons, registry, threshold)
}

/// Infer the printed page number for every page of a document.
///
/// `source` opens the page stream; it is called once per pass, so it must
/// yield the same pages each time. `skip` holds leaf numbers to drop from
/// the stream.
pub fn infer_page_numbers<I, F>(
    source: F,
    skip: &HashSet<usize>,
    options: &InferenceOptions,
) -> Result<InferenceResult>
where
    F: Fn() -> Result<I>,
    I: IntoIterator<Item = hocr::Result<OcrPage>>,
{
    let mut registry = SchemeRegistry::new();
    let mut rng = StdRng::seed_from_u64(GLOBAL_SEED);

    let (extracted1, path1) = run_pass(
        source()?,
        skip,
        &mut registry,
        &mut rng,
        None,
        options.pass1_threshold,
        PASS1_SEQ_FACTOR,
    )?;

    let mut classifier_trained = false;
    let mut assigned = path1;
    let mut threshold = options.pass1_threshold;

    if options.two_pass {
        match train_filter(options.classifier, &assigned, &extracted1) {
            Err(InferError::TrainingUnderdetermined) => {
                // Nothing to learn from; pass 1 stands.
            }
            Err(other) => return Err(other),
            Ok(filter) => {
                classifier_trained = true;
                let infos = extracted1.page_infos.clone();
                let prefilter = move |page: usize, word: &WordObservation| {
                    let info = infos.get(page).copied().unwrap_or_default();
                    let (p_false, p_true) = filter.score(&feature_vector(word, &info, page));
                    (p_true > 0.5, (p_false, p_true))
                };
                let (_, path2) = run_pass(
                    source()?,
                    skip,
                    &mut registry,
                    &mut rng,
                    Some(&prefilter),
                    options.pass2_threshold,
                    PASS2_SEQ_FACTOR,
                )?;
                assigned = path2;
                threshold = options.pass2_threshold;
            }
        }
    }

    let refined = refine_sequences(&assigned, &registry, threshold)?;

    if options.opportunistic_fill {
        opportunistic_fill(&mut assigned, &registry)?;
    }

    let confidence = document_confidence(&assigned, &refined, &registry);

    Ok(InferenceResult {
        assigned,
        page_infos: extracted1.page_infos,
        leaf_nums: extracted1.leaf_nums,
        refined,
        confidence,
        classifier_trained,
        registry,
    })
}
