//! Document confidence aggregation
//!
//! Five observables multiply into a single score in [0, 1]: assignment
//! coverage, observed (non-synthetic) coverage, the observed share of
//! assignments, the mean classifier probability, and how many pages each
//! refined run explains. Arabic runs that look like sub-continuations of an
//! earlier Arabic run (chapter-numbered front matter, re-started inserts)
//! are discounted from the run count first.

use super::types::{PageNumberCandidate, Sequence};
use crate::scheme::{NumberingScheme, SchemeRegistry};

/// Pairwise thresholds for recognizing an Arabic run as a sub-continuation
/// of an earlier one.
const SEQOFFSET_MAX_LEAF_GAP: i64 = 20;
const SEQOFFSET_MAX_VALUE_GAP: i64 = 20;
const SEQOFFSET_MAX_DRIFT: i64 = 5;

/// Count Arabic refined runs that continue an earlier Arabic run.
///
/// For each ordered pair `(a, b)` with `a` first: when the page gap and
/// value gap are both small and nearly equal, `b` is counted once and `a`
/// pairs no further.
pub fn seqoffset(refined: &[Sequence], registry: &SchemeRegistry) -> usize {
    let arabic: Vec<&Sequence> = refined
        .iter()
        .filter(|s| matches!(registry.get(s.scheme), NumberingScheme::Arabic))
        .collect();

    let mut offset = 0;
    for (i, a) in arabic.iter().enumerate() {
        for b in arabic.iter().skip(i + 1) {
            let leaf = b.start_page() as i64 - a.start_page() as i64;
            let value = b.start_value() - a.start_value();
            if 0 < leaf
                && leaf < SEQOFFSET_MAX_LEAF_GAP
                && 0 < value
                && value < SEQOFFSET_MAX_VALUE_GAP
                && 0 < leaf - value
                && leaf - value < SEQOFFSET_MAX_DRIFT
            {
                offset += 1;
                break;
            }
        }
    }
    offset
}

/// Document confidence in [0, 1]
pub fn document_confidence(
    assigned: &[Option<PageNumberCandidate>],
    refined: &[Sequence],
    registry: &SchemeRegistry,
) -> f64 {
    let total = assigned.len();
    if total == 0 {
        return 0.0;
    }

    let found_or_synth = assigned.iter().filter(|c| c.is_some()).count();
    let found = assigned
        .iter()
        .filter(|c| c.as_ref().is_some_and(|c| !c.synthetic))
        .count();

    let prob_sum: f64 = assigned
        .iter()
        .filter_map(|c| c.as_ref())
        .filter(|c| !c.synthetic)
        .map(|c| c.prob.map(|(_, p_true)| p_true).unwrap_or(0.0))
        .sum();
    let prob_avg = if found > 0 { prob_sum / found as f64 } else { 0.0 };

    let synth_ratio = if found_or_synth > 0 {
        found as f64 / found_or_synth as f64
    } else {
        0.0
    };

    let run_count = refined.len().saturating_sub(seqoffset(refined, registry));
    let pages_per_seq = total as f64 / run_count.max(1) as f64;

    let factor = |v: f64| v.min(1.0);
    factor(found_or_synth as f64 / total as f64 + 0.20)
        * factor(found as f64 / total as f64 + 0.70)
        * factor(synth_ratio + 2.0 / 3.0)
        * factor(prob_avg + 0.10)
        * factor(pages_per_seq / (total.min(30) as f64) + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeId;

    fn arabic_candidate(id: SchemeId, n: i64, prob: Option<(f64, f64)>) -> PageNumberCandidate {
        let mut c = PageNumberCandidate::synthesized(n.to_string(), n, id);
        c.synthetic = false;
        c.prob = prob;
        c
    }

    fn arabic_seq(id: SchemeId, start_page: usize, start_value: i64, len: usize) -> Sequence {
        Sequence {
            scheme: id,
            entries: (0..len)
                .map(|i| {
                    (
                        start_page + i,
                        PageNumberCandidate::synthesized(
                            (start_value + i as i64).to_string(),
                            start_value + i as i64,
                            id,
                        ),
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_document_scores_zero() {
        let registry = SchemeRegistry::new();
        assert_eq!(document_confidence(&[], &[], &registry), 0.0);
    }

    #[test]
    fn test_full_confident_assignment() {
        let registry = SchemeRegistry::new();
        let id = registry.match_word("1").unwrap();
        let assigned: Vec<Option<PageNumberCandidate>> = (1..=10)
            .map(|n| Some(arabic_candidate(id, n, Some((0.0, 1.0)))))
            .collect();
        let refined = vec![arabic_seq(id, 0, 1, 10)];
        let c = document_confidence(&assigned, &refined, &registry);
        assert!(c > 0.99, "c = {c}");
    }

    #[test]
    fn test_no_assignment_scores_low() {
        let registry = SchemeRegistry::new();
        let assigned: Vec<Option<PageNumberCandidate>> = vec![None; 10];
        let c = document_confidence(&assigned, &[], &registry);
        // 0.20 * 0.70 * 2/3 * 0.10 * min(1, 1 + 0.05)
        assert!(c < 0.011, "c = {c}");
    }

    #[test]
    fn test_synthetic_share_lowers_confidence() {
        let registry = SchemeRegistry::new();
        let id = registry.match_word("1").unwrap();
        // 3 observed pages, 7 synthesized: coverage is full but the
        // observed share drags the score down.
        let mut assigned: Vec<Option<PageNumberCandidate>> = (1..=3)
            .map(|n| Some(arabic_candidate(id, n, Some((0.0, 1.0)))))
            .collect();
        assigned.extend(
            (4..=10).map(|n| Some(PageNumberCandidate::synthesized(n.to_string(), n, id))),
        );
        let refined = vec![arabic_seq(id, 0, 1, 10)];
        let c = document_confidence(&assigned, &refined, &registry);
        // Only the observed-share factor (0.3 + 2/3) stays below one
        assert!(c < 1.0 && c > 0.9, "c = {c}");
    }

    #[test]
    fn test_seqoffset_detects_sub_continuation() {
        let registry = SchemeRegistry::new();
        let id = registry.match_word("1").unwrap();
        // Run B restarts 3 pages after A with values 1 behind: drift 2
        let a = arabic_seq(id, 0, 1, 5);
        let b = arabic_seq(id, 3, 2, 5);
        assert_eq!(seqoffset(&[a, b], &registry), 1);
    }

    #[test]
    fn test_seqoffset_ignores_distant_runs() {
        let registry = SchemeRegistry::new();
        let id = registry.match_word("1").unwrap();
        let a = arabic_seq(id, 0, 1, 5);
        let b = arabic_seq(id, 40, 2, 5);
        assert_eq!(seqoffset(&[a, b], &registry), 0);
    }

    #[test]
    fn test_seqoffset_requires_arabic() {
        let registry = SchemeRegistry::new();
        let roman = registry.match_word("iv").unwrap();
        let arabic = registry.match_word("1").unwrap();
        let a = Sequence {
            scheme: roman,
            entries: vec![
                (0, PageNumberCandidate::synthesized("i".into(), 1, roman)),
                (1, PageNumberCandidate::synthesized("ii".into(), 2, roman)),
            ],
        };
        let b = arabic_seq(arabic, 3, 2, 5);
        assert_eq!(seqoffset(&[a, b], &registry), 0);
    }

    #[test]
    fn test_seqoffset_counts_each_base_once() {
        let registry = SchemeRegistry::new();
        let id = registry.match_word("1").unwrap();
        let a = arabic_seq(id, 0, 1, 3);
        let b = arabic_seq(id, 3, 2, 3);
        let c = arabic_seq(id, 6, 4, 3);
        // A pairs with B and stops; B pairs with C
        assert_eq!(seqoffset(&[a, b, c], &registry), 2);
    }
}
