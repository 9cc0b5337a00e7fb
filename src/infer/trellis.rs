//! Trellis construction and best-path selection
//!
//! One layer per page; state 0 of every layer is the distinguished "none"
//! state. Every sequence contributes one state per element to the layer of
//! that element's page. Consecutive in-sequence states on adjacent pages are
//! linked at cost `F / N`, so long runs are cheap to stay on; entering or
//! leaving a run passes through none states at a fixed cost. Edges that were
//! never established answer with a sentinel cost so the solver can probe any
//! next-layer state.

use super::types::{PageNumberCandidate, Sequence, TRELLIS_MISSING_COST, TRELLIS_NONE_COST};
use std::collections::HashMap;

/// Per-node emission cost; identical everywhere, kept explicit so path
/// costs match the model.
const EMISSION_COST: f64 = 1.0;

/// One state in a trellis layer
#[derive(Debug)]
pub struct TrellisState {
    /// The candidate this state assigns, `None` for the none state
    pub candidate: Option<PageNumberCandidate>,
    /// Established edges: successor state index in the next layer -> cost
    outgoing: HashMap<usize, f64>,
}

impl TrellisState {
    fn none() -> Self {
        Self {
            candidate: None,
            outgoing: HashMap::new(),
        }
    }

    /// Cost towards `successor` in the next layer; absent edges answer the
    /// sentinel.
    pub fn edge_cost(&self, successor: usize) -> f64 {
        self.outgoing
            .get(&successor)
            .copied()
            .unwrap_or(TRELLIS_MISSING_COST)
    }
}

/// Layered graph over the document's pages
#[derive(Debug)]
pub struct Trellis {
    layers: Vec<Vec<TrellisState>>,
}

impl Trellis {
    /// Number of layers (pages)
    pub fn page_count(&self) -> usize {
        self.layers.len()
    }

    /// States of one layer
    pub fn layer(&self, page: usize) -> &[TrellisState] {
        &self.layers[page]
    }
}

/// Build the trellis for `page_count` pages over `sequences`.
///
/// `seq_factor` is the in-sequence transition numerator: a run of length `N`
/// links its consecutive elements at cost `seq_factor / N`.
pub fn build_trellis(page_count: usize, sequences: &[Sequence], seq_factor: f64) -> Trellis {
    let mut layers: Vec<Vec<TrellisState>> = (0..page_count)
        .map(|_| vec![TrellisState::none()])
        .collect();

    for seq in sequences {
        let run_cost = seq_factor / seq.len() as f64;
        let mut prev: Option<(usize, usize)> = None;
        for (page, candidate) in &seq.entries {
            if *page >= page_count {
                break;
            }
            let index = layers[*page].len();
            layers[*page].push(TrellisState {
                candidate: Some(candidate.clone()),
                outgoing: HashMap::new(),
            });
            if let Some((prev_page, prev_index)) = prev {
                // Only adjacent-layer links are traversable; a run with an
                // unfilled hole leans on the sentinel instead.
                if *page == prev_page + 1 {
                    layers[prev_page][prev_index].outgoing.insert(index, run_cost);
                }
            }
            prev = Some((*page, index));
        }
    }

    // None-state wiring: everything may fall into the next none, and the
    // none may enter any next-layer state.
    for page in 1..page_count {
        let next_len = layers[page].len();
        for state in layers[page - 1].iter_mut() {
            state.outgoing.insert(0, TRELLIS_NONE_COST);
        }
        let none = &mut layers[page - 1][0];
        for next in 1..next_len {
            none.outgoing.insert(next, TRELLIS_NONE_COST);
        }
    }

    Trellis { layers }
}

/// Minimum-cost path through one state per layer.
///
/// Ties break towards the lowest state index, so repeated runs pick the
/// same path.
pub fn best_path(trellis: &Trellis) -> Vec<Option<PageNumberCandidate>> {
    let pages = trellis.page_count();
    if pages == 0 {
        return Vec::new();
    }

    let mut cost: Vec<Vec<f64>> = Vec::with_capacity(pages);
    let mut back: Vec<Vec<usize>> = Vec::with_capacity(pages);

    cost.push(vec![EMISSION_COST; trellis.layer(0).len()]);
    back.push(vec![0; trellis.layer(0).len()]);

    for page in 1..pages {
        let prev_layer = trellis.layer(page - 1);
        let prev_cost = &cost[page - 1];
        let layer_len = trellis.layer(page).len();

        let mut layer_cost = vec![f64::INFINITY; layer_len];
        let mut layer_back = vec![0usize; layer_len];
        for (next, (lc, lb)) in layer_cost.iter_mut().zip(layer_back.iter_mut()).enumerate() {
            for (prev, state) in prev_layer.iter().enumerate() {
                let total = prev_cost[prev] + state.edge_cost(next) + EMISSION_COST;
                if total < *lc {
                    *lc = total;
                    *lb = prev;
                }
            }
        }
        cost.push(layer_cost);
        back.push(layer_back);
    }

    let last = &cost[pages - 1];
    let mut best = 0;
    for (i, &c) in last.iter().enumerate() {
        if c < last[best] {
            best = i;
        }
    }

    let mut path = vec![0usize; pages];
    path[pages - 1] = best;
    for page in (1..pages).rev() {
        path[page - 1] = back[page][path[page]];
    }

    path.iter()
        .enumerate()
        .map(|(page, &state)| trellis.layer(page)[state].candidate.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeRegistry;

    fn arabic_seq(registry: &SchemeRegistry, start_page: usize, values: &[i64]) -> Sequence {
        let id = registry.match_word("1").unwrap();
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                (
                    start_page + i,
                    PageNumberCandidate::synthesized(v.to_string(), v, id),
                )
            })
            .collect();
        Sequence {
            scheme: id,
            entries,
        }
    }

    #[test]
    fn test_empty_document() {
        let trellis = build_trellis(0, &[], 3.0);
        assert!(best_path(&trellis).is_empty());
    }

    #[test]
    fn test_no_sequences_yields_all_none() {
        let trellis = build_trellis(3, &[], 3.0);
        let path = best_path(&trellis);
        assert_eq!(path.len(), 3);
        assert!(path.iter().all(Option::is_none));
    }

    #[test]
    fn test_single_run_wins_over_none() {
        let registry = SchemeRegistry::new();
        let seq = arabic_seq(&registry, 0, &[1, 2, 3, 4, 5]);
        let trellis = build_trellis(5, &[seq], 3.0);
        let path = best_path(&trellis);
        let values: Vec<String> = path.iter().map(|c| c.as_ref().unwrap().value.clone()).collect();
        assert_eq!(values, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_longer_run_beats_shorter() {
        let registry = SchemeRegistry::new();
        // Two runs covering the same pages with conflicting values
        let long = arabic_seq(&registry, 0, &[1, 2, 3, 4, 5, 6]);
        let short = arabic_seq(&registry, 0, &[100, 101]);
        let trellis = build_trellis(6, &[short, long], 3.0);
        let path = best_path(&trellis);
        assert_eq!(path[0].as_ref().unwrap().value, "1");
        assert_eq!(path[5].as_ref().unwrap().value, "6");
    }

    #[test]
    fn test_missing_edge_sentinel() {
        let registry = SchemeRegistry::new();
        let a = arabic_seq(&registry, 0, &[1, 2]);
        let b = arabic_seq(&registry, 2, &[10, 11]);
        let trellis = build_trellis(4, &[a, b], 3.0);

        // Cross-sequence edges are never established
        let end_of_a = &trellis.layer(1)[1];
        assert_eq!(end_of_a.edge_cost(1), TRELLIS_MISSING_COST);
        // Into-none is established
        assert_eq!(end_of_a.edge_cost(0), TRELLIS_NONE_COST);

        // The path still reaches both runs (through the sentinel or none)
        let path = best_path(&trellis);
        assert_eq!(path[0].as_ref().unwrap().value, "1");
        assert_eq!(path[3].as_ref().unwrap().value, "11");
    }

    #[test]
    fn test_exactly_one_assignment_per_page() {
        let registry = SchemeRegistry::new();
        let seq = arabic_seq(&registry, 1, &[7, 8]);
        let trellis = build_trellis(4, &[seq], 1.0);
        let path = best_path(&trellis);
        assert_eq!(path.len(), 4);
        assert!(path[0].is_none());
        assert_eq!(path[1].as_ref().unwrap().value, "7");
        assert_eq!(path[2].as_ref().unwrap().value, "8");
        assert!(path[3].is_none());
    }
}
