//! Sequence enumeration and gap filling
//!
//! Groups candidates into monotone same-scheme runs with a greedy first-fit
//! pass, parks runs whose density drops below the caller's threshold, and
//! interpolates missing pages for schemes that can synthesize values.

use super::types::{PageNumberCandidate, Result, Sequence};
use crate::scheme::SchemeRegistry;

/// Density of a run observed up to page `current`
fn density(seq: &Sequence, current: usize) -> f64 {
    let start = seq.start_page();
    if current == start {
        1.0
    } else {
        seq.len() as f64 / (current - start) as f64
    }
}

/// Greedily group candidates into monotonically increasing runs.
///
/// Each candidate joins the first active run it continues; otherwise it
/// opens a new run. After every page, runs whose density has fallen below
/// `min_density` are parked. Runs shorter than two entries are discarded.
pub fn enumerate_sequences(
    page_matches: &[Vec<PageNumberCandidate>],
    registry: &SchemeRegistry,
    min_density: f64,
) -> Result<Vec<Sequence>> {
    let mut active: Vec<Sequence> = Vec::new();
    let mut parked: Vec<Sequence> = Vec::new();

    for (page, candidates) in page_matches.iter().enumerate() {
        for candidate in candidates {
            let slot = active.iter().position(|seq| {
                if seq.scheme != candidate.scheme {
                    return false;
                }
                let Some((tail_page, tail_value)) = seq.tail() else {
                    return false;
                };
                page != tail_page
                    && candidate.num_value != tail_value
                    && registry.get(seq.scheme).is_increase(
                        tail_value,
                        (page - tail_page) as i64,
                        candidate.num_value,
                    )
            });
            match slot {
                Some(i) => active[i].push(page, candidate.clone())?,
                None => active.push(Sequence::open(page, candidate.clone())),
            }
        }

        // Snapshot, then partition: parking while iterating would leave
        // stale runs behind.
        let snapshot: Vec<Sequence> = active.drain(..).collect();
        for seq in snapshot {
            if density(&seq, page) < min_density {
                parked.push(seq);
            } else {
                active.push(seq);
            }
        }
    }

    parked.append(&mut active);
    parked.retain(|seq| seq.len() >= 2);
    Ok(parked)
}

/// Interpolate missing pages inside each run.
///
/// Runs of extrapolating schemes come back covering every page between
/// their first and last entry, with synthesized candidates in the gaps.
/// Other runs, and runs whose gap values have no printed form, pass
/// through unchanged.
pub fn fill_gaps(sequences: Vec<Sequence>, registry: &SchemeRegistry) -> Vec<Sequence> {
    let mut filled = Vec::with_capacity(sequences.len());

    for seq in sequences {
        let scheme = registry.get(seq.scheme);
        if !scheme.supports_extrapolation() || seq.entries.is_empty() {
            filled.push(seq);
            continue;
        }

        let (first_page, first_value) = (seq.start_page(), seq.start_value());
        let last_page = seq.entries.last().map(|(p, _)| *p).unwrap_or(first_page);

        let mut entries = Vec::with_capacity(last_page - first_page + 1);
        let mut existing = seq.entries.iter().peekable();
        let mut complete = true;
        for page in first_page..=last_page {
            if existing.peek().is_some_and(|(p, _)| *p == page) {
                if let Some(entry) = existing.next() {
                    entries.push(entry.clone());
                }
            } else {
                let expected = first_value + (page - first_page) as i64;
                let Ok(value) = scheme.from_num(expected) else {
                    complete = false;
                    break;
                };
                entries.push((
                    page,
                    PageNumberCandidate::synthesized(value, expected, seq.scheme),
                ));
            }
        }

        if complete {
            filled.push(Sequence {
                scheme: seq.scheme,
                entries,
            });
        } else {
            filled.push(seq);
        }
    }

    filled
}
