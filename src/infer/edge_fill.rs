//! Opportunistic edge filling
//!
//! Books often print no number on the first few leaves even though the
//! count started there. When enabled, the engine walks backward from the
//! first confirmed page number (stopping at page 0 or value 1) and forward
//! from the last one (unbounded), synthesizing values in the same scheme.

use super::types::{PageNumberCandidate, Result};
use crate::scheme::SchemeRegistry;

/// Back-fill towards page 0 and forward-fill towards the last page.
///
/// The forward walk assigns every downstream page unconditionally; entries
/// already present past the last confirmed number are replaced.
pub fn opportunistic_fill(
    assigned: &mut [Option<PageNumberCandidate>],
    registry: &SchemeRegistry,
) -> Result<()> {
    let Some(first) = assigned.iter().position(Option::is_some) else {
        return Ok(());
    };
    let Some(last) = assigned.iter().rposition(Option::is_some) else {
        return Ok(());
    };

    if let Some(anchor) = assigned[first].clone() {
        let scheme = registry.get(anchor.scheme);
        for page in (0..first).rev() {
            let value = anchor.num_value - (first - page) as i64;
            if value < 1 {
                break;
            }
            let Ok(text) = scheme.from_num(value) else {
                break;
            };
            assigned[page] = Some(PageNumberCandidate::synthesized(text, value, anchor.scheme));
        }
    }

    if let Some(anchor) = assigned[last].clone() {
        let scheme = registry.get(anchor.scheme);
        for page in last + 1..assigned.len() {
            let value = anchor.num_value + (page - last) as i64;
            let Ok(text) = scheme.from_num(value) else {
                break;
            };
            assigned[page] = Some(PageNumberCandidate::synthesized(text, value, anchor.scheme));
        }
    }

    Ok(())
}
