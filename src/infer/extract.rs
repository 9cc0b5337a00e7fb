//! Candidate extraction
//!
//! Walks the page stream, asks the scheme registry whether each word could
//! be a printed page number, and collects three things per kept page: the
//! candidates, a sample of non-matching words (classifier training
//! negatives), and the page geometry. Skipped leaves are dropped and the
//! remaining pages re-numbered densely.

use super::types::{PageInfo, PageNumberCandidate, Result, NEGATIVES_PER_PAGE};
use crate::hocr::{self, OcrPage, WordObservation};
use crate::scheme::{is_simple_composite, SchemeRegistry};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;
use std::rc::Rc;

/// Pass-2 prefilter: `(effective page index, word) -> (keep, (p_false, p_true))`
pub type PrefilterFn<'a> = dyn Fn(usize, &WordObservation) -> (bool, (f64, f64)) + 'a;

/// Everything extraction yields, indexed by effective page
#[derive(Debug, Default)]
pub struct ExtractOutput {
    /// Page number candidates per page
    pub page_matches: Vec<Vec<PageNumberCandidate>>,
    /// Sampled negative observations per page
    pub page_non_matches: Vec<Vec<Rc<WordObservation>>>,
    /// Page geometry per page
    pub page_infos: Vec<PageInfo>,
    /// Physical leaf number per effective page
    pub leaf_nums: Vec<usize>,
}

impl ExtractOutput {
    /// Number of kept pages
    pub fn page_count(&self) -> usize {
        self.page_infos.len()
    }
}

/// Whether the word sits wholly inside the central 60% x 60% of the page
fn in_central_region(word: &WordObservation, dims: (i64, i64)) -> bool {
    let (w, h) = dims;
    let b = word.bbox;
    5 * b.x1 >= w && 5 * b.x2 <= 4 * w && 5 * b.y1 >= h && 5 * b.y2 <= 4 * h
}

/// Extract candidates and negatives from a page stream.
///
/// `skip` holds leaf numbers absent from access formats; the indices seen by
/// the prefilter and recorded in the output are the dense effective indices
/// that remain after dropping them.
pub fn extract_candidates<I>(
    pages: I,
    skip: &HashSet<usize>,
    registry: &mut SchemeRegistry,
    rng: &mut StdRng,
    filter: Option<&PrefilterFn<'_>>,
) -> Result<ExtractOutput>
where
    I: IntoIterator<Item = hocr::Result<OcrPage>>,
{
    let mut out = ExtractOutput::default();

    for (leaf, page) in pages.into_iter().enumerate() {
        let page = page?;
        if skip.contains(&leaf) {
            continue;
        }
        let effective = out.page_infos.len();
        let dims = page.dimensions;

        let mut content_bbox = None;
        let mut matches: Vec<PageNumberCandidate> = Vec::new();
        let mut non_matches: Vec<Rc<WordObservation>> = Vec::new();

        for paragraph in page.paragraphs {
            for line in paragraph.lines {
                for word in line.words {
                    content_bbox = Some(match content_bbox {
                        None => word.bbox,
                        Some(existing) => word.bbox.union(&existing),
                    });

                    // With enough negatives banked, words deep inside the
                    // page body cannot be page numbers and cost nothing to
                    // drop.
                    if non_matches.len() >= NEGATIVES_PER_PAGE && in_central_region(&word, dims) {
                        continue;
                    }

                    let word = Rc::new(word);
                    let mut prob = None;
                    if let Some(filter) = filter {
                        // The classifier is expensive; only words that could
                        // possibly become candidates get scored.
                        let eligible = registry.match_word(&word.text).is_some()
                            || (is_simple_composite(&word.text) && !registry.at_cap());
                        if !eligible {
                            non_matches.push(word);
                            continue;
                        }
                        let (keep, p) = filter(effective, &word);
                        if !keep {
                            non_matches.push(word);
                            continue;
                        }
                        prob = Some(p);
                    }

                    let matched = match registry.match_word(&word.text) {
                        Some(id) => Some(id),
                        None if is_simple_composite(&word.text) => {
                            registry.try_add_composite(&word.text)
                        }
                        None => None,
                    };
                    // A word whose value cannot be represented is no
                    // candidate either.
                    let valued = matched
                        .and_then(|id| registry.get(id).numeral_value(&word.text).ok().map(|v| (id, v)));
                    match valued {
                        Some((id, num_value)) => matches.push(PageNumberCandidate::observed(
                            word.text.clone(),
                            num_value,
                            id,
                            word,
                            prob,
                        )),
                        None => non_matches.push(word),
                    }
                }
            }
        }

        let negatives = if non_matches.is_empty() {
            Vec::new()
        } else {
            (0..NEGATIVES_PER_PAGE)
                .map(|_| Rc::clone(&non_matches[rng.random_range(0..non_matches.len())]))
                .collect()
        };

        out.page_matches.push(matches);
        out.page_non_matches.push(negatives);
        out.page_infos.push(PageInfo {
            dimensions: dims,
            content_bbox: content_bbox.unwrap_or_default(),
        });
        out.leaf_nums.push(leaf);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hocr::{BBox, OcrLine, OcrParagraph};
    use crate::infer::types::GLOBAL_SEED;
    use rand::SeedableRng;

    fn word(text: &str, x1: i64, y1: i64, x2: i64, y2: i64) -> WordObservation {
        WordObservation {
            bbox: BBox::new(x1, y1, x2, y2),
            text: text.to_string(),
            fontsize: 10,
            confidence: 90,
        }
    }

    fn page(words: Vec<WordObservation>) -> OcrPage {
        OcrPage {
            dimensions: (1000, 1600),
            paragraphs: vec![OcrParagraph {
                lines: vec![OcrLine { words }],
            }],
        }
    }

    fn run(
        pages: Vec<OcrPage>,
        skip: &HashSet<usize>,
        registry: &mut SchemeRegistry,
        filter: Option<&PrefilterFn<'_>>,
    ) -> ExtractOutput {
        let mut rng = StdRng::seed_from_u64(GLOBAL_SEED);
        extract_candidates(pages.into_iter().map(Ok), skip, registry, &mut rng, filter).unwrap()
    }

    #[test]
    fn test_basic_extraction() {
        let pages = vec![
            page(vec![word("17", 80, 1490, 130, 1530), word("snow", 100, 200, 200, 240)]),
            page(vec![word("18", 80, 1490, 130, 1530)]),
        ];
        let mut registry = SchemeRegistry::new();
        let out = run(pages, &HashSet::new(), &mut registry, None);

        assert_eq!(out.page_count(), 2);
        assert_eq!(out.page_matches[0].len(), 1);
        assert_eq!(out.page_matches[0][0].value, "17");
        assert_eq!(out.page_matches[0][0].num_value, 17);
        assert!(!out.page_matches[0][0].synthetic);
        // The non-numeric word was sampled as negatives
        assert_eq!(out.page_non_matches[0].len(), NEGATIVES_PER_PAGE);
        assert!(out.page_non_matches[1].is_empty());
    }

    #[test]
    fn test_skip_pages_renumber_densely() {
        let pages = vec![
            page(vec![word("1", 80, 1490, 130, 1530)]),
            page(vec![word("99", 80, 1490, 130, 1530)]),
            page(vec![word("2", 80, 1490, 130, 1530)]),
        ];
        let skip: HashSet<usize> = [1].into_iter().collect();
        let mut registry = SchemeRegistry::new();
        let out = run(pages, &skip, &mut registry, None);

        assert_eq!(out.page_count(), 2);
        assert_eq!(out.leaf_nums, vec![0, 2]);
        assert_eq!(out.page_matches[1][0].value, "2");
    }

    #[test]
    fn test_content_bbox_union() {
        let pages = vec![page(vec![
            word("17", 80, 1490, 130, 1530),
            word("title", 300, 100, 700, 150),
        ])];
        let mut registry = SchemeRegistry::new();
        let out = run(pages, &HashSet::new(), &mut registry, None);
        assert_eq!(out.page_infos[0].content_bbox, BBox::new(80, 100, 700, 1530));
    }

    #[test]
    fn test_central_words_skipped_after_enough_negatives() {
        let mut words: Vec<WordObservation> = (0..NEGATIVES_PER_PAGE as i64)
            .map(|i| word("body", 300, 400 + i * 40, 400, 430 + i * 40))
            .collect();
        // This central numeric word arrives after ten negatives are banked
        words.push(word("1987", 450, 700, 530, 740));
        // A margin word is still considered
        words.push(word("17", 80, 1490, 130, 1530));

        let mut registry = SchemeRegistry::new();
        let out = run(vec![page(words)], &HashSet::new(), &mut registry, None);
        let values: Vec<&str> = out.page_matches[0].iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["17"]);
    }

    #[test]
    fn test_composite_discovery_and_reuse() {
        let pages = vec![
            page(vec![word("A-1", 80, 1490, 140, 1530)]),
            page(vec![word("A-2", 80, 1490, 140, 1530)]),
        ];
        let mut registry = SchemeRegistry::new();
        let out = run(pages, &HashSet::new(), &mut registry, None);

        assert_eq!(registry.composite_count(), 1);
        let first = &out.page_matches[0][0];
        let second = &out.page_matches[1][0];
        assert_eq!(first.scheme, second.scheme);
        assert_eq!(second.num_value, first.num_value + 1);
    }

    #[test]
    fn test_prefilter_rejects_word() {
        let pages = vec![page(vec![
            word("17", 80, 1490, 130, 1530),
            word("1987", 450, 700, 530, 740),
        ])];
        let filter = |_page: usize, w: &WordObservation| -> (bool, (f64, f64)) {
            if w.text == "1987" {
                (false, (0.9, 0.1))
            } else {
                (true, (0.05, 0.95))
            }
        };
        let mut registry = SchemeRegistry::new();
        let out = run(pages, &HashSet::new(), &mut registry, Some(&filter));

        assert_eq!(out.page_matches[0].len(), 1);
        assert_eq!(out.page_matches[0][0].value, "17");
        assert_eq!(out.page_matches[0][0].prob, Some((0.05, 0.95)));
    }

    #[test]
    fn test_negative_sampling_is_deterministic() {
        let words: Vec<WordObservation> = (0..30)
            .map(|i| word(&format!("w{i}"), 50, 100 + i * 45, 120, 130 + i * 45))
            .collect();
        let mut r1 = SchemeRegistry::new();
        let mut r2 = SchemeRegistry::new();
        let a = run(vec![page(words.clone())], &HashSet::new(), &mut r1, None);
        let b = run(vec![page(words)], &HashSet::new(), &mut r2, None);
        let texts =
            |o: &ExtractOutput| o.page_non_matches[0].iter().map(|w| w.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts(&a), texts(&b));
    }
}
