//! Composite numbering templates
//!
//! Compound page numbers ("A-7", "3-12", "(4)") are handled by templates
//! discovered from observed samples: every maximal digit run in the sample
//! becomes a hole, everything else is literal. A template packs its digit
//! groups into one integer so sequence arithmetic works unchanged, and it
//! can reconstruct the printed form from that integer.

use super::SchemeError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Packing base for multi-group composite values. Each digit group holds at
/// most 8 digits, so groups never collide under this base.
pub const COMPOSITE_BASE: i64 = 1_000_000_000_000;

/// Shapes a composite sample must take to support extrapolation: parenthesized
/// groups, letter-prefixed or letter-suffixed numbers (with optional hyphen),
/// and two-group separators.
static SIMPLE_COMPOSITE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\(\d{1,8}\)$",
        r"^[A-Z]+-?\d{1,8}$",
        r"^\d{1,8}-?[A-Z]+$",
        r"^\(\d{1,8}\)\(\d{1,8}\)$",
        r"^\(\d{1,8}\)\d{1,8}$",
        r"^\d{1,8}/\d{1,8}$",
        r"^\d{1,8}\.\d{1,8}$",
        r"^\d{1,8}-\d{1,8}$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("simple composite pattern is valid"))
    .collect()
});

static DIGIT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("digit run pattern is valid"));

/// Whether a sample takes one of the extrapolation-capable composite shapes
pub fn is_simple_composite(text: &str) -> bool {
    SIMPLE_COMPOSITE_RES.iter().any(|re| re.is_match(text))
}

/// One segment of a composite template
#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    /// Verbatim text between digit groups
    Literal(String),
    /// A digit group
    Hole,
}

/// A numbering template derived from an observed sample
#[derive(Debug, Clone)]
pub struct CompositeTemplate {
    parts: Vec<TemplatePart>,
    group_count: usize,
    pattern: Regex,
    extrapolates: bool,
}

impl CompositeTemplate {
    /// Derive a template from a sample. Returns `None` when the sample
    /// carries no digits at all.
    pub fn from_sample(sample: &str) -> Option<Self> {
        if !DIGIT_RUN_RE.is_match(sample) {
            return None;
        }

        let mut parts = Vec::new();
        let mut pattern = String::from("^");
        let mut group_count = 0;
        let mut last = 0;
        for m in DIGIT_RUN_RE.find_iter(sample) {
            if m.start() > last {
                let literal = &sample[last..m.start()];
                parts.push(TemplatePart::Literal(literal.to_string()));
                pattern.push_str(&regex::escape(literal));
            }
            parts.push(TemplatePart::Hole);
            pattern.push_str(r"(\d{1,8})");
            group_count += 1;
            last = m.end();
        }
        if last < sample.len() {
            let literal = &sample[last..];
            parts.push(TemplatePart::Literal(literal.to_string()));
            pattern.push_str(&regex::escape(literal));
        }
        pattern.push('$');

        let pattern = Regex::new(&pattern).ok()?;
        Some(Self {
            parts,
            group_count,
            pattern,
            extrapolates: is_simple_composite(sample),
        })
    }

    /// Number of digit groups in the template
    pub fn group_count(&self) -> usize {
        self.group_count
    }

    /// Whether values of this template may be synthesized for gap filling
    pub fn supports_extrapolation(&self) -> bool {
        self.extrapolates
    }

    /// Whether `text` matches this template
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Pack the digit groups of `text` into a single integer, high-order
    /// group first.
    pub fn value(&self, text: &str) -> Result<i64, SchemeError> {
        let caps = self
            .pattern
            .captures(text)
            .ok_or_else(|| SchemeError::InvalidComposite(text.to_string()))?;
        let mut packed: i64 = 0;
        for i in 1..=self.group_count {
            let group = caps
                .get(i)
                .ok_or_else(|| SchemeError::InvalidComposite(text.to_string()))?;
            let digits: i64 = group
                .as_str()
                .parse()
                .map_err(|_| SchemeError::InvalidComposite(text.to_string()))?;
            packed = packed
                .checked_mul(COMPOSITE_BASE)
                .and_then(|p| p.checked_add(digits))
                .ok_or_else(|| SchemeError::InvalidComposite(text.to_string()))?;
        }
        Ok(packed)
    }

    /// Rebuild the printed form from a packed integer
    pub fn format(&self, mut packed: i64) -> Result<String, SchemeError> {
        if packed < 0 {
            return Err(SchemeError::InvalidComposite(packed.to_string()));
        }
        // Unpack right to left, then emit in template order.
        let mut groups = vec![0i64; self.group_count];
        for slot in groups.iter_mut().rev() {
            *slot = packed % COMPOSITE_BASE;
            packed /= COMPOSITE_BASE;
        }

        let mut out = String::new();
        let mut next_group = 0;
        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Hole => {
                    out.push_str(&groups[next_group].to_string());
                    next_group += 1;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_simple_composite() {
        assert!(is_simple_composite("(4)"));
        assert!(is_simple_composite("A7"));
        assert!(is_simple_composite("A-1"));
        assert!(is_simple_composite("7A"));
        assert!(is_simple_composite("12-A"));
        assert!(is_simple_composite("(1)(2)"));
        assert!(is_simple_composite("(1)2"));
        assert!(is_simple_composite("3/4"));
        assert!(is_simple_composite("3.4"));
        assert!(is_simple_composite("3-4"));
        assert!(!is_simple_composite("17"));
        assert!(!is_simple_composite("chapter"));
        assert!(!is_simple_composite("a-1"));
        assert!(!is_simple_composite("3--4"));
    }

    #[test]
    fn test_template_from_plain_text() {
        assert!(CompositeTemplate::from_sample("hello").is_none());
    }

    #[test]
    fn test_single_group_template() {
        let t = CompositeTemplate::from_sample("A-1").unwrap();
        assert_eq!(t.group_count(), 1);
        assert!(t.supports_extrapolation());
        assert!(t.matches("A-1"));
        assert!(t.matches("A-42"));
        assert!(!t.matches("B-1"));
        assert!(!t.matches("A-"));
        assert_eq!(t.value("A-7").unwrap(), 7);
        assert_eq!(t.format(8).unwrap(), "A-8");
    }

    #[test]
    fn test_two_group_packing() {
        let t = CompositeTemplate::from_sample("3-12").unwrap();
        assert_eq!(t.group_count(), 2);
        assert_eq!(t.value("3-12").unwrap(), 3 * COMPOSITE_BASE + 12);
        assert_eq!(t.format(3 * COMPOSITE_BASE + 13).unwrap(), "3-13");
    }

    #[test]
    fn test_increment_moves_last_group() {
        let t = CompositeTemplate::from_sample("3-12").unwrap();
        let v = t.value("3-12").unwrap();
        assert_eq!(t.format(v + 1).unwrap(), "3-13");
    }

    #[test]
    fn test_round_trip() {
        for sample in ["(4)", "A7", "A-1", "7A", "(1)(2)", "3/4", "3.4", "3-4"] {
            let t = CompositeTemplate::from_sample(sample).unwrap();
            let v = t.value(sample).unwrap();
            assert_eq!(t.format(v).unwrap(), sample, "round trip for {sample}");
        }
    }

    #[test]
    fn test_non_simple_template_still_builds() {
        let t = CompositeTemplate::from_sample("p. 14").unwrap();
        assert!(!t.supports_extrapolation());
        assert!(t.matches("p. 15"));
        assert_eq!(t.value("p. 15").unwrap(), 15);
    }

    #[test]
    fn test_value_rejects_mismatch() {
        let t = CompositeTemplate::from_sample("A-1").unwrap();
        assert!(matches!(t.value("B-2"), Err(SchemeError::InvalidComposite(_))));
    }
}
