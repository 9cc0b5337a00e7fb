//! Numbering schemes and the scheme registry
//!
//! A scheme is a printed numbering convention: Arabic digits, Roman
//! numerals, single letters, or a composite template discovered from the
//! document itself. Every scheme offers the same capability set: syntactic
//! match, integer valuation, formatting from an integer, an increase check,
//! and an extrapolation flag. Dispatch is over a tagged enum; composite
//! variants carry their template as data.

mod composite;
mod roman;

pub use composite::{is_simple_composite, CompositeTemplate, COMPOSITE_BASE};
pub use roman::{is_roman, parse_roman, to_roman};

use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Upper bound on dynamically discovered composite schemes. Once reached, no
/// further composites are admitted for the remainder of the run.
pub const COMPOSITE_LIMIT: usize = 2500;

/// Longest digit string accepted as an Arabic page number. Anything longer
/// cannot be a plausible page number and would overflow valuation.
const MAX_ARABIC_DIGITS: usize = 18;

// ============================================================
// Error Types
// ============================================================

/// Scheme valuation and formatting errors
#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("Value does not re-parse under its composite template: {0}")]
    InvalidComposite(String),

    #[error("Not a numeral in this scheme: {0}")]
    InvalidNumeral(String),

    #[error("No printed form for value {0} in this scheme")]
    Unformattable(i64),
}

pub type Result<T> = std::result::Result<T, SchemeError>;

// ============================================================
// Numbering Schemes
// ============================================================

/// A page numbering convention
#[derive(Debug, Clone)]
pub enum NumberingScheme {
    /// Decimal digits: "1", "17", "352"
    Arabic,
    /// Classical Roman numerals: "iv", "xii", case-insensitive
    Roman,
    /// Exactly one ASCII letter: "A", "b"
    SingleLetter,
    /// A discovered compound template: "A-7", "(4)", "3/12"
    Composite(CompositeTemplate),
}

impl NumberingScheme {
    /// Whether `text` is syntactically a numeral of this scheme
    pub fn syntactic_match(&self, text: &str) -> bool {
        match self {
            Self::Arabic => {
                !text.is_empty()
                    && text.len() <= MAX_ARABIC_DIGITS
                    && text.bytes().all(|b| b.is_ascii_digit())
            }
            Self::Roman => is_roman(text),
            Self::SingleLetter => {
                text.len() == 1 && text.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
            }
            Self::Composite(template) => template.matches(text),
        }
    }

    /// Integer valuation of a syntactically matching numeral
    pub fn numeral_value(&self, text: &str) -> Result<i64> {
        match self {
            Self::Arabic => {
                if !self.syntactic_match(text) {
                    return Err(SchemeError::InvalidNumeral(text.to_string()));
                }
                text.parse()
                    .map_err(|_| SchemeError::InvalidNumeral(text.to_string()))
            }
            Self::Roman => {
                if !is_roman(text) {
                    return Err(SchemeError::InvalidNumeral(text.to_string()));
                }
                parse_roman(text).ok_or_else(|| SchemeError::InvalidNumeral(text.to_string()))
            }
            Self::SingleLetter => {
                if !self.syntactic_match(text) {
                    return Err(SchemeError::InvalidNumeral(text.to_string()));
                }
                Ok(i64::from(text.bytes().next().unwrap_or(0)))
            }
            Self::Composite(template) => template.value(text),
        }
    }

    /// Printed form of an integer under this scheme
    pub fn from_num(&self, n: i64) -> Result<String> {
        match self {
            Self::Arabic => {
                if n < 0 {
                    return Err(SchemeError::Unformattable(n));
                }
                Ok(n.to_string())
            }
            Self::Roman => to_roman(n).ok_or(SchemeError::Unformattable(n)),
            Self::SingleLetter => match u8::try_from(n) {
                Ok(b) if b.is_ascii_alphabetic() => Ok((b as char).to_string()),
                _ => Err(SchemeError::Unformattable(n)),
            },
            Self::Composite(template) => template.format(n),
        }
    }

    /// Whether `candidate` continues `base` after `steps` pages
    pub fn is_increase(&self, base: i64, steps: i64, candidate: i64) -> bool {
        base + steps == candidate
    }

    /// Whether missing values of this scheme may be synthesized
    pub fn supports_extrapolation(&self) -> bool {
        match self {
            Self::Arabic | Self::Roman | Self::SingleLetter => true,
            Self::Composite(template) => template.supports_extrapolation(),
        }
    }
}

// ============================================================
// Scheme Registry
// ============================================================

/// Stable handle to a registry entry. The registry is append-only, so
/// handles stay valid for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemeId(usize);

/// The fixed schemes plus composites discovered during extraction
#[derive(Debug)]
pub struct SchemeRegistry {
    schemes: Vec<NumberingScheme>,
    cap_notice_emitted: bool,
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeRegistry {
    /// Registry with the three preinstalled schemes
    pub fn new() -> Self {
        Self {
            schemes: vec![
                NumberingScheme::Arabic,
                NumberingScheme::Roman,
                NumberingScheme::SingleLetter,
            ],
            cap_notice_emitted: false,
        }
    }

    /// Look up a scheme by handle
    pub fn get(&self, id: SchemeId) -> &NumberingScheme {
        &self.schemes[id.0]
    }

    /// Total registered schemes
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// Whether only the preinstalled schemes exist
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Number of discovered composite schemes
    pub fn composite_count(&self) -> usize {
        self.schemes.len() - 3
    }

    /// Whether the composite cap has been reached
    pub fn at_cap(&self) -> bool {
        self.composite_count() >= COMPOSITE_LIMIT
    }

    /// First scheme that syntactically matches `text`, in fixed order:
    /// Arabic, Roman, SingleLetter, then composites in insertion order.
    pub fn match_word(&self, text: &str) -> Option<SchemeId> {
        self.schemes
            .iter()
            .position(|s| s.syntactic_match(text))
            .map(SchemeId)
    }

    /// Register a composite scheme for `sample`. Returns `None` when the
    /// sample carries no digits or the cap is reached.
    pub fn try_add_composite(&mut self, sample: &str) -> Option<SchemeId> {
        if self.at_cap() {
            if !self.cap_notice_emitted {
                eprintln!(
                    "Warning: composite scheme limit ({}) reached; further composites ignored",
                    COMPOSITE_LIMIT
                );
                self.cap_notice_emitted = true;
            }
            return None;
        }
        let template = CompositeTemplate::from_sample(sample)?;
        self.schemes.push(NumberingScheme::Composite(template));
        Some(SchemeId(self.schemes.len() - 1))
    }
}
