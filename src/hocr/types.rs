//! hOCR input core types
//!
//! Contains the data structures produced by the hOCR parser: per-word
//! observations grouped into lines, paragraphs, and pages.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// hOCR parsing error types
#[derive(Debug, Error)]
pub enum HocrError {
    #[error("hOCR file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed page header: {0}")]
    MalformedPage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HocrError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Axis-aligned bounding box in page pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl BBox {
    /// Create a new bounding box
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box width
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    /// Box height
    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    /// Smallest box covering both boxes
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// A single OCR word observation
#[derive(Debug, Clone, PartialEq)]
pub struct WordObservation {
    /// Word bounding box
    pub bbox: BBox,
    /// Recognized text
    pub text: String,
    /// Font size in points, 0 when the OCR engine did not report one
    pub fontsize: i64,
    /// OCR word confidence, 0-100
    pub confidence: i64,
}

/// A line of words
#[derive(Debug, Clone, Default)]
pub struct OcrLine {
    pub words: Vec<WordObservation>,
}

/// A paragraph of lines
#[derive(Debug, Clone, Default)]
pub struct OcrParagraph {
    pub lines: Vec<OcrLine>,
}

/// A full OCR page
#[derive(Debug, Clone)]
pub struct OcrPage {
    /// Page dimensions (width, height) from the page header bbox
    pub dimensions: (i64, i64),
    /// Page content in reading order
    pub paragraphs: Vec<OcrParagraph>,
}

impl OcrPage {
    /// Iterate all words on the page in reading order
    pub fn words(&self) -> impl Iterator<Item = &WordObservation> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.lines.iter())
            .flat_map(|l| l.words.iter())
    }
}
