//! hOCR input module
//!
//! Streaming access to the OCR observations the inference engine consumes:
//! per-word text, bounding box, font size, and recognition confidence,
//! organized page by page.
//!
//! # Example
//!
//! ```rust,no_run
//! use hocr_pagenum::hocr::HocrParser;
//! use std::path::Path;
//!
//! let parser = HocrParser::open(Path::new("book_hocr.html")).unwrap();
//! for page in parser {
//!     let page = page.unwrap();
//!     println!("page {}x{}", page.dimensions.0, page.dimensions.1);
//! }
//! ```

mod parser;
mod types;

pub use parser::{parse_bbox, parse_int_prop, HocrParser};
pub use types::{BBox, HocrError, OcrLine, OcrPage, OcrParagraph, Result, WordObservation};
