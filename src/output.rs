//! Output document
//!
//! The JSON document consumers read: document identifier, tool version,
//! document confidence as an integer percent, and one record per kept leaf
//! with the inferred number, its probabilities, and the OCR word confidence.
//! Pretty-printed with a 4-space indent.

use crate::infer::InferenceResult;
use serde::Serialize;

/// Schema version of the emitted document
pub const FORMAT_VERSION: &str = "2";

/// Per-page record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageRecord {
    /// Physical leaf number
    #[serde(rename = "leafNum")]
    pub leaf_num: usize,
    /// Damped per-page confidence percent; null without a classifier score
    pub confidence: Option<u32>,
    /// Inferred printed number, empty when none
    #[serde(rename = "pageNumber")]
    pub page_number: String,
    /// Raw classifier probability percent
    #[serde(rename = "pageProb")]
    pub page_prob: Option<u32>,
    /// OCR word confidence of the chosen word
    #[serde(rename = "wordConf")]
    pub word_conf: Option<i64>,
}

/// The full output document
#[derive(Debug, Clone, Serialize)]
pub struct PageNumberDocument {
    pub identifier: Option<String>,
    #[serde(rename = "format-version")]
    pub format_version: String,
    #[serde(rename = "archive-hocr-tools-version")]
    pub tool_version: String,
    /// Document confidence as an integer percent
    pub confidence: u32,
    pub pages: Vec<PageRecord>,
}

impl PageNumberDocument {
    /// Build the document from an inference result
    pub fn from_result(result: &InferenceResult, identifier: Option<String>) -> Self {
        let pages = result
            .assigned
            .iter()
            .zip(result.leaf_nums.iter())
            .map(|(assigned, &leaf_num)| match assigned {
                Some(candidate) => PageRecord {
                    leaf_num,
                    confidence: candidate
                        .prob
                        .map(|(_, p_true)| (((p_true + 0.10).min(1.0)) * 100.0).round() as u32),
                    page_number: candidate.value.clone(),
                    page_prob: candidate.prob.map(|(_, p_true)| (p_true * 100.0).round() as u32),
                    word_conf: candidate.observation.as_ref().map(|obs| obs.confidence),
                },
                None => PageRecord {
                    leaf_num,
                    confidence: None,
                    page_number: String::new(),
                    page_prob: None,
                    word_conf: None,
                },
            })
            .collect();

        Self {
            identifier,
            format_version: FORMAT_VERSION.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            confidence: (result.confidence * 100.0).round() as u32,
            pages,
        }
    }

    /// Serialize with a 4-space indent
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
