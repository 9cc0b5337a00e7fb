//! Scandata skip-page handling
//!
//! Scanned books carry a scandata XML file describing every physical leaf.
//! Leaves marked `addToAccessFormats = false` (color cards, calibration
//! targets, duplicate scans) are absent from the access formats, so the
//! inference engine must drop them from the page stream and re-number the
//! remaining pages densely.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// Scandata parsing error types
#[derive(Debug, Error)]
pub enum ScandataError {
    #[error("Scandata file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScandataError>;

// ============================================================
// Scandata
// ============================================================

/// Leaf skip set derived from scandata
#[derive(Debug, Clone, Default)]
pub struct Scandata {
    skip: HashSet<usize>,
}

impl Scandata {
    /// Leaves absent from access formats, by leaf number
    pub fn skip_pages(&self) -> &HashSet<usize> {
        &self.skip
    }

    /// Whether a leaf is skipped
    pub fn is_skipped(&self, leaf: usize) -> bool {
        self.skip.contains(&leaf)
    }

    /// Load scandata from an XML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScandataError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Parse scandata from any buffered reader
    pub fn read<R: BufRead>(source: R) -> Result<Self> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);

        let mut skip = HashSet::new();
        let mut buf = Vec::new();
        let mut current_leaf: Option<usize> = None;
        let mut in_access_flag = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"page" => {
                        current_leaf = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"leafNum")
                            .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok());
                        in_access_flag = false;
                    }
                    b"addToAccessFormats" => in_access_flag = true,
                    _ => in_access_flag = false,
                },
                Event::Text(ref t) => {
                    if in_access_flag {
                        let value = t.unescape().unwrap_or_default();
                        if value.trim().eq_ignore_ascii_case("false") {
                            if let Some(leaf) = current_leaf {
                                skip.insert(leaf);
                            }
                        }
                    }
                }
                Event::End(ref e) => {
                    if e.name().as_ref() == b"addToAccessFormats" {
                        in_access_flag = false;
                    } else if e.name().as_ref() == b"page" {
                        current_leaf = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { skip })
    }
}
