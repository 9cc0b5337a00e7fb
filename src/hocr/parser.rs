//! Streaming hOCR parser
//!
//! Walks the hOCR XHTML event stream and yields one page at a time, so a
//! document is never held in memory as a whole. Recognized elements are
//! dispatched on their `class` attribute (`ocr_page`, `ocr_par`, `ocr_line`,
//! `ocrx_word`); everything else is structural noise and passed over.

use super::types::{BBox, HocrError, OcrLine, OcrPage, OcrParagraph, Result, WordObservation};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// ============================================================
// Title Property Parsing
// ============================================================

/// Extract the `bbox x1 y1 x2 y2` property from an hOCR title attribute
pub fn parse_bbox(title: &str) -> Option<BBox> {
    for prop in title.split(';') {
        let mut parts = prop.split_whitespace();
        if parts.next() == Some("bbox") {
            let coords: Vec<i64> = parts.filter_map(|t| t.parse().ok()).collect();
            if coords.len() == 4 {
                return Some(BBox::new(coords[0], coords[1], coords[2], coords[3]));
            }
        }
    }
    None
}

/// Extract a numeric property such as `x_wconf` or `x_fsize`.
///
/// Some OCR engines emit fractional values; those are rounded to the
/// nearest integer.
pub fn parse_int_prop(title: &str, key: &str) -> Option<i64> {
    for prop in title.split(';') {
        let mut parts = prop.split_whitespace();
        if parts.next() == Some(key) {
            return parts.next().and_then(|t| t.parse::<f64>().ok()).map(|v| v.round() as i64);
        }
    }
    None
}

// ============================================================
// Parser
// ============================================================

/// Element kinds tracked while inside a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Elem {
    Page,
    Par,
    Line,
    Word,
    Other,
}

/// In-flight word while its text nodes are being collected
struct WordBuilder {
    bbox: Option<BBox>,
    fontsize: i64,
    confidence: i64,
    text: String,
}

/// Streaming parser yielding `OcrPage` values one at a time
pub struct HocrParser<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    stack: Vec<Elem>,
    done: bool,
}

impl HocrParser<BufReader<File>> {
    /// Open an hOCR file for streaming
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HocrError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> HocrParser<R> {
    /// Create a parser over any buffered reader
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            stack: Vec::new(),
            done: false,
        }
    }

    fn class_of(e: &BytesStart) -> Option<String> {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"class" {
                return Some(String::from_utf8_lossy(&attr.value).into_owned());
            }
        }
        None
    }

    fn title_of(e: &BytesStart) -> Option<String> {
        for attr in e.attributes().flatten() {
            if attr.key.as_ref() == b"title" {
                return Some(String::from_utf8_lossy(&attr.value).into_owned());
            }
        }
        None
    }

    fn kind_of(e: &BytesStart) -> Elem {
        let Some(class) = Self::class_of(e) else {
            return Elem::Other;
        };
        let has = |name: &str| class.split_whitespace().any(|t| t == name);
        if has("ocr_page") {
            Elem::Page
        } else if has("ocr_par") {
            Elem::Par
        } else if has("ocr_line") || has("ocr_header") || has("ocr_textfloat") || has("ocr_caption")
        {
            Elem::Line
        } else if has("ocrx_word") {
            Elem::Word
        } else {
            Elem::Other
        }
    }
}

impl<R: BufRead> Iterator for HocrParser<R> {
    type Item = Result<OcrPage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut page: Option<OcrPage> = None;
        let mut word: Option<WordBuilder> = None;

        loop {
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(ev) => ev,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            match event {
                Event::Eof => {
                    self.done = true;
                    return None;
                }
                Event::Start(ref e) => {
                    let kind = Self::kind_of(e);
                    match page {
                        None => {
                            if kind == Elem::Page {
                                let title = Self::title_of(e).unwrap_or_default();
                                let Some(bbox) = parse_bbox(&title) else {
                                    self.done = true;
                                    return Some(Err(HocrError::MalformedPage(title)));
                                };
                                page = Some(OcrPage {
                                    dimensions: (bbox.width(), bbox.height()),
                                    paragraphs: Vec::new(),
                                });
                                self.stack.clear();
                                self.stack.push(Elem::Page);
                            }
                        }
                        Some(ref mut pg) => {
                            match kind {
                                Elem::Par => pg.paragraphs.push(OcrParagraph::default()),
                                Elem::Line => {
                                    if pg.paragraphs.is_empty() {
                                        pg.paragraphs.push(OcrParagraph::default());
                                    }
                                    if let Some(par) = pg.paragraphs.last_mut() {
                                        par.lines.push(OcrLine::default());
                                    }
                                }
                                Elem::Word => {
                                    let title = Self::title_of(e).unwrap_or_default();
                                    word = Some(WordBuilder {
                                        bbox: parse_bbox(&title),
                                        fontsize: parse_int_prop(&title, "x_fsize").unwrap_or(0),
                                        confidence: parse_int_prop(&title, "x_wconf").unwrap_or(0),
                                        text: String::new(),
                                    });
                                }
                                _ => {}
                            }
                            self.stack.push(kind);
                        }
                    }
                }
                Event::Text(ref t) => {
                    if let Some(ref mut wb) = word {
                        if let Ok(text) = t.unescape() {
                            wb.text.push_str(&text);
                        }
                    }
                }
                Event::End(_) => {
                    if let Some(ref mut pg) = page {
                        match self.stack.pop() {
                            Some(Elem::Word) => {
                                if let Some(wb) = word.take() {
                                    let text = wb.text.trim().to_string();
                                    // Words without a bbox cannot feed geometry
                                    // features and are dropped here.
                                    if let (Some(bbox), false) = (wb.bbox, text.is_empty()) {
                                        if pg.paragraphs.is_empty() {
                                            pg.paragraphs.push(OcrParagraph::default());
                                        }
                                        if let Some(par) = pg.paragraphs.last_mut() {
                                            if par.lines.is_empty() {
                                                par.lines.push(OcrLine::default());
                                            }
                                            if let Some(line) = par.lines.last_mut() {
                                                line.words.push(WordObservation {
                                                    bbox,
                                                    text,
                                                    fontsize: wb.fontsize,
                                                    confidence: wb.confidence,
                                                });
                                            }
                                        }
                                    }
                                }
                            }
                            Some(Elem::Page) => {
                                self.buf.clear();
                                return page.take().map(Ok);
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
            self.buf.clear();
        }
    }
}
