//! Geometric and typographic feature extraction
//!
//! Every observation maps to a fixed 40-dimensional integer vector built
//! from the word box, pairwise corner products, page geometry, page parity,
//! parity-signed copies of the base features, and the font size. Position on
//! the page, not text content, is what separates a printed page number from
//! body text.

use crate::hocr::WordObservation;
use crate::infer::PageInfo;

/// Width of the feature vector
pub const FEATURE_DIM: usize = 40;

/// Feature vector layout:
///
/// | index | feature |
/// |-------|---------|
/// | 0-3   | word bbox (x1, y1, x2, y2) |
/// | 4-13  | pairwise corner products |
/// | 14    | integer page aspect ratio |
/// | 15-18 | page content bbox |
/// | 19    | page parity (+1 even, -1 odd) |
/// | 20-38 | features 0-18 signed by parity |
/// | 39    | font size |
pub fn feature_vector(
    word: &WordObservation,
    info: &PageInfo,
    page_index: usize,
) -> [i64; FEATURE_DIM] {
    let (x1, y1, x2, y2) = (word.bbox.x1, word.bbox.y1, word.bbox.x2, word.bbox.y2);
    let (pw, ph) = info.dimensions;
    let cb = info.content_bbox;
    let parity: i64 = if page_index % 2 == 0 { 1 } else { -1 };

    let mut f = [0i64; FEATURE_DIM];
    f[0] = x1;
    f[1] = y1;
    f[2] = x2;
    f[3] = y2;
    f[4] = x1 * x1;
    f[5] = y1 * y1;
    f[6] = x2 * x2;
    f[7] = y2 * y2;
    f[8] = x1 * y1;
    f[9] = x1 * x2;
    f[10] = x1 * y2;
    f[11] = y1 * x2;
    f[12] = y1 * y2;
    f[13] = x2 * y2;
    f[14] = if ph > 0 { pw / ph } else { 0 };
    f[15] = cb.x1;
    f[16] = cb.y1;
    f[17] = cb.x2;
    f[18] = cb.y2;
    f[19] = parity;
    for i in 0..19 {
        f[20 + i] = f[i] * parity;
    }
    f[39] = word.fontsize;
    f
}
