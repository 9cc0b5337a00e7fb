//! Roman numeral parsing and formatting
//!
//! Classical subtractive notation, case-insensitive on input, lowercase on
//! output (front matter is conventionally numbered in lowercase).

use once_cell::sync::Lazy;
use regex::Regex;

/// Subtractive pairs in descending value order. Parsing and formatting both
/// walk this table front to back.
const ROMAN_PAIRS: [(&str, i64); 13] = [
    ("m", 1000),
    ("cm", 900),
    ("d", 500),
    ("cd", 400),
    ("c", 100),
    ("xc", 90),
    ("l", 50),
    ("xl", 40),
    ("x", 10),
    ("ix", 9),
    ("v", 5),
    ("iv", 4),
    ("i", 1),
];

static ROMAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^m{0,4}(cm|cd|d?c{0,3})(xc|xl|l?x{0,3})(ix|iv|v?i{0,3})$")
        .expect("roman pattern is valid")
});

/// Whether `text` is a well-formed classical Roman numeral
pub fn is_roman(text: &str) -> bool {
    !text.is_empty() && ROMAN_RE.is_match(text)
}

/// Parse a Roman numeral to its integer value
pub fn parse_roman(text: &str) -> Option<i64> {
    let text = text.trim().to_lowercase();

    let mut result = 0;
    let mut remaining = text.as_str();

    for (numeral, value) in &ROMAN_PAIRS {
        while remaining.starts_with(numeral) {
            result += value;
            remaining = &remaining[numeral.len()..];
        }
    }

    if remaining.is_empty() && result > 0 {
        Some(result)
    } else {
        None
    }
}

/// Format an integer as a lowercase Roman numeral
pub fn to_roman(mut n: i64) -> Option<String> {
    if n <= 0 {
        return None;
    }
    let mut out = String::new();
    for (numeral, value) in &ROMAN_PAIRS {
        while n >= *value {
            out.push_str(numeral);
            n -= value;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roman_basic() {
        assert_eq!(parse_roman("i"), Some(1));
        assert_eq!(parse_roman("iv"), Some(4));
        assert_eq!(parse_roman("v"), Some(5));
        assert_eq!(parse_roman("ix"), Some(9));
        assert_eq!(parse_roman("x"), Some(10));
        assert_eq!(parse_roman("xl"), Some(40));
        assert_eq!(parse_roman("l"), Some(50));
        assert_eq!(parse_roman("xc"), Some(90));
        assert_eq!(parse_roman("c"), Some(100));
        assert_eq!(parse_roman("cd"), Some(400));
        assert_eq!(parse_roman("d"), Some(500));
        assert_eq!(parse_roman("cm"), Some(900));
        assert_eq!(parse_roman("m"), Some(1000));
        assert_eq!(parse_roman("mcmxcix"), Some(1999));
    }

    #[test]
    fn test_parse_roman_case_insensitive() {
        assert_eq!(parse_roman("XIV"), Some(14));
        assert_eq!(parse_roman("MMXXIII"), Some(2023));
    }

    #[test]
    fn test_parse_roman_invalid() {
        assert_eq!(parse_roman(""), None);
        assert_eq!(parse_roman("abc"), None);
        assert_eq!(parse_roman("123"), None);
    }

    #[test]
    fn test_is_roman() {
        assert!(is_roman("xvii"));
        assert!(is_roman("IV"));
        assert!(!is_roman(""));
        assert!(!is_roman("iiv"));
        assert!(!is_roman("xyz"));
    }

    #[test]
    fn test_to_roman() {
        assert_eq!(to_roman(1).as_deref(), Some("i"));
        assert_eq!(to_roman(4).as_deref(), Some("iv"));
        assert_eq!(to_roman(14).as_deref(), Some("xiv"));
        assert_eq!(to_roman(1999).as_deref(), Some("mcmxcix"));
        assert_eq!(to_roman(0), None);
        assert_eq!(to_roman(-3), None);
    }

    #[test]
    fn test_roman_round_trip_canonical() {
        for n in 1..=500 {
            let formatted = to_roman(n).unwrap();
            assert!(is_roman(&formatted), "{formatted} should validate");
            assert_eq!(parse_roman(&formatted), Some(n));
        }
    }
}
