// ============================================================
// CELL VALUE
// ============================================================
// Tagged representation of a single table cell

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?$").unwrap());

/// Largest magnitude that still round-trips through an f64 without loss (2^53).
const MAX_SAFE_NUMBER: f64 = 9_007_199_254_740_992.0;

/// A single cell, already coerced into the kind its text looks like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellValue {
    Empty,

    /// Numeric literal; `raw` keeps the text exactly as it appeared in the file
    Number { value: f64, raw: String },

    Boolean { value: bool },

    Text { value: String },
}

impl CellValue {
    /// Coerce raw field text the same way the parser does ("dynamic typing").
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        match trimmed {
            "true" | "TRUE" => return CellValue::Boolean { value: true },
            "false" | "FALSE" => return CellValue::Boolean { value: false },
            _ => {}
        }

        if let Some(value) = Self::parse_number(trimmed) {
            return CellValue::Number {
                value,
                raw: trimmed.to_string(),
            };
        }

        CellValue::Text {
            value: trimmed.to_string(),
        }
    }

    /// Keep the field as text without any number/boolean detection.
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text {
                value: trimmed.to_string(),
            }
        }
    }

    fn parse_number(trimmed: &str) -> Option<f64> {
        if !FLOAT_PATTERN.is_match(trimmed) {
            return None;
        }
        let value = trimmed.parse::<f64>().ok()?;
        if value.is_finite() && value.abs() <= MAX_SAFE_NUMBER {
            Some(value)
        } else {
            None
        }
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text { value } => value.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number { .. })
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, CellValue::Boolean { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text { value } => Some(value.as_str()),
            _ => None,
        }
    }

    /// Plain-text form written by the exporter
    pub fn as_export_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number { raw, .. } => raw.clone(),
            CellValue::Boolean { value } => value.to_string(),
            CellValue::Text { value } => value.clone(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_export_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(
            CellValue::coerce(" 42 "),
            CellValue::Number {
                value: 42.0,
                raw: "42".to_string()
            }
        );
        assert!(CellValue::coerce("-3.5e2").is_number());
        assert!(CellValue::coerce(".5").is_number());
        assert!(CellValue::coerce("7.").is_number());
    }

    #[test]
    fn test_number_keeps_raw_text() {
        let cell = CellValue::coerce("1.50");
        assert_eq!(cell.as_export_text(), "1.50");
    }

    #[test]
    fn test_non_numbers_stay_text() {
        for raw in ["1,000", "abc", "1.2.3", "0x10", "NaN", "inf", "+5", "12 34"] {
            assert!(
                matches!(CellValue::coerce(raw), CellValue::Text { .. }),
                "{raw} should stay text"
            );
        }
    }

    #[test]
    fn test_numbers_beyond_safe_range_stay_text() {
        assert!(matches!(
            CellValue::coerce("99999999999999999999"),
            CellValue::Text { .. }
        ));
    }

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(CellValue::coerce("true"), CellValue::Boolean { value: true });
        assert_eq!(CellValue::coerce("FALSE"), CellValue::Boolean { value: false });
        assert_eq!(CellValue::coerce("TRUE").as_export_text(), "true");
    }

    #[test]
    fn test_mixed_case_booleans_stay_text() {
        assert_eq!(CellValue::coerce("True").as_text(), Some("True"));
        assert_eq!(CellValue::coerce("tRuE").as_text(), Some("tRuE"));
        assert_eq!(CellValue::coerce("False").as_text(), Some("False"));
    }

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::coerce("   ").is_blank());
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text { value: "  ".to_string() }.is_blank());
        assert!(!CellValue::coerce("0").is_blank());
        assert!(!CellValue::coerce("false").is_blank());
    }

    #[test]
    fn test_text_skips_coercion() {
        assert_eq!(CellValue::text("42").as_text(), Some("42"));
        assert_eq!(CellValue::text(""), CellValue::Empty);
    }
}
