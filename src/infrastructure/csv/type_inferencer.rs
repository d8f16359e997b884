// ============================================================
// TYPE INFERENCER
// ============================================================
// Classify each column into one semantic type from its values

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::csv::{CellValue, ColumnTypes, IngestionConfig, Record, SemanticType};

/// Whole-column type inference. Pure: same values in, same type out.
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    date_formats: Vec<String>,
}

impl TypeInferencer {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    pub fn from_config(config: &IngestionConfig) -> Self {
        Self::new(config.date_formats.clone())
    }

    /// First match wins: Empty, Number, Boolean, Date, String
    pub fn infer_type<'a, I>(&self, values: I) -> SemanticType
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let present: Vec<&CellValue> = values.into_iter().filter(|v| !v.is_blank()).collect();

        if present.is_empty() {
            return SemanticType::Empty;
        }
        if present.iter().all(|v| v.is_number()) {
            return SemanticType::Number;
        }
        if present.iter().all(|v| v.is_boolean()) {
            return SemanticType::Boolean;
        }
        if present
            .iter()
            .all(|v| v.as_text().map(|text| self.is_date(text)).unwrap_or(false))
        {
            return SemanticType::Date;
        }

        SemanticType::String
    }

    /// Infer every column; the result has one entry per column, in order
    pub fn infer_columns(&self, columns: &[String], rows: &[Record]) -> ColumnTypes {
        columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let semantic_type = self.infer_type(rows.iter().filter_map(|row| row.get(idx)));
                (name.clone(), semantic_type)
            })
            .collect()
    }

    /// Best-effort calendar date / timestamp recognition
    pub fn is_date(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        if DateTime::parse_from_rfc3339(text).is_ok() || DateTime::parse_from_rfc2822(text).is_ok()
        {
            return true;
        }

        self.date_formats.iter().any(|format| {
            if has_time_component(format) {
                NaiveDateTime::parse_from_str(text, format).is_ok()
            } else {
                NaiveDate::parse_from_str(text, format).is_ok()
            }
        })
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::from_config(&IngestionConfig::default())
    }
}

fn has_time_component(format: &str) -> bool {
    ["%H", "%M", "%S", "%T", "%R", "%I"]
        .iter()
        .any(|spec| format.contains(spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(raw: &[&str]) -> SemanticType {
        let values: Vec<CellValue> = raw.iter().map(|v| CellValue::coerce(v)).collect();
        TypeInferencer::default().infer_type(&values)
    }

    #[test]
    fn test_classification_examples() {
        assert_eq!(infer(&["1", "2", "3"]), SemanticType::Number);
        assert_eq!(infer(&["true", "false"]), SemanticType::Boolean);
        assert_eq!(infer(&["2024-01-01", "2024-02-01"]), SemanticType::Date);
        assert_eq!(infer(&["", "", ""]), SemanticType::Empty);
        assert_eq!(infer(&["1", "abc", "3"]), SemanticType::String);
    }

    #[test]
    fn test_zero_rows_is_empty() {
        assert_eq!(infer(&[]), SemanticType::Empty);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        assert_eq!(infer(&["1", "", "  ", "2.5"]), SemanticType::Number);
        assert_eq!(infer(&["", "TRUE"]), SemanticType::Boolean);
    }

    #[test]
    fn test_mixed_numbers_and_booleans_is_string() {
        assert_eq!(infer(&["1", "true"]), SemanticType::String);
    }

    #[test]
    fn test_numbers_never_count_as_dates() {
        assert_eq!(infer(&["2024-01-01", "20240101"]), SemanticType::String);
    }

    #[test]
    fn test_date_formats() {
        let inferencer = TypeInferencer::default();
        for text in [
            "2024-03-05",
            "2024/03/05",
            "03/05/2024",
            "05.03.2024",
            "2024-03-05 10:30:00",
            "2024-03-05T10:30:00",
            "2024-03-05T10:30:00Z",
            "Mar 05 2024",
            "5 Mar 2024",
            "March 5, 2024",
            "Tue, 5 Mar 2024 10:30:00 +0000",
        ] {
            assert!(inferencer.is_date(text), "{text} should be a date");
        }
        for text in ["hello", "2024-13-45", "12:30"] {
            assert!(!inferencer.is_date(text), "{text} should not be a date");
        }
    }

    #[test]
    fn test_inference_is_idempotent() {
        let values: Vec<CellValue> = ["2024-01-01", "x"].iter().map(|v| CellValue::coerce(v)).collect();
        let inferencer = TypeInferencer::default();
        assert_eq!(inferencer.infer_type(&values), inferencer.infer_type(&values));
    }

    #[test]
    fn test_infer_columns_keeps_column_order() {
        let columns = vec!["when".to_string(), "amount".to_string(), "note".to_string()];
        let rows = vec![
            Record::new(vec![
                CellValue::coerce("2024-01-01"),
                CellValue::coerce("10"),
                CellValue::Empty,
            ]),
            Record::new(vec![
                CellValue::coerce("2024-01-02"),
                CellValue::coerce("12.5"),
                CellValue::Empty,
            ]),
        ];

        let types = TypeInferencer::default().infer_columns(&columns, &rows);
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["when", "amount", "note"]);
        assert_eq!(types.get("when"), Some(SemanticType::Date));
        assert_eq!(types.get("amount"), Some(SemanticType::Number));
        assert_eq!(types.get("note"), Some(SemanticType::Empty));
    }
}
