// ============================================================
// CSV EXPORTER
// ============================================================
// Serialize the current rows back to comma-separated text

use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::domain::csv::{Dataset, IngestionConfig, Record};
use crate::domain::error::{AppError, Result};

pub const EXPORT_MIME: &str = "text/csv;charset=utf-8";

/// Bytes ready to hand to a save-as mechanism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    /// Separators the parser sniffs for; values containing one get quoted
    sniffed_delimiters: Vec<char>,

    default_file_name: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::from_config(&IngestionConfig::default())
    }
}

impl CsvExporter {
    pub fn from_config(config: &IngestionConfig) -> Self {
        Self {
            sniffed_delimiters: config.candidate_delimiters.clone(),
            default_file_name: config.default_export_name.clone(),
        }
    }

    pub fn export(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        self.export_rows(dataset.columns(), dataset.rows())
    }

    /// Header line plus one line per record. No columns means no output.
    pub fn export_rows(&self, columns: &[String], rows: &[Record]) -> Result<Vec<u8>> {
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let quote_style = if self.needs_full_quoting(columns, rows) {
            QuoteStyle::Always
        } else {
            QuoteStyle::Necessary
        };

        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .terminator(Terminator::CRLF)
            .quote_style(quote_style)
            .from_writer(Vec::new());

        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(row.cells.iter().map(|cell| cell.as_export_text()))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::IoError(format!("Failed to finish CSV output: {}", e)))
    }

    /// Export plus the file name and MIME type for the download
    pub fn export_download(&self, dataset: &Dataset) -> Result<ExportedFile> {
        let bytes = self.export(dataset)?;
        Ok(ExportedFile {
            file_name: self.download_name(dataset),
            mime: EXPORT_MIME.to_string(),
            bytes,
        })
    }

    fn download_name(&self, dataset: &Dataset) -> String {
        dataset
            .provenance()
            .source_file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.trim().is_empty())
            .map(|stem| format!("{}.csv", stem))
            .unwrap_or_else(|| self.default_file_name.clone())
    }

    /// A value containing a non-comma separator could fool delimiter
    /// sniffing on re-import unless every field is quoted.
    fn needs_full_quoting(&self, columns: &[String], rows: &[Record]) -> bool {
        let contains_other_separator = |text: &str| {
            self.sniffed_delimiters
                .iter()
                .any(|d| *d != ',' && text.contains(*d))
        };

        columns.iter().any(|c| contains_other_separator(c))
            || rows.iter().any(|row| {
                row.cells
                    .iter()
                    .filter_map(|cell| cell.as_text())
                    .any(|text| contains_other_separator(text))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::{CellValue, ColumnTypes, Provenance, SemanticType};
    use crate::infrastructure::csv::CsvParser;

    fn dataset(columns: &[&str], rows: &[&[&str]], file_name: Option<&str>) -> Dataset {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let types: ColumnTypes = columns
            .iter()
            .map(|c| (c.clone(), SemanticType::String))
            .collect();
        let rows = rows
            .iter()
            .map(|r| Record::new(r.iter().map(|v| CellValue::coerce(v)).collect()))
            .collect();
        Dataset::assemble(
            columns,
            rows,
            types,
            Provenance {
                source_file_name: file_name.map(str::to_string),
                ..Provenance::default()
            },
        )
        .unwrap()
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_export_simple_dataset() {
        let data = dataset(&["name", "age", "active"], &[&["Ann", "41", "true"], &["Bob", "", "FALSE"]], None);
        let out = text(CsvExporter::default().export(&data).unwrap());
        assert_eq!(out, "name,age,active\r\nAnn,41,true\r\nBob,,false\r\n");
    }

    #[test]
    fn test_export_quotes_only_when_needed() {
        let data = dataset(&["a", "b"], &[&["x, y", "say \"hi\""]], None);
        let out = text(CsvExporter::default().export(&data).unwrap());
        assert_eq!(out, "a,b\r\n\"x, y\",\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn test_export_quotes_everything_when_values_hold_other_separators() {
        let data = dataset(&["a", "b"], &[&["x;y;z", "1"]], None);
        let out = text(CsvExporter::default().export(&data).unwrap());
        assert_eq!(out, "\"a\",\"b\"\r\n\"x;y;z\",\"1\"\r\n");
    }

    #[test]
    fn test_export_without_columns_is_empty() {
        let out = CsvExporter::default().export(&Dataset::empty()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_columns_and_rows() {
        let source = "id ; label ; price ; note\n1;Widget;2.50;\"multi\nline\"\n2;Gadget, large;10;x|y\n3;;;\"quoted \"\"word\"\"\"";
        let parser = CsvParser::new();
        let first = parser.parse_content(source).unwrap();
        let types = ColumnTypes::from_iter(
            first
                .columns
                .iter()
                .map(|c| (c.clone(), SemanticType::String)),
        );
        let data = Dataset::assemble(
            first.columns.clone(),
            first.rows.clone(),
            types,
            Provenance::default(),
        )
        .unwrap();

        let exported = CsvExporter::default().export(&data).unwrap();
        let second = parser.parse_bytes(&exported).unwrap();

        assert_eq!(second.delimiter, b',');
        assert_eq!(second.columns, first.columns);
        assert_eq!(second.rows, first.rows);
    }

    #[test]
    fn test_download_descriptor() {
        let named = dataset(&["a"], &[&["1"]], Some("report.final.csv"));
        let file = CsvExporter::default().export_download(&named).unwrap();
        assert_eq!(file.file_name, "report.final.csv");
        assert_eq!(file.mime, "text/csv;charset=utf-8");

        let unnamed = dataset(&["a"], &[&["1"]], None);
        let file = CsvExporter::default().export_download(&unnamed).unwrap();
        assert_eq!(file.file_name, "data.csv");
    }
}
