// ============================================================
// CSV PARSER
// ============================================================
// Decode bytes, sniff the delimiter, validate quoting, tokenize

use std::borrow::Cow;
use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use crate::domain::csv::{CellValue, IngestionConfig, Record};
use crate::domain::error::{AppError, Result};

/// Output of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    /// Unique, trimmed header names in file order
    pub columns: Vec<String>,

    /// Non-blank records, each exactly `columns.len()` cells wide
    pub rows: Vec<Record>,

    pub delimiter: u8,
}

/// CSV parser with encoding and delimiter detection
#[derive(Debug, Clone)]
pub struct CsvParser {
    /// Fixed delimiter; sniffed from the content when `None`
    delimiter: Option<u8>,

    candidates: Vec<u8>,

    sniff_line_count: usize,

    /// Coerce number/boolean literals while parsing
    dynamic_typing: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::from_config(&IngestionConfig::default())
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &IngestionConfig) -> Self {
        Self {
            delimiter: None,
            candidates: config
                .candidate_delimiters
                .iter()
                .filter_map(|c| match u8::try_from(*c) {
                    Ok(byte) if byte.is_ascii() => Some(byte),
                    _ => {
                        warn!(delimiter = %c.escape_default(), "Skipping non-ASCII candidate delimiter");
                        None
                    }
                })
                .collect(),
            sniff_line_count: config.sniff_line_count,
            dynamic_typing: config.dynamic_typing,
        }
    }

    /// Set custom delimiter (disables sniffing)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_dynamic_typing(mut self, dynamic_typing: bool) -> Self {
        self.dynamic_typing = dynamic_typing;
        self
    }

    /// Decode and parse raw file bytes
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedCsv> {
        let content = decode(bytes)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<ParsedCsv> {
        let delimiter = match self.delimiter {
            Some(delimiter) => delimiter,
            None => detect_delimiter(content, &self.candidates, self.sniff_line_count),
        };

        validate_quotes(content, delimiter)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row: {}", e))
            })?;

            if is_blank_record(&record) {
                continue;
            }

            match &columns {
                None => columns = Some(normalize_headers(&record)),
                Some(headers) => {
                    let row = self.parse_row(headers.len(), &record);
                    if !row.is_blank() {
                        rows.push(row);
                    }
                }
            }
        }

        let columns = columns.ok_or_else(|| {
            AppError::ParseError("the file contains no header row".to_string())
        })?;

        debug!(
            delimiter = %(delimiter as char).escape_default(),
            columns = columns.len(),
            rows = rows.len(),
            "CSV content parsed"
        );

        Ok(ParsedCsv {
            columns,
            rows,
            delimiter,
        })
    }

    /// Parse a single data row, aligned to the header width
    fn parse_row(&self, width: usize, record: &StringRecord) -> Record {
        let cells = record
            .iter()
            .take(width)
            .map(|field| {
                if self.dynamic_typing {
                    CellValue::coerce(field)
                } else {
                    CellValue::text(field)
                }
            })
            .collect();
        Record::aligned(cells, width)
    }
}

/// Decode file bytes to text.
/// BOM-marked input uses the BOM's encoding; otherwise UTF-8, falling back to Windows-1252.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let text: Cow<'_, str> = if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        text
    } else {
        let (text, had_errors) = UTF_8.decode_without_bom_handling(bytes);
        if had_errors {
            debug!("input is not valid UTF-8, decoding as Windows-1252");
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        } else {
            text
        }
    };

    if text.contains('\0') {
        return Err(AppError::ParseError(
            "unreadable input (binary content)".to_string(),
        ));
    }

    Ok(text.into_owned())
}

/// Detect delimiter from content (comma, semicolon, tab, pipe by default).
/// Scores each candidate by how frequently and consistently it occurs
/// outside quotes in the first records; falls back to comma.
pub fn detect_delimiter(content: &str, candidates: &[u8], sample_size: usize) -> u8 {
    let sample_lines = logical_lines(content, sample_size);

    let mut best_delimiter = b',';
    let mut best_score = 0.0f32;

    if sample_lines.is_empty() {
        return best_delimiter;
    }

    for &delimiter in candidates {
        let field_counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| count_unquoted(line, delimiter as char))
            .collect();

        let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
        if avg < 1.0 {
            continue;
        }

        let variance = field_counts
            .iter()
            .map(|&x| (x as f32 - avg).powi(2))
            .sum::<f32>()
            / field_counts.len() as f32;

        let score = avg / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    best_delimiter
}

/// First `limit` non-blank records, split on line breaks outside quotes
fn logical_lines(content: &str, limit: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, c) in content.char_indices() {
        if lines.len() >= limit {
            return lines;
        }
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' | '\r' if !in_quotes => {
                let line = &content[start..idx];
                if !line.trim().is_empty() {
                    lines.push(line);
                }
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    let tail = &content[start..];
    if lines.len() < limit && !tail.trim().is_empty() {
        lines.push(tail);
    }
    lines
}

fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Reject unterminated quoted fields and garbage after a closing quote.
/// A quote only opens a quoted field when it is the field's first character.
fn validate_quotes(content: &str, delimiter: u8) -> Result<()> {
    let delimiter = delimiter as char;
    let mut chars = content.chars().peekable();
    let mut line = 1usize;
    let mut quote_line = 0usize;
    let mut field_start = true;
    let mut in_quotes = false;
    let mut after_close = false;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                    after_close = true;
                }
            }
            continue;
        }

        let at_boundary = c == delimiter || c == '\n' || c == '\r';

        if after_close {
            if at_boundary {
                after_close = false;
                field_start = true;
            } else if c != ' ' && c != '\t' {
                return Err(AppError::ParseError(format!(
                    "malformed quoted field on line {}: unexpected {:?} after closing quote",
                    line, c
                )));
            }
            continue;
        }

        if at_boundary {
            field_start = true;
        } else if c == '"' && field_start {
            in_quotes = true;
            quote_line = line;
            field_start = false;
        } else {
            field_start = false;
        }
    }

    if in_quotes {
        return Err(AppError::ParseError(format!(
            "unterminated quoted field starting on line {}",
            quote_line
        )));
    }

    Ok(())
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Trim header names, name unnamed columns, and suffix duplicates
fn normalize_headers(record: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(record.len());

    for (idx, raw) in record.iter().enumerate() {
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}_{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}
