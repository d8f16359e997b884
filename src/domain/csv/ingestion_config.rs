// ============================================================
// INGESTION CONFIGURATION
// ============================================================
// Tunables for delimiter sniffing, typing, and export naming

use serde::{Deserialize, Serialize};

/// Configuration for loading and exporting CSV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Delimiters tried during sniffing, in priority order
    pub candidate_delimiters: Vec<char>,

    /// Number of non-blank lines examined when sniffing (default: 10)
    pub sniff_line_count: usize,

    /// Coerce number/boolean literals at parse time (default: true)
    pub dynamic_typing: bool,

    /// chrono format strings accepted as calendar dates
    pub date_formats: Vec<String>,

    /// File name used for downloads when the source name is unknown
    pub default_export_name: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            candidate_delimiters: vec![',', ';', '\t', '|'],
            sniff_line_count: 10,
            dynamic_typing: true,
            date_formats: [
                "%Y-%m-%d",
                "%Y/%m/%d",
                "%m/%d/%Y",
                "%d.%m.%Y",
                "%d-%m-%Y",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%d %H:%M",
                "%b %d %Y",
                "%d %b %Y",
                "%B %d, %Y",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            default_export_name: "data.csv".to_string(),
        }
    }
}

impl IngestionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.candidate_delimiters.is_empty() {
            return Err("candidate_delimiters must not be empty".to_string());
        }
        if let Some(bad) = self
            .candidate_delimiters
            .iter()
            .find(|d| !d.is_ascii() || **d == '"' || **d == '\n' || **d == '\r')
        {
            return Err(format!("{:?} cannot be used as a delimiter", bad));
        }
        if self.sniff_line_count == 0 {
            return Err("sniff_line_count must be > 0".to_string());
        }
        if self.default_export_name.trim().is_empty() {
            return Err("default_export_name must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(IngestionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_quote_delimiter() {
        let config = IngestionConfig {
            candidate_delimiters: vec!['"'],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sniff_lines() {
        let config = IngestionConfig {
            sniff_line_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
