use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    UnsupportedFileType(String),
    ParseError(String),
    InvalidEdit(String),
    DuplicateColumn(String),
    InvalidState(String),
    ValidationError(String),
    ConfigError(String),
    IoError(String),
}

impl AppError {
    /// Text suitable for the modal/toast shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UnsupportedFileType(_) => {
                "Only CSV files are accepted. Please upload a valid CSV file.".to_string()
            }
            AppError::ParseError(msg) => format!("The file could not be read: {}", msg),
            AppError::InvalidEdit(msg) => format!("That edit could not be applied: {}", msg),
            AppError::DuplicateColumn(name) => {
                format!("A column named \"{}\" already exists", name)
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedFileType(msg) => write!(f, "Unsupported file type: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::InvalidEdit(msg) => write!(f, "Invalid edit: {}", msg),
            AppError::DuplicateColumn(msg) => write!(f, "Duplicate column: {}", msg),
            AppError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
