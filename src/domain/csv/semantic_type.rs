// ============================================================
// SEMANTIC TYPE ENUM
// ============================================================
// Whole-column classification produced by the type inferencer

use serde::{Deserialize, Serialize};

/// Semantic type inferred for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    /// No non-blank values at all (or no rows)
    Empty,

    Number,

    Boolean,

    /// Every value parses as a calendar date or timestamp
    Date,

    /// Anything else, including mixed content
    String,
}

impl SemanticType {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            SemanticType::Empty => "Column has no values",
            SemanticType::Number => "Every value is numeric",
            SemanticType::Boolean => "Every value is true or false",
            SemanticType::Date => "Every value is a calendar date",
            SemanticType::String => "Free text or mixed content",
        }
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Empty => write!(f, "Empty"),
            SemanticType::Number => write!(f, "Number"),
            SemanticType::Boolean => write!(f, "Boolean"),
            SemanticType::Date => write!(f, "Date"),
            SemanticType::String => write!(f, "String"),
        }
    }
}
