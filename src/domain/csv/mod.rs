// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for the loaded table
// No I/O, no async

mod cell_value;
mod dataset;
mod file_source;
mod ingestion_config;
mod semantic_type;
mod summary;

pub use cell_value::CellValue;
pub use dataset::{ColumnType, ColumnTypes, Dataset, DatasetDraft, Provenance, Record};
pub use file_source::{FileSource, ACCEPTED_EXTENSION, ACCEPTED_MIME};
pub use ingestion_config::IngestionConfig;
pub use semantic_type::SemanticType;
pub use summary::{column_names_label, summarize, DatasetSummary};
