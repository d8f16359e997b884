// ============================================================
// CSV COMMAND TYPES
// ============================================================

use serde::{Deserialize, Serialize};

use crate::application::{CsvIngestion, PipelineState};
use crate::domain::csv::{column_names_label, CellValue, SemanticType};

#[derive(Debug, Deserialize)]
pub struct CsvLoadRequest {
    pub file_name: String,
    pub mime: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct CsvEditCellRequest {
    pub row_index: usize,
    pub column: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct CsvRenameColumnRequest {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Serialize)]
pub struct CsvColumn {
    pub name: String,
    pub semantic_type: SemanticType,
}

/// Info panel figures
#[derive(Debug, Serialize)]
pub struct CsvInfo {
    pub column_count: usize,
    pub row_count: usize,
    pub empty_cell_count: usize,
    pub file_size: String,
    pub column_names: String,
    pub delimiter: char,
    pub file_name: Option<String>,
}

/// Read-only view for the table renderer. While editing, rows and
/// columns come from the draft; `info` always describes committed data.
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub state: PipelineState,
    pub has_data: bool,
    pub is_loading: bool,
    pub columns: Vec<CsvColumn>,
    pub rows: Vec<Vec<CellValue>>,
    pub info: CsvInfo,
}

impl DatasetResponse {
    pub fn from_pipeline(pipeline: &CsvIngestion) -> Self {
        let committed = pipeline.snapshot();
        let summary = committed.summary();
        let column_types = pipeline.working_column_types();

        let columns = pipeline
            .working_columns()
            .iter()
            .map(|name| CsvColumn {
                name: name.clone(),
                semantic_type: column_types.get(name).unwrap_or(SemanticType::Empty),
            })
            .collect();

        Self {
            state: pipeline.state(),
            has_data: pipeline.has_data(),
            is_loading: pipeline.is_loading(),
            columns,
            rows: pipeline
                .working_rows()
                .iter()
                .map(|row| row.cells.clone())
                .collect(),
            info: CsvInfo {
                column_count: summary.column_count,
                row_count: summary.row_count,
                empty_cell_count: summary.empty_cell_count,
                file_size: summary.file_size_label(),
                column_names: column_names_label(committed.columns()),
                delimiter: committed.provenance().delimiter,
                file_name: committed.provenance().source_file_name.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CsvLoadResponse {
    /// `None` when a newer load replaced this one before it finished
    pub message: Option<String>,
    pub superseded: bool,
    pub dataset: DatasetResponse,
}

#[derive(Debug, Serialize)]
pub struct CommandMessage {
    pub message: String,
    pub dataset: DatasetResponse,
}

#[derive(Debug, Serialize)]
pub struct CsvExportResponse {
    pub file_name: String,
    pub mime: String,
    pub content: Vec<u8>,
}
