// ============================================================
// DATASET SUMMARY
// ============================================================
// Derived counts shown next to the table; always recomputed, never patched

use serde::{Deserialize, Serialize};

use super::Record;

/// Summary figures for a dataset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Rows kept after blank-row filtering
    pub row_count: usize,

    pub column_count: usize,

    /// `row_count * column_count`
    pub total_cells: usize,

    /// Cells that are empty or whitespace-only
    pub empty_cell_count: usize,

    /// Size of the source file in bytes (0 when unknown)
    pub file_size_bytes: u64,
}

impl DatasetSummary {
    pub fn with_file_size(mut self, file_size_bytes: u64) -> Self {
        self.file_size_bytes = file_size_bytes;
        self
    }

    /// Share of cells that hold a value (0.0 - 1.0)
    pub fn fill_ratio(&self) -> f32 {
        if self.total_cells == 0 {
            0.0
        } else {
            (self.total_cells - self.empty_cell_count) as f32 / self.total_cells as f32
        }
    }

    pub fn file_size_label(&self) -> String {
        format!("{:.2} KB", self.file_size_bytes as f64 / 1024.0)
    }

    /// Get human-readable summary
    pub fn report(&self) -> String {
        format!(
            "Dataset Summary ({} rows, {} columns):\n\
             - Empty cells: {} of {}\n\
             - Fill ratio: {:.2}\n\
             - File size: {}",
            self.row_count,
            self.column_count,
            self.empty_cell_count,
            self.total_cells,
            self.fill_ratio(),
            self.file_size_label()
        )
    }
}

/// Names joined the way the info panel lists them
pub fn column_names_label(columns: &[String]) -> String {
    columns.join(", ")
}

/// Count rows and empty cells. Cells missing from a short record count as empty.
pub fn summarize(rows: &[Record], columns: &[String]) -> DatasetSummary {
    let column_count = columns.len();

    let empty_cell_count = rows
        .iter()
        .map(|row| {
            let present = row.cells.iter().take(column_count);
            let blank = present.clone().filter(|cell| cell.is_blank()).count();
            blank + column_count.saturating_sub(present.count())
        })
        .sum();

    DatasetSummary {
        row_count: rows.len(),
        column_count,
        total_cells: rows.len() * column_count,
        empty_cell_count,
        file_size_bytes: 0,
    }
}
