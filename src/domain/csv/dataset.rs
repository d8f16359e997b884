// ============================================================
// DATASET TYPES
// ============================================================
// In-memory table: records, column order, column types, provenance

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::summary::summarize;
use super::{CellValue, DatasetSummary, SemanticType};
use crate::domain::error::{AppError, Result};

/// A single record. Cells are stored positionally, aligned with the
/// owning dataset's `columns`, so a column rename never touches records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub cells: Vec<CellValue>,
}

impl Record {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Pad with `Empty` or truncate so the record has exactly `width` cells
    pub fn aligned(mut cells: Vec<CellValue>, width: usize) -> Self {
        cells.resize(width, CellValue::Empty);
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// True when every cell is empty or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// Inferred type for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub name: String,
    pub semantic_type: SemanticType,
}

/// Column name to semantic type, kept in column order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnTypes {
    entries: Vec<ColumnType>,
}

impl ColumnTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, semantic_type: SemanticType) {
        self.entries.push(ColumnType {
            name: name.into(),
            semantic_type,
        });
    }

    pub fn get(&self, name: &str) -> Option<SemanticType> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.semantic_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnType> {
        self.entries.iter()
    }

    /// Re-key an entry in place; the type itself is left alone
    fn rename(&mut self, old_name: &str, new_name: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == old_name) {
            entry.name = new_name.to_string();
        }
    }
}

impl FromIterator<(String, SemanticType)> for ColumnTypes {
    fn from_iter<I: IntoIterator<Item = (String, SemanticType)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, semantic_type)| ColumnType {
                    name,
                    semantic_type,
                })
                .collect(),
        }
    }
}

/// Where the data came from. Fixed until the next load or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_file_name: Option<String>,
    pub source_file_size_bytes: u64,
    pub delimiter: char,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            source_file_name: None,
            source_file_size_bytes: 0,
            delimiter: ',',
        }
    }
}

/// The loaded table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Record>,
    columns: Vec<String>,
    column_types: ColumnTypes,
    row_count: usize,
    empty_cell_count: usize,
    provenance: Provenance,
}

impl Dataset {
    /// The canonical empty dataset: no rows, no columns, no types
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset and derive its summary scalars.
    /// Fails if the parts break the column/record/type invariants.
    pub fn assemble(
        columns: Vec<String>,
        rows: Vec<Record>,
        column_types: ColumnTypes,
        provenance: Provenance,
    ) -> Result<Self> {
        validate_parts(&columns, &rows, &column_types)?;

        let counts = summarize(&rows, &columns);
        Ok(Self {
            row_count: counts.row_count,
            empty_cell_count: counts.empty_cell_count,
            rows,
            columns,
            column_types,
            provenance,
        })
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_types(&self) -> &ColumnTypes {
        &self.column_types
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn empty_cell_count(&self) -> usize {
        self.empty_cell_count
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Look a cell up by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Name/value pairs for one row, in column order
    pub fn row_entries(&self, row: usize) -> Option<Vec<(&str, &CellValue)>> {
        let record = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .map(String::as_str)
                .zip(record.cells.iter())
                .collect(),
        )
    }

    /// Full summary including the file size from provenance
    pub fn summary(&self) -> DatasetSummary {
        summarize(&self.rows, &self.columns)
            .with_file_size(self.provenance.source_file_size_bytes)
    }

    /// Re-check invariants, e.g. after deserializing a cached snapshot
    pub fn validate(&self) -> Result<()> {
        validate_parts(&self.columns, &self.rows, &self.column_types)?;

        let counts = summarize(&self.rows, &self.columns);
        if counts.row_count != self.row_count || counts.empty_cell_count != self.empty_cell_count {
            return Err(AppError::ValidationError(format!(
                "stored counts ({} rows, {} empty cells) do not match the rows ({} rows, {} empty cells)",
                self.row_count, self.empty_cell_count, counts.row_count, counts.empty_cell_count
            )));
        }

        Ok(())
    }
}

fn validate_parts(columns: &[String], rows: &[Record], column_types: &ColumnTypes) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(AppError::ValidationError(format!(
                "column \"{}\" appears more than once",
                column
            )));
        }
    }

    if let Some((index, record)) = rows
        .iter()
        .enumerate()
        .find(|(_, record)| record.cells.len() != columns.len())
    {
        return Err(AppError::ValidationError(format!(
            "row {} has {} cells but there are {} columns",
            index,
            record.cells.len(),
            columns.len()
        )));
    }

    let types_match = column_types.len() == columns.len()
        && columns
            .iter()
            .zip(column_types.iter())
            .all(|(column, entry)| *column == entry.name);
    if !types_match {
        return Err(AppError::ValidationError(
            "column types do not match the column list".to_string(),
        ));
    }

    Ok(())
}

/// Working copy used during an edit session. Changes stay here until
/// they are committed back into a new `Dataset`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDraft {
    pub columns: Vec<String>,
    pub column_types: ColumnTypes,
    pub rows: Vec<Record>,
}

impl DatasetDraft {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            columns: dataset.columns.clone(),
            column_types: dataset.column_types.clone(),
            rows: dataset.rows.clone(),
        }
    }

    pub fn edit_cell(&mut self, row: usize, column: &str, value: CellValue) -> Result<()> {
        let index = self
            .columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| AppError::InvalidEdit(format!("unknown column \"{}\"", column)))?;

        let row_count = self.rows.len();
        let record = self.rows.get_mut(row).ok_or_else(|| {
            AppError::InvalidEdit(format!(
                "row {} is out of range ({} rows)",
                row, row_count
            ))
        })?;

        record.cells[index] = value;
        Ok(())
    }

    /// Rename a column in place. Records are positional, so only the
    /// column list and the type entry need re-keying.
    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::InvalidEdit(
                "column name cannot be empty".to_string(),
            ));
        }

        let index = self
            .columns
            .iter()
            .position(|name| name == old_name)
            .ok_or_else(|| AppError::InvalidEdit(format!("unknown column \"{}\"", old_name)))?;

        if new_name == old_name {
            return Ok(());
        }
        if self.columns.iter().any(|name| name == new_name) {
            return Err(AppError::DuplicateColumn(new_name.to_string()));
        }

        self.columns[index] = new_name.to_string();
        self.column_types.rename(old_name, new_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(values: &[&str]) -> Record {
        Record::new(values.iter().map(|v| CellValue::coerce(v)).collect())
    }

    fn types(columns: &[&str]) -> ColumnTypes {
        columns
            .iter()
            .map(|c| (c.to_string(), SemanticType::String))
            .collect()
    }

    fn sample() -> Dataset {
        Dataset::assemble(
            vec!["A".to_string(), "B".to_string()],
            vec![record(&["1", "x"]), record(&["2", ""]), record(&["3", "z"])],
            types(&["A", "B"]),
            Provenance::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_assemble_derives_summary() {
        let dataset = sample();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.empty_cell_count(), 1);
        assert!(dataset.has_data());
    }

    #[test]
    fn test_assemble_rejects_duplicate_columns() {
        let err = Dataset::assemble(
            vec!["A".to_string(), "A".to_string()],
            vec![],
            types(&["A", "A"]),
            Provenance::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_assemble_rejects_ragged_rows() {
        let err = Dataset::assemble(
            vec!["A".to_string(), "B".to_string()],
            vec![record(&["1"])],
            types(&["A", "B"]),
            Provenance::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_cell_lookup_by_name() {
        let dataset = sample();
        assert_eq!(dataset.cell(2, "B").unwrap().as_text(), Some("z"));
        assert!(dataset.cell(3, "B").is_none());
        assert!(dataset.cell(0, "C").is_none());

        let entries = dataset.row_entries(0).unwrap();
        assert_eq!(entries[1].0, "B");
    }

    #[test]
    fn test_record_alignment() {
        let short = Record::aligned(vec![CellValue::coerce("1")], 3);
        assert_eq!(short.cells.len(), 3);
        assert_eq!(short.cells[2], CellValue::Empty);

        let long = Record::aligned(vec![CellValue::coerce("1"); 4], 2);
        assert_eq!(long.cells.len(), 2);
    }

    #[test]
    fn test_draft_rename_preserves_position_and_type() {
        let dataset = sample();
        let mut draft = DatasetDraft::from_dataset(&dataset);
        draft.rename_column("A", "Z").unwrap();

        assert_eq!(draft.columns, vec!["Z".to_string(), "B".to_string()]);
        assert_eq!(draft.column_types.get("Z"), Some(SemanticType::String));
        assert_eq!(draft.column_types.get("A"), None);
        assert_eq!(draft.rows.len(), 3);
    }

    #[test]
    fn test_draft_rename_to_existing_name_fails() {
        let dataset = sample();
        let mut draft = DatasetDraft::from_dataset(&dataset);
        let before = draft.clone();

        let err = draft.rename_column("A", "B").unwrap_err();
        assert_eq!(err, AppError::DuplicateColumn("B".to_string()));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_draft_rename_to_same_name_is_noop() {
        let dataset = sample();
        let mut draft = DatasetDraft::from_dataset(&dataset);
        draft.rename_column("A", "A").unwrap();
        assert_eq!(draft.columns[0], "A");
    }

    #[test]
    fn test_draft_edit_guards() {
        let dataset = sample();
        let mut draft = DatasetDraft::from_dataset(&dataset);

        assert!(matches!(
            draft.edit_cell(10, "A", CellValue::Empty),
            Err(AppError::InvalidEdit(_))
        ));
        assert!(matches!(
            draft.edit_cell(0, "missing", CellValue::Empty),
            Err(AppError::InvalidEdit(_))
        ));

        draft.edit_cell(0, "B", CellValue::coerce("new")).unwrap();
        assert_eq!(draft.rows[0].cells[1].as_text(), Some("new"));
        assert_eq!(dataset.cell(0, "B").unwrap().as_text(), Some("x"));
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let dataset = Dataset::assemble(
            vec!["id".to_string(), "ok".to_string(), "note".to_string()],
            vec![
                record(&["1.50", "true", "first"]),
                record(&["2", "", "second, quoted"]),
            ],
            vec![
                ("id".to_string(), SemanticType::Number),
                ("ok".to_string(), SemanticType::Boolean),
                ("note".to_string(), SemanticType::String),
            ]
            .into_iter()
            .collect(),
            Provenance {
                source_file_name: Some("notes.csv".to_string()),
                source_file_size_bytes: 48,
                delimiter: ';',
            },
        )
        .unwrap();

        let json = serde_json::to_string(&dataset).unwrap();
        let restored: Dataset = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.rows(), dataset.rows());
        assert_eq!(restored.columns(), dataset.columns());
        assert_eq!(restored.column_types(), dataset.column_types());
        assert_eq!(restored.row_count(), 2);
        assert_eq!(restored.empty_cell_count(), 1);
        assert_eq!(restored.provenance(), dataset.provenance());
        assert_eq!(restored.summary(), dataset.summary());
        restored.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_drifted_counts() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["row_count"] = serde_json::json!(99);
        value["empty_cell_count"] = serde_json::json!(7);

        let drifted: Dataset = serde_json::from_value(value).unwrap();
        assert_eq!(drifted.row_count(), 99);
        assert!(matches!(
            drifted.validate(),
            Err(AppError::ValidationError(_))
        ));
        sample().validate().unwrap();
    }
}
