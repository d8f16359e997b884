// ============================================================
// CSV INGESTION USE CASE
// ============================================================
// Load / edit / save / revert / delete over a single dataset slot

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::domain::csv::{
    CellValue, ColumnTypes, Dataset, DatasetDraft, FileSource, IngestionConfig, Provenance,
    Record,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{CsvExporter, CsvParser, ExportedFile, TypeInferencer};

/// User-facing result of a transition, for whatever toast mechanism the caller uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub message: String,
}

impl OperationOutcome {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(OperationOutcome),

    /// A newer load (or a delete) was issued while this one was parsing
    Superseded,
}

/// Identifies one in-flight load; only the newest ticket may commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Empty,
    Loaded,
    Editing,
}

enum Session {
    Empty,
    Loaded(Arc<Dataset>),
    Editing {
        dataset: Arc<Dataset>,
        draft: DatasetDraft,
    },
}

/// Parse -> infer -> summarize. Holds no session state, so it can run
/// without the pipeline lock.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    parser: CsvParser,
    inferencer: TypeInferencer,
}

impl DatasetLoader {
    pub fn new(config: &IngestionConfig) -> Self {
        Self {
            parser: CsvParser::from_config(config),
            inferencer: TypeInferencer::from_config(config),
        }
    }

    pub fn load(&self, source: &FileSource) -> Result<Dataset> {
        let start = Instant::now();
        source.ensure_accepted()?;

        let parsed = self.parser.parse_bytes(&source.bytes)?;
        let column_types = self.inferencer.infer_columns(&parsed.columns, &parsed.rows);

        let dataset = Dataset::assemble(
            parsed.columns,
            parsed.rows,
            column_types,
            Provenance {
                source_file_name: Some(source.name.clone()),
                source_file_size_bytes: source.size_bytes(),
                delimiter: parsed.delimiter as char,
            },
        )?;

        info!(
            file = %source.name,
            rows = dataset.row_count(),
            columns = dataset.columns().len(),
            empty_cells = dataset.empty_cell_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "CSV parsed"
        );
        Ok(dataset)
    }
}

/// The ingestion pipeline: a single dataset slot plus the edit session
pub struct CsvIngestion {
    config: IngestionConfig,
    loader: DatasetLoader,
    inferencer: TypeInferencer,
    exporter: CsvExporter,
    session: Session,
    generation: u64,
    pending: Option<u64>,
}

impl CsvIngestion {
    pub fn new(config: IngestionConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid ingestion config: {}", e)))?;

        Ok(Self {
            loader: DatasetLoader::new(&config),
            inferencer: TypeInferencer::from_config(&config),
            exporter: CsvExporter::from_config(&config),
            config,
            session: Session::Empty,
            generation: 0,
            pending: None,
        })
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    pub fn state(&self) -> PipelineState {
        match self.session {
            Session::Empty => PipelineState::Empty,
            Session::Loaded(_) => PipelineState::Loaded,
            Session::Editing { .. } => PipelineState::Editing,
        }
    }

    /// Whether a replace should be confirmed before loading over the current data
    pub fn has_data(&self) -> bool {
        self.committed().map(|d| d.has_data()).unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The committed dataset. Edits in progress are not visible here.
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.committed()
            .cloned()
            .unwrap_or_else(|| Arc::new(Dataset::empty()))
    }

    fn committed(&self) -> Option<&Arc<Dataset>> {
        match &self.session {
            Session::Empty => None,
            Session::Loaded(dataset) | Session::Editing { dataset, .. } => Some(dataset),
        }
    }

    /// Columns as currently shown: the draft's while editing
    pub fn working_columns(&self) -> &[String] {
        match &self.session {
            Session::Empty => &[],
            Session::Loaded(dataset) => dataset.columns(),
            Session::Editing { draft, .. } => &draft.columns,
        }
    }

    /// Rows as currently shown: the draft's while editing
    pub fn working_rows(&self) -> &[Record] {
        match &self.session {
            Session::Empty => &[],
            Session::Loaded(dataset) => dataset.rows(),
            Session::Editing { draft, .. } => &draft.rows,
        }
    }

    pub fn working_column_types(&self) -> ColumnTypes {
        match &self.session {
            Session::Empty => ColumnTypes::new(),
            Session::Loaded(dataset) => dataset.column_types().clone(),
            Session::Editing { draft, .. } => draft.column_types.clone(),
        }
    }

    /// Load synchronously: filter, parse, and commit in one step
    pub fn load(&mut self, source: &FileSource) -> Result<OperationOutcome> {
        source.ensure_accepted().map_err(|e| {
            warn!(file = %source.name, "Rejected file at input filter");
            e
        })?;

        let ticket = self.begin_load();
        let result = self.loader.load(source);
        match self.complete_load(ticket, result)? {
            LoadOutcome::Loaded(outcome) => Ok(outcome),
            LoadOutcome::Superseded => Err(AppError::InvalidState(
                "load was superseded".to_string(),
            )),
        }
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Commit a parse result if its ticket is still the newest one.
    /// A failed parse leaves the current dataset untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Dataset>,
    ) -> Result<LoadOutcome> {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale load result"
            );
            return Ok(LoadOutcome::Superseded);
        }

        self.pending = None;
        let dataset = result.map_err(|e| {
            warn!(error = %e, "Load failed, keeping previous data");
            e
        })?;

        let message = format!("{} rows loaded", dataset.row_count());
        self.session = Session::Loaded(Arc::new(dataset));
        Ok(LoadOutcome::Loaded(OperationOutcome::new(message)))
    }

    pub fn begin_edit(&mut self) -> Result<OperationOutcome> {
        let dataset = match &self.session {
            Session::Loaded(dataset) => Arc::clone(dataset),
            Session::Empty => return Err(invalid_state("begin an edit", PipelineState::Empty)),
            Session::Editing { .. } => {
                return Err(invalid_state("begin an edit", PipelineState::Editing))
            }
        };

        let draft = DatasetDraft::from_dataset(&dataset);
        self.session = Session::Editing { dataset, draft };
        Ok(OperationOutcome::new("Editing enabled"))
    }

    /// Set one cell in the draft. The text is coerced like parsed input.
    pub fn edit_cell(&mut self, row: usize, column: &str, value: &str) -> Result<OperationOutcome> {
        let value = if self.config.dynamic_typing {
            CellValue::coerce(value)
        } else {
            CellValue::text(value)
        };

        self.draft_mut("edit a cell")?.edit_cell(row, column, value)?;
        Ok(OperationOutcome::new("Cell updated"))
    }

    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> Result<OperationOutcome> {
        self.draft_mut("rename a column")?
            .rename_column(old_name, new_name)?;
        Ok(OperationOutcome::new(format!(
            "Column \"{}\" renamed to \"{}\"",
            old_name,
            new_name.trim()
        )))
    }

    /// Commit the draft: drop rows that became blank, re-infer types, re-summarize
    pub fn save(&mut self) -> Result<OperationOutcome> {
        let (dataset, draft) = match &self.session {
            Session::Editing { dataset, draft } => (dataset, draft),
            _ => return Err(invalid_state("save", self.state())),
        };

        let rows: Vec<Record> = draft
            .rows
            .iter()
            .filter(|row| !row.is_blank())
            .cloned()
            .collect();
        let column_types = self.inferencer.infer_columns(&draft.columns, &rows);
        let saved = Dataset::assemble(
            draft.columns.clone(),
            rows,
            column_types,
            dataset.provenance().clone(),
        )?;

        info!(
            rows = saved.row_count(),
            empty_cells = saved.empty_cell_count(),
            "Edits saved"
        );
        self.session = Session::Loaded(Arc::new(saved));
        Ok(OperationOutcome::new("Changes saved"))
    }

    pub fn revert(&mut self) -> Result<OperationOutcome> {
        let dataset = match &self.session {
            Session::Editing { dataset, .. } => Arc::clone(dataset),
            _ => return Err(invalid_state("revert", self.state())),
        };

        self.session = Session::Loaded(dataset);
        Ok(OperationOutcome::new("Changes reverted"))
    }

    /// Reset to the empty dataset. In-flight loads are invalidated too.
    pub fn delete(&mut self) -> Result<OperationOutcome> {
        if matches!(self.session, Session::Empty) {
            return Err(invalid_state("delete", PipelineState::Empty));
        }

        self.generation += 1;
        self.pending = None;
        self.session = Session::Empty;
        info!("Dataset deleted");
        Ok(OperationOutcome::new("Data deleted"))
    }

    /// Serialize the committed dataset
    pub fn export(&self) -> Result<Vec<u8>> {
        self.exporter.export(&self.snapshot())
    }

    pub fn export_download(&self) -> Result<ExportedFile> {
        let file = self.exporter.export_download(&self.snapshot())?;
        info!(file = %file.file_name, bytes = file.bytes.len(), "CSV exported");
        Ok(file)
    }

    fn draft_mut(&mut self, action: &str) -> Result<&mut DatasetDraft> {
        let state = self.state();
        match &mut self.session {
            Session::Editing { draft, .. } => Ok(draft),
            _ => Err(invalid_state(action, state)),
        }
    }
}

impl Default for CsvIngestion {
    fn default() -> Self {
        Self {
            loader: DatasetLoader::new(&IngestionConfig::default()),
            inferencer: TypeInferencer::default(),
            exporter: CsvExporter::default(),
            config: IngestionConfig::default(),
            session: Session::Empty,
            generation: 0,
            pending: None,
        }
    }
}

fn invalid_state(action: &str, state: PipelineState) -> AppError {
    AppError::InvalidState(format!("cannot {} while {:?}", action, state))
}

/// Pipeline shared across async callers. Parsing happens outside the lock,
/// so overlapping loads resolve to whichever was issued last.
#[derive(Clone)]
pub struct SharedPipeline {
    inner: Arc<Mutex<CsvIngestion>>,
}

impl SharedPipeline {
    pub fn new(pipeline: CsvIngestion) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pipeline)),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, CsvIngestion> {
        self.inner.lock().await
    }

    pub async fn load(&self, source: FileSource) -> Result<LoadOutcome> {
        source.ensure_accepted().map_err(|e| {
            warn!(file = %source.name, "Rejected file at input filter");
            e
        })?;

        let (ticket, loader) = {
            let mut pipeline = self.inner.lock().await;
            (pipeline.begin_load(), pipeline.loader().clone())
        };

        let result = tokio::task::spawn_blocking(move || loader.load(&source))
            .await
            .unwrap_or_else(|e| Err(AppError::ParseError(format!("parse task failed: {}", e))));

        self.inner.lock().await.complete_load(ticket, result)
    }

    /// Read a file from disk and load it; the file name and size become provenance
    pub async fn load_path(&self, path: &Path) -> Result<LoadOutcome> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.load(FileSource::new(name, bytes)).await
    }

    /// Write the committed dataset to disk
    pub async fn export_to_path(&self, path: &Path) -> Result<OperationOutcome> {
        let bytes = self.inner.lock().await.export()?;
        tokio::fs::write(path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "CSV written");
        Ok(OperationOutcome::new(format!("Saved to {}", path.display())))
    }
}
