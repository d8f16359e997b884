//! CSV Commands
//!
//! Entry points for the UI collaborators:
//! - loading / replacing a file (after the caller confirmed a replace)
//! - the edit session: begin, edit cell, rename column, save, revert
//! - delete (after the caller confirmed) and export for download

use std::path::Path;

use crate::application::{CsvIngestion, LoadOutcome, OperationOutcome};
use crate::domain::csv::FileSource;
use crate::domain::error::Result;
use crate::interfaces::activity_log::add_log;

use super::state::AppState;
use super::types::*;

pub async fn csv_load_file(state: &AppState, request: CsvLoadRequest) -> Result<CsvLoadResponse> {
    add_log(
        &state.logs,
        "INFO",
        "CSV",
        &format!("Loading CSV: {}", request.file_name),
    );

    let mut source = FileSource::new(request.file_name, request.content);
    if let Some(mime) = request.mime {
        source = source.with_mime(mime);
    }

    let outcome = state.pipeline.load(source).await;
    finish_load(state, outcome).await
}

pub async fn csv_load_path(state: &AppState, file_path: String) -> Result<CsvLoadResponse> {
    add_log(
        &state.logs,
        "INFO",
        "CSV",
        &format!("Loading CSV from path: {}", file_path),
    );

    let outcome = state.pipeline.load_path(Path::new(&file_path)).await;
    finish_load(state, outcome).await
}

async fn finish_load(state: &AppState, outcome: Result<LoadOutcome>) -> Result<CsvLoadResponse> {
    let outcome = outcome.map_err(|e| {
        add_log(&state.logs, "ERROR", "CSV", &e.user_message());
        e
    })?;

    let (message, superseded) = match outcome {
        LoadOutcome::Loaded(outcome) => {
            add_log(&state.logs, "INFO", "CSV", &outcome.message);
            (Some(outcome.message), false)
        }
        LoadOutcome::Superseded => (None, true),
    };

    let pipeline = state.pipeline.lock().await;
    Ok(CsvLoadResponse {
        message,
        superseded,
        dataset: DatasetResponse::from_pipeline(&pipeline),
    })
}

/// Lets the caller decide whether to ask for replace confirmation
pub async fn csv_has_data(state: &AppState) -> bool {
    state.pipeline.lock().await.has_data()
}

pub async fn csv_snapshot(state: &AppState) -> DatasetResponse {
    let pipeline = state.pipeline.lock().await;
    DatasetResponse::from_pipeline(&pipeline)
}

pub async fn csv_begin_edit(state: &AppState) -> Result<CommandMessage> {
    run_transition(state, |pipeline| pipeline.begin_edit()).await
}

pub async fn csv_edit_cell(state: &AppState, request: CsvEditCellRequest) -> Result<CommandMessage> {
    run_transition(state, |pipeline| {
        pipeline.edit_cell(request.row_index, &request.column, &request.value)
    })
    .await
}

pub async fn csv_rename_column(
    state: &AppState,
    request: CsvRenameColumnRequest,
) -> Result<CommandMessage> {
    run_transition(state, |pipeline| {
        pipeline.rename_column(&request.old_name, &request.new_name)
    })
    .await
}

pub async fn csv_save(state: &AppState) -> Result<CommandMessage> {
    run_transition(state, |pipeline| pipeline.save()).await
}

pub async fn csv_revert(state: &AppState) -> Result<CommandMessage> {
    run_transition(state, |pipeline| pipeline.revert()).await
}

pub async fn csv_delete(state: &AppState) -> Result<CommandMessage> {
    run_transition(state, |pipeline| pipeline.delete()).await
}

pub async fn csv_export(state: &AppState) -> Result<CsvExportResponse> {
    let pipeline = state.pipeline.lock().await;
    let file = pipeline.export_download().map_err(|e| {
        add_log(&state.logs, "ERROR", "CSV", &format!("Export failed: {}", e));
        e
    })?;

    add_log(
        &state.logs,
        "INFO",
        "CSV",
        &format!("Exported {} ({} bytes)", file.file_name, file.bytes.len()),
    );

    Ok(CsvExportResponse {
        file_name: file.file_name,
        mime: file.mime,
        content: file.bytes,
    })
}

async fn run_transition<F>(state: &AppState, transition: F) -> Result<CommandMessage>
where
    F: FnOnce(&mut CsvIngestion) -> Result<OperationOutcome>,
{
    let mut pipeline = state.pipeline.lock().await;
    let outcome = transition(&mut *pipeline).map_err(|e| {
        add_log(&state.logs, "ERROR", "CSV", &e.user_message());
        e
    })?;

    add_log(&state.logs, "INFO", "CSV", &outcome.message);
    Ok(CommandMessage {
        message: outcome.message,
        dataset: DatasetResponse::from_pipeline(&pipeline),
    })
}
