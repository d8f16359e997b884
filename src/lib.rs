pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::{CsvIngestion, LoadOutcome, OperationOutcome, PipelineState, SharedPipeline};
pub use domain::csv::{CellValue, Dataset, FileSource, IngestionConfig, SemanticType};
pub use domain::error::{AppError, Result};
