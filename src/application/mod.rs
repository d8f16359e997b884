pub mod use_cases;

pub use use_cases::csv_ingestion::{
    CsvIngestion, DatasetLoader, LoadOutcome, LoadTicket, OperationOutcome, PipelineState,
    SharedPipeline,
};
