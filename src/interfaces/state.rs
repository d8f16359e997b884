use std::sync::{Arc, Mutex};

use crate::application::{CsvIngestion, SharedPipeline};
use crate::domain::csv::IngestionConfig;
use crate::domain::error::Result;
use crate::interfaces::activity_log::LogEntry;

/// Everything the command layer needs; one per UI session
pub struct AppState {
    pub pipeline: SharedPipeline,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
    pub config: IngestionConfig,
}

impl AppState {
    pub fn new(config: IngestionConfig) -> Result<Self> {
        let pipeline = SharedPipeline::new(CsvIngestion::new(config.clone())?);
        Ok(Self {
            pipeline,
            logs: Arc::new(Mutex::new(Vec::new())),
            config,
        })
    }
}
