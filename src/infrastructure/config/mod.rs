use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::debug;

use crate::domain::csv::IngestionConfig;
use crate::domain::error::{AppError, Result};

pub const ENV_PREFIX: &str = "CSVDESK_";

/// Layers defaults, an optional TOML file, and `CSVDESK_*` environment variables
pub struct ConfigService;

impl ConfigService {
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(IngestionConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(path: Option<&Path>) -> Result<IngestionConfig> {
        let config: IngestionConfig = Self::figment(path)
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid ingestion config: {}", e)))?;

        debug!(
            sniff_line_count = config.sniff_line_count,
            dynamic_typing = config.dynamic_typing,
            "Ingestion config loaded"
        );
        Ok(config)
    }
}
