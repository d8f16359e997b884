use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::AppState;

/// Install the fmt subscriber; `RUST_LOG` overrides the default `info` filter
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration and build the state the command layer runs against
pub fn build_state(config_path: Option<&Path>) -> Result<AppState> {
    let config = ConfigService::load(config_path)?;
    AppState::new(config)
}
