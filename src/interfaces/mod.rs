pub mod activity_log;
pub mod commands;
pub mod state;
pub mod types;

pub use state::AppState;
