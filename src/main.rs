use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use csvdesk_lib::app::{build_state, init_tracing};
use csvdesk_lib::domain::csv::column_names_label;
use csvdesk_lib::interfaces::AppState;
use csvdesk_lib::{AppError, LoadOutcome};

#[derive(Parser)]
#[command(name = "csvdesk", version, about = "Inspect and re-export delimited text files")]
struct Cli {
    /// TOML file with ingestion settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the summary and inferred column types
    Inspect { file: PathBuf },

    /// Load a file and write it back out as comma-separated text
    Export { input: PathBuf, output: PathBuf },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "csvdesk failed");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let state = build_state(cli.config.as_deref())?;

    match cli.command {
        Command::Inspect { file } => {
            load(&state, &file).await?;
            let pipeline = state.pipeline.lock().await;
            let dataset = pipeline.snapshot();

            println!("{}", dataset.summary().report());
            println!("Delimiter: {:?}", dataset.provenance().delimiter);
            println!("Columns: {}", column_names_label(dataset.columns()));
            for column in dataset.column_types().iter() {
                println!("  {:<24} {}", column.name, column.semantic_type);
            }
        }
        Command::Export { input, output } => {
            load(&state, &input).await?;
            let outcome = state.pipeline.export_to_path(&output).await?;
            println!("{}", outcome.message);
        }
    }

    Ok(())
}

async fn load(state: &AppState, path: &Path) -> Result<(), AppError> {
    match state.pipeline.load_path(path).await? {
        LoadOutcome::Loaded(outcome) => {
            println!("{}", outcome.message);
            Ok(())
        }
        LoadOutcome::Superseded => Err(AppError::InvalidState("load was superseded".to_string())),
    }
}
