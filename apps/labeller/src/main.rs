mod config;
mod errors;
mod labelling;
mod llm_client;
mod table;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Cli, Config};
use crate::errors::AppError;
use crate::labelling::pipeline::{label_table, PipelineError, RunSummary};
use crate::llm_client::LlmClient;
use crate::table::{load_table, save_table, SaveOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing
    let cli = Cli::parse();

    // Initialize structured logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting labeller v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(summary) => {
            match serde_json::to_string(&summary) {
                Ok(json) => info!("Run summary: {json}"),
                Err(e) => error!("Could not serialize run summary: {e}"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Load → label → save. On a fail-fast abort the partial table is still saved
/// before the abort is reported.
async fn run(cli: Cli) -> Result<RunSummary, AppError> {
    let config = Config::from_cli(cli)?;

    let mut table = load_table(&config.input).map_err(AppError::Load)?;

    let llm = LlmClient::new(config.api_key.clone(), &config.api_base, config.model.clone())
        .map_err(|e| AppError::Config(e.into()))?;
    info!("LLM client initialized (model: {})", llm.model());

    match label_table(&mut table, &llm, &config.run).await {
        Ok(summary) => {
            let outcome = save_table(&table, &config.output).map_err(AppError::Save)?;
            report_save(&outcome);
            Ok(summary)
        }
        Err(PipelineError::Aborted { row, source }) => {
            warn!("Run aborted at row {row}; saving partial results");
            let outcome = save_table(&table, &config.output).map_err(AppError::Save)?;
            report_save(&outcome);
            Err(AppError::Aborted { row, source })
        }
        Err(PipelineError::Table(e)) => Err(AppError::Load(e)),
    }
}

fn report_save(outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Primary(path) => {
            info!("Finished processing. Output saved to {}", path.display())
        }
        SaveOutcome::Fallback { path, cause } => warn!(
            "Primary output could not be written ({cause}); results are in {}",
            path.display()
        ),
    }
}
