use thiserror::Error;

use crate::llm_client::LlmError;
use crate::table::TableError;

/// Application-level error type.
/// Each variant maps to a process exit code in `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),

    #[error("Failed to load input: {0}")]
    Load(TableError),

    #[error("Error or timeout at row {row}: {source}")]
    Aborted {
        row: usize,
        #[source]
        source: LlmError,
    },

    #[error("Failed to save output: {0}")]
    Save(TableError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Aborted { .. } => 1,
            AppError::Config(_) | AppError::Load(_) => 2,
            AppError::Save(_) => 3,
        }
    }
}
