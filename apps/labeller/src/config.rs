use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::labelling::classifier::DEFAULT_TIMEOUT;
use crate::labelling::pipeline::RunOptions;
use crate::labelling::variant::{FailurePolicy, Variant, WriteMode};
use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Command-line surface. Every flag except the mode switches also reads from
/// the environment (after `.env` is loaded).
#[derive(Debug, Parser)]
#[command(
    name = "labeller",
    version,
    about = "Label social-media posts with an LLM and write the results back to a spreadsheet"
)]
pub struct Cli {
    /// Input table (.csv or .xlsx) with `title` and `selftext` columns.
    #[arg(short, long, env = "LABELLER_INPUT")]
    pub input: PathBuf,

    /// Output table. A `<stem>_fallback.csv` is written next to it if this write fails.
    #[arg(short, long, env = "LABELLER_OUTPUT")]
    pub output: PathBuf,

    #[arg(long, value_enum, env = "LABELLER_VARIANT")]
    pub variant: Variant,

    /// Per-row failure policy. Defaults to the variant's policy.
    #[arg(long, value_enum, env = "LABELLER_ON_ERROR")]
    pub on_error: Option<FailurePolicy>,

    /// Skip rows whose label column is already filled.
    #[arg(long, conflicts_with = "overwrite")]
    pub resume: bool,

    /// Relabel every row, discarding earlier results.
    #[arg(long)]
    pub overwrite: bool,

    /// Column index for the label column (rationale follows it).
    #[arg(long, env = "LABELLER_INSERT_AT")]
    pub insert_at: Option<usize>,

    #[arg(long, env = "LABELLER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "LABELLER_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Upper bound on a single completion call, in seconds.
    #[arg(long, env = "LABELLER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Hide the per-row progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub run: RunOptions,
}

impl Config {
    /// Resolves the CLI against the environment. Fails if `OPENAI_API_KEY` is unset.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let api_key = require_env("OPENAI_API_KEY")?;
        Self::resolve(cli, api_key)
    }

    pub fn resolve(cli: Cli, api_key: String) -> Result<Self> {
        if cli.timeout_secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }
        if api_key.trim().is_empty() {
            bail!("OPENAI_API_KEY is set but empty");
        }

        let mut run = RunOptions::for_variant(cli.variant, Duration::from_secs(cli.timeout_secs));
        if let Some(policy) = cli.on_error {
            run.policy = policy;
        }
        if cli.resume {
            run.mode = WriteMode::Resume;
        } else if cli.overwrite {
            run.mode = WriteMode::Overwrite;
        }
        if cli.insert_at.is_some() {
            run.insert_at = cli.insert_at;
        }
        run.show_progress = !cli.no_progress;

        Ok(Config {
            input: cli.input,
            output: cli.output,
            api_key,
            api_base: cli.api_base,
            model: cli.model,
            run,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
