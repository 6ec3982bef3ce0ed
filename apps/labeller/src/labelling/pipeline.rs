//! Labelling pipeline — the single sequential pass over a loaded table.
//!
//! Flow per row: resume check → build passage → classify (bounded call + parse)
//! → write label/rationale cells. Rows never influence each other.

use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::labelling::classifier::Classifier;
use crate::labelling::variant::{build_passage, FailurePolicy, Variant, WriteMode};
use crate::llm_client::{CompletionService, LlmError};
use crate::table::{Table, TableError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Table(#[from] TableError),

    /// Fail-fast stop. `row` is the zero-based position of the failing row.
    #[error("Error or timeout at row {row}: {source}")]
    Aborted {
        row: usize,
        #[source]
        source: LlmError,
    },
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub variant: Variant,
    pub policy: FailurePolicy,
    pub mode: WriteMode,
    pub insert_at: Option<usize>,
    pub timeout: Duration,
    pub show_progress: bool,
}

impl RunOptions {
    /// Options with every per-variant default applied.
    pub fn for_variant(variant: Variant, timeout: Duration) -> Self {
        let profile = variant.profile();
        Self {
            variant,
            policy: profile.default_policy,
            mode: profile.default_mode,
            insert_at: profile.default_insert_at,
            timeout,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub variant: Variant,
    pub total_rows: usize,
    pub classified: usize,
    pub skipped: usize,
    /// Rows that ended up with the error sentinel.
    pub errors: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Result columns resolved against the table for this run.
#[derive(Debug, Clone, Copy)]
struct ResultColumns {
    label: usize,
    rationale: usize,
}

/// Labels every row of `table` in place.
///
/// On a fail-fast abort the table keeps every result written so far and
/// `PipelineError::Aborted` is returned; the caller is expected to persist it.
pub async fn label_table(
    table: &mut Table,
    service: &dyn CompletionService,
    options: &RunOptions,
) -> Result<RunSummary, PipelineError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("label_run", %run_id, variant = ?options.variant);
    run(table, service, options, run_id).instrument(span).await
}

async fn run(
    table: &mut Table,
    service: &dyn CompletionService,
    options: &RunOptions,
    run_id: Uuid,
) -> Result<RunSummary, PipelineError> {
    let started_at = Utc::now();
    let columns = prepare_columns(table, options);
    let title_col = table.require_column("title")?;
    let selftext_col = table.require_column("selftext")?;

    let classifier = Classifier::new(service, options.variant, options.policy, options.timeout);
    let progress = progress_bar(table.len(), options.show_progress);

    info!(
        "Labelling {} rows (policy={:?}, mode={:?})",
        table.len(),
        options.policy,
        options.mode
    );

    if table.is_empty() {
        warn!("Input table has no rows; nothing to label");
    }

    let mut classified = 0;
    let mut skipped = 0;
    let mut errors = 0;

    for row in 0..table.len() {
        progress.inc(1);

        if options.mode == WriteMode::Resume && table.is_filled(row, columns.label) {
            skipped += 1;
            continue;
        }

        let passage = build_passage(table.cell(row, title_col), table.cell(row, selftext_col));
        let result = match classifier.classify(&passage).await {
            Ok(result) => result,
            Err(source) => {
                progress.abandon();
                warn!("Aborting at row {row}: {source}");
                return Err(PipelineError::Aborted { row, source });
            }
        };

        if result.is_error() {
            errors += 1;
        }
        table.set(row, columns.label, Some(result.label));
        table.set(row, columns.rationale, Some(result.rationale));
        classified += 1;
    }

    progress.finish();

    let summary = RunSummary {
        run_id,
        variant: options.variant,
        total_rows: table.len(),
        classified,
        skipped,
        errors,
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        "Finished: {} classified, {} skipped, {} errors",
        summary.classified, summary.skipped, summary.errors
    );
    Ok(summary)
}

/// Makes sure both result columns exist and, in overwrite mode, hold no prior values.
///
/// Overwrite with `insert_at`: prior columns are dropped and fresh ones inserted at
/// `insert_at` / `insert_at + 1`. Otherwise existing columns stay where they are
/// and missing ones are appended.
fn prepare_columns(table: &mut Table, options: &RunOptions) -> ResultColumns {
    let profile = options.variant.profile();
    let (label_name, rationale_name) = (profile.label_column, profile.rationale_column);

    match (options.mode, options.insert_at) {
        (WriteMode::Overwrite, Some(at)) => {
            table.drop_column(label_name);
            table.drop_column(rationale_name);
            let label = table.insert_column(at, label_name);
            let rationale = table.insert_column(label + 1, rationale_name);
            ResultColumns { label, rationale }
        }
        (mode, insert_at) => {
            let label = ensure_column(table, label_name, insert_at);
            let rationale = ensure_column(table, rationale_name, insert_at.map(|_| label + 1));
            if mode == WriteMode::Overwrite {
                table.clear_column(label);
                table.clear_column(rationale);
            }
            ResultColumns { label, rationale }
        }
    }
}

fn ensure_column(table: &mut Table, name: &str, insert_at: Option<usize>) -> usize {
    match (table.column(name), insert_at) {
        (Some(idx), _) => idx,
        (None, Some(at)) => table.insert_column(at, name),
        (None, None) => table.append_column(name),
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}<{eta}]")
    {
        bar.set_style(style);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::labelling::parser::ERROR_LABEL;
    use crate::table::{load_table, save_table, SaveOutcome};

    /// Replies with a fixed string and counts calls.
    struct Fixed {
        reply: &'static str,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionService for Fixed {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.to_string())
        }
    }

    /// Fails on the n-th call (zero-based), succeeds otherwise.
    struct FailOn {
        n: usize,
        seen: Mutex<usize>,
    }

    #[async_trait]
    impl CompletionService for FailOn {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            let mut seen = self.seen.lock().unwrap();
            let current = *seen;
            *seen += 1;
            if current == self.n {
                Err(LlmError::EmptyContent)
            } else {
                Ok("Label: 1\nRationale: fine".into())
            }
        }
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn posts(extra_headers: &[&str], rows: Vec<Vec<Option<String>>>) -> Table {
        let mut headers = vec!["title".to_string(), "selftext".to_string()];
        headers.extend(extra_headers.iter().map(|h| h.to_string()));
        Table::new(headers, rows)
    }

    fn options(variant: Variant) -> RunOptions {
        RunOptions {
            show_progress: false,
            ..RunOptions::for_variant(variant, Duration::from_secs(120))
        }
    }

    #[tokio::test]
    async fn test_resume_skips_labelled_row_and_fills_the_rest() {
        let mut table = posts(
            &["llm_label", "rationales"],
            vec![
                vec![s("Meta bias"), None, None, None],
                vec![s("Musk tweets"), s("body"), s("1"), s("earlier run")],
                vec![s("Apple prices"), None, None, None],
            ],
        );
        let service = Fixed::new("Label: 0\nRationale: pricing only");

        let summary = label_table(&mut table, &service, &options(Variant::TechRelevance))
            .await
            .unwrap();

        assert_eq!(service.calls(), 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.classified, 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(1, 2), Some("1"));
        assert_eq!(table.cell(1, 3), Some("earlier run"));
        for row in [0, 2] {
            assert_eq!(table.cell(row, 2), Some("0"));
            assert_eq!(table.cell(row, 3), Some("pricing only"));
        }
        assert_eq!(table.cell(0, 0), Some("Meta bias"));
        assert_eq!(table.cell(2, 0), Some("Apple prices"));
    }

    #[tokio::test]
    async fn test_resume_creates_missing_result_columns() {
        let mut table = posts(&["score"], vec![vec![s("t"), None, s("5")]]);
        let service = Fixed::new("Label: 1\nRationale: yes");

        label_table(&mut table, &service, &options(Variant::TechRelevance))
            .await
            .unwrap();

        assert_eq!(
            table.headers(),
            ["title", "selftext", "score", "llm_label", "rationales"]
        );
        assert_eq!(table.cell(0, 3), Some("1"));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_prior_results_and_inserts_at_position() {
        let mut table = posts(
            &["a", "llm_label", "rationale"],
            vec![
                vec![s("x"), None, s("a0"), s("1"), s("old")],
                vec![s("y"), s("z"), s("a1"), None, None],
            ],
        );
        let service = Fixed::new("Label: 0\nRationale: new");
        let opts = RunOptions {
            insert_at: Some(1),
            ..options(Variant::PoliticalRelevance)
        };

        let summary = label_table(&mut table, &service, &opts).await.unwrap();

        assert_eq!(service.calls(), 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(
            table.headers(),
            ["title", "llm_label", "rationale", "selftext", "a"]
        );
        for row in 0..2 {
            assert_eq!(table.cell(row, 1), Some("0"));
            assert_eq!(table.cell(row, 2), Some("Rationale: new"));
        }
        assert_eq!(table.cell(1, 4), Some("a1"));
    }

    #[tokio::test]
    async fn test_political_default_position_clamps_to_table_width() {
        let mut table = posts(&[], vec![vec![s("x"), None]]);
        let service = Fixed::new("Label: 1");

        label_table(&mut table, &service, &options(Variant::PoliticalRelevance))
            .await
            .unwrap();

        assert_eq!(table.headers(), ["title", "selftext", "llm_label", "rationale"]);
        assert_eq!(table.cell(0, 2), Some("1"));
        assert_eq!(table.cell(0, 3), Some(""));
    }

    #[tokio::test]
    async fn test_sentiment_overwrites_existing_columns_in_place() {
        let mut table = posts(
            &["llm_sentiment", "llm_sentiment_rationale", "tail"],
            vec![vec![s("Bezos"), None, s("Positive"), s("old"), s("keep")]],
        );
        let service = Fixed::new("Sentiment Label: NEGATIVE\nRationale: backlash");

        label_table(&mut table, &service, &options(Variant::Sentiment))
            .await
            .unwrap();

        assert_eq!(service.calls(), 1);
        assert_eq!(table.cell(0, 2), Some("Negative"));
        assert_eq!(table.cell(0, 3), Some("backlash"));
        assert_eq!(table.cell(0, 4), Some("keep"));
    }

    #[tokio::test]
    async fn test_fail_soft_keeps_going_and_counts_sentinels() {
        let mut table = posts(&[], vec![vec![s("a"), None], vec![s("b"), None]]);
        let service = FailOn {
            n: 0,
            seen: Mutex::new(0),
        };

        let summary = label_table(&mut table, &service, &options(Variant::PoliticalRelevance))
            .await
            .unwrap();

        let label = table.require_column("llm_label").unwrap();
        let rationale = table.require_column("rationale").unwrap();
        assert_eq!(summary.errors, 1);
        assert_eq!(table.cell(0, label), Some(ERROR_LABEL));
        assert!(table.cell(0, rationale).unwrap().starts_with("API Error:"));
        assert_eq!(table.cell(1, label), Some("1"));
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_with_row_and_keeps_partial_results() {
        let mut table = posts(
            &[],
            vec![
                vec![s("a"), None],
                vec![s("b"), None],
                vec![s("c"), None],
            ],
        );
        let service = FailOn {
            n: 1,
            seen: Mutex::new(0),
        };

        let err = label_table(&mut table, &service, &options(Variant::TechRelevance))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Aborted {
                row: 1,
                source: LlmError::EmptyContent
            }
        ));
        assert_eq!(table.len(), 3);
        let label = table.require_column("llm_label").unwrap();
        assert_eq!(table.cell(0, label), Some("1"));
        assert_eq!(table.cell(1, label), None);
        assert_eq!(table.cell(2, label), None);
    }

    #[tokio::test]
    async fn test_rerun_after_abort_only_labels_remaining_rows() {
        let mut table = posts(&[], (0..4).map(|i| vec![s(&format!("p{i}")), None]).collect());
        let failing = FailOn {
            n: 2,
            seen: Mutex::new(0),
        };
        let opts = options(Variant::TechRelevance);
        assert!(label_table(&mut table, &failing, &opts).await.is_err());

        let service = Fixed::new("Label: 0\nRationale: second pass");
        let summary = label_table(&mut table, &service, &opts).await.unwrap();

        assert_eq!(service.calls(), 2);
        assert_eq!(summary.skipped, 2);
        let rationale = table.require_column("rationales").unwrap();
        assert_eq!(table.cell(0, rationale), Some("fine"));
        assert_eq!(table.cell(3, rationale), Some("second pass"));
    }

    #[tokio::test]
    async fn test_end_to_end_csv_in_xlsx_out() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("posts.csv");
        let output = dir.path().join("labelled.xlsx");
        std::fs::write(
            &input,
            "id,title,selftext,llm_label,rationales\n\
             1,Google ads,,,\n\
             2,Musk buys Twitter,funding,1,kept\n\
             3,Reddit pricing,\"api, costs\",,\n",
        )
        .unwrap();

        let mut table = load_table(&input).unwrap();
        let service = Fixed::new("Label: 1\nRationale: takes a side");
        let summary = label_table(&mut table, &service, &options(Variant::TechRelevance))
            .await
            .unwrap();
        let outcome = save_table(&table, &output).unwrap();

        assert_eq!(service.calls(), 2);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(outcome, SaveOutcome::Primary(output.clone()));

        let saved = load_table(&output).unwrap();
        assert_eq!(saved.len(), 3);
        let id = saved.require_column("id").unwrap();
        let label = saved.require_column("llm_label").unwrap();
        let rationale = saved.require_column("rationales").unwrap();
        let ids: Vec<_> = (0..3).map(|r| saved.cell(r, id)).collect();
        assert_eq!(ids, [Some("1"), Some("2"), Some("3")]);
        assert!((0..3).all(|r| saved.is_filled(r, label) && saved.is_filled(r, rationale)));
        assert_eq!(saved.cell(1, rationale), Some("kept"));
    }
}
