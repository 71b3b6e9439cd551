// orderpipe-core/src/application/pipeline.rs

use std::fmt;
use std::path::Path;
use tracing::{error, info, warn};

use crate::application::warehouse::{WAREHOUSE_TABLES, WarehouseLoader};
use crate::domain::configuration::PipelinePaths;
use crate::domain::quality::validate;
use crate::domain::summary::RunSummary;
use crate::domain::transform::transform;
use crate::error::PipelineError;
use crate::infrastructure::fs::write_json;
use crate::infrastructure::orders_csv::{load_raw_orders, write_processed_orders};
use crate::ports::connector::Connector;

/// Steps of a run, in execution order. `Failed` can follow any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Transforming,
    Validating,
    PersistingFile,
    CreatingSchema,
    LoadingDimensions,
    LoadingFacts,
    CollectingCounts,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Loading => "loading",
            PipelineStage::Transforming => "transforming",
            PipelineStage::Validating => "validating",
            PipelineStage::PersistingFile => "persisting_file",
            PipelineStage::CreatingSchema => "creating_schema",
            PipelineStage::LoadingDimensions => "loading_dimensions",
            PipelineStage::LoadingFacts => "loading_facts",
            PipelineStage::CollectingCounts => "collecting_counts",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything a run needs, built by the caller.
pub struct PipelineContext<'a> {
    pub connector: &'a dyn Connector,
    pub paths: &'a PipelinePaths,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after validation: no processed file, no warehouse access.
    pub dry_run: bool,
}

struct StageTracker {
    current: PipelineStage,
}

impl StageTracker {
    fn enter(&mut self, stage: PipelineStage) {
        self.current = stage;
        info!(stage = %stage, "Entering stage");
    }
}

/// Runs the batch end to end and persists exactly one run summary.
///
/// The summary is written on success and on failure. A step error is
/// recorded in the summary and then returned unchanged.
pub async fn run_pipeline(
    ctx: &PipelineContext<'_>,
    options: RunOptions,
) -> Result<RunSummary, PipelineError> {
    let mut summary = RunSummary::start(options.dry_run, &WAREHOUSE_TABLES);
    let mut tracker = StageTracker {
        current: PipelineStage::Loading,
    };

    info!(
        source = ?ctx.paths.raw_data,
        dry_run = options.dry_run,
        engine = ctx.connector.engine_name(),
        "Starting pipeline run"
    );

    match execute_steps(ctx, options, &mut summary, &mut tracker).await {
        Ok(()) => {
            tracker.enter(PipelineStage::Done);
            summary.succeed();
            write_json(&ctx.paths.summary, &summary)?;
            info!(summary = ?ctx.paths.summary, "Pipeline finished successfully");
            Ok(summary)
        }
        Err(e) => {
            let failed_at = tracker.current;
            tracker.enter(PipelineStage::Failed);
            error!(stage = %failed_at, kind = ?e.kind(), "Pipeline failed: {}", e);
            summary.fail(e.kind(), e.to_string());
            persist_failure(&ctx.paths.summary, &summary);
            Err(e)
        }
    }
}

/// Records a run that failed before the pipeline could start (e.g. the
/// warehouse could not be opened), so the summary file never keeps the
/// outcome of a previous run.
pub fn record_failed_run(
    paths: &PipelinePaths,
    options: RunOptions,
    err: &PipelineError,
) -> RunSummary {
    let mut summary = RunSummary::start(options.dry_run, &WAREHOUSE_TABLES);
    error!(kind = ?err.kind(), "Run aborted before start: {}", err);
    summary.fail(err.kind(), err.to_string());
    persist_failure(&paths.summary, &summary);
    summary
}

fn persist_failure(path: &Path, summary: &RunSummary) {
    if let Err(write_err) = write_json(path, summary) {
        warn!(summary = ?path, "Could not persist run summary: {}", write_err);
    }
}

async fn execute_steps(
    ctx: &PipelineContext<'_>,
    options: RunOptions,
    summary: &mut RunSummary,
    tracker: &mut StageTracker,
) -> Result<(), PipelineError> {
    tracker.enter(PipelineStage::Loading);
    let raw = load_raw_orders(&ctx.paths.raw_data)?;
    summary.raw_rows = Some(raw.len());

    tracker.enter(PipelineStage::Transforming);
    let clean = transform(raw)?;
    summary.clean_rows = Some(clean.len());

    tracker.enter(PipelineStage::Validating);
    validate(&clean)?;

    if options.dry_run {
        info!(rows = clean.len(), "Dry run: skipping file output and warehouse load");
        return Ok(());
    }

    tracker.enter(PipelineStage::PersistingFile);
    write_processed_orders(&ctx.paths.processed_data, &clean)?;

    tracker.enter(PipelineStage::CreatingSchema);
    WarehouseLoader::ensure_schema(ctx.connector).await?;

    tracker.enter(PipelineStage::LoadingDimensions);
    WarehouseLoader::load_dimensions(ctx.connector, &clean).await?;

    tracker.enter(PipelineStage::LoadingFacts);
    WarehouseLoader::load_fact(ctx.connector, &clean).await?;

    tracker.enter(PipelineStage::CollectingCounts);
    for table in WAREHOUSE_TABLES {
        let count = match WarehouseLoader::table_row_count(ctx.connector, table).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(table, "Row count unavailable: {}", e);
                None
            }
        };
        summary.record_count(table, count);
    }

    Ok(())
}
