// orderpipe/src/commands/run.rs
//
// USE CASE: Run the pipeline once.

use std::path::{Path, PathBuf};
use tracing::{error, info};

use orderpipe_core::PipelineError;
use orderpipe_core::application::{PipelineContext, RunOptions, record_failed_run, run_pipeline};
use orderpipe_core::domain::configuration::IN_MEMORY_WAREHOUSE;
use orderpipe_core::infrastructure::adapters::duckdb::DuckDBConnector;
use orderpipe_core::infrastructure::fs::ensure_parent_dir;

use super::load_project;

pub async fn execute(project_dir: PathBuf, dry_run: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    println!("⚙️  Loading configuration...");
    let (config, paths) = load_project(&project_dir)?;
    println!("   Project: {}", config.name);

    // A dry run never opens the warehouse file.
    let db_path = if dry_run {
        IN_MEMORY_WAREHOUSE
    } else {
        paths.warehouse.as_str()
    };
    let options = RunOptions { dry_run };
    info!(warehouse = db_path, dry_run, "Opening warehouse");
    let connector = match open_warehouse(db_path) {
        Ok(connector) => connector,
        Err(e) => {
            // No pipeline run to record the failure.
            record_failed_run(&paths, options, &e);
            abort(e);
        }
    };

    let ctx = PipelineContext {
        connector: &connector,
        paths: &paths,
    };

    match run_pipeline(&ctx, options).await {
        Ok(summary) => {
            if dry_run {
                println!(
                    "\n✨ DRY RUN OK: {} clean rows validated in {:.2?}",
                    summary.clean_rows.unwrap_or_default(),
                    start.elapsed()
                );
            } else {
                println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
                for (table, count) in &summary.table_counts {
                    match count {
                        Some(n) => println!("   {}: {} rows", table, n),
                        None => println!("   {}: count unavailable", table),
                    }
                }
            }
            println!("   Summary: {}", paths.summary.display());
        }
        Err(e) => abort(e),
    }

    Ok(())
}

fn open_warehouse(db_path: &str) -> Result<DuckDBConnector, PipelineError> {
    if db_path != IN_MEMORY_WAREHOUSE {
        ensure_parent_dir(Path::new(db_path))?;
    }
    Ok(DuckDBConnector::new(db_path)?)
}

fn abort(e: PipelineError) -> ! {
    error!(kind = ?e.kind(), "Run failed");
    eprintln!("\n💥 PIPELINE FAILED [{:?}]: {}", e.kind(), e);
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(1);
}
