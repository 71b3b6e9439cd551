// orderpipe/src/commands/mod.rs

pub mod inspect;
pub mod report;
pub mod run;

use anyhow::Context;
use std::path::Path;

use orderpipe_core::domain::configuration::IN_MEMORY_WAREHOUSE;
use orderpipe_core::infrastructure::adapters::duckdb::DuckDBConnector;
use orderpipe_core::infrastructure::config::{PipelineConfig, PipelinePaths, load_pipeline_config};

/// Loads `orderpipe.yaml` (or defaults) and resolves every path against `project_dir`.
pub fn load_project(project_dir: &Path) -> anyhow::Result<(PipelineConfig, PipelinePaths)> {
    let config = load_pipeline_config(project_dir).with_context(|| {
        format!(
            "Failed to load pipeline configuration from {:?}",
            project_dir
        )
    })?;
    let paths = config.resolve(project_dir);
    Ok((config, paths))
}

/// Opens an existing warehouse. Never creates one.
pub fn open_existing_warehouse(paths: &PipelinePaths) -> anyhow::Result<DuckDBConnector> {
    if paths.warehouse != IN_MEMORY_WAREHOUSE && !Path::new(&paths.warehouse).exists() {
        anyhow::bail!(
            "❌ Warehouse not found at: {}\n👉 Have you run 'orderpipe run'?",
            paths.warehouse
        );
    }
    DuckDBConnector::new(&paths.warehouse)
        .with_context(|| format!("Failed to open DuckDB at {}", paths.warehouse))
}
