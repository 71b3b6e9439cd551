// orderpipe-core/src/application/mod.rs

pub mod pipeline;
pub mod reports;
pub mod warehouse;

// Facade for the CLI: `use orderpipe_core::application::{run_pipeline, WarehouseLoader};`
pub use pipeline::{PipelineContext, PipelineStage, RunOptions, record_failed_run, run_pipeline};
pub use reports::{ReportFiles, generate_all_reports};
pub use warehouse::{WAREHOUSE_TABLES, WarehouseLoader};
