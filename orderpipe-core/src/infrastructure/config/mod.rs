pub mod project;

pub use crate::domain::configuration::{PipelineConfig, PipelinePaths};
pub use project::load_pipeline_config;
