// orderpipe-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::configuration::PipelineConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["orderpipe.yaml", "orderpipe.yml"];

#[instrument(skip(project_dir))]
pub fn load_pipeline_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    // 1. Main file, or defaults when the project has none
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading pipeline configuration");
            let content = fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&content)?
        }
        None => {
            info!(dir = ?project_dir, "No orderpipe.yaml found, using defaults");
            PipelineConfig::default()
        }
    };

    // 2. Override via environment (e.g. ORDERPIPE_WAREHOUSE_PATH=:memory:)
    apply_overrides(&mut config, |key| std::env::var(key).ok());

    // 3. Fail fast on nonsense values
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|filename| root.join(filename))
        .find(|p| p.exists())
}

fn apply_overrides<F>(config: &mut PipelineConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 4] = [
        ("ORDERPIPE_RAW_DATA_PATH", &mut config.raw_data_path),
        ("ORDERPIPE_WAREHOUSE_PATH", &mut config.warehouse_path),
        ("ORDERPIPE_REPORTS_DIR", &mut config.reports_dir),
        ("ORDERPIPE_SUMMARY_PATH", &mut config.summary_path),
    ];

    for (key, slot) in targets {
        if let Some(val) = lookup(key) {
            info!(key, old = ?slot, new = ?val, "Overriding config via ENV");
            *slot = val;
        }
    }
}
