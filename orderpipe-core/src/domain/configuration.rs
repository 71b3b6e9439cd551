// orderpipe-core/src/domain/configuration.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

pub const IN_MEMORY_WAREHOUSE: &str = ":memory:";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "kebab-case")]
pub struct PipelineConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[validate(length(min = 1, message = "raw-data-path cannot be empty"))]
    #[serde(default = "default_raw_data_path")]
    pub raw_data_path: String,

    #[validate(length(min = 1, message = "processed-data-path cannot be empty"))]
    #[serde(default = "default_processed_data_path")]
    pub processed_data_path: String,

    #[validate(length(min = 1, message = "warehouse-path cannot be empty"))]
    #[serde(default = "default_warehouse_path")]
    pub warehouse_path: String,

    #[validate(length(min = 1, message = "reports-dir cannot be empty"))]
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,

    #[validate(length(min = 1, message = "summary-path cannot be empty"))]
    #[serde(default = "default_summary_path")]
    pub summary_path: String,

    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_top_products_limit")]
    pub top_products_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            raw_data_path: default_raw_data_path(),
            processed_data_path: default_processed_data_path(),
            warehouse_path: default_warehouse_path(),
            reports_dir: default_reports_dir(),
            summary_path: default_summary_path(),
            top_products_limit: default_top_products_limit(),
        }
    }
}

/// Absolute locations for one run, resolved against the project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePaths {
    pub raw_data: PathBuf,
    pub processed_data: PathBuf,
    /// Kept as a string so `:memory:` passes through untouched.
    pub warehouse: String,
    pub reports_dir: PathBuf,
    pub summary: PathBuf,
}

impl PipelineConfig {
    pub fn resolve(&self, project_dir: &Path) -> PipelinePaths {
        let warehouse = if self.warehouse_path == IN_MEMORY_WAREHOUSE {
            self.warehouse_path.clone()
        } else {
            join(project_dir, &self.warehouse_path)
                .to_string_lossy()
                .into_owned()
        };

        PipelinePaths {
            raw_data: join(project_dir, &self.raw_data_path),
            processed_data: join(project_dir, &self.processed_data_path),
            warehouse,
            reports_dir: join(project_dir, &self.reports_dir),
            summary: join(project_dir, &self.summary_path),
        }
    }
}

fn join(root: &Path, rel: &str) -> PathBuf {
    let path = Path::new(rel);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn default_name() -> String {
    "orderpipe".to_string()
}
fn default_raw_data_path() -> String {
    "data/raw/orders_raw.csv".to_string()
}
fn default_processed_data_path() -> String {
    "data/processed/orders_clean.csv".to_string()
}
fn default_warehouse_path() -> String {
    "warehouse.duckdb".to_string()
}
fn default_reports_dir() -> String {
    "reports".to_string()
}
fn default_summary_path() -> String {
    "logs/run_summary.json".to_string()
}
fn default_top_products_limit() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_memory() {
        let config = PipelineConfig {
            warehouse_path: IN_MEMORY_WAREHOUSE.into(),
            ..Default::default()
        };
        let paths = config.resolve(Path::new("/srv/shop"));

        assert_eq!(
            paths.raw_data,
            PathBuf::from("/srv/shop/data/raw/orders_raw.csv")
        );
        assert_eq!(paths.summary, PathBuf::from("/srv/shop/logs/run_summary.json"));
        assert_eq!(paths.warehouse, ":memory:");
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let config = PipelineConfig {
            reports_dir: "/tmp/reports".into(),
            ..Default::default()
        };
        let paths = config.resolve(Path::new("/srv/shop"));
        assert_eq!(paths.reports_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(paths.warehouse, "/srv/shop/warehouse.duckdb");
    }

    #[test]
    fn test_limit_out_of_range_is_rejected() {
        let config = PipelineConfig {
            top_products_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
