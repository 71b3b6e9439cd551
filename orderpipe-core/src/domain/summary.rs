// orderpipe-core/src/domain/summary.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Failed,
}

/// Coarse error category recorded in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SourceRead,
    Parse,
    Validation,
    Store,
    Config,
    Io,
    Internal,
}

/// One record per pipeline invocation, persisted as JSON when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at_utc: DateTime<Utc>,
    pub finished_at_utc: Option<DateTime<Utc>>,
    pub dry_run: bool,
    /// `None` while the run is in flight; set once when it ends.
    pub status: Option<RunStatus>,
    pub error_kind: Option<ErrorKind>,
    pub error_message: Option<String>,
    pub raw_rows: Option<usize>,
    pub clean_rows: Option<usize>,
    pub table_counts: BTreeMap<String, Option<u64>>,
}

impl RunSummary {
    pub fn start(dry_run: bool, tables: &[&str]) -> Self {
        Self {
            started_at_utc: Utc::now(),
            finished_at_utc: None,
            dry_run,
            status: None,
            error_kind: None,
            error_message: None,
            raw_rows: None,
            clean_rows: None,
            table_counts: tables.iter().map(|t| (t.to_string(), None)).collect(),
        }
    }

    pub fn succeed(&mut self) {
        self.status = Some(RunStatus::Success);
        self.finished_at_utc = Some(Utc::now());
    }

    pub fn fail(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.status = Some(RunStatus::Failed);
        self.error_kind = Some(kind);
        self.error_message = Some(message.into());
        self.finished_at_utc = Some(Utc::now());
    }

    pub fn record_count(&mut self, table: &str, count: Option<u64>) {
        self.table_counts.insert(table.to_string(), count);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_summary_json_shape() -> Result<()> {
        let mut summary = RunSummary::start(true, &["dim_customers", "fact_orders"]);
        summary.raw_rows = Some(4);
        summary.clean_rows = Some(3);
        summary.fail(ErrorKind::Validation, "1 rows with non-positive quantity");

        let json = serde_json::to_value(&summary)?;
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error_kind"], "validation");
        assert_eq!(json["raw_rows"], 4);
        assert_eq!(json["clean_rows"], 3);
        assert!(json["table_counts"]["fact_orders"].is_null());
        assert!(json["started_at_utc"].as_str().unwrap().contains('T'));
        Ok(())
    }

    #[test]
    fn test_success_keeps_error_fields_empty() {
        let mut summary = RunSummary::start(false, &["fact_orders"]);
        summary.record_count("fact_orders", Some(12));
        summary.succeed();

        assert_eq!(summary.status, Some(RunStatus::Success));
        assert!(summary.error_message.is_none());
        assert!(summary.finished_at_utc.is_some());
        assert_eq!(summary.table_counts["fact_orders"], Some(12));
    }

    #[test]
    fn test_status_is_only_set_when_run_ends() -> Result<()> {
        let summary = RunSummary::start(false, &["fact_orders"]);
        assert_eq!(summary.status, None);

        let mut failed = summary.clone();
        failed.fail(ErrorKind::Store, "lock held");
        assert_eq!(serde_json::to_value(&failed)?["status"], "failed");

        let mut succeeded = summary;
        succeeded.succeed();
        assert_eq!(serde_json::to_value(&succeeded)?["status"], "success");
        Ok(())
    }
}
