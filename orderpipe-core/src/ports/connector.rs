// orderpipe-core/src/ports/connector.rs

// What the application needs from a relational store, without knowing which
// engine sits behind it.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::PipelineError;

#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

/// Engine-neutral cell value, used both to bind inserts and to read results.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Text rendering, `None` for SQL NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Int(v) => Some(v.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("NULL"),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<Option<String>> for CellValue {
    fn from(v: Option<String>) -> Self {
        v.map_or(CellValue::Null, CellValue::Text)
    }
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn execute(&self, query: &str) -> Result<(), PipelineError>;

    /// Inserts every row into `table`, in order. Returns the number of rows written.
    async fn insert_rows(
        &self,
        table: &str,
        columns: &[&str],
        rows: Vec<Vec<CellValue>>,
    ) -> Result<u64, PipelineError>;

    async fn query_scalar(&self, query: &str) -> Result<u64, PipelineError>;

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<CellValue>>, PipelineError>;

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, PipelineError>;

    fn engine_name(&self) -> &str;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every statement it receives. Fails on demand when a statement
    /// contains `fail_on`.
    #[derive(Clone, Default)]
    pub struct MockConnector {
        pub executed_queries: Arc<Mutex<Vec<String>>>,
        pub inserted: Arc<Mutex<Vec<(String, usize)>>>,
        pub fail_on: Option<String>,
    }

    impl MockConnector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(pattern: &str) -> Self {
            Self {
                fail_on: Some(pattern.to_string()),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.executed_queries.lock().unwrap().len() + self.inserted.lock().unwrap().len()
        }

        fn check(&self, statement: &str) -> Result<(), PipelineError> {
            match &self.fail_on {
                Some(pattern) if statement.contains(pattern.as_str()) => Err(
                    PipelineError::InternalError(format!("mock failure on {}", statement)),
                ),
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn execute(&self, query: &str) -> Result<(), PipelineError> {
            self.executed_queries
                .lock()
                .unwrap()
                .push(query.to_string());
            self.check(query)
        }

        async fn insert_rows(
            &self,
            table: &str,
            _columns: &[&str],
            rows: Vec<Vec<CellValue>>,
        ) -> Result<u64, PipelineError> {
            self.inserted
                .lock()
                .unwrap()
                .push((table.to_string(), rows.len()));
            self.check(&format!("INSERT INTO {}", table))?;
            Ok(rows.len() as u64)
        }

        async fn query_scalar(&self, query: &str) -> Result<u64, PipelineError> {
            self.executed_queries
                .lock()
                .unwrap()
                .push(query.to_string());
            self.check(query)?;
            Ok(0)
        }

        async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<CellValue>>, PipelineError> {
            self.executed_queries
                .lock()
                .unwrap()
                .push(query.to_string());
            self.check(query)?;
            Ok(vec![])
        }

        async fn fetch_columns(
            &self,
            _table_name: &str,
        ) -> Result<Vec<ColumnSchema>, PipelineError> {
            Ok(vec![])
        }

        fn engine_name(&self) -> &str {
            "mock"
        }
    }
}
