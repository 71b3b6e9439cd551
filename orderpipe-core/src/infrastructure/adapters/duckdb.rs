// orderpipe-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use duckdb::types::Value;
use duckdb::{Config, Connection, params_from_iter};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::domain::configuration::IN_MEMORY_WAREHOUSE;
use crate::error::PipelineError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{CellValue, ColumnSchema, Connector};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == IN_MEMORY_WAREHOUSE {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PipelineError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), PipelineError> {
        let conn = self.lock()?;
        conn.execute_batch(query)?;
        Ok(())
    }

    async fn insert_rows(
        &self,
        table: &str,
        columns: &[&str],
        rows: Vec<Vec<CellValue>>,
    ) -> Result<u64, PipelineError> {
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        );

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut written = 0u64;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in &rows {
                stmt.execute(params_from_iter(row.iter().map(to_duckdb_value)))?;
                written += 1;
            }
        }
        tx.commit()?;

        debug!(table, rows = written, "Inserted rows");
        Ok(written)
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, PipelineError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let row = rows
            .next()?
            .ok_or_else(|| PipelineError::InternalError("No scalar value returned".into()))?;

        let value: i64 = row.get(0)?;
        u64::try_from(value).map_err(|_| {
            PipelineError::InternalError(format!("Negative scalar value returned: {}", value))
        })
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<CellValue>>, PipelineError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                let value: Value = row.get(i)?;
                cells.push(from_duckdb_value(value));
            }
            out.push(cells);
        }
        Ok(out)
    }

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, PipelineError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "PRAGMA table_info('{}')",
            table_name.replace('\'', "''")
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: !row.get::<_, bool>("notnull")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

fn to_duckdb_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Int(v) => Value::BigInt(*v),
        CellValue::Float(v) => Value::Double(*v),
        CellValue::Text(s) => Value::Text(s.clone()),
        // Bound as ISO text; DuckDB casts it to the DATE column type.
        CellValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
    }
}

fn from_duckdb_value(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Boolean(b) => CellValue::Int(i64::from(b)),
        Value::TinyInt(v) => CellValue::Int(v.into()),
        Value::SmallInt(v) => CellValue::Int(v.into()),
        Value::Int(v) => CellValue::Int(v.into()),
        Value::BigInt(v) => CellValue::Int(v),
        Value::UTinyInt(v) => CellValue::Int(v.into()),
        Value::USmallInt(v) => CellValue::Int(v.into()),
        Value::UInt(v) => CellValue::Int(v.into()),
        Value::HugeInt(v) => i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int),
        Value::UBigInt(v) => i64::try_from(v).map_or(CellValue::Float(v as f64), CellValue::Int),
        Value::Float(v) => CellValue::Float(v.into()),
        Value::Double(v) => CellValue::Float(v),
        Value::Text(s) => CellValue::Text(s),
        Value::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days.into())))
            .map_or(CellValue::Int(days.into()), CellValue::Date),
        other => CellValue::Text(format!("{:?}", other)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_duckdb_flow() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;

        connector
            .execute("CREATE TABLE users (id BIGINT, name VARCHAR, joined DATE)")
            .await?;

        let columns = connector.fetch_columns("users").await?;
        assert_eq!(columns.len(), 3);
        let name_col = columns
            .iter()
            .find(|c| c.name == "name")
            .ok_or_else(|| anyhow::anyhow!("Column 'name' not found"))?;
        assert_eq!(name_col.data_type, "VARCHAR");

        let joined = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let written = connector
            .insert_rows(
                "users",
                &["id", "name", "joined"],
                vec![
                    vec![
                        CellValue::Int(1),
                        Some("Alice".to_string()).into(),
                        joined.into(),
                    ],
                    vec![CellValue::Int(2), CellValue::Null, joined.into()],
                ],
            )
            .await?;
        assert_eq!(written, 2);

        let count = connector.query_scalar("SELECT count(*) FROM users").await?;
        assert_eq!(count, 2);

        let rows = connector
            .fetch_rows("SELECT id, name, joined FROM users ORDER BY id")
            .await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], CellValue::Text("Alice".into()));
        assert_eq!(rows[0][2], CellValue::Date(joined));
        assert_eq!(rows[1][1], CellValue::Null);
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_error() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let result = connector.execute("SELECT * FROM non_existent_table").await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_primary_key_violation_surfaces() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute("CREATE TABLE t (id BIGINT PRIMARY KEY)")
            .await?;
        let err = connector
            .insert_rows("t", &["id"], vec![vec![CellValue::Int(1)], vec![CellValue::Int(1)]])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::domain::summary::ErrorKind::Store);
        Ok(())
    }
}
