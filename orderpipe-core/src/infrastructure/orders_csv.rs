// orderpipe-core/src/infrastructure/orders_csv.rs

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::order::{CLEAN_COLUMNS, OrderRecord, RAW_COLUMNS, RawOrder};
use crate::error::PipelineError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// Reads the raw orders file into memory.
///
/// Fields are trimmed and empty cells become nulls. A missing or unreadable
/// file, or a header without the expected columns, is a source read error; a
/// cell that does not fit its column type is a parse error for that line.
#[instrument]
pub fn load_raw_orders(path: &Path) -> Result<Dataset<RawOrder>, PipelineError> {
    let file = File::open(path).map_err(|e| source_read(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| source_read(path, e))?.clone();
    if let Some(missing) = RAW_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(source_read(path, format!("missing column '{}'", missing)));
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| source_read(path, e))?;
        let line = record.position().map_or(0, |p| p.line());
        let mut order: RawOrder = record
            .deserialize(Some(&headers))
            .map_err(|e| parse_error(e, line, &headers, &record))?;
        order.line = line;
        records.push(order);
    }

    info!(rows = records.len(), "Loaded raw orders");
    Ok(Dataset::new(records))
}

/// Writes the cleaned dataset with its derived columns.
pub fn write_processed_orders(
    path: &Path,
    dataset: &Dataset<OrderRecord>,
) -> Result<(), PipelineError> {
    write_csv(path, &CLEAN_COLUMNS, dataset.records())?;
    info!(path = ?path, rows = dataset.len(), "Saved processed data");
    Ok(())
}

/// Serializes `rows` under an explicit header (written even when empty).
pub fn write_csv<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<(), InfrastructureError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))?;
    atomic_write(path, bytes)
}

fn source_read(path: &Path, reason: impl ToString) -> PipelineError {
    InfrastructureError::SourceRead {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
    .into()
}

fn parse_error(
    err: csv::Error,
    line: u64,
    headers: &StringRecord,
    record: &StringRecord,
) -> PipelineError {
    let (field, value, reason) = match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => {
            let index = de.field().map(|i| i as usize);
            (
                index
                    .and_then(|i| headers.get(i))
                    .unwrap_or("unknown")
                    .to_string(),
                index
                    .and_then(|i| record.get(i))
                    .unwrap_or_default()
                    .to_string(),
                de.kind().to_string(),
            )
        }
        _ => ("record".to_string(), String::new(), err.to_string()),
    };

    DomainError::Parse {
        line,
        field,
        value,
        reason,
    }
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::summary::ErrorKind;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "order_id,customer_id,product_id,customer_name,country,product_name,category,order_date,quantity,unit_price";

    #[test]
    fn test_load_raw_orders_reads_nulls() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("orders.csv");
        fs::write(
            &path,
            format!(
                "{}\n1,10,100,Alice,Germany,USB Cable,Electronics,2024-01-01,2,5.0\n,11, 101 ,,France,Mouse,Electronics,2024-01-02,,15\n",
                HEADER
            ),
        )?;

        let dataset = load_raw_orders(&path)?;
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.order_id, Some(1));
        assert_eq!(first.unit_price, Some(5.0));
        assert_eq!(first.line, 2);

        let second = &dataset.records()[1];
        assert_eq!(second.order_id, None);
        assert_eq!(second.product_id, Some(101));
        assert_eq!(second.customer_name, None);
        assert_eq!(second.quantity, None);
        assert_eq!(second.line, 3);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_source_read_error() {
        let err = load_raw_orders(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceRead);
    }

    #[test]
    fn test_missing_column_is_source_read_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("orders.csv");
        fs::write(&path, "order_id,customer_id\n1,10\n")?;

        let err = load_raw_orders(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceRead);
        assert!(err.to_string().contains("product_id"));
        Ok(())
    }

    #[test]
    fn test_bad_number_is_parse_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("orders.csv");
        fs::write(
            &path,
            format!(
                "{}\n1,10,100,Alice,Germany,USB Cable,Electronics,2024-01-01,two,5.0\n",
                HEADER
            ),
        )?;

        let err = load_raw_orders(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        let message = err.to_string();
        assert!(message.contains("quantity"));
        assert!(message.contains("two"));
        Ok(())
    }

    #[test]
    fn test_write_csv_keeps_header_when_empty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("processed").join("orders_clean.csv");

        write_processed_orders(&path, &Dataset::default())?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.trim_end(), CLEAN_COLUMNS.join(","));
        Ok(())
    }
}
