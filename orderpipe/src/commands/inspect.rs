// orderpipe/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use comfy_table::Table;
use std::path::PathBuf;

use orderpipe_core::ports::connector::Connector;

use super::{load_project, open_existing_warehouse};

pub async fn execute(project_dir: PathBuf, table: String, limit: usize) -> anyhow::Result<()> {
    let (_, paths) = load_project(&project_dir)?;
    let connector = open_existing_warehouse(&paths)?;

    let columns = connector.fetch_columns(&table).await?;
    if columns.is_empty() {
        anyhow::bail!("❌ Table '{}' not found in {}", table, paths.warehouse);
    }

    println!("\n🔍 Inspecting Table: '{}'", table);

    let mut schema = Table::new();
    schema.set_header(vec!["column", "type", "nullable"]);
    for col in &columns {
        schema.add_row(vec![
            col.name.clone(),
            col.data_type.clone(),
            col.is_nullable.to_string(),
        ]);
    }
    println!("{}", schema);

    let rows = connector
        .fetch_rows(&format!(
            "SELECT * FROM \"{}\" LIMIT {}",
            table.replace('"', "\"\""),
            limit
        ))
        .await?;

    println!("   --- Rows (Limit {}) ---", limit);
    let mut sample = Table::new();
    sample.set_header(columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>());
    for row in rows {
        sample.add_row(row.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    }
    println!("{}", sample);

    Ok(())
}
