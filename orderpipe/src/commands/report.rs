// orderpipe/src/commands/report.rs
//
// USE CASE: Write the revenue reports from the loaded warehouse.

use comfy_table::Table;
use std::path::PathBuf;

use orderpipe_core::application::generate_all_reports;
use orderpipe_core::application::reports::{
    revenue_by_country, revenue_by_month, top_products_by_revenue,
};

use super::{load_project, open_existing_warehouse};

pub async fn execute(project_dir: PathBuf, limit: Option<usize>) -> anyhow::Result<()> {
    let (config, paths) = load_project(&project_dir)?;
    let limit = limit.unwrap_or(config.top_products_limit);
    if limit == 0 {
        anyhow::bail!("--limit must be at least 1");
    }

    let connector = open_existing_warehouse(&paths)?;

    println!("📊 Generating reports in {}...", paths.reports_dir.display());
    let files = generate_all_reports(&connector, &paths.reports_dir, limit).await?;
    for path in [&files.top_products, &files.monthly, &files.country] {
        println!("   ✅ {}", path.display());
    }

    let mut top = Table::new();
    top.set_header(vec!["product_name", "category", "revenue"]);
    for row in top_products_by_revenue(&connector, limit).await? {
        top.add_row(vec![
            display(row.product_name),
            display(row.category),
            format!("{:.2}", row.revenue),
        ]);
    }
    println!("\nTop {} products by revenue\n{}", limit, top);

    let mut monthly = Table::new();
    monthly.set_header(vec!["year_month", "revenue"]);
    for row in revenue_by_month(&connector).await? {
        monthly.add_row(vec![row.year_month, format!("{:.2}", row.revenue)]);
    }
    println!("\nRevenue by month\n{}", monthly);

    let mut country = Table::new();
    country.set_header(vec!["country", "revenue"]);
    for row in revenue_by_country(&connector).await? {
        country.add_row(vec![display(row.country), format!("{:.2}", row.revenue)]);
    }
    println!("\nRevenue by country\n{}", country);

    Ok(())
}

fn display(value: Option<String>) -> String {
    value.unwrap_or_else(|| "NULL".to_string())
}
