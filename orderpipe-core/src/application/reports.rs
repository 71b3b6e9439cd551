// orderpipe-core/src/application/reports.rs

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::PipelineError;
use crate::infrastructure::orders_csv::write_csv;
use crate::ports::connector::{CellValue, Connector};

pub const TOP_PRODUCTS_FILE: &str = "top_products_by_revenue.csv";
pub const MONTHLY_REVENUE_FILE: &str = "revenue_by_month.csv";
pub const COUNTRY_REVENUE_FILE: &str = "revenue_by_country.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub year_month: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRevenue {
    pub country: Option<String>,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportFiles {
    pub top_products: PathBuf,
    pub monthly: PathBuf,
    pub country: PathBuf,
}

pub async fn top_products_by_revenue(
    connector: &dyn Connector,
    limit: usize,
) -> Result<Vec<ProductRevenue>, PipelineError> {
    let query = format!(
        "SELECT p.product_name, p.category, SUM(f.total_amount) AS revenue
         FROM fact_orders f
         JOIN dim_products p ON f.product_id = p.product_id
         GROUP BY p.product_name, p.category
         ORDER BY revenue DESC, p.product_name
         LIMIT {}",
        limit
    );

    connector
        .fetch_rows(&query)
        .await?
        .iter()
        .map(|row| {
            Ok(ProductRevenue {
                product_name: cell(row, 0)?.as_text(),
                category: cell(row, 1)?.as_text(),
                revenue: number(row, 2)?,
            })
        })
        .collect()
}

pub async fn revenue_by_month(
    connector: &dyn Connector,
) -> Result<Vec<MonthlyRevenue>, PipelineError> {
    let query = "SELECT strftime(order_date, '%Y-%m') AS year_month, SUM(total_amount) AS revenue
         FROM fact_orders
         GROUP BY year_month
         ORDER BY year_month";

    connector
        .fetch_rows(query)
        .await?
        .iter()
        .map(|row| {
            Ok(MonthlyRevenue {
                year_month: cell(row, 0)?.as_text().unwrap_or_default(),
                revenue: number(row, 1)?,
            })
        })
        .collect()
}

pub async fn revenue_by_country(
    connector: &dyn Connector,
) -> Result<Vec<CountryRevenue>, PipelineError> {
    let query = "SELECT c.country, SUM(f.total_amount) AS revenue
         FROM fact_orders f
         JOIN dim_customers c ON f.customer_id = c.customer_id
         GROUP BY c.country
         ORDER BY revenue DESC, c.country";

    connector
        .fetch_rows(query)
        .await?
        .iter()
        .map(|row| {
            Ok(CountryRevenue {
                country: cell(row, 0)?.as_text(),
                revenue: number(row, 1)?,
            })
        })
        .collect()
}

/// Writes the three CSV reports under `reports_dir` (created if needed).
pub async fn generate_all_reports(
    connector: &dyn Connector,
    reports_dir: &Path,
    limit: usize,
) -> Result<ReportFiles, PipelineError> {
    info!(dir = ?reports_dir, limit, "Generating analytics reports");

    let files = ReportFiles {
        top_products: reports_dir.join(TOP_PRODUCTS_FILE),
        monthly: reports_dir.join(MONTHLY_REVENUE_FILE),
        country: reports_dir.join(COUNTRY_REVENUE_FILE),
    };

    let top = top_products_by_revenue(connector, limit).await?;
    write_csv(
        &files.top_products,
        &["product_name", "category", "revenue"],
        &top,
    )?;
    info!(path = ?files.top_products, "Wrote report");

    let monthly = revenue_by_month(connector).await?;
    write_csv(&files.monthly, &["year_month", "revenue"], &monthly)?;
    info!(path = ?files.monthly, "Wrote report");

    let country = revenue_by_country(connector).await?;
    write_csv(&files.country, &["country", "revenue"], &country)?;
    info!(path = ?files.country, "Wrote report");

    Ok(files)
}

fn cell(row: &[CellValue], index: usize) -> Result<&CellValue, PipelineError> {
    row.get(index).ok_or_else(|| {
        PipelineError::InternalError(format!(
            "Report row has {} columns, expected at least {}",
            row.len(),
            index + 1
        ))
    })
}

fn number(row: &[CellValue], index: usize) -> Result<f64, PipelineError> {
    let value = cell(row, index)?;
    match value {
        CellValue::Null => Ok(0.0),
        other => other.as_f64().ok_or_else(|| {
            PipelineError::InternalError(format!("Expected a number, got {:?}", other))
        }),
    }
}
