// orderpipe-core/src/application/warehouse.rs

use tracing::{info, instrument};

use crate::domain::dataset::Dataset;
use crate::domain::order::OrderRecord;
use crate::error::PipelineError;
use crate::ports::connector::{CellValue, Connector};

pub const DIM_CUSTOMERS: &str = "dim_customers";
pub const DIM_PRODUCTS: &str = "dim_products";
pub const FACT_ORDERS: &str = "fact_orders";

/// Star schema tables, in load order.
pub const WAREHOUSE_TABLES: [&str; 3] = [DIM_CUSTOMERS, DIM_PRODUCTS, FACT_ORDERS];

const DIM_CUSTOMERS_DDL: &str = "CREATE TABLE IF NOT EXISTS dim_customers (
    customer_id BIGINT PRIMARY KEY,
    customer_name VARCHAR,
    country VARCHAR
)";

const DIM_PRODUCTS_DDL: &str = "CREATE TABLE IF NOT EXISTS dim_products (
    product_id BIGINT PRIMARY KEY,
    product_name VARCHAR,
    category VARCHAR
)";

// customer_id / product_id reference the dimensions, but the keys are not
// declared: dimensions are dropped and rebuilt while fact rows still exist.
const FACT_ORDERS_DDL: &str = "CREATE TABLE IF NOT EXISTS fact_orders (
    order_id BIGINT PRIMARY KEY,
    customer_id BIGINT,
    product_id BIGINT,
    order_date DATE,
    quantity BIGINT,
    unit_price DOUBLE,
    total_amount DOUBLE
)";

const CUSTOMER_COLUMNS: [&str; 3] = ["customer_id", "customer_name", "country"];
const PRODUCT_COLUMNS: [&str; 3] = ["product_id", "product_name", "category"];
const FACT_COLUMNS: [&str; 7] = [
    "order_id",
    "customer_id",
    "product_id",
    "order_date",
    "quantity",
    "unit_price",
    "total_amount",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DimensionCounts {
    pub customers: u64,
    pub products: u64,
}

/// Full-refresh loader for the star schema. Every load drops the target
/// table and repopulates it; nothing spans the two steps, so a concurrent
/// reader can see an empty table.
pub struct WarehouseLoader;

impl WarehouseLoader {
    /// Creates the three tables when absent. Existing tables and rows are left alone.
    #[instrument(skip(connector), fields(engine = connector.engine_name()))]
    pub async fn ensure_schema(connector: &dyn Connector) -> Result<(), PipelineError> {
        for ddl in [DIM_CUSTOMERS_DDL, DIM_PRODUCTS_DDL, FACT_ORDERS_DDL] {
            connector.execute(ddl).await?;
        }
        Ok(())
    }

    pub async fn load_dimensions(
        connector: &dyn Connector,
        dataset: &Dataset<OrderRecord>,
    ) -> Result<DimensionCounts, PipelineError> {
        let customers: Vec<Vec<CellValue>> = dataset
            .customer_dimension()
            .into_iter()
            .map(|c| vec![c.customer_id.into(), c.customer_name.into(), c.country.into()])
            .collect();
        let products: Vec<Vec<CellValue>> = dataset
            .product_dimension()
            .into_iter()
            .map(|p| vec![p.product_id.into(), p.product_name.into(), p.category.into()])
            .collect();

        let customers = replace_table(
            connector,
            DIM_CUSTOMERS,
            DIM_CUSTOMERS_DDL,
            &CUSTOMER_COLUMNS,
            customers,
        )
        .await?;
        let products = replace_table(
            connector,
            DIM_PRODUCTS,
            DIM_PRODUCTS_DDL,
            &PRODUCT_COLUMNS,
            products,
        )
        .await?;

        Ok(DimensionCounts {
            customers,
            products,
        })
    }

    pub async fn load_fact(
        connector: &dyn Connector,
        dataset: &Dataset<OrderRecord>,
    ) -> Result<u64, PipelineError> {
        let rows: Vec<Vec<CellValue>> = dataset
            .iter()
            .map(|o| {
                vec![
                    o.order_id.into(),
                    o.customer_id.into(),
                    o.product_id.into(),
                    o.order_date.into(),
                    o.quantity.into(),
                    o.unit_price.into(),
                    o.total_amount.into(),
                ]
            })
            .collect();

        replace_table(connector, FACT_ORDERS, FACT_ORDERS_DDL, &FACT_COLUMNS, rows).await
    }

    pub async fn table_row_count(
        connector: &dyn Connector,
        table: &str,
    ) -> Result<u64, PipelineError> {
        connector
            .query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", table))
            .await
    }
}

async fn replace_table(
    connector: &dyn Connector,
    table: &str,
    ddl: &str,
    columns: &[&str],
    rows: Vec<Vec<CellValue>>,
) -> Result<u64, PipelineError> {
    connector
        .execute(&format!("DROP TABLE IF EXISTS \"{}\"", table))
        .await?;
    connector.execute(ddl).await?;
    let written = connector.insert_rows(table, columns, rows).await?;
    info!(table, rows = written, "Replaced table contents");
    Ok(written)
}
