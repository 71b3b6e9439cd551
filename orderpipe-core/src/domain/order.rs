// orderpipe-core/src/domain/order.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::dataset::Dataset;

/// Columns every raw input file must carry (header row).
pub const RAW_COLUMNS: [&str; 10] = [
    "order_id",
    "customer_id",
    "product_id",
    "customer_name",
    "country",
    "product_name",
    "category",
    "order_date",
    "quantity",
    "unit_price",
];

/// Columns of the processed file, in output order.
pub const CLEAN_COLUMNS: [&str; 13] = [
    "order_id",
    "customer_id",
    "product_id",
    "customer_name",
    "country",
    "product_name",
    "category",
    "order_date",
    "quantity",
    "unit_price",
    "total_amount",
    "order_year",
    "order_month",
];

/// The minimal view the quality rules need over a record.
pub trait OrderFacts {
    const COLUMNS: &'static [&'static str];

    fn order_id(&self) -> Option<i64>;
    fn quantity(&self) -> Option<i64>;
    fn unit_price(&self) -> Option<f64>;
}

/// One row of the raw file, as read. Nothing is guaranteed present.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawOrder {
    /// 1-based line in the source file (0 when built in memory).
    #[serde(skip)]
    pub line: u64,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub product_id: Option<i64>,
    pub customer_name: Option<String>,
    pub country: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub order_date: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
}

impl OrderFacts for RawOrder {
    const COLUMNS: &'static [&'static str] = &RAW_COLUMNS;

    fn order_id(&self) -> Option<i64> {
        self.order_id
    }

    fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }
}

/// A cleaned, enriched order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub customer_name: Option<String>,
    pub country: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub order_date: NaiveDate,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub order_year: i32,
    pub order_month: u32,
}

impl OrderFacts for OrderRecord {
    const COLUMNS: &'static [&'static str] = &CLEAN_COLUMNS;

    fn order_id(&self) -> Option<i64> {
        Some(self.order_id)
    }

    fn quantity(&self) -> Option<i64> {
        Some(self.quantity)
    }

    fn unit_price(&self) -> Option<f64> {
        Some(self.unit_price)
    }
}

impl From<&OrderRecord> for RawOrder {
    fn from(order: &OrderRecord) -> Self {
        RawOrder {
            line: 0,
            order_id: Some(order.order_id),
            customer_id: Some(order.customer_id),
            product_id: Some(order.product_id),
            customer_name: order.customer_name.clone(),
            country: order.country.clone(),
            product_name: order.product_name.clone(),
            category: order.category.clone(),
            order_date: Some(order.order_date.format("%Y-%m-%d").to_string()),
            quantity: Some(order.quantity),
            unit_price: Some(order.unit_price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerDim {
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductDim {
    pub product_id: i64,
    pub product_name: Option<String>,
    pub category: Option<String>,
}

impl Dataset<OrderRecord> {
    /// Distinct `(customer_id, customer_name, country)` tuples, first-seen order.
    pub fn customer_dimension(&self) -> Vec<CustomerDim> {
        distinct(self.iter().map(|o| CustomerDim {
            customer_id: o.customer_id,
            customer_name: o.customer_name.clone(),
            country: o.country.clone(),
        }))
    }

    /// Distinct `(product_id, product_name, category)` tuples, first-seen order.
    pub fn product_dimension(&self) -> Vec<ProductDim> {
        distinct(self.iter().map(|o| ProductDim {
            product_id: o.product_id,
            product_name: o.product_name.clone(),
            category: o.category.clone(),
        }))
    }
}

fn distinct<T: Clone + Eq + std::hash::Hash>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn order(id: i64, customer: (i64, &str, &str), product: (i64, &str)) -> OrderRecord {
        OrderRecord {
            order_id: id,
            customer_id: customer.0,
            product_id: product.0,
            customer_name: Some(customer.1.into()),
            country: Some(customer.2.into()),
            product_name: Some(product.1.into()),
            category: Some("Electronics".into()),
            order_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            quantity: 1,
            unit_price: 1.0,
            total_amount: 1.0,
            order_year: 2024,
            order_month: 1,
        }
    }

    #[test]
    fn test_dimensions_are_distinct_projections() {
        let dataset = Dataset::new(vec![
            order(1, (10, "Alice", "Germany"), (100, "USB Cable")),
            order(2, (11, "Bob", "France"), (100, "USB Cable")),
            order(3, (10, "Alice", "Germany"), (101, "Wireless Mouse")),
        ]);

        let customers = dataset.customer_dimension();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].customer_id, 10);
        assert_eq!(customers[1].country.as_deref(), Some("France"));

        let products = dataset.product_dimension();
        let ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![100, 101]);
    }

    #[test]
    fn test_raw_view_of_clean_record() {
        let clean = order(7, (10, "Alice", "Germany"), (100, "USB Cable"));
        let raw = RawOrder::from(&clean);
        assert_eq!(raw.order_id, Some(7));
        assert_eq!(raw.order_date.as_deref(), Some("2024-01-01"));
        assert_eq!(raw.unit_price, Some(1.0));
    }
}
