// orderpipe-core/src/domain/transform.rs

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::order::{OrderRecord, RawOrder};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Full transformation: dedup on `order_id`, drop incomplete rows, derive
/// `total_amount`, `order_year` and `order_month`.
///
/// A record whose date or amounts cannot be read fails the whole batch.
pub fn transform(raw: Dataset<RawOrder>) -> Result<Dataset<OrderRecord>, DomainError> {
    let raw_rows = raw.len();
    let deduped = drop_duplicate_orders(raw.into_records());
    let deduped_rows = deduped.len();

    let complete: Vec<RawOrder> = deduped.into_iter().filter(is_complete).collect();
    debug!(
        raw_rows,
        duplicates = raw_rows - deduped_rows,
        incomplete = deduped_rows - complete.len(),
        "Cleaned raw orders"
    );

    complete.into_iter().map(add_features).collect()
}

/// Keeps the first occurrence of each `order_id`. Null ids share one bucket.
fn drop_duplicate_orders(records: Vec<RawOrder>) -> Vec<RawOrder> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.order_id))
        .collect()
}

fn is_complete(record: &RawOrder) -> bool {
    record.order_id.is_some()
        && record.customer_id.is_some()
        && record.product_id.is_some()
        && record
            .order_date
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
}

fn add_features(raw: RawOrder) -> Result<OrderRecord, DomainError> {
    let date_text = raw.order_date.clone().unwrap_or_default();
    let order_date = parse_order_date(&date_text).ok_or_else(|| DomainError::Parse {
        line: raw.line,
        field: "order_date".into(),
        value: date_text.clone(),
        reason: "not a recognised date".into(),
    })?;

    let quantity = raw.quantity.ok_or_else(|| missing(&raw, "quantity"))?;
    let unit_price = raw.unit_price.ok_or_else(|| missing(&raw, "unit_price"))?;

    // Three required ids were checked by `is_complete`.
    let (Some(order_id), Some(customer_id), Some(product_id)) =
        (raw.order_id, raw.customer_id, raw.product_id)
    else {
        return Err(missing(&raw, "order_id"));
    };

    Ok(OrderRecord {
        order_id,
        customer_id,
        product_id,
        customer_name: raw.customer_name,
        country: raw.country,
        product_name: raw.product_name,
        category: raw.category,
        order_date,
        quantity,
        unit_price,
        total_amount: quantity as f64 * unit_price,
        order_year: order_date.year(),
        order_month: order_date.month(),
    })
}

fn missing(raw: &RawOrder, field: &str) -> DomainError {
    DomainError::Parse {
        line: raw.line,
        field: field.into(),
        value: String::new(),
        reason: "value is missing".into(),
    }
}

pub fn parse_order_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
