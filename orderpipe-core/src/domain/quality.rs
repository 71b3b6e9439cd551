// orderpipe-core/src/domain/quality.rs

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{error, info};

use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::order::OrderFacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRule {
    NullOrderId,
    DuplicateOrderId,
    NonPositiveQuantity,
    NonPositiveUnitPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: QualityRule,
    pub count: usize,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rule {
            QualityRule::NullOrderId => write!(f, "{} rows with null order_id", self.count),
            QualityRule::DuplicateOrderId => {
                write!(f, "{} duplicate order_id values found", self.count)
            }
            QualityRule::NonPositiveQuantity => {
                write!(f, "{} rows with non-positive quantity", self.count)
            }
            QualityRule::NonPositiveUnitPrice => {
                write!(f, "{} rows with non-positive unit_price", self.count)
            }
        }
    }
}

/// Every rule that failed on one dataset, with its offending row count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count_for(&self, rule: QualityRule) -> Option<usize> {
        self.violations
            .iter()
            .find(|v| v.rule == rule)
            .map(|v| v.count)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issues: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "Data quality validation failed: {}", issues.join("; "))
    }
}

/// Evaluates all rules over the dataset without stopping at the first hit.
pub fn check<R: OrderFacts>(dataset: &Dataset<R>) -> ValidationReport {
    let mut null_ids = 0;
    let mut duplicates = 0;
    let mut bad_quantity = 0;
    let mut bad_price = 0;
    let mut seen = HashSet::new();

    for record in dataset {
        match record.order_id() {
            None => null_ids += 1,
            Some(id) => {
                if !seen.insert(id) {
                    duplicates += 1;
                }
            }
        }
        if !record.quantity().is_some_and(|q| q > 0) {
            bad_quantity += 1;
        }
        // NaN fails `> 0.0` and is reported as well.
        if !record.unit_price().is_some_and(|p| p > 0.0) {
            bad_price += 1;
        }
    }

    let violations = [
        (QualityRule::NullOrderId, null_ids),
        (QualityRule::DuplicateOrderId, duplicates),
        (QualityRule::NonPositiveQuantity, bad_quantity),
        (QualityRule::NonPositiveUnitPrice, bad_price),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(rule, count)| Violation { rule, count })
    .collect();

    ValidationReport { violations }
}

/// Runs the data quality checks and fails with every violation at once.
pub fn validate<R: OrderFacts>(dataset: &Dataset<R>) -> Result<(), DomainError> {
    let report = check(dataset);

    info!(
        rows = dataset.len(),
        columns = R::COLUMNS.len(),
        issues = report.violations.len(),
        "Data quality summary"
    );

    if report.is_clean() {
        return Ok(());
    }

    for violation in &report.violations {
        error!("Data quality issue: {}", violation);
    }
    Err(DomainError::Validation(report))
}
