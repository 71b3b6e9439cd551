// orderpipe-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// Ports: the store contract (Connector).
pub mod ports;

// Domain: order records, transform rules, quality checks, run summary.
// Depends on nothing else in the crate.
pub mod domain;

// Infrastructure: DuckDB adapter, CSV files, config loading.
pub mod infrastructure;

// Application: pipeline orchestration, warehouse loads, reports.
pub mod application;

pub mod error;

pub use error::PipelineError;
