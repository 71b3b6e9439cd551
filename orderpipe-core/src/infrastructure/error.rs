// orderpipe-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(orderpipe::infra::database::duckdb),
        help("An error occurred inside the warehouse engine. Tables may be partially replaced.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Warehouse connection lock poisoned")]
    #[diagnostic(code(orderpipe::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- RAW SOURCE ---
    #[error("Cannot read raw orders from '{path}': {reason}")]
    #[diagnostic(
        code(orderpipe::infra::source_read),
        help("Check that the file exists and is a CSV with a header row.")
    )]
    SourceRead { path: String, reason: String },

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(orderpipe::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    #[diagnostic(code(orderpipe::infra::csv))]
    Csv(#[from] csv::Error),

    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(orderpipe::infra::json))]
    Json(#[from] serde_json::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(orderpipe::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(orderpipe::infra::config))]
    ConfigError(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
