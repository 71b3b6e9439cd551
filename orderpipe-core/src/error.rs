// orderpipe-core/src/error.rs

use crate::domain::error::DomainError;
use crate::domain::summary::ErrorKind;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PipelineError {
    // --- Business rules (parsing, data quality) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- IO, warehouse, config ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Domain(DomainError::Parse { .. }) => ErrorKind::Parse,
            PipelineError::Domain(DomainError::Validation(_)) => ErrorKind::Validation,
            PipelineError::Infrastructure(infra) => match infra {
                InfrastructureError::Database(_) => ErrorKind::Store,
                InfrastructureError::SourceRead { .. } => ErrorKind::SourceRead,
                InfrastructureError::YamlError(_) | InfrastructureError::ConfigError(_) => {
                    ErrorKind::Config
                }
                InfrastructureError::Io(_) | InfrastructureError::Csv(_) => ErrorKind::Io,
                InfrastructureError::Json(_) => ErrorKind::Internal,
            },
            PipelineError::InternalError(_) => ErrorKind::Internal,
        }
    }
}

// Manual implementations to avoid duplicate enum variants but keep ergonomics
impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for PipelineError {
    fn from(err: duckdb::Error) -> Self {
        PipelineError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDB(err)))
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Infrastructure(InfrastructureError::Csv(err))
    }
}
