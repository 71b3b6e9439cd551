// orderpipe-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::quality::ValidationReport;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Parse error at line {line}: cannot read {field} from '{value}' ({reason})")]
    #[diagnostic(
        code(orderpipe::domain::parse),
        help("Fix the offending row in the raw file. A single malformed row aborts the batch.")
    )]
    Parse {
        line: u64,
        field: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    #[diagnostic(
        code(orderpipe::domain::validation),
        help("Nothing was persisted. Inspect the raw orders for the rules listed above.")
    )]
    Validation(ValidationReport),
}
