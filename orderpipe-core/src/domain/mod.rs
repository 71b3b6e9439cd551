pub mod configuration;
pub mod dataset;
pub mod error;
pub mod order;
pub mod quality;
pub mod summary;
pub mod transform;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use configuration::{PipelineConfig, PipelinePaths};
pub use dataset::Dataset;
pub use error::DomainError;
pub use order::{CustomerDim, OrderFacts, OrderRecord, ProductDim, RawOrder};
pub use quality::{QualityRule, ValidationReport, Violation, validate};
pub use summary::{ErrorKind, RunStatus, RunSummary};
pub use transform::transform;
