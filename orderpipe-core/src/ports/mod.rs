pub mod connector;

pub use connector::{CellValue, ColumnSchema, Connector};
