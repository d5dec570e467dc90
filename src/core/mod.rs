// Core value and error types shared by columns and tables
pub mod data_value;
pub mod error;

// Re-exports for convenience
pub use data_value::{ColumnType, Value};
pub use error::{Error, Result};
