use thiserror::Error;

use crate::core::data_value::ColumnType;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("Can't create a table from an instance of {0}")]
    UnsupportedSourceType(String),

    #[error("Can't assign {ndim}-dimensional array to the '{name}' column")]
    Dimensionality { name: String, ndim: usize },

    #[error("Expected {expected} values, received {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Unsupported key for assignment: {0}")]
    UnsupportedAssignment(String),

    #[error("Unsupported index: {0}")]
    UnsupportedIndex(String),

    #[error("Unknown column name '{0}'")]
    UnknownColumn(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: isize, size: usize },

    #[error("Column type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Shape(err.to_string())
    }
}
