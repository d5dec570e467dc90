//! Ordered, heterogeneous, column-oriented tables
//!
//! A [`Table`] maps unique column names to equal-length typed columns, keeps
//! insertion order, and tracks missing values per element. It can be built from
//! ordered or unordered keyed sources, `(name, values)` pairs, 2-D matrices,
//! foreign frames, JSON documents and delimited text, and it is read through a
//! single indexing entry point that selects rows, columns or both.
//!
//! ```
//! use tabula::Table;
//!
//! let table = Table::from_source(vec![("a", vec![1i64, 2, 3]), ("b", vec![4i64, 5, 6])]).unwrap();
//! let rows = table.get_table(1..3).unwrap();
//! assert_eq!(rows.shape(), (2, 2));
//! let swapped = table.get_table((.., vec!["b", "a"])).unwrap();
//! assert_eq!(swapped.keys(), &["b", "a"]);
//! ```

pub mod column;
pub mod config;
pub mod core;
pub mod io;
pub mod table;

pub use column::{BitMask, Column, ColumnType, Runs, Value, Values};
pub use config::{CsvConfig, DisplayConfig, FrameConfig, TabulaConfig};
pub use crate::core::error::{Error, Result};
pub use io::{read_csv, read_csv_from_reader, read_csv_with_config, read_json, table_from_rows};
pub use table::{
    Frame, FrameSource, IndexKey, IndexNames, Metadata, OrderedColumns, RowSelector, RowSlice,
    Selected, Selection, Table, TableMatrix, TableSource,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
