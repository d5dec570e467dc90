//! The table type and everything that builds, reads or writes it

pub mod base;
pub mod dedup;
pub mod indexing;
pub mod matrix;
pub mod source;

pub use base::{Metadata, RowIter, Table};
pub use dedup::{first_collision, resolve_duplicates, ResolvedNames};
pub use indexing::{IndexKey, RowSelector, RowSlice, Selected, Selection};
pub use matrix::{MatrixValues, TableMatrix};
pub use source::{
    format_index_name, Frame, FrameSource, IndexNames, OrderedColumns, TableSource,
    DEFAULT_INDEX_TEMPLATE,
};
