use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

use log::warn;

use crate::column::{Column, Values};
use crate::config::DisplayConfig;
use crate::core::data_value::Value;
use crate::core::error::{Error, Result};
use crate::table::dedup::{first_collision, resolve_duplicates};
use crate::table::indexing::{describe_tuple, IndexKey, RowSelector};
use crate::table::source::TableSource;

/// Open-ended per-column key/value annotations
pub type Metadata = BTreeMap<String, serde_json::Value>;

static EMPTY_METADATA: Metadata = BTreeMap::new();

/// Ordered, heterogeneous collection of named columns of equal length
///
/// Column names are unique, column order is insertion order, and every column
/// holds the same number of rows. Each table owns its columns outright; tables
/// returned by selections are independent copies.
#[derive(Debug, Clone, Default)]
pub struct Table {
    // Column data
    columns: Vec<Column>,
    // Order of columns
    column_names: Vec<String>,
    // Mapping of column names to positions
    column_indices: HashMap<String, usize>,
    // Per-column metadata, created on first access
    metadata: HashMap<String, Metadata>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from any supported source shape
    ///
    /// Duplicate names are made unique (see [`resolve_duplicates`]) before any
    /// column is stored, and a warning lists every rename.
    pub fn from_source(source: impl Into<TableSource>) -> Result<Self> {
        let named = source.into().into_named_values()?;
        let (names, values): (Vec<String>, Vec<Values>) = named.into_iter().unzip();

        let resolved = resolve_duplicates(&names);
        if resolved.has_renames() {
            let renames: Vec<String> = resolved
                .renamed
                .iter()
                .map(|(from, to)| format!("'{}' -> '{}'", from, to))
                .collect();
            warn!(
                "Altering duplicate column names to make them unique: {}",
                renames.join(", ")
            );
        }
        if let Some(name) = first_collision(&resolved.names) {
            warn!("Column name '{}' is still duplicated after renaming", name);
            return Err(Error::DuplicateColumnName(name.to_string()));
        }

        let mut table = Table::new();
        for (name, values) in resolved.names.into_iter().zip(values) {
            table.set_column(name, values)?;
        }
        Ok(table)
    }

    /// (number of rows, number of columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Get the number of rows; zero when there are no columns
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Alias of [`Table::row_count`]
    pub fn len(&self) -> usize {
        self.row_count()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Column names, in column order
    pub fn keys(&self) -> &[String] {
        &self.column_names
    }

    /// Columns, in column order
    pub fn values(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter()
    }

    /// `(name, column)` pairs, in column order
    pub fn items(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Check if the table contains a column with the given name
    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_indices
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        match self.column_indices.get(name) {
            Some(&i) => Ok(&mut self.columns[i]),
            None => Err(Error::UnknownColumn(name.to_string())),
        }
    }

    /// Stores `values` under `name`
    ///
    /// An existing column keeps its position, a new one is appended. Once the
    /// table has a column, the new column must match its row count.
    pub fn set_column(&mut self, name: impl Into<String>, values: impl Into<Values>) -> Result<()> {
        let name = name.into();
        let column = values.into().into_column(&name)?;

        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(Error::LengthMismatch {
                expected: self.row_count(),
                actual: column.len(),
            });
        }

        match self.column_indices.get(&name) {
            Some(&i) => self.columns[i] = column,
            None => {
                self.column_indices.insert(name.clone(), self.columns.len());
                self.column_names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Overwrites the selected elements of an existing column in place
    ///
    /// `values` must provide one element per selected row, or one element to
    /// broadcast. The row count never changes.
    pub fn set_values(
        &mut self,
        name: &str,
        rows: impl Into<RowSelector>,
        values: impl Into<Values>,
    ) -> Result<()> {
        if !self.contains_column(name) {
            return Err(Error::UnknownColumn(name.to_string()));
        }
        let positions = rows.into().resolve(self.row_count())?;
        let values = values.into().into_column(name)?;
        self.column_mut(name)?.assign(&positions, &values)
    }

    /// Assignment through a dynamic key
    ///
    /// A name replaces or adds a whole column; `(name, position)` and
    /// `(name, slice)` overwrite elements of an existing column. Any other key
    /// shape is rejected.
    pub fn assign(&mut self, key: impl Into<IndexKey>, values: impl Into<Values>) -> Result<()> {
        match key.into() {
            IndexKey::Str(name) => self.set_column(name, values),
            IndexKey::Tuple(items) => match items.as_slice() {
                [IndexKey::Str(name), IndexKey::Int(position)] => {
                    self.set_values(name, RowSelector::Position(*position as isize), values)
                }
                [IndexKey::Str(name), IndexKey::Slice(slice)] => {
                    self.set_values(name, RowSelector::Slice(*slice), values)
                }
                _ => Err(Error::UnsupportedAssignment(describe_tuple(&items))),
            },
            other => Err(Error::UnsupportedAssignment(other.describe())),
        }
    }

    /// Removes a column and its metadata
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let position = self
            .column_indices
            .remove(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;

        self.column_names.remove(position);
        let column = self.columns.remove(position);
        for index in self.column_indices.values_mut() {
            if *index > position {
                *index -= 1;
            }
        }
        self.metadata.remove(name);
        Ok(column)
    }

    /// Metadata for a column, empty if never written
    pub fn metadata(&self, name: &str) -> Result<&Metadata> {
        if !self.contains_column(name) {
            return Err(Error::UnknownColumn(name.to_string()));
        }
        Ok(self.metadata.get(name).unwrap_or(&EMPTY_METADATA))
    }

    /// Mutable metadata for a column, created on first access
    pub fn metadata_mut(&mut self, name: &str) -> Result<&mut Metadata> {
        if !self.contains_column(name) {
            return Err(Error::UnknownColumn(name.to_string()));
        }
        Ok(self.metadata.entry(name.to_string()).or_default())
    }

    /// Lazily yields each row as its cells in column order
    pub fn iter_rows(&self) -> RowIter<'_> {
        RowIter {
            table: self,
            next: 0,
        }
    }

    /// Renders up to `config.max_rows` rows as plain text
    pub fn to_text(&self, config: &DisplayConfig) -> String {
        TextView {
            table: self,
            config,
        }
        .to_string()
    }

    fn write_text(&self, f: &mut impl fmt::Write, config: &DisplayConfig) -> fmt::Result {
        let (rows, cols) = self.shape();
        if cols == 0 {
            return write!(f, "Table (0 rows x 0 columns)");
        }

        let width = config.column_width;
        writeln!(f, "Table ({} rows x {} columns):", rows, cols)?;

        write!(f, "{:<5} |", "idx")?;
        for name in &self.column_names {
            write!(f, " {:<width$} |", truncate(name, width), width = width)?;
        }
        writeln!(f)?;

        write!(f, "{:-<5}-+", "")?;
        for _ in &self.column_names {
            write!(f, "-{:-<width$}-+", "", width = width)?;
        }
        writeln!(f)?;

        let display_rows = rows.min(config.max_rows);
        for (i, row) in self.iter_rows().take(display_rows).enumerate() {
            write!(f, "{:<5} |", i)?;
            for value in &row {
                let text = match value {
                    Value::Float64(v) => format!("{:.3}", v),
                    other => other.to_string(),
                };
                write!(f, " {:<width$} |", truncate(&text, width), width = width)?;
            }
            writeln!(f)?;
        }

        if rows > display_rows {
            writeln!(f, "... ({} more rows)", rows - display_rows)?;
        }
        Ok(())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('~');
        short
    }
}

/// A table rendered with a specific display configuration
struct TextView<'a> {
    table: &'a Table,
    config: &'a DisplayConfig,
}

impl Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_text(f, self.config)
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f, &DisplayConfig::default())
    }
}

impl PartialEq for Table {
    /// Tables are equal when they hold equal columns under the same names in
    /// the same order; metadata is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.column_names == other.column_names && self.columns == other.columns
    }
}

impl TryFrom<TableSource> for Table {
    type Error = Error;

    fn try_from(source: TableSource) -> Result<Self> {
        Table::from_source(source)
    }
}

/// Row iterator returned by [`Table::iter_rows`]
pub struct RowIter<'a> {
    table: &'a Table,
    next: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.table.row_count() {
            return None;
        }
        let row = self
            .table
            .columns
            .iter()
            .map(|column| column.value_at(self.next))
            .collect();
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.row_count().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowIter<'_> {}
