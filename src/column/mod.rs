//! Column storage
//!
//! A [`Column`] is a fixed-length, single-typed value buffer with an optional
//! bit-packed missing-value mask. Every selection or cast re-slices the mask
//! together with the values.

mod bitmask;
mod runs;
mod typed;
mod values;

pub use bitmask::BitMask;
pub use runs::Runs;
pub use typed::{BooleanColumn, Float64Column, Int64Column, StringColumn, TypedColumn};
pub use values::Values;

pub use crate::core::data_value::{ColumnType, Value};
use crate::core::error::{Error, Result};

/// Enum representing a column
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Int64Column),
    Float64(Float64Column),
    String(StringColumn),
    Boolean(BooleanColumn),
}

macro_rules! for_each_variant {
    ($column:expr, $col:ident => $body:expr) => {
        match $column {
            Column::Int64($col) => $body,
            Column::Float64($col) => $body,
            Column::String($col) => $body,
            Column::Boolean($col) => $body,
        }
    };
}

impl Column {
    /// Returns the length of the column
    pub fn len(&self) -> usize {
        for_each_variant!(self, col => col.len())
    }

    /// Returns whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type of the column
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Boolean(_) => ColumnType::Boolean,
        }
    }

    /// Missing-value mask, `None` when nothing is missing
    pub fn null_mask(&self) -> Option<&BitMask> {
        for_each_variant!(self, col => col.null_mask())
    }

    /// Number of missing elements
    pub fn null_count(&self) -> usize {
        for_each_variant!(self, col => col.null_count())
    }

    /// Whether the element at `index` is missing
    pub fn is_missing(&self, index: usize) -> Result<bool> {
        self.check_bounds(index)?;
        Ok(for_each_variant!(self, col => col.is_null(index)))
    }

    /// Get the value at the specified index
    pub fn get(&self, index: usize) -> Result<Value> {
        self.check_bounds(index)?;
        Ok(self.value_at(index))
    }

    /// Iterate over the column as cells, in row order
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.value_at(i))
    }

    pub(crate) fn value_at(&self, index: usize) -> Value {
        match self {
            Column::Int64(col) => col.get(index).ok().flatten().map(|v| Value::Int64(*v)),
            Column::Float64(col) => col.get(index).ok().flatten().map(|v| Value::Float64(*v)),
            Column::String(col) => col.get(index).ok().flatten().map(|v| Value::String(v.clone())),
            Column::Boolean(col) => col.get(index).ok().flatten().map(|v| Value::Boolean(*v)),
        }
        .unwrap_or(Value::Null)
    }

    fn check_bounds(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index: index as isize,
                size: self.len(),
            });
        }
        Ok(())
    }

    /// Gathers the elements at `positions` (bounds-checked by the caller) into a new column
    pub fn take(&self, positions: &[usize]) -> Column {
        match self {
            Column::Int64(col) => Column::Int64(col.take(positions)),
            Column::Float64(col) => Column::Float64(col.take(positions)),
            Column::String(col) => Column::String(col.take(positions)),
            Column::Boolean(col) => Column::Boolean(col.take(positions)),
        }
    }

    /// Widens the column to `target`
    ///
    /// Allowed: identity, bool to int64, bool/int64 to float64, anything to str.
    pub fn cast(&self, target: ColumnType) -> Result<Column> {
        let cast = match (self, target) {
            (col, target) if col.column_type() == target => col.clone(),
            (Column::Boolean(col), ColumnType::Int64) => Column::Int64(col.map(|&v| v as i64)),
            (Column::Boolean(col), ColumnType::Float64) => {
                Column::Float64(col.map(|&v| if v { 1.0 } else { 0.0 }))
            }
            (Column::Int64(col), ColumnType::Float64) => Column::Float64(col.map(|&v| v as f64)),
            (col, ColumnType::String) => Column::String(for_each_variant!(col, c => c.map(|v| v.to_string()))),
            (col, target) => {
                return Err(Error::TypeMismatch {
                    expected: target,
                    found: col.column_type(),
                })
            }
        };
        Ok(cast)
    }

    /// Overwrites the elements at `positions` with `values`
    ///
    /// `values` must hold one element per position, or exactly one element that
    /// is broadcast to every position. It is widened to this column's type first.
    pub fn assign(&mut self, positions: &[usize], values: &Column) -> Result<()> {
        if values.len() != positions.len() && values.len() != 1 {
            return Err(Error::LengthMismatch {
                expected: positions.len(),
                actual: values.len(),
            });
        }
        if let Some(&bad) = positions.iter().find(|&&p| p >= self.len()) {
            return Err(Error::IndexOutOfBounds {
                index: bad as isize,
                size: self.len(),
            });
        }

        let source = values.cast(self.column_type())?;
        match (self, &source) {
            (Column::Int64(dst), Column::Int64(src)) => dst.assign(positions, src),
            (Column::Float64(dst), Column::Float64(src)) => dst.assign(positions, src),
            (Column::String(dst), Column::String(src)) => dst.assign(positions, src),
            (Column::Boolean(dst), Column::Boolean(src)) => dst.assign(positions, src),
            (dst, src) => {
                return Err(Error::TypeMismatch {
                    expected: dst.column_type(),
                    found: src.column_type(),
                })
            }
        }
        Ok(())
    }

    /// Reinterprets a text column as float64
    ///
    /// Returns `None` unless every present element parses; missing elements stay missing.
    pub fn parse_float(&self) -> Option<Column> {
        let Column::String(col) = self else {
            return None;
        };

        let mut data = Vec::with_capacity(col.len());
        for (i, text) in col.data.iter().enumerate() {
            if col.is_null(i) {
                data.push(f64::NAN);
                continue;
            }
            data.push(text.trim().parse::<f64>().ok()?);
        }

        Some(Column::Float64(TypedColumn {
            data,
            null_mask: col.null_mask.clone(),
        }))
    }

    /// Builds a column from cells, choosing the narrowest type that holds every present cell
    ///
    /// A column with no present cells becomes float64, entirely masked.
    pub fn from_values(values: &[Value]) -> Column {
        let column_type = values
            .iter()
            .filter_map(Value::column_type)
            .reduce(ColumnType::unify)
            .unwrap_or(ColumnType::Float64);

        match column_type {
            ColumnType::Boolean => {
                Column::Boolean(TypedColumn::from_options(values.iter().map(Value::as_bool).collect()))
            }
            ColumnType::Int64 => {
                Column::Int64(TypedColumn::from_options(values.iter().map(Value::as_i64).collect()))
            }
            ColumnType::Float64 => {
                Column::Float64(TypedColumn::from_options(values.iter().map(Value::as_f64).collect()))
            }
            ColumnType::String => Column::String(TypedColumn::from_options(
                values
                    .iter()
                    .map(|v| if v.is_null() { None } else { Some(v.to_string()) })
                    .collect(),
            )),
        }
    }

    /// Casts to Int64Column
    pub fn as_int64(&self) -> Option<&Int64Column> {
        match self {
            Column::Int64(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to Float64Column
    pub fn as_float64(&self) -> Option<&Float64Column> {
        match self {
            Column::Float64(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to StringColumn
    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to BooleanColumn
    pub fn as_boolean(&self) -> Option<&BooleanColumn> {
        match self {
            Column::Boolean(col) => Some(col),
            _ => None,
        }
    }
}

// From implementations for type conversion
impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}

macro_rules! impl_column_from_vec {
    ($($elem:ty => $variant:ident, $conv:expr;)*) => {
        $(
            impl From<Vec<$elem>> for Column {
                fn from(data: Vec<$elem>) -> Self {
                    Column::$variant(TypedColumn::new(data.into_iter().map($conv).collect()))
                }
            }

            impl From<Vec<Option<$elem>>> for Column {
                fn from(data: Vec<Option<$elem>>) -> Self {
                    Column::$variant(TypedColumn::from_options(
                        data.into_iter().map(|v| v.map($conv)).collect(),
                    ))
                }
            }
        )*
    };
}

impl_column_from_vec! {
    i64 => Int64, |v| v;
    i32 => Int64, |v| v as i64;
    f64 => Float64, |v| v;
    String => String, |v| v;
    &str => String, |v: &str| v.to_string();
    bool => Boolean, |v| v;
}
