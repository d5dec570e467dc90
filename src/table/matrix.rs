use ndarray::Array2;

use crate::column::{Column, ColumnType, TypedColumn};
use crate::core::error::Result;
use crate::table::base::Table;

/// Homogeneous row-major values of a table
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixValues {
    Int64(Array2<i64>),
    Float64(Array2<f64>),
    String(Array2<String>),
    Boolean(Array2<bool>),
}

impl MatrixValues {
    pub fn column_type(&self) -> ColumnType {
        match self {
            MatrixValues::Int64(_) => ColumnType::Int64,
            MatrixValues::Float64(_) => ColumnType::Float64,
            MatrixValues::String(_) => ColumnType::String,
            MatrixValues::Boolean(_) => ColumnType::Boolean,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            MatrixValues::Int64(a) => a.dim(),
            MatrixValues::Float64(a) => a.dim(),
            MatrixValues::String(a) => a.dim(),
            MatrixValues::Boolean(a) => a.dim(),
        }
    }
}

/// A table flattened into one matrix, with a matching missing-value mask
#[derive(Debug, Clone, PartialEq)]
pub struct TableMatrix {
    pub values: MatrixValues,
    /// `true` where the source cell is missing
    pub mask: Array2<bool>,
}

impl TableMatrix {
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn column_type(&self) -> ColumnType {
        self.values.column_type()
    }

    pub fn is_missing(&self, row: usize, column: usize) -> Option<bool> {
        self.mask.get((row, column)).copied()
    }
}

fn row_major<T: Clone>(columns: &[&TypedColumn<T>], rows: usize) -> Result<Array2<T>> {
    let mut data = Vec::with_capacity(rows * columns.len());
    for row in 0..rows {
        for column in columns {
            data.push(column.data()[row].clone());
        }
    }
    Ok(Array2::from_shape_vec((rows, columns.len()), data)?)
}

impl Table {
    /// Flattens every column into one matrix of the narrowest common type
    ///
    /// Columns are widened along bool, int64, float64, str. Missing cells keep
    /// their storage placeholder and are flagged in `mask`.
    pub fn matrix(&self) -> Result<TableMatrix> {
        let (rows, cols) = self.shape();

        let column_type = self
            .values()
            .map(Column::column_type)
            .reduce(ColumnType::unify)
            .unwrap_or(ColumnType::Float64);
        let columns = self
            .values()
            .map(|c| c.cast(column_type))
            .collect::<Result<Vec<_>>>()?;

        let mut mask = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for column in &columns {
                mask.push(column.is_missing(row)?);
            }
        }
        let mask = Array2::from_shape_vec((rows, cols), mask)?;

        let values = match column_type {
            ColumnType::Int64 => {
                let typed: Vec<_> = columns.iter().filter_map(Column::as_int64).collect();
                MatrixValues::Int64(row_major(&typed, rows)?)
            }
            ColumnType::Float64 => {
                let typed: Vec<_> = columns.iter().filter_map(Column::as_float64).collect();
                MatrixValues::Float64(row_major(&typed, rows)?)
            }
            ColumnType::String => {
                let typed: Vec<_> = columns.iter().filter_map(Column::as_string).collect();
                MatrixValues::String(row_major(&typed, rows)?)
            }
            ColumnType::Boolean => {
                let typed: Vec<_> = columns.iter().filter_map(Column::as_boolean).collect();
                MatrixValues::Boolean(row_major(&typed, rows)?)
            }
        };

        Ok(TableMatrix { values, mask })
    }
}
