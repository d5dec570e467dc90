use ndarray::{Array1, Array2, ArrayD, Axis, Ix2};

use crate::column::{Column, TypedColumn};
use crate::core::error::{Error, Result};

/// Array-like input accepted wherever a column is stored
///
/// Values may have any number of dimensions; only rank-1 values can become a
/// column, and only rank-2 values can act as a matrix source.
#[derive(Debug, Clone)]
pub enum Values {
    /// An existing column, possibly with missing values
    Column(Column),
    Int64(ArrayD<i64>),
    Float64(ArrayD<f64>),
    String(ArrayD<String>),
    Boolean(ArrayD<bool>),
}

impl Values {
    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        match self {
            Values::Column(_) => 1,
            Values::Int64(a) => a.ndim(),
            Values::Float64(a) => a.ndim(),
            Values::String(a) => a.ndim(),
            Values::Boolean(a) => a.ndim(),
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            Values::Column(c) => vec![c.len()],
            Values::Int64(a) => a.shape().to_vec(),
            Values::Float64(a) => a.shape().to_vec(),
            Values::String(a) => a.shape().to_vec(),
            Values::Boolean(a) => a.shape().to_vec(),
        }
    }

    /// Coerces the values into a column destined for `name`
    pub fn into_column(self, name: &str) -> Result<Column> {
        let ndim = self.ndim();
        if ndim != 1 {
            return Err(Error::Dimensionality {
                name: name.to_string(),
                ndim,
            });
        }

        let column = match self {
            Values::Column(c) => c,
            Values::Int64(a) => Column::Int64(TypedColumn::new(a.iter().cloned().collect())),
            Values::Float64(a) => Column::Float64(TypedColumn::new(a.iter().cloned().collect())),
            Values::String(a) => Column::String(TypedColumn::new(a.iter().cloned().collect())),
            Values::Boolean(a) => Column::Boolean(TypedColumn::new(a.iter().cloned().collect())),
        };
        Ok(column)
    }

    /// Splits rank-2 values into their columns, left to right
    pub fn into_matrix_columns(self) -> Result<Vec<Column>> {
        let ndim = self.ndim();
        if ndim != 2 {
            return Err(Error::Shape(format!(
                "Only two-dimensional arrays are allowed, received {} dimensions",
                ndim
            )));
        }

        let columns = match self {
            Values::Column(_) => Vec::new(),
            Values::Int64(a) => split_columns(a)?.into_iter().map(Column::Int64).collect(),
            Values::Float64(a) => split_columns(a)?.into_iter().map(Column::Float64).collect(),
            Values::String(a) => split_columns(a)?.into_iter().map(Column::String).collect(),
            Values::Boolean(a) => split_columns(a)?.into_iter().map(Column::Boolean).collect(),
        };
        Ok(columns)
    }
}

fn split_columns<T: Clone>(array: ArrayD<T>) -> Result<Vec<TypedColumn<T>>> {
    let matrix = array.into_dimensionality::<Ix2>()?;
    Ok(matrix
        .axis_iter(Axis(1))
        .map(|column| TypedColumn::new(column.to_vec()))
        .collect())
}

impl From<Column> for Values {
    fn from(column: Column) -> Self {
        Values::Column(column)
    }
}

macro_rules! impl_values_from {
    ($($elem:ty => $variant:ident;)*) => {
        $(
            impl From<Vec<$elem>> for Values {
                fn from(data: Vec<$elem>) -> Self {
                    Values::$variant(Array1::from(data).into_dyn())
                }
            }

            impl From<Vec<Option<$elem>>> for Values {
                fn from(data: Vec<Option<$elem>>) -> Self {
                    Values::Column(Column::from(data))
                }
            }

            impl From<Array1<$elem>> for Values {
                fn from(data: Array1<$elem>) -> Self {
                    Values::$variant(data.into_dyn())
                }
            }

            impl From<Array2<$elem>> for Values {
                fn from(data: Array2<$elem>) -> Self {
                    Values::$variant(data.into_dyn())
                }
            }

            impl From<ArrayD<$elem>> for Values {
                fn from(data: ArrayD<$elem>) -> Self {
                    Values::$variant(data)
                }
            }
        )*
    };
}

impl_values_from! {
    i64 => Int64;
    f64 => Float64;
    String => String;
    bool => Boolean;
}

impl From<Vec<i32>> for Values {
    fn from(data: Vec<i32>) -> Self {
        Values::Int64(Array1::from_iter(data.into_iter().map(i64::from)).into_dyn())
    }
}

impl From<Vec<Option<i32>>> for Values {
    fn from(data: Vec<Option<i32>>) -> Self {
        Values::Column(Column::from(data))
    }
}

impl From<Vec<&str>> for Values {
    fn from(data: Vec<&str>) -> Self {
        Values::String(Array1::from_iter(data.into_iter().map(str::to_string)).into_dyn())
    }
}

impl From<Vec<Option<&str>>> for Values {
    fn from(data: Vec<Option<&str>>) -> Self {
        Values::Column(Column::from(data))
    }
}

impl From<&[f64]> for Values {
    fn from(data: &[f64]) -> Self {
        Values::from(data.to_vec())
    }
}

impl From<&[i64]> for Values {
    fn from(data: &[i64]) -> Self {
        Values::from(data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rank_one_becomes_column() {
        let column = Values::from(vec![1i64, 2, 3]).into_column("a").unwrap();
        assert_eq!(column.len(), 3);
    }

    #[test]
    fn test_rank_two_is_rejected_as_column() {
        let values = Values::from(array![[1.0, 2.0], [3.0, 4.0]]);
        match values.into_column("m") {
            Err(Error::Dimensionality { name, ndim }) => {
                assert_eq!(name, "m");
                assert_eq!(ndim, 2);
            }
            other => panic!("expected a dimensionality error, got {:?}", other),
        }
    }

    #[test]
    fn test_matrix_columns_are_split_left_to_right() {
        let values = Values::from(array![[1i64, 2], [3, 4], [5, 6]]);
        let columns = values.into_matrix_columns().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], Column::from(vec![1i64, 3, 5]));
        assert_eq!(columns[1], Column::from(vec![2i64, 4, 6]));
    }
}
