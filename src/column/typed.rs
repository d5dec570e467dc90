use crate::column::bitmask::BitMask;
use crate::core::error::{Error, Result};

/// Contiguous value buffer paired with an optional missing-value mask
///
/// Elements whose mask bit is set are missing; the value stored at that position
/// is a placeholder and never observable through `get` or `iter`.
#[derive(Debug, Clone)]
pub struct TypedColumn<T> {
    pub(crate) data: Vec<T>,
    pub(crate) null_mask: Option<BitMask>,
}

/// Structure representing an Int64 column
pub type Int64Column = TypedColumn<i64>;
/// Structure representing a Float64 column
pub type Float64Column = TypedColumn<f64>;
/// Structure representing a string column
pub type StringColumn = TypedColumn<String>;
/// Structure representing a boolean column
pub type BooleanColumn = TypedColumn<bool>;

impl<T: Clone> TypedColumn<T> {
    /// Create a new column without missing values
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            null_mask: None,
        }
    }

    /// Returns the length of the column
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw value buffer, including placeholders under masked positions
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn null_mask(&self) -> Option<&BitMask> {
        self.null_mask.as_ref()
    }

    /// Whether the element at `index` is missing; `index` must be in bounds
    pub fn is_null(&self, index: usize) -> bool {
        self.null_mask
            .as_ref()
            .map_or(false, |mask| mask.is_set(index))
    }

    /// Number of missing elements
    pub fn null_count(&self) -> usize {
        self.null_mask.as_ref().map_or(0, BitMask::count_ones)
    }

    /// Get data at the specified index
    pub fn get(&self, index: usize) -> Result<Option<&T>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index: index as isize,
                size: self.data.len(),
            });
        }

        if self.is_null(index) {
            return Ok(None);
        }
        Ok(Some(&self.data[index]))
    }

    /// Iterate over the elements, yielding `None` for missing ones
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| if self.is_null(i) { None } else { Some(v) })
    }

    /// Gathers the elements at `positions`, keeping the mask in step with the values
    ///
    /// Positions must already be bounds-checked.
    pub fn take(&self, positions: &[usize]) -> Self {
        let data = positions.iter().map(|&i| self.data[i].clone()).collect();
        let null_mask = self
            .null_mask
            .as_ref()
            .map(|mask| mask.take(positions))
            .filter(BitMask::any);

        Self { data, null_mask }
    }

    /// Create a new column by applying a mapping function, keeping the mask
    pub fn map<U, F>(&self, f: F) -> TypedColumn<U>
    where
        F: Fn(&T) -> U,
    {
        TypedColumn {
            data: self.data.iter().map(f).collect(),
            null_mask: self.null_mask.clone(),
        }
    }

    /// Overwrites the elements at `positions` with `src`
    ///
    /// `src` holds either one element per position or a single element that is
    /// broadcast. Positions must already be bounds-checked.
    pub(crate) fn assign(&mut self, positions: &[usize], src: &TypedColumn<T>) {
        let broadcast = src.len() == 1;
        for (i, &pos) in positions.iter().enumerate() {
            let from = if broadcast { 0 } else { i };
            self.data[pos] = src.data[from].clone();

            let missing = src.is_null(from);
            if missing && self.null_mask.is_none() {
                self.null_mask = Some(BitMask::new(self.data.len()));
            }
            if let Some(mask) = self.null_mask.as_mut() {
                // pos < len, checked by the caller
                let _ = mask.set(pos, missing);
            }
        }

        if !self.null_mask.as_ref().map_or(false, BitMask::any) {
            self.null_mask = None;
        }
    }
}

impl<T: Clone + Default> TypedColumn<T> {
    /// Create a column from optional values, masking every `None`
    pub fn from_options(values: Vec<Option<T>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data = values.into_iter().map(Option::unwrap_or_default).collect();
        let null_mask = if nulls.iter().any(|&n| n) {
            Some(BitMask::from_bools(&nulls))
        } else {
            None
        };

        Self { data, null_mask }
    }
}

impl<T: PartialEq> PartialEq for TypedColumn<T> {
    /// Two columns are equal when the same positions are missing and every
    /// present element compares equal.
    fn eq(&self, other: &Self) -> bool {
        if self.data.len() != other.data.len() {
            return false;
        }

        let null_at = |col: &Self, i: usize| col.null_mask.as_ref().map_or(false, |m| m.is_set(i));
        (0..self.data.len()).all(|i| {
            let (a, b) = (null_at(self, i), null_at(other, i));
            a == b && (a || self.data[i] == other.data[i])
        })
    }
}
