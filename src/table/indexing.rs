//! Unified indexing for tables
//!
//! A read goes through two steps:
//! - an [`IndexKey`] (the dynamic shape of the index expression: scalar,
//!   name, slice, array or tuple) is parsed into a [`Selection`]
//! - each `Selection` variant has exactly one handler, returning either a
//!   column slice or a new [`Table`]
//!
//! Typed entry points (`take_rows`, `select_columns`, `select_rows_columns`)
//! skip the parsing step.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::column::{Column, Values};
use crate::core::error::{Error, Result};
use crate::table::base::Table;
use crate::table::source::TableSource;

/// Row slice with optional bounds and a non-zero step
///
/// Negative bounds count from the end; out-of-range bounds are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl RowSlice {
    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Self {
            start,
            stop,
            step: 1,
        }
    }

    /// Every row
    pub fn full() -> Self {
        Self::new(None, None)
    }

    /// The half-open slice `[position, position + 1)`
    ///
    /// Empty when `position` is out of range; a negative position never wraps
    /// past the end, so `-1` selects nothing.
    pub fn single(position: isize) -> Self {
        Self::new(Some(position), position.checked_add(1))
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = step;
        self
    }

    /// Row positions selected from a column of `len` rows
    pub fn positions(&self, len: usize) -> Result<Vec<usize>> {
        let step = self.step;
        if step == 0 {
            return Err(Error::UnsupportedIndex("slice step cannot be zero".to_string()));
        }

        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + len).max(lower),
            Some(b) => b.min(upper),
        };
        let start = clamp(self.start, if step > 0 { lower } else { upper });
        let stop = clamp(self.stop, if step > 0 { upper } else { lower });

        let mut positions = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            positions.push(i as usize);
            i = match i.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(positions)
    }
}

impl Default for RowSlice {
    fn default() -> Self {
        Self::full()
    }
}

impl std::fmt::Display for RowSlice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}

/// Selection specification for rows
#[derive(Debug, Clone, PartialEq)]
pub enum RowSelector {
    /// Single row by position
    Position(isize),
    /// Range of rows
    Slice(RowSlice),
    /// Explicit positions; may repeat or reorder rows
    Positions(Vec<isize>),
    /// Boolean mask with one entry per row
    Mask(Vec<bool>),
}

impl RowSelector {
    /// All rows
    pub fn all() -> Self {
        RowSelector::Slice(RowSlice::full())
    }

    /// Resolves the selector against `len` rows, in selection order
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>> {
        match self {
            RowSelector::Position(position) => Ok(vec![normalize_position(*position, len)?]),
            RowSelector::Slice(slice) => slice.positions(len),
            RowSelector::Positions(positions) => positions
                .iter()
                .map(|&p| normalize_position(p, len))
                .collect(),
            RowSelector::Mask(mask) => {
                if mask.len() != len {
                    return Err(Error::LengthMismatch {
                        expected: len,
                        actual: mask.len(),
                    });
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect())
            }
        }
    }
}

/// Widens any integer position to `isize`, saturating at the bounds
fn saturating_isize(value: i128) -> isize {
    value.clamp(isize::MIN as i128, isize::MAX as i128) as isize
}

fn saturating_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

fn normalize_position(position: isize, len: usize) -> Result<usize> {
    let resolved = if position < 0 {
        position + len as isize
    } else {
        position
    };
    if resolved < 0 || resolved >= len as isize {
        return Err(Error::IndexOutOfBounds {
            index: position,
            size: len,
        });
    }
    Ok(resolved as usize)
}

/// Dynamic index expression
///
/// Mirrors the shapes an index can take: an integer, a boolean, a name, a
/// slice, an array of scalars, or a tuple of any of these.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexKey {
    Int(i64),
    Bool(bool),
    Str(String),
    Slice(RowSlice),
    List(Vec<IndexKey>),
    Tuple(Vec<IndexKey>),
}

impl IndexKey {
    /// Short human-readable rendering for error messages
    pub fn describe(&self) -> String {
        match self {
            IndexKey::Int(i) => i.to_string(),
            IndexKey::Bool(b) => b.to_string(),
            IndexKey::Str(s) => format!("'{}'", s),
            IndexKey::Slice(slice) => slice.to_string(),
            IndexKey::List(items) => {
                let inner: Vec<String> = items.iter().map(IndexKey::describe).collect();
                format!("[{}]", inner.join(", "))
            }
            IndexKey::Tuple(items) => describe_tuple(items),
        }
    }
}

/// Renders tuple elements the way [`IndexKey::describe`] renders a tuple
pub fn describe_tuple(items: &[IndexKey]) -> String {
    let inner: Vec<String> = items.iter().map(IndexKey::describe).collect();
    format!("({})", inner.join(", "))
}

/// Parsed index expression; one variant per dispatch rule
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// `"a"`: the whole column
    NamedColumn(String),
    /// `("a", i)`: the column sliced to `[i, i + 1)`
    NamedColumnAt(String, isize),
    /// `("a", rows)`: the selected elements of the column, in selector order
    NamedColumnRows(String, RowSelector),
    /// `i`: every column, restricted to row `i`
    ScalarRow(isize),
    /// `start:stop`: every column, restricted to a row slice
    RowSlice(RowSlice),
    /// `(rows, "a")`: a table with one column, restricted to `rows`
    RowsWithColumn(RowSelector, String),
    /// `(rows, ["b", "a"])`: a table with those columns in that order
    RowsWithColumns(RowSelector, Vec<String>),
    /// Array of positions or booleans: every column, restricted to those rows
    RowArray(RowSelector),
    /// Array of names: those columns, every row
    ColumnArray(Vec<String>),
}

/// An array index after coercion to a single element kind
enum CoercedArray {
    Empty,
    Names(Vec<String>),
    Rows(RowSelector),
}

impl CoercedArray {
    fn into_rows(self) -> Option<RowSelector> {
        match self {
            CoercedArray::Empty => Some(RowSelector::Positions(Vec::new())),
            CoercedArray::Rows(rows) => Some(rows),
            CoercedArray::Names(_) => None,
        }
    }

    fn into_names(self) -> Option<Vec<String>> {
        match self {
            CoercedArray::Empty => Some(Vec::new()),
            CoercedArray::Names(names) => Some(names),
            CoercedArray::Rows(_) => None,
        }
    }
}

/// Coerces array elements to one kind: any name makes the whole array textual,
/// all-boolean arrays are masks, everything else is positions.
fn coerce_array(items: Vec<IndexKey>) -> Result<CoercedArray> {
    if items.is_empty() {
        return Ok(CoercedArray::Empty);
    }
    if let Some(nested) = items
        .iter()
        .find(|k| matches!(k, IndexKey::List(_) | IndexKey::Tuple(_) | IndexKey::Slice(_)))
    {
        return Err(Error::UnsupportedIndex(format!(
            "array element {} is not a scalar",
            nested.describe()
        )));
    }

    if items.iter().any(|k| matches!(k, IndexKey::Str(_))) {
        let names = items
            .into_iter()
            .map(|k| match k {
                IndexKey::Str(s) => s,
                other => other.describe(),
            })
            .collect();
        return Ok(CoercedArray::Names(names));
    }

    if items.iter().all(|k| matches!(k, IndexKey::Bool(_))) {
        let mask = items
            .into_iter()
            .map(|k| matches!(k, IndexKey::Bool(true)))
            .collect();
        return Ok(CoercedArray::Rows(RowSelector::Mask(mask)));
    }

    let positions = items
        .into_iter()
        .map(|k| match k {
            IndexKey::Int(i) => saturating_isize(i.into()),
            IndexKey::Bool(b) => b as isize,
            _ => 0,
        })
        .collect();
    Ok(CoercedArray::Rows(RowSelector::Positions(positions)))
}

impl Selection {
    /// Decides what an index expression asks for
    ///
    /// Rules, by priority: a name; `(name, position)`; `(name, rows)`; an
    /// integer; a slice; `(rows, name)`; `(rows, names)`; otherwise the key is
    /// coerced to an array of names or rows. Anything else is unsupported.
    ///
    /// A scalar integer row is the slice `[i, i + 1)`, so an out-of-range row
    /// selects nothing instead of failing.
    pub fn parse(key: IndexKey) -> Result<Selection> {
        match key {
            IndexKey::Str(name) => Ok(Selection::NamedColumn(name)),
            IndexKey::Tuple(items) => Self::parse_pair(items),
            IndexKey::Int(i) => Ok(Selection::ScalarRow(saturating_isize(i.into()))),
            IndexKey::Slice(slice) => Ok(Selection::RowSlice(slice)),
            IndexKey::List(items) => match coerce_array(items)? {
                CoercedArray::Names(names) => Ok(Selection::ColumnArray(names)),
                coerced => coerced
                    .into_rows()
                    .map(Selection::RowArray)
                    .ok_or_else(|| Error::UnsupportedIndex("empty array".to_string())),
            },
            IndexKey::Bool(b) => Err(Error::UnsupportedIndex(format!("boolean scalar {}", b))),
        }
    }

    fn parse_pair(items: Vec<IndexKey>) -> Result<Selection> {
        let description = describe_tuple(&items);
        let unsupported = || Error::UnsupportedIndex(description.clone());

        let [first, second]: [IndexKey; 2] = items.try_into().map_err(|_| unsupported())?;
        match (first, second) {
            (IndexKey::Str(name), IndexKey::Int(i)) => {
                Ok(Selection::NamedColumnAt(name, saturating_isize(i.into())))
            }
            (IndexKey::Str(name), IndexKey::Slice(slice)) => {
                Ok(Selection::NamedColumnRows(name, RowSelector::Slice(slice)))
            }
            (IndexKey::Str(name), IndexKey::List(list)) => coerce_array(list)?
                .into_rows()
                .map(|rows| Selection::NamedColumnRows(name, rows))
                .ok_or_else(unsupported),
            (IndexKey::Str(_), _) => Err(unsupported()),
            (rows, columns) => {
                let rows = match rows {
                    IndexKey::Int(i) => {
                        RowSelector::Slice(RowSlice::single(saturating_isize(i.into())))
                    }
                    IndexKey::Slice(slice) => RowSelector::Slice(slice),
                    IndexKey::List(list) => coerce_array(list)?.into_rows().ok_or_else(unsupported)?,
                    _ => return Err(unsupported()),
                };
                match columns {
                    IndexKey::Str(name) => Ok(Selection::RowsWithColumn(rows, name)),
                    IndexKey::List(list) => coerce_array(list)?
                        .into_names()
                        .map(|names| Selection::RowsWithColumns(rows, names))
                        .ok_or_else(unsupported),
                    _ => Err(unsupported()),
                }
            }
        }
    }
}

/// Result of a read: a column slice or a new table
#[derive(Debug, Clone, PartialEq)]
pub enum Selected {
    Column(Column),
    Table(Table),
}

impl Selected {
    pub fn is_column(&self) -> bool {
        matches!(self, Selected::Column(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Selected::Table(_))
    }

    pub fn into_column(self) -> Result<Column> {
        match self {
            Selected::Column(column) => Ok(column),
            Selected::Table(_) => Err(Error::UnsupportedIndex(
                "index selects a table, not a column".to_string(),
            )),
        }
    }

    pub fn into_table(self) -> Result<Table> {
        match self {
            Selected::Table(table) => Ok(table),
            Selected::Column(_) => Err(Error::UnsupportedIndex(
                "index selects a column, not a table".to_string(),
            )),
        }
    }
}

impl Table {
    /// Reads through any index expression
    pub fn get(&self, key: impl Into<IndexKey>) -> Result<Selected> {
        self.select(Selection::parse(key.into())?)
    }

    /// Reads a column slice; fails if the key selects a table
    pub fn get_column(&self, key: impl Into<IndexKey>) -> Result<Column> {
        self.get(key)?.into_column()
    }

    /// Reads a sub-table; fails if the key selects a column
    pub fn get_table(&self, key: impl Into<IndexKey>) -> Result<Table> {
        self.get(key)?.into_table()
    }

    /// Executes a parsed selection
    pub fn select(&self, selection: Selection) -> Result<Selected> {
        match selection {
            Selection::NamedColumn(name) => Ok(Selected::Column(self.column(&name)?.clone())),
            Selection::NamedColumnAt(name, position) => self
                .column_rows(&name, &RowSelector::Slice(RowSlice::single(position)))
                .map(Selected::Column),
            Selection::NamedColumnRows(name, rows) => {
                self.column_rows(&name, &rows).map(Selected::Column)
            }
            Selection::ScalarRow(position) => self
                .sub_table(&RowSelector::Slice(RowSlice::single(position)), None)
                .map(Selected::Table),
            Selection::RowSlice(slice) => self
                .sub_table(&RowSelector::Slice(slice), None)
                .map(Selected::Table),
            Selection::RowsWithColumn(rows, name) => self
                .sub_table(&rows, Some(std::slice::from_ref(&name)))
                .map(Selected::Table),
            Selection::RowsWithColumns(rows, names) => {
                self.sub_table(&rows, Some(&names)).map(Selected::Table)
            }
            Selection::RowArray(rows) => self.sub_table(&rows, None).map(Selected::Table),
            Selection::ColumnArray(names) => self
                .sub_table(&RowSelector::all(), Some(&names))
                .map(Selected::Table),
        }
    }

    /// Every column, restricted to the selected rows
    pub fn take_rows(&self, rows: impl Into<RowSelector>) -> Result<Table> {
        self.sub_table(&rows.into(), None)
    }

    /// The named columns in the given order, every row
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        self.sub_table(&RowSelector::all(), Some(&names))
    }

    /// The named columns in the given order, restricted to the selected rows
    pub fn select_rows_columns<S: AsRef<str>>(
        &self,
        rows: impl Into<RowSelector>,
        names: &[S],
    ) -> Result<Table> {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        self.sub_table(&rows.into(), Some(&names))
    }

    fn column_rows(&self, name: &str, rows: &RowSelector) -> Result<Column> {
        let column = self.column(name)?;
        let positions = rows.resolve(column.len())?;
        Ok(column.take(&positions))
    }

    fn sub_table(&self, rows: &RowSelector, names: Option<&[String]>) -> Result<Table> {
        let positions = rows.resolve(self.row_count())?;
        let names = names.unwrap_or(self.keys());

        let columns = names
            .iter()
            .map(|name| {
                let column = self.column(name)?.take(&positions);
                Ok((name.clone(), Values::Column(column)))
            })
            .collect::<Result<Vec<_>>>()?;
        Table::from_source(TableSource::Pairs(columns))
    }
}

macro_rules! impl_index_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for IndexKey {
                fn from(value: $t) -> Self {
                    IndexKey::Int(saturating_i64(value as i128))
                }
            }

            impl From<$t> for RowSelector {
                fn from(value: $t) -> Self {
                    RowSelector::Position(saturating_isize(value as i128))
                }
            }

            impl From<Vec<$t>> for RowSelector {
                fn from(positions: Vec<$t>) -> Self {
                    RowSelector::Positions(
                        positions.into_iter().map(|p| saturating_isize(p as i128)).collect(),
                    )
                }
            }
        )*
    };
}

impl_index_from_int!(i32, i64, isize, usize);

macro_rules! impl_slice_from_ranges {
    ($($t:ty),*) => {
        $(
            impl From<Range<$t>> for RowSlice {
                fn from(range: Range<$t>) -> Self {
                    RowSlice::new(
                        Some(saturating_isize(range.start as i128)),
                        Some(saturating_isize(range.end as i128)),
                    )
                }
            }

            impl From<RangeFrom<$t>> for RowSlice {
                fn from(range: RangeFrom<$t>) -> Self {
                    RowSlice::new(Some(saturating_isize(range.start as i128)), None)
                }
            }

            impl From<RangeTo<$t>> for RowSlice {
                fn from(range: RangeTo<$t>) -> Self {
                    RowSlice::new(None, Some(saturating_isize(range.end as i128)))
                }
            }

            impl From<RangeInclusive<$t>> for RowSlice {
                fn from(range: RangeInclusive<$t>) -> Self {
                    RowSlice::new(
                        Some(saturating_isize(*range.start() as i128)),
                        Some(saturating_isize(*range.end() as i128 + 1)),
                    )
                }
            }

            impl From<RangeToInclusive<$t>> for RowSlice {
                fn from(range: RangeToInclusive<$t>) -> Self {
                    RowSlice::new(None, Some(saturating_isize(range.end as i128 + 1)))
                }
            }
        )*
    };
}

impl_slice_from_ranges!(usize, i32);

macro_rules! impl_from_slice_like {
    ($($t:ty),*) => {
        $(
            impl From<$t> for IndexKey {
                fn from(range: $t) -> Self {
                    IndexKey::Slice(RowSlice::from(range))
                }
            }

            impl From<$t> for RowSelector {
                fn from(range: $t) -> Self {
                    RowSelector::Slice(RowSlice::from(range))
                }
            }
        )*
    };
}

impl_from_slice_like!(
    Range<usize>,
    RangeFrom<usize>,
    RangeTo<usize>,
    RangeInclusive<usize>,
    RangeToInclusive<usize>,
    Range<i32>,
    RangeFrom<i32>,
    RangeTo<i32>,
    RangeInclusive<i32>,
    RangeToInclusive<i32>
);

impl From<RangeFull> for RowSlice {
    fn from(_: RangeFull) -> Self {
        RowSlice::full()
    }
}

impl From<RangeFull> for IndexKey {
    fn from(_: RangeFull) -> Self {
        IndexKey::Slice(RowSlice::full())
    }
}

impl From<RangeFull> for RowSelector {
    fn from(_: RangeFull) -> Self {
        RowSelector::all()
    }
}

impl From<RowSlice> for IndexKey {
    fn from(slice: RowSlice) -> Self {
        IndexKey::Slice(slice)
    }
}

impl From<RowSlice> for RowSelector {
    fn from(slice: RowSlice) -> Self {
        RowSelector::Slice(slice)
    }
}

impl From<Vec<bool>> for RowSelector {
    fn from(mask: Vec<bool>) -> Self {
        RowSelector::Mask(mask)
    }
}

impl From<RowSelector> for IndexKey {
    fn from(rows: RowSelector) -> Self {
        match rows {
            RowSelector::Position(p) => IndexKey::Int(saturating_i64(p as i128)),
            RowSelector::Slice(slice) => IndexKey::Slice(slice),
            RowSelector::Positions(positions) => {
                IndexKey::List(
                    positions
                        .into_iter()
                        .map(|p| IndexKey::Int(saturating_i64(p as i128)))
                        .collect(),
                )
            }
            RowSelector::Mask(mask) => IndexKey::List(mask.into_iter().map(IndexKey::Bool).collect()),
        }
    }
}

impl From<bool> for IndexKey {
    fn from(value: bool) -> Self {
        IndexKey::Bool(value)
    }
}

impl From<&str> for IndexKey {
    fn from(name: &str) -> Self {
        IndexKey::Str(name.to_string())
    }
}

impl From<String> for IndexKey {
    fn from(name: String) -> Self {
        IndexKey::Str(name)
    }
}

impl From<&String> for IndexKey {
    fn from(name: &String) -> Self {
        IndexKey::Str(name.clone())
    }
}

impl<T: Into<IndexKey>> From<Vec<T>> for IndexKey {
    fn from(items: Vec<T>) -> Self {
        IndexKey::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<IndexKey>, const N: usize> From<[T; N]> for IndexKey {
    fn from(items: [T; N]) -> Self {
        IndexKey::List(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<IndexKey>, B: Into<IndexKey>> From<(A, B)> for IndexKey {
    fn from((a, b): (A, B)) -> Self {
        IndexKey::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<IndexKey>, B: Into<IndexKey>, C: Into<IndexKey>> From<(A, B, C)> for IndexKey {
    fn from((a, b, c): (A, B, C)) -> Self {
        IndexKey::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
