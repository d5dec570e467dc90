//! Construction sources
//!
//! Every shape a table can be built from is one variant of [`TableSource`].
//! Foreign structures are adapted into a variant before the table sees them:
//! keyed containers through the `From` impls, column-ordered containers through
//! [`OrderedColumns`], and data frames through [`FrameSource`].

use std::collections::{BTreeMap, HashMap};

use ndarray::Array2;

use crate::column::Values;
use crate::config::FrameConfig;
use crate::core::error::{Error, Result};
use crate::table::base::Table;

/// Name template used for frame index columns when none is given
pub const DEFAULT_INDEX_TEMPLATE: &str = "index{}";

/// A keyed source whose key order is meaningful
pub trait OrderedColumns {
    /// Column names, in column order
    fn column_names(&self) -> Vec<String>;

    /// Values stored under `name`
    fn column_values(&self, name: &str) -> Result<Values>;
}

impl OrderedColumns for Table {
    fn column_names(&self) -> Vec<String> {
        self.keys().to_vec()
    }

    fn column_values(&self, name: &str) -> Result<Values> {
        Ok(Values::Column(self.column(name)?.clone()))
    }
}

/// A foreign tabular frame: labelled columns plus an optional multi-level row index
pub trait FrameSource {
    /// Column labels, in frame order
    fn column_labels(&self) -> Vec<String>;

    /// Values of the column at `position`
    fn column_values(&self, position: usize) -> Result<Values>;

    /// Number of row index levels
    fn index_levels(&self) -> usize {
        0
    }

    /// Values of row index level `level`
    fn index_level_values(&self, level: usize) -> Result<Values> {
        Err(Error::IndexOutOfBounds {
            index: level as isize,
            size: self.index_levels(),
        })
    }
}

/// Plain in-memory frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    labels: Vec<String>,
    columns: Vec<Values>,
    index: Vec<Values>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a labelled column
    pub fn with_column(mut self, label: impl ToString, values: impl Into<Values>) -> Self {
        self.labels.push(label.to_string());
        self.columns.push(values.into());
        self
    }

    /// Appends a row index level
    pub fn with_index_level(mut self, values: impl Into<Values>) -> Self {
        self.index.push(values.into());
        self
    }

    /// Copies any frame implementation into a `Frame`
    pub fn from_source<F: FrameSource + ?Sized>(source: &F) -> Result<Self> {
        let labels = source.column_labels();
        let columns = (0..labels.len())
            .map(|i| source.column_values(i))
            .collect::<Result<Vec<_>>>()?;
        let index = (0..source.index_levels())
            .map(|level| source.index_level_values(level))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            labels,
            columns,
            index,
        })
    }
}

impl FrameSource for Frame {
    fn column_labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn column_values(&self, position: usize) -> Result<Values> {
        self.columns
            .get(position)
            .cloned()
            .ok_or(Error::IndexOutOfBounds {
                index: position as isize,
                size: self.columns.len(),
            })
    }

    fn index_levels(&self) -> usize {
        self.index.len()
    }

    fn index_level_values(&self, level: usize) -> Result<Values> {
        self.index.get(level).cloned().ok_or(Error::IndexOutOfBounds {
            index: level as isize,
            size: self.index.len(),
        })
    }
}

/// Whether and how a frame's row index becomes leading columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexNames {
    /// Leave the row index out
    #[default]
    Exclude,
    /// Include the index, named with [`DEFAULT_INDEX_TEMPLATE`]
    Default,
    /// Include the index, named with a template accepting `{}`, `{0}` or `{index}`
    Template(String),
}

impl IndexNames {
    /// Includes the index using the configured template
    pub fn from_config(config: &FrameConfig) -> Self {
        IndexNames::Template(config.index_name_template.clone())
    }

    fn template(&self) -> Option<&str> {
        match self {
            IndexNames::Exclude => None,
            IndexNames::Default => Some(DEFAULT_INDEX_TEMPLATE),
            IndexNames::Template(t) => Some(t),
        }
    }
}

/// Substitutes a zero-based index level into a name template
///
/// Supports `{}`, `{0}` and `{index}` fields with an optional `:[0][width][d]`
/// spec, and `{{`/`}}` escapes.
pub fn format_index_name(template: &str, level: usize) -> Result<String> {
    let invalid = |reason: &str| {
        Error::ConfigurationError(format!(
            "Invalid index name template '{}': {}",
            template, reason
        ))
    };

    let mut out = String::with_capacity(template.len() + 2);
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => return Err(invalid("unterminated field")),
                    }
                }
                let (key, spec) = field.split_once(':').unwrap_or((field.as_str(), ""));
                if !matches!(key, "" | "0" | "index") {
                    return Err(invalid(&format!("unknown field '{}'", key)));
                }
                out.push_str(&apply_format_spec(level, spec).ok_or_else(|| invalid("bad format spec"))?);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(invalid("single '}'")),
            c => out.push(c),
        }
    }
    Ok(out)
}

fn apply_format_spec(level: usize, spec: &str) -> Option<String> {
    let spec = spec.strip_suffix('d').unwrap_or(spec);
    if spec.is_empty() {
        return Some(level.to_string());
    }

    let width: usize = spec.parse().ok()?;
    if spec.starts_with('0') {
        Some(format!("{:0width$}", level, width = width))
    } else {
        Some(format!("{:>width$}", level, width = width))
    }
}

/// The closed set of shapes a table can be built from
#[derive(Debug, Clone, Default)]
pub enum TableSource {
    /// No columns
    #[default]
    Empty,
    /// Keyed source with a known order (another table, an ordered map, a bundled array file)
    Ordered(Vec<(String, Values)>),
    /// Keyed source without a meaningful order; columns are sorted by name
    Unordered(HashMap<String, Values>),
    /// Sequence of `(name, values)` pairs
    Pairs(Vec<(String, Values)>),
    /// Two-dimensional matrix; columns are named by their zero-based position
    Matrix(Values),
    /// Foreign data frame
    Frame { frame: Frame, index: IndexNames },
}

impl TableSource {
    /// Captures an ordered keyed source
    pub fn ordered<S: OrderedColumns + ?Sized>(source: &S) -> Result<Self> {
        let columns = source
            .column_names()
            .into_iter()
            .map(|name| {
                let values = source.column_values(&name)?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TableSource::Ordered(columns))
    }

    pub fn pairs<K, V, I>(items: I) -> Self
    where
        K: Into<String>,
        V: Into<Values>,
        I: IntoIterator<Item = (K, V)>,
    {
        TableSource::Pairs(items.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn unordered<K, V, I>(items: I) -> Self
    where
        K: Into<String>,
        V: Into<Values>,
        I: IntoIterator<Item = (K, V)>,
    {
        TableSource::Unordered(items.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn matrix(values: impl Into<Values>) -> Self {
        TableSource::Matrix(values.into())
    }

    pub fn frame(frame: Frame, index: IndexNames) -> Self {
        TableSource::Frame { frame, index }
    }

    /// Captures any frame implementation
    pub fn from_frame<F: FrameSource + ?Sized>(source: &F, index: IndexNames) -> Result<Self> {
        Ok(TableSource::frame(Frame::from_source(source)?, index))
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            TableSource::Empty => "empty",
            TableSource::Ordered(_) => "ordered",
            TableSource::Unordered(_) => "unordered",
            TableSource::Pairs(_) => "pairs",
            TableSource::Matrix(_) => "matrix",
            TableSource::Frame { .. } => "frame",
        }
    }

    /// Normalizes the source into `(name, values)` pairs in column order
    pub(crate) fn into_named_values(self) -> Result<Vec<(String, Values)>> {
        let named = match self {
            TableSource::Empty => Vec::new(),
            TableSource::Ordered(columns) | TableSource::Pairs(columns) => columns,
            TableSource::Unordered(map) => {
                let mut columns: Vec<(String, Values)> = map.into_iter().collect();
                columns.sort_by(|a, b| a.0.cmp(&b.0));
                columns
            }
            TableSource::Matrix(values) => values
                .into_matrix_columns()?
                .into_iter()
                .enumerate()
                .map(|(i, column)| (i.to_string(), Values::Column(column)))
                .collect(),
            TableSource::Frame { frame, index } => {
                let mut columns = Vec::new();
                if let Some(template) = index.template() {
                    for level in 0..frame.index_levels() {
                        let name = format_index_name(template, level)?;
                        columns.push((name, frame.index_level_values(level)?));
                    }
                }
                columns.extend(frame.labels.into_iter().zip(frame.columns));
                columns
            }
        };
        Ok(named)
    }
}

impl From<&Table> for TableSource {
    fn from(table: &Table) -> Self {
        TableSource::Ordered(
            table
                .items()
                .map(|(name, column)| (name.to_string(), Values::Column(column.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Values>> From<Vec<(K, V)>> for TableSource {
    fn from(items: Vec<(K, V)>) -> Self {
        TableSource::pairs(items)
    }
}

impl<K: Into<String>, V: Into<Values>, S> From<HashMap<K, V, S>> for TableSource {
    fn from(map: HashMap<K, V, S>) -> Self {
        TableSource::unordered(map)
    }
}

impl<K: Into<String>, V: Into<Values>> From<BTreeMap<K, V>> for TableSource {
    fn from(map: BTreeMap<K, V>) -> Self {
        TableSource::unordered(map)
    }
}

impl<T> From<Array2<T>> for TableSource
where
    Values: From<Array2<T>>,
{
    fn from(matrix: Array2<T>) -> Self {
        TableSource::Matrix(Values::from(matrix))
    }
}

impl From<Frame> for TableSource {
    fn from(frame: Frame) -> Self {
        TableSource::frame(frame, IndexNames::Exclude)
    }
}

impl TryFrom<Values> for TableSource {
    type Error = Error;

    /// Only rank-2 values describe a table on their own
    fn try_from(values: Values) -> Result<Self> {
        match values.ndim() {
            2 => Ok(TableSource::Matrix(values)),
            ndim => Err(Error::UnsupportedSourceType(format!(
                "{}-dimensional array",
                ndim
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_template_fields() {
        assert_eq!(format_index_name("index{}", 0).unwrap(), "index0");
        assert_eq!(format_index_name("level_{0}", 2).unwrap(), "level_2");
        assert_eq!(format_index_name("{index}_idx", 1).unwrap(), "1_idx");
        assert_eq!(format_index_name("i{:03d}", 7).unwrap(), "i007");
        assert_eq!(format_index_name("{{{}}}", 4).unwrap(), "{4}");
    }

    #[test]
    fn test_index_template_rejects_unknown_fields() {
        assert!(format_index_name("{1}", 0).is_err());
        assert!(format_index_name("{name}", 0).is_err());
        assert!(format_index_name("index{", 0).is_err());
        assert!(format_index_name("index}", 0).is_err());
    }

    #[test]
    fn test_unordered_source_is_sorted() {
        let mut map = HashMap::new();
        map.insert("b", vec![1i64, 2]);
        map.insert("a", vec![3i64, 4]);
        let named = TableSource::from(map).into_named_values().unwrap();
        let names: Vec<_> = named.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_one_dimensional_values_are_not_a_source() {
        let result = TableSource::try_from(Values::from(vec![1.0, 2.0]));
        assert!(matches!(result, Err(Error::UnsupportedSourceType(_))));
    }
}
