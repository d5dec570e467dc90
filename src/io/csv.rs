use csv::{ReaderBuilder, Trim};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::column::Values;
use crate::config::CsvConfig;
use crate::core::error::{Error, Result};
use crate::table::{Table, TableSource};

/// Read a table from a delimited-text file
///
/// The first row supplies column names. Every column is stored as text unless
/// `convert` is set, in which case each column that parses entirely as
/// floating point becomes float64.
pub fn read_csv<P: AsRef<Path>>(path: P, convert: bool) -> Result<Table> {
    read_csv_with_config(path, &CsvConfig::with_convert(convert))
}

/// Read a table from a delimited-text file with explicit settings
pub fn read_csv_with_config<P: AsRef<Path>>(path: P, config: &CsvConfig) -> Result<Table> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    read_csv_from_reader(file, config)
}

/// Read a table from any reader producing delimited text
pub fn read_csv_from_reader<R: Read>(reader: R, config: &CsvConfig) -> Result<Table> {
    // Field-count checks happen in `table_from_rows`, where padding is decided
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter_byte()?)
        .trim(if config.trim { Trim::All } else { Trim::None })
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(Error::Csv)?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    table_from_rows(rows, config)
}

/// Build a table from rows of text fields
///
/// With a header, the first row names the columns and duplicate names are made
/// unique; without one, columns are named by position. A row whose field count
/// differs from the header is an error unless `config.flexible` is set, in which
/// case short rows are padded with missing values and long rows are truncated.
pub fn table_from_rows<I, R, S>(rows: I, config: &CsvConfig) -> Result<Table>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rows = rows.into_iter().map(|row| {
        row.into_iter()
            .map(|field| {
                let field: String = field.into();
                if config.trim {
                    field.trim().to_string()
                } else {
                    field
                }
            })
            .collect::<Vec<String>>()
    });

    let Some(first) = rows.next() else {
        return Ok(Table::new());
    };

    let width = first.len();
    let (names, pending) = if config.has_header {
        (first, None)
    } else {
        ((0..width).map(|i| i.to_string()).collect(), Some(first))
    };

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for row in pending.into_iter().chain(rows) {
        if row.len() != width && !config.flexible {
            return Err(Error::LengthMismatch {
                expected: width,
                actual: row.len(),
            });
        }
        let mut fields = row.into_iter();
        for column in columns.iter_mut() {
            column.push(fields.next());
        }
    }

    let pairs = names
        .into_iter()
        .zip(columns)
        .map(|(name, column)| (name, Values::from(column)))
        .collect();
    let mut table = Table::from_source(TableSource::Pairs(pairs))?;

    if config.convert {
        convert_numeric_columns(&mut table)?;
    }
    Ok(table)
}

/// Reinterprets every text column that parses entirely as float64
///
/// A column that fails to parse is left as text.
fn convert_numeric_columns(table: &mut Table) -> Result<()> {
    let names = table.keys().to_vec();
    for name in names {
        let converted = table.column(&name)?.parse_float();
        match converted {
            Some(converted) => table.set_column(name, converted)?,
            None => debug!("Column '{}' kept as text: not every value is numeric", name),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    #[test]
    fn test_rows_without_header_are_named_by_position() {
        let config = CsvConfig {
            has_header: false,
            ..CsvConfig::default()
        };
        let table = table_from_rows(vec![vec!["1", "2"], vec!["3", "4"]], &config).unwrap();
        assert_eq!(table.keys(), &["0", "1"]);
        assert_eq!(table.shape(), (2, 2));
    }

    #[test]
    fn test_ragged_rows_rejected_unless_flexible() {
        let rows = vec![vec!["a", "b"], vec!["1"]];
        let strict = table_from_rows(rows.clone(), &CsvConfig::default());
        assert!(matches!(
            strict,
            Err(Error::LengthMismatch { expected: 2, actual: 1 })
        ));

        let config = CsvConfig {
            flexible: true,
            ..CsvConfig::default()
        };
        let table = table_from_rows(rows, &config).unwrap();
        assert!(table.column("b").unwrap().is_missing(0).unwrap());
    }

    #[test]
    fn test_partial_conversion_is_column_local() {
        let rows = vec![vec!["n", "s"], vec!["1.5", "x"], vec!["2", "y"]];
        let table = table_from_rows(rows, &CsvConfig::with_convert(true)).unwrap();
        assert_eq!(table.column("n").unwrap().column_type(), ColumnType::Float64);
        assert_eq!(table.column("s").unwrap().column_type(), ColumnType::String);
    }
}
