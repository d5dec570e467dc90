use std::io::Write;

use tabula::io::table_from_rows;
use tabula::{
    read_csv, read_csv_from_reader, read_csv_with_config, Column, ColumnType, CsvConfig, Error,
    Table,
};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_read_csv_with_conversion() -> Result<(), Error> {
    let file = write_temp("a,b\n1,2\n3,4\n");
    let table = read_csv(file.path(), true)?;

    assert_eq!(table.keys(), &["a", "b"]);
    assert_eq!(table.column("a")?, &Column::from(vec![1.0, 3.0]));
    assert_eq!(table.column("b")?, &Column::from(vec![2.0, 4.0]));
    Ok(())
}

#[test]
fn test_read_csv_without_conversion_keeps_text() -> Result<(), Error> {
    let file = write_temp("a,b\n1,2\n3,4\n");
    let table = read_csv(file.path(), false)?;

    assert_eq!(table.column("a")?.column_type(), ColumnType::String);
    assert_eq!(table.column("a")?, &Column::from(vec!["1", "3"]));
    Ok(())
}

#[test]
fn test_failed_conversion_is_column_local() -> Result<(), Error> {
    let data = "id,name,score\n1,alice,0.5\n2,bob,n/a\n3,carol,1e3\n";
    let table = read_csv_from_reader(data.as_bytes(), &CsvConfig::with_convert(true))?;

    assert_eq!(table.column("id")?.column_type(), ColumnType::Float64);
    assert_eq!(table.column("name")?.column_type(), ColumnType::String);
    assert_eq!(table.column("score")?.column_type(), ColumnType::String);
    assert_eq!(table.shape(), (3, 3));
    Ok(())
}

#[test]
fn test_duplicate_headers_are_renamed() -> Result<(), Error> {
    let table = read_csv_from_reader("x,x,y\n1,2,3\n".as_bytes(), &CsvConfig::default())?;
    assert_eq!(table.keys(), &["x", "x-1", "y"]);
    Ok(())
}

#[test]
fn test_header_only_and_empty_input() -> Result<(), Error> {
    let header_only = read_csv_from_reader("a,b\n".as_bytes(), &CsvConfig::default())?;
    assert_eq!(header_only.shape(), (0, 2));

    let empty = read_csv_from_reader("".as_bytes(), &CsvConfig::default())?;
    assert_eq!(empty, Table::new());
    Ok(())
}

#[test]
fn test_custom_delimiter_and_trim() -> Result<(), Error> {
    let config = CsvConfig {
        delimiter: ';',
        trim: true,
        convert: true,
        ..CsvConfig::default()
    };
    let table = read_csv_from_reader(" a ; b \n 1 ; x \n".as_bytes(), &config)?;
    assert_eq!(table.keys(), &["a", "b"]);
    assert_eq!(table.column("a")?, &Column::from(vec![1.0]));
    assert_eq!(table.column("b")?, &Column::from(vec!["x"]));
    Ok(())
}

#[test]
fn test_ragged_rows() {
    let data = "a,b,c\n1,2,3\n4,5\n";
    let strict = read_csv_from_reader(data.as_bytes(), &CsvConfig::default());
    assert!(matches!(
        strict,
        Err(Error::LengthMismatch {
            expected: 3,
            actual: 2
        })
    ));

    let config = CsvConfig {
        flexible: true,
        convert: true,
        ..CsvConfig::default()
    };
    let table = read_csv_from_reader(data.as_bytes(), &config).unwrap();
    let c = table.column("c").unwrap();
    assert_eq!(c.column_type(), ColumnType::Float64);
    assert!(c.is_missing(1).unwrap());
    assert_eq!(c.null_count(), 1);
}

#[test]
fn test_long_rows_truncated_when_flexible() {
    let config = CsvConfig {
        flexible: true,
        ..CsvConfig::default()
    };
    let table = table_from_rows(vec![vec!["a"], vec!["1", "extra"]], &config).unwrap();
    assert_eq!(table.shape(), (1, 1));
}

#[test]
fn test_no_header_config() -> Result<(), Error> {
    let file = write_temp("5,6\n7,8\n");
    let config = CsvConfig {
        has_header: false,
        convert: true,
        ..CsvConfig::default()
    };
    let table = read_csv_with_config(file.path(), &config)?;
    assert_eq!(table.keys(), &["0", "1"]);
    assert_eq!(table.column("1")?, &Column::from(vec![6.0, 8.0]));
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let result = read_csv("/definitely/not/here.csv", false);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_non_ascii_delimiter_rejected() {
    let config = CsvConfig {
        delimiter: '§',
        ..CsvConfig::default()
    };
    let result = read_csv_from_reader("a\n1\n".as_bytes(), &config);
    assert!(matches!(result, Err(Error::ConfigurationError(_))));
}
