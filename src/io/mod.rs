pub mod csv;
pub mod json;

// Re-export commonly used functions
pub use csv::{read_csv, read_csv_from_reader, read_csv_with_config, table_from_rows};
pub use json::{read_json, read_json_str, source_from_json};
