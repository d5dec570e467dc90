use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array2;
use serde_json::{Map, Value as Json};

use crate::column::{Column, ColumnType, Value, Values};
use crate::core::error::{Error, Result};
use crate::table::{Table, TableSource};

/// Read a table from a JSON file
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Table> {
    let file = File::open(path.as_ref()).map_err(Error::Io)?;
    let reader = BufReader::new(file);

    let json: Json = serde_json::from_reader(reader).map_err(Error::Json)?;
    Table::from_source(source_from_json(json)?)
}

/// Read a table from a JSON string
pub fn read_json_str(text: &str) -> Result<Table> {
    let json: Json = serde_json::from_str(text)?;
    Table::from_source(source_from_json(json)?)
}

/// Adapts a JSON document to a construction source
///
/// - an object maps names to arrays and is unordered (columns sort by name)
/// - an array of `[name, [values...]]` pairs keeps pair order
/// - an array of equal-length arrays of scalars is a row-major matrix
///
/// Anything else is rejected with the JSON type in the message.
pub fn source_from_json(json: Json) -> Result<TableSource> {
    match json {
        Json::Object(map) => object_source(map),
        Json::Array(items) if items.is_empty() => Ok(TableSource::Empty),
        Json::Array(items) if items.iter().all(is_pair) => pairs_source(items),
        Json::Array(items) if items.iter().all(is_scalar_row) => matrix_source(items),
        Json::Array(_) => Err(Error::UnsupportedSourceType(
            "JSON array that is neither pairs nor a matrix".to_string(),
        )),
        other => Err(Error::UnsupportedSourceType(format!(
            "JSON {}",
            json_type(&other)
        ))),
    }
}

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn scalar(json: &Json) -> Option<Value> {
    match json {
        Json::Null => Some(Value::Null),
        Json::Bool(b) => Some(Value::Boolean(*b)),
        Json::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => Value::Float64(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Json::String(s) => Some(Value::String(s.clone())),
        Json::Array(_) | Json::Object(_) => None,
    }
}

fn is_pair(json: &Json) -> bool {
    matches!(json, Json::Array(pair) if pair.len() == 2
        && pair[0].is_string()
        && pair[1].is_array())
}

fn is_scalar_row(json: &Json) -> bool {
    matches!(json, Json::Array(row) if row.iter().all(|cell| scalar(cell).is_some()))
}

/// One column from a JSON array of scalars
fn column_values(name: &str, json: &Json) -> Result<Values> {
    let Json::Array(items) = json else {
        return Err(Error::Dimensionality {
            name: name.to_string(),
            ndim: 0,
        });
    };

    let cells = items
        .iter()
        .map(|item| {
            scalar(item).ok_or_else(|| Error::Dimensionality {
                name: name.to_string(),
                ndim: 2,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Values::Column(Column::from_values(&cells)))
}

fn object_source(map: Map<String, Json>) -> Result<TableSource> {
    let columns: HashMap<String, Values> = map
        .iter()
        .map(|(name, json)| Ok((name.clone(), column_values(name, json)?)))
        .collect::<Result<_>>()?;
    Ok(TableSource::Unordered(columns))
}

fn pairs_source(items: Vec<Json>) -> Result<TableSource> {
    let mut pairs = Vec::with_capacity(items.len());
    for item in &items {
        if let Json::Array(pair) = item {
            let name = pair[0].as_str().unwrap_or_default().to_string();
            let values = column_values(&name, &pair[1])?;
            pairs.push((name, values));
        }
    }
    Ok(TableSource::Pairs(pairs))
}

fn matrix_source(items: Vec<Json>) -> Result<TableSource> {
    let rows: Vec<Vec<Value>> = items
        .iter()
        .map(|item| match item {
            Json::Array(row) => row.iter().filter_map(scalar).collect(),
            _ => Vec::new(),
        })
        .collect();

    let width = rows.first().map_or(0, Vec::len);
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(Error::Shape(format!(
            "matrix rows must have equal length: expected {}, found {}",
            width,
            row.len()
        )));
    }

    let cells: Vec<Value> = rows.into_iter().flatten().collect();
    if cells.iter().any(Value::is_null) {
        return Err(Error::UnsupportedSourceType(
            "JSON matrix with null cells".to_string(),
        ));
    }

    let shape = (cells.len() / width.max(1), width);
    let column_type = cells
        .iter()
        .filter_map(Value::column_type)
        .reduce(ColumnType::unify)
        .unwrap_or(ColumnType::Float64);

    let values = match column_type {
        ColumnType::Boolean => Values::from(Array2::from_shape_vec(
            shape,
            cells.iter().map(|v| v.as_bool().unwrap_or_default()).collect(),
        )?),
        ColumnType::Int64 => Values::from(Array2::from_shape_vec(
            shape,
            cells.iter().map(|v| v.as_i64().unwrap_or_default()).collect(),
        )?),
        ColumnType::Float64 => Values::from(Array2::from_shape_vec(
            shape,
            cells.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect(),
        )?),
        ColumnType::String => Values::from(Array2::from_shape_vec(
            shape,
            cells.iter().map(Value::to_string).collect(),
        )?),
    };
    Ok(TableSource::Matrix(values))
}
