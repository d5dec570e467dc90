use serde_json::json;
use tabula::{Column, Error, IndexKey, RowSlice, Table, Value, Values};

fn numbers() -> Table {
    Table::from_source(vec![
        ("x", Values::from(vec![1i64, 2, 3])),
        ("y", Values::from(vec![1.0, 4.0, 9.0])),
    ])
    .unwrap()
}

#[test]
fn test_assign_new_column_appends() {
    let mut table = numbers();
    table.assign("z", vec!["p", "q", "r"]).unwrap();
    assert_eq!(table.keys(), &["x", "y", "z"]);
}

#[test]
fn test_assign_existing_column_keeps_position() {
    let mut table = numbers();
    table.assign("x", vec![true, false, true]).unwrap();
    assert_eq!(table.keys(), &["x", "y"]);
    assert_eq!(table.column("x").unwrap(), &Column::from(vec![true, false, true]));
}

#[test]
fn test_first_column_sets_row_count() {
    let mut table = Table::new();
    table.assign("a", vec![1.0, 2.0]).unwrap();
    assert_eq!(table.shape(), (2, 1));
}

#[test]
fn test_length_mismatch_leaves_table_unchanged() {
    let mut table = numbers();
    let before = table.clone();

    let result = table.assign("z", vec![1, 2]);
    assert!(matches!(
        result,
        Err(Error::LengthMismatch {
            expected: 3,
            actual: 2
        })
    ));
    assert_eq!(table, before);

    let result = table.assign("x", vec![1, 2, 3, 4]);
    assert!(result.is_err());
    assert_eq!(table, before);
}

#[test]
fn test_multidimensional_assignment_fails() {
    let mut table = numbers();
    let matrix = Values::from(ndarray::Array2::<f64>::zeros((3, 2)));
    assert!(matches!(
        table.assign("m", matrix),
        Err(Error::Dimensionality { ndim: 2, .. })
    ));
    assert!(!table.contains_column("m"));
}

#[test]
fn test_assign_single_element() {
    let mut table = numbers();
    table.assign(("x", 1), vec![20]).unwrap();
    assert_eq!(table.column("x").unwrap(), &Column::from(vec![1i64, 20, 3]));

    table.assign(("y", -1), vec![0.25]).unwrap();
    assert_eq!(table.column("y").unwrap().get(2).unwrap(), Value::Float64(0.25));
}

#[test]
fn test_assign_slice_of_elements() {
    let mut table = numbers();
    table.assign(("y", 0..2), vec![-1.0, -2.0]).unwrap();
    assert_eq!(table.column("y").unwrap(), &Column::from(vec![-1.0, -2.0, 9.0]));

    table.assign(("x", ..), vec![0]).unwrap();
    assert_eq!(table.column("x").unwrap(), &Column::from(vec![0i64, 0, 0]));
}

#[test]
fn test_element_assignment_widens_values() {
    let mut table = numbers();
    table.assign(("y", 0), vec![5]).unwrap();
    assert_eq!(table.column("y").unwrap().get(0).unwrap(), Value::Float64(5.0));

    let result = table.assign(("x", 0), vec![1.5]);
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    assert_eq!(table, numbers());
}

#[test]
fn test_element_assignment_length_checks() {
    let mut table = numbers();
    let result = table.assign(("x", RowSlice::new(Some(0), Some(2))), vec![7, 8, 9]);
    assert!(matches!(
        result,
        Err(Error::LengthMismatch {
            expected: 2,
            actual: 3
        })
    ));
    assert!(matches!(
        table.assign(("x", 3), vec![1]),
        Err(Error::IndexOutOfBounds { .. })
    ));
    assert!(matches!(
        table.assign(("nope", 0), vec![1]),
        Err(Error::UnknownColumn(_))
    ));
}

#[test]
fn test_element_assignment_clears_missing_flag() {
    let mut table = Table::from_source(vec![("m", vec![None, Some(2i64)])]).unwrap();
    assert_eq!(table.column("m").unwrap().null_count(), 1);

    table.assign(("m", 0), vec![1]).unwrap();
    assert_eq!(table.column("m").unwrap().null_count(), 0);

    table.set_values("m", 1, vec![None::<i64>]).unwrap();
    assert!(table.column("m").unwrap().is_missing(1).unwrap());
}

#[test]
fn test_unsupported_assignment_keys() {
    let mut table = numbers();
    for key in [
        IndexKey::from(0),
        IndexKey::from(0..1),
        IndexKey::from(vec!["x", "y"]),
        IndexKey::from((0, "x")),
        IndexKey::from(("x", vec![0, 1])),
    ] {
        let result = table.assign(key.clone(), vec![1, 2]);
        assert!(
            matches!(result, Err(Error::UnsupportedAssignment(_))),
            "{:?} should be rejected",
            key
        );
    }
}

#[test]
fn test_remove_column() {
    let mut table = numbers();
    table.metadata_mut("x").unwrap().insert("unit".into(), json!("m"));

    let removed = table.remove_column("x").unwrap();
    assert_eq!(removed, Column::from(vec![1i64, 2, 3]));
    assert_eq!(table.keys(), &["y"]);
    assert!(table.get("x").is_err());
    assert!(matches!(table.remove_column("x"), Err(Error::UnknownColumn(_))));

    // Metadata does not survive the column
    table.assign("x", vec![0, 0, 0]).unwrap();
    assert!(table.metadata("x").unwrap().is_empty());
    assert_eq!(table.keys(), &["y", "x"]);
}

#[test]
fn test_removing_last_column_resets_row_count() {
    let mut table = Table::from_source(vec![("only", vec![1, 2, 3])]).unwrap();
    table.remove_column("only").unwrap();
    assert_eq!(table.shape(), (0, 0));

    table.assign("fresh", vec![1.0]).unwrap();
    assert_eq!(table.shape(), (1, 1));
}

#[test]
fn test_metadata_is_lazy_and_per_column() {
    let mut table = numbers();
    assert!(table.metadata("x").unwrap().is_empty());

    table
        .metadata_mut("y")
        .unwrap()
        .insert("label".to_string(), json!({"title": "squares"}));
    assert_eq!(table.metadata("y").unwrap()["label"]["title"], json!("squares"));
    assert!(table.metadata("x").unwrap().is_empty());

    assert!(matches!(table.metadata("nope"), Err(Error::UnknownColumn(_))));
    assert!(matches!(table.metadata_mut("nope"), Err(Error::UnknownColumn(_))));
}

#[test]
fn test_metadata_does_not_affect_data() {
    let mut table = numbers();
    let before = table.clone();
    table.metadata_mut("x").unwrap().insert("k".into(), json!(1));
    assert_eq!(table, before);
    assert_eq!(table.shape(), (3, 2));
}
