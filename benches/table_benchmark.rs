use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabula::{CsvConfig, Result, Table, Values};

fn create_test_table(size: usize) -> Result<Table> {
    let categories = ["A", "B", "C", "D", "E"];
    let mut cat_data = Vec::with_capacity(size);
    let mut int_data = Vec::with_capacity(size);
    let mut float_data = Vec::with_capacity(size);

    for i in 0..size {
        cat_data.push(categories[i % categories.len()].to_string());
        int_data.push((i % 1000) as i64);
        float_data.push((i as f64) * 0.1 + (i % 100) as f64);
    }

    Table::from_source(vec![
        ("category", Values::from(cat_data)),
        ("value", Values::from(int_data)),
        ("score", Values::from(float_data)),
    ])
}

fn benchmark_table_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_creation");

    for size in [1_000, 10_000, 100_000].iter() {
        group.bench_with_input(BenchmarkId::new("create_table", size), size, |b, &size| {
            b.iter(|| black_box(create_test_table(size).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_duplicate_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_names");

    for width in [10, 100, 1_000].iter() {
        let pairs: Vec<(String, Vec<i64>)> =
            (0..*width).map(|i| (format!("c{}", i % 7), vec![i as i64])).collect();
        group.bench_with_input(BenchmarkId::new("dedup", width), &pairs, |b, pairs| {
            b.iter(|| black_box(Table::from_source(pairs.clone()).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");

    for size in [10_000, 100_000].iter() {
        let table = create_test_table(*size).unwrap();
        let mask: Vec<bool> = (0..*size).map(|i| i % 3 == 0).collect();

        group.bench_with_input(BenchmarkId::new("row_slice", size), &table, |b, table| {
            b.iter(|| black_box(table.get_table(100..5_000).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("column_list", size), &table, |b, table| {
            b.iter(|| black_box(table.get_table((.., vec!["score", "category"])).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("boolean_mask", size), &table, |b, table| {
            b.iter(|| black_box(table.get_table(mask.clone()).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_csv_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_loading");

    let mut text = String::from("a,b,c\n");
    for i in 0..10_000 {
        text.push_str(&format!("{},{},label{}\n", i, i as f64 * 0.5, i % 10));
    }
    let config = CsvConfig::with_convert(true);

    group.bench_function("read_and_convert", |b| {
        b.iter(|| black_box(tabula::read_csv_from_reader(text.as_bytes(), &config).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_table_creation,
    benchmark_duplicate_names,
    benchmark_indexing,
    benchmark_csv_loading
);
criterion_main!(benches);
