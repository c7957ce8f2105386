use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{
    ColumnMap, FieldUpdate, FilterColumns, FilterCriteria, build_filter_clause,
    build_update_clause,
};

const COLUMNS: ColumnMap<'static> = ColumnMap::new(&[
    ("field0", "column_0"),
    ("field2", "column_2"),
    ("field4", "column_4"),
]);

/// `n` fields, alternating between integer and text values.
fn fields(n: usize) -> FieldUpdate {
    (0..n)
        .map(|i| {
            let value = if i % 2 == 0 {
                jobly::Value::Int(i as i64)
            } else {
                jobly::Value::from(format!("value {i}"))
            };
            (format!("field{i}"), value)
        })
        .collect()
}

fn bench_update_clause(c: &mut Criterion) {
    let mut group = c.benchmark_group("clause/update");

    for n in [1, 5, 10, 50, 100] {
        let data = fields(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| black_box(build_update_clause(data, &COLUMNS)));
        });
    }

    group.finish();
}

fn bench_update_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("clause/update_render");

    for n in [1, 10, 100] {
        let clause = build_update_clause(&fields(n), &COLUMNS).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &clause, |b, clause| {
            b.iter(|| black_box(clause.to_sql()));
        });
    }

    group.finish();
}

fn bench_filter_clause(c: &mut Criterion) {
    let columns = FilterColumns::new(Some("title"), Some("salary"), Some("equity"));
    let cases = [
        ("empty", FilterCriteria::new()),
        ("substring", FilterCriteria::new().substring("engineer")),
        (
            "all",
            FilterCriteria::new()
                .substring("engineer")
                .lower(50_000)
                .upper(150_000)
                .flag(true),
        ),
    ];

    let mut group = c.benchmark_group("clause/filter");
    for (name, criteria) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), criteria, |b, criteria| {
            b.iter(|| black_box(build_filter_clause(criteria, &columns)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_update_clause,
    bench_update_render,
    bench_filter_clause
);
criterion_main!(benches);
