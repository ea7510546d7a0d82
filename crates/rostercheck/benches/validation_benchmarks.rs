//! Row validation and ingestion benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rostercheck::input::Parser;
use rostercheck::transform::{attach_hours, tutoring_hours};
use rostercheck::validation::RowValidator;
use rostercheck::{Schema, SchemaKind, Table, ValidationPolicy, summarize};

fn header(schema: &Schema) -> Vec<String> {
    schema.field_names().iter().map(|s| s.to_string()).collect()
}

/// Generate a student table with `rows` rows, every tenth one invalid.
fn student_table(rows: usize) -> Table {
    let schema = Schema::student();
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            let gender = if i % 10 == 0 { "M" } else { "Female" };
            vec![
                format!("{:010}", i),
                "1234567".to_string(),
                "District".to_string(),
                format!("{:06}", i % 1000),
                format!("School {}", i % 40),
                (i % 13).to_string(),
                gender.to_string(),
                format!("Group {}", i % 8),
                "TRUE".to_string(),
                "FALSE".to_string(),
                "FALSE".to_string(),
                "FALSE".to_string(),
                (650 + i % 150).to_string(),
                "700".to_string(),
                "710".to_string(),
                "720".to_string(),
                "730".to_string(),
                "740".to_string(),
                "proficient".to_string(),
                "basic".to_string(),
                "FALSE".to_string(),
                "TRUE".to_string(),
            ]
        })
        .collect();
    Table::from_strings(&header(&schema), &data)
}

fn session_table(rows: usize) -> Table {
    let data: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                format!("{:010}", i % 500),
                if i % 2 == 0 { "math" } else { "ELA" }.to_string(),
                format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
                (15 + i % 60).to_string(),
                format!("T{}", i % 25),
            ]
        })
        .collect();
    Table::from_strings(&header(&Schema::session()), &data)
}

/// Benchmark the row engine at increasing table sizes.
fn bench_row_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_validation");
    let schema = Schema::student();

    for rows in [100, 1_000, 10_000] {
        let table = student_table(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("strict", rows), &table, |b, table| {
            let validator = RowValidator::new(&schema, ValidationPolicy::strict());
            b.iter(|| black_box(validator.validate(table)))
        });

        group.bench_with_input(BenchmarkId::new("lenient", rows), &table, |b, table| {
            let validator = RowValidator::new(&schema, ValidationPolicy::lenient());
            b.iter(|| black_box(validator.validate(table)))
        });
    }

    group.finish();
}

/// Benchmark delimited parsing in both modes.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    let text = student_table(5_000).to_delimited(',');
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("naive_5000", |b| {
        let parser = Parser::new();
        b.iter(|| black_box(parser.parse_str(&text)))
    });

    group.bench_function("quoted_5000", |b| {
        let parser = Parser::with_config(rostercheck::ParserConfig {
            delimiter: Some(b','),
            quoting: true,
        });
        b.iter(|| black_box(parser.parse_str(&text)))
    });

    group.finish();
}

/// Benchmark summary and dosage aggregation.
fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    let students = student_table(5_000);
    let sessions = session_table(20_000);

    group.bench_function("summarize_5000", |b| {
        b.iter(|| black_box(summarize(&students, SchemaKind::Student)))
    });

    group.bench_function("dosage_20000_sessions", |b| {
        b.iter(|| {
            let hours = tutoring_hours(&sessions).unwrap();
            black_box(attach_hours(&students, &hours))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_row_validation, bench_parsing, bench_aggregation);
criterion_main!(benches);
