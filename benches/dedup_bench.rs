use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tabdedup::{
    ExactConfig, FuzzyConfig, HashAlgorithm, HashJoinConfig, KeyedTable, RawTable,
    deduplicate_exact, deduplicate_fuzzy, deduplicate_hash_join,
};

/// `n` tables of `rows x 4` cells; every fourth table repeats an earlier one
/// with its rows reversed.
fn sample_corpus(n: u64, rows: usize) -> Vec<RawTable> {
    (0..n)
        .map(|id| {
            let source = if id % 4 == 3 { id - 1 } else { id };
            let mut cells: Vec<Vec<String>> = (0..rows)
                .map(|r| (0..4).map(|c| format!("t{source}r{r}c{c}")).collect())
                .collect();
            if source != id {
                cells.reverse();
            }
            RawTable::from_rows(id, cells)
        })
        .collect()
}

fn keyed_corpus(tables: &[RawTable]) -> Vec<KeyedTable> {
    tables
        .iter()
        .map(|table| {
            let keys: Vec<String> = table
                .rows()
                .map(|(_, row)| {
                    let mut values: Vec<&str> = row.values().map(String::as_str).collect();
                    values.sort_unstable();
                    let weight: u32 = values.concat().bytes().map(u32::from).sum();
                    format!("{weight:b}")
                })
                .collect();
            KeyedTable::from_binary_keys(table.clone(), &keys).expect("one key per row")
        })
        .collect()
}

fn bench_exact(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact");
    for size in [100u64, 1_000] {
        let tables = sample_corpus(size, 8);
        group.throughput(Throughput::Elements(size));
        for hash in [HashAlgorithm::Fnv1_64, HashAlgorithm::SimHash64] {
            let config = ExactConfig::default().with_hash(hash);
            group.bench_with_input(BenchmarkId::new(hash.as_str(), size), &tables, |b, t| {
                b.iter(|| deduplicate_exact(black_box(t), &config))
            });
        }
        let parallel = ExactConfig::default().with_parallel(true);
        group.bench_with_input(BenchmarkId::new("parallel", size), &tables, |b, t| {
            b.iter(|| deduplicate_exact(black_box(t), &parallel))
        });
    }
    group.finish();
}

fn bench_hash_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_join");
    let tables = keyed_corpus(&sample_corpus(200, 8));
    group.throughput(Throughput::Elements(tables.len() as u64));
    group.bench_function("default", |b| {
        b.iter(|| deduplicate_hash_join(black_box(&tables), &HashJoinConfig::default()))
    });
    group.finish();
}

fn bench_fuzzy(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuzzy");
    let tables = sample_corpus(200, 8);
    for tolerance in [3u32, 16] {
        let config = FuzzyConfig::default().with_bit_tolerance(tolerance);
        group.bench_with_input(BenchmarkId::new("tolerance", tolerance), &tables, |b, t| {
            b.iter(|| deduplicate_fuzzy(black_box(t), &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_exact, bench_hash_join, bench_fuzzy);
criterion_main!(benches);
