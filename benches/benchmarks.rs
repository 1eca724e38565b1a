//! Search benchmarks for versefind
//!
//! Run with: cargo bench

#[path = "../tests/fixtures/utils.rs"]
mod fixtures;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use versefind::query::{GrepSearch, IndexedSearch, QueryTokenizer, SearchEngine, Tokenizer};
use versefind::types::{Ari, BookScope, Query};
use versefind::utils::intersect_sorted;

const QUERIES: &[&str] = &[
    "light",
    "+god",
    "lord god",
    "+the shepherd sheep",
    "\"the lord\"",
    "go",
];

fn bench_intersection(c: &mut Criterion) {
    let a: Vec<Ari> = (0..20_000u32).filter(|n| n % 3 == 0).map(Ari).collect();
    let b: Vec<Ari> = (0..20_000u32).filter(|n| n % 5 == 0).map(Ari).collect();

    c.bench_function("intersect_sorted", |bench| {
        bench.iter(|| intersect_sorted(black_box(&a), black_box(&b)))
    });
}

fn bench_tokenizer(c: &mut Criterion) {
    let tokenizer = QueryTokenizer::new();
    c.bench_function("tokenize", |b| {
        b.iter(|| tokenizer.tokenize(black_box("+God \"in the beginning\" light ++darkness")))
    });
}

fn bench_search(c: &mut Criterion) {
    let corpus = fixtures::synthetic_corpus(66, 20, 20, 42);
    let table = fixtures::verse_table(&corpus);
    let cache = fixtures::memory_cache(&corpus);

    let grep = GrepSearch::new(&corpus);
    let indexed = IndexedSearch::new(&corpus, &table, &cache);

    let mut group = c.benchmark_group("search");
    for q in QUERIES {
        let query = Query::new(*q);
        group.bench_with_input(BenchmarkId::new("grep", q), &query, |b, query| {
            b.iter(|| grep.search(black_box(query)))
        });
        group.bench_with_input(BenchmarkId::new("indexed", q), &query, |b, query| {
            b.iter(|| indexed.search(black_box(query)))
        });
    }

    let scoped = Query::new("+god").with_scope(BookScope::new(39..66));
    group.bench_function("grep_scoped", |b| b.iter(|| grep.search(black_box(&scoped))));
    group.bench_function("indexed_scoped", |b| b.iter(|| indexed.search(black_box(&scoped))));

    group.finish();
}

criterion_group!(benches, bench_intersection, bench_tokenizer, bench_search);

criterion_main!(benches);
