// Criterion benchmarks for Vibe Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use vibe_match::core::{normalize, FacetSchema, FacetVector, Ranker};
use vibe_match::models::Candidate;

fn create_candidate(schema: &FacetSchema, id: usize) -> Candidate {
    let values = (0..schema.len())
        .map(|i| ((id * 31 + i * 17) % 100) as f64 / 100.0)
        .collect();

    Candidate {
        name: format!("Place {}", id),
        locale: String::new(),
        rationale: String::new(),
        tags: vec![],
        vector: FacetVector::from_values(schema, values).unwrap(),
    }
}

fn bench_normalize(c: &mut Criterion) {
    let schema = FacetSchema::default();
    let raw = json!({
        "artsy_creative": 0.9,
        "nightlife": "lots",
        "wealth_level": 1.7,
        "green_space": null
    });

    c.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box(&schema), black_box(&raw)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let ranker = Ranker::default();
    let schema = ranker.schema().clone();
    let source = create_candidate(&schema, 0).vector;

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [3, 10, 50, 250].iter() {
        let candidates: Vec<Candidate> = (1..=*candidate_count)
            .map(|i| create_candidate(&schema, i))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("rank_top_3", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| ranker.rank(black_box(&source), black_box(candidates.clone()), 3));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_ranking);

criterion_main!(benches);
