//! Exact vs sampled betweenness on synthetic transaction graphs.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sentinel_risk::domain::entities::TransactionRecord;
use sentinel_risk::domain::services::{CentralityCalculator, CentralityConfig, GraphBuilder};
use std::hint::black_box;

/// Ring plus deterministic chords, about four edges per node.
fn records(nodes: usize) -> Vec<TransactionRecord> {
    let mut out = Vec::with_capacity(nodes * 4);
    for i in 0..nodes {
        let name = |j: usize| format!("N{}", j % nodes);
        out.push(TransactionRecord::new(name(i), name(i + 1), 100.0));
        out.push(TransactionRecord::new(name(i), name(i * 7 + 3), 25.0));
        out.push(TransactionRecord::new(name(i), name(i * 13 + 5), 10.0));
        out.push(TransactionRecord::new(name(i * 3 + 1), name(i), 5.0));
    }
    out
}

fn bench_betweenness(c: &mut Criterion) {
    let mut group = c.benchmark_group("centrality");
    group.sample_size(10);

    for nodes in [200, 1_000] {
        let graph = GraphBuilder::build(&records(nodes));

        group.bench_with_input(BenchmarkId::new("exact", nodes), &graph, |b, graph| {
            let config = CentralityConfig::default().with_exact_betweenness_limit(usize::MAX);
            b.iter(|| {
                let Ok(mut calculator) = CentralityCalculator::new(config.clone()) else {
                    return;
                };
                calculator.compute_all(black_box(graph));
                black_box(calculator.score("N0"));
            });
        });

        group.bench_with_input(BenchmarkId::new("sampled", nodes), &graph, |b, graph| {
            let config = CentralityConfig::default()
                .with_exact_betweenness_limit(0)
                .with_sample_size(100);
            b.iter(|| {
                let Ok(mut calculator) = CentralityCalculator::new(config.clone()) else {
                    return;
                };
                calculator.compute_all(black_box(graph));
                black_box(calculator.score("N0"));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_betweenness);
criterion_main!(benches);
