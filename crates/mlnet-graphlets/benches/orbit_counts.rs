use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mlnet_core::labels;
use mlnet_core::rng::RngHandle;
use mlnet_graph::er;
use mlnet_graphlets::{gcm, graphlets, orbit_counts_all, GraphletOptions};
use mlnet_iso::BackendRegistry;

fn graphlet_bench(c: &mut Criterion) {
    let registry = BackendRegistry::with_defaults();
    let layers = labels([0, 1]);
    let options = GraphletOptions::default();
    let set = graphlets(3, &layers, &options, &registry).unwrap();
    let mut rng = RngHandle::from_seed(3);
    let net = er(12, &[0.3, 0.3], &mut rng).unwrap();

    c.bench_function("graphlets_3_nodes_2_layers", |b| {
        b.iter(|| black_box(graphlets(3, &layers, &options, &registry).unwrap().len()));
    });

    c.bench_function("orbit_counts_er12", |b| {
        b.iter(|| black_box(gcm(&orbit_counts_all(&net, &set, &registry).unwrap()).nrows()));
    });
}

criterion_group!(benches, graphlet_bench);
criterion_main!(benches);
