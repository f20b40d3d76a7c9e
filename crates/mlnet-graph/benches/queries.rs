use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mlnet_core::rng::RngHandle;
use mlnet_core::{Direction, Network, NodeLayer};
use mlnet_graph::{er, supra_adjacency};

fn queries_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(7);
    let net = er(300, &[0.03; 3], &mut rng).unwrap();
    let node_layers: Vec<NodeLayer> = net.node_layers().collect();

    c.bench_function("degree_queries", |b| {
        b.iter(|| {
            for nl in &node_layers {
                black_box(net.degree(nl, Direction::Total));
            }
        });
    });

    c.bench_function("neighbor_iteration", |b| {
        b.iter(|| {
            for nl in &node_layers {
                black_box(net.neighbors(nl, Direction::Total).count());
            }
        });
    });

    c.bench_function("supra_adjacency", |b| {
        b.iter(|| black_box(supra_adjacency(&net, true)));
    });
}

criterion_group!(benches, queries_bench);
criterion_main!(benches);
