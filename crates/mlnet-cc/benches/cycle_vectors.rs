use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mlnet_cc::{cc_barrett_optimized, gcc_aw, CcOptions, CyclePath};
use mlnet_core::rng::RngHandle;
use mlnet_core::Label;
use mlnet_graph::er;

fn cycle_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(19);
    let net = er(40, &[0.15; 3], &mut rng).unwrap();
    let matrix = CcOptions {
        undefined: Some(0.0),
        ..CcOptions::default()
    };
    let walks = CcOptions {
        path: CyclePath::BruteForce,
        ..matrix
    };

    c.bench_function("gcc_aw_matrix", |b| {
        b.iter(|| black_box(gcc_aw(&net, &matrix).unwrap()));
    });

    c.bench_function("gcc_aw_walks", |b| {
        b.iter(|| black_box(gcc_aw(&net, &walks).unwrap()));
    });

    c.bench_function("cc_barrett", |b| {
        b.iter(|| black_box(cc_barrett_optimized(&net, &Label::from(0), Some(0.0)).unwrap()));
    });
}

criterion_group!(benches, cycle_bench);
criterion_main!(benches);
