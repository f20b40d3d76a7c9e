use mlnet_core::rng::{derive_substream_seed, RngHandle};
use rand::RngCore;

#[test]
fn equal_seeds_give_equal_streams() {
    let mut first = RngHandle::from_seed(1234);
    let mut second = RngHandle::from_seed(1234);
    let draws = |rng: &mut RngHandle| (0..64).map(|_| rng.next_u64()).collect::<Vec<_>>();
    assert_eq!(draws(&mut first), draws(&mut second));

    let flips = |rng: &mut RngHandle| (0..64).map(|_| rng.bernoulli(0.3)).collect::<Vec<_>>();
    assert_eq!(
        flips(&mut RngHandle::from_seed(5)),
        flips(&mut RngHandle::from_seed(5))
    );
}

#[test]
fn substreams_differ_per_id() {
    assert_ne!(derive_substream_seed(7, 0), derive_substream_seed(7, 1));
    assert_ne!(derive_substream_seed(7, 0), derive_substream_seed(8, 0));
    assert_eq!(derive_substream_seed(7, 0), derive_substream_seed(7, 0));

    let mut direct = RngHandle::from_seed(derive_substream_seed(7, 3));
    let mut derived = RngHandle::substream(7, 3);
    assert_eq!(direct.next_u64(), derived.next_u64());
}

#[test]
fn unit_draws_and_coin_flips_respect_bounds() {
    let mut rng = RngHandle::from_seed(99);
    assert!((0..1_000).all(|_| (0.0..1.0).contains(&rng.next_unit())));
    assert!((0..100).all(|_| rng.bernoulli(1.0) && rng.bernoulli(7.0)));
    assert!((0..100).all(|_| !rng.bernoulli(0.0) && !rng.bernoulli(-1.0) && !rng.bernoulli(f64::NAN)));
}
