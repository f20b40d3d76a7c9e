use mlnet_cc::{cc_barrett_explicit, cc_barrett_optimized, gcc_aw, lcc, CcOptions, CyclePath};
use mlnet_core::rng::RngHandle;
use mlnet_core::{Label, Network};
use mlnet_graph::er;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn coefficients_stay_in_unit_interval(seed in any::<u64>(), n in 3usize..8, p in 0.1f64..0.9) {
        let mut rng = RngHandle::from_seed(seed);
        let net = er(n, &[p, p, p], &mut rng).unwrap();
        let opts = CcOptions { undefined: Some(0.0), ..CcOptions::default() };
        let global = gcc_aw(&net, &opts).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&global));
        for node in net.nodes() {
            let local = lcc(&net, &node, Some(0.0)).unwrap();
            prop_assert!((0.0..=1.0).contains(&local));
        }
    }

    #[test]
    fn paths_and_barrett_variants_agree(seed in any::<u64>(), p in 0.2f64..0.8) {
        let mut rng = RngHandle::from_seed(seed);
        let net = er(5, &[p, 1.0 - p], &mut rng).unwrap();
        let matrix = CcOptions { undefined: Some(-1.0), ..CcOptions::default() };
        let walks = CcOptions { path: CyclePath::BruteForce, ..matrix };
        prop_assert_eq!(gcc_aw(&net, &matrix).unwrap(), gcc_aw(&net, &walks).unwrap());
        let node = Label::from(0);
        let optimized = cc_barrett_optimized(&net, &node, Some(-1.0)).unwrap();
        let explicit = cc_barrett_explicit(&net, &node, Some(-1.0)).unwrap();
        prop_assert!((optimized - explicit).abs() < 1e-12);
    }
}
