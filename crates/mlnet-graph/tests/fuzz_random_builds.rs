use std::collections::BTreeMap;

use mlnet_core::{Direction, Network, NetworkConfig, NetworkMut, NodeLayer};
use mlnet_graph::{canonical_hash, subnet, MultilayerNetwork, Selection};
use proptest::prelude::*;

fn check_invariants(net: &MultilayerNetwork, expected: &BTreeMap<(NodeLayer, NodeLayer), f64>) {
    for ((a, b), weight) in expected {
        assert_eq!(net.weight(a, b), *weight);
        if !net.is_directed() {
            assert_eq!(net.weight(b, a), *weight);
        }
    }
    for nl in net.node_layers() {
        for direction in [Direction::Out, Direction::In, Direction::Total] {
            assert_eq!(net.degree(&nl, direction), net.neighbors(&nl, direction).count());
        }
    }
}

proptest! {
    #[test]
    fn random_writes_respect_invariants(
        directed in any::<bool>(),
        writes in prop::collection::vec((0i64..5, 0i64..3, 0i64..5, 0i64..3, 0u8..4), 1..40),
    ) {
        let mut net = MultilayerNetwork::new(NetworkConfig::with_aspects(1).directed(directed));
        let mut expected: BTreeMap<(NodeLayer, NodeLayer), f64> = BTreeMap::new();
        for (u, s, v, r, w) in writes {
            let a = NodeLayer::single(u, s);
            let b = NodeLayer::single(v, r);
            let weight = f64::from(w);
            net.set_weight(&a, &b, weight).unwrap();
            let key = if directed || a <= b { (a, b) } else { (b, a) };
            expected.insert(key, weight);
        }
        check_invariants(&net, &expected);

        let stored = expected.values().filter(|w| **w != 0.0).count();
        prop_assert_eq!(net.edge_count(), stored);

        let copy = subnet(&net, &Selection::all(1), false).unwrap();
        prop_assert_eq!(canonical_hash(&copy), canonical_hash(&net));
        prop_assert!(copy == net);
    }
}
