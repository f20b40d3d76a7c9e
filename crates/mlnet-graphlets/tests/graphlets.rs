use std::collections::BTreeSet;

use mlnet_core::rng::RngHandle;
use mlnet_core::{labels, Label, MlnError, Network, NetworkMut, NodeLayer};
use mlnet_graph::{er, full_multilayer, full_multiplex, MultiplexNetwork};
use mlnet_graphlets::{
    automorphism_orbits, gcd, gcm, graphlets, orbit_counts_all, orbit_list, GraphletOptions, Orbit,
};
use mlnet_iso::BackendRegistry;
use proptest::prelude::*;

fn single_layer(edges: &[(i64, i64)]) -> Result<MultiplexNetwork, MlnError> {
    let mut net = MultiplexNetwork::categorical(1.0);
    net.add_layer(1, Label::from(0))?;
    for &(a, b) in edges {
        net.set_weight(&NodeLayer::single(a, 0), &NodeLayer::single(b, 0), 1.0)?;
    }
    Ok(net)
}

#[test]
fn single_layer_graphlets_match_known_counts() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let set = graphlets(4, &labels([0]), &GraphletOptions::default(), &registry)?;
    assert_eq!(set.max_nodes(), 4);
    assert_eq!(set.with_nodes(2).len(), 1);
    assert_eq!(set.with_nodes(3).len(), 2);
    assert_eq!(set.with_nodes(4).len(), 6);
    assert_eq!(set.len(), 9);
    assert!(set.with_nodes(5).is_empty());
    // the classic 15 orbits of graphlets on 2 to 4 nodes
    assert_eq!(orbit_list(&set).len(), 15);
    Ok(())
}

#[test]
fn allowed_aspects_decide_layer_symmetry() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let layers = labels(["X", "Y"]);
    let swapped = graphlets(2, &layers, &GraphletOptions::default(), &registry)?;
    assert_eq!(swapped.len(), 2);
    let fixed = GraphletOptions {
        allowed_aspects: vec![0],
    };
    assert_eq!(graphlets(2, &layers, &fixed, &registry)?.len(), 3);
    Ok(())
}

#[test]
fn invalid_generation_requests() {
    let registry = BackendRegistry::with_defaults();
    let options = GraphletOptions::default();
    assert_eq!(
        graphlets(1, &labels([0]), &options, &registry).unwrap_err().code(),
        "graphlet-size"
    );
    assert_eq!(
        graphlets(3, &labels([0, 0]), &options, &registry).unwrap_err().code(),
        "graphlet-layers"
    );
    let layers_only = GraphletOptions {
        allowed_aspects: vec![1],
    };
    assert_eq!(
        graphlets(3, &labels([0]), &layers_only, &registry).unwrap_err().code(),
        "allowed-aspects"
    );
    let err = graphlets(3, &labels([0]), &options, &BackendRegistry::new()).unwrap_err();
    assert!(matches!(err, MlnError::BackendMissing(_)));
}

#[test]
fn orbits_follow_automorphisms() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let triangle = full_multiplex(3, 2)?;
    let swapped = automorphism_orbits(&triangle, &[0, 1], &registry)?;
    assert_eq!(swapped.node_orbit_count(), 1);
    assert!(swapped.node_layers.values().all(|&orbit| orbit == 0));

    let fixed = automorphism_orbits(&triangle, &[0], &registry)?;
    let distinct: BTreeSet<usize> = fixed.node_layers.values().copied().collect();
    assert_eq!(distinct.len(), 2);

    let path = single_layer(&[(1, 2), (2, 3)])?;
    let orbits = automorphism_orbits(&path, &[0, 1], &registry)?;
    assert_eq!(orbits.node_orbit_count(), 2);
    assert_eq!(orbits.nodes[&Label::from(1)], orbits.nodes[&Label::from(3)]);
    assert_ne!(orbits.nodes[&Label::from(1)], orbits.nodes[&Label::from(2)]);
    Ok(())
}

#[test]
fn path_orbit_counts() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let options = GraphletOptions::default();
    let set = graphlets(3, &labels([0]), &options, &registry)?;
    let path = single_layer(&[(1, 2), (2, 3)])?;
    let counts = orbit_counts_all(&path, &set, &registry)?;
    assert_eq!(counts.nodes, labels([1, 2, 3]));

    let edge = Orbit {
        nodes: 2,
        graphlet: 0,
        orbit: 0,
    };
    assert_eq!(counts.count(&Label::from(1), &edge), 1);
    assert_eq!(counts.count(&Label::from(2), &edge), 2);

    let invariant = registry.complete_invariant(&path, &options.allowed_aspects)?;
    let (size, index) = set.locate(&invariant).expect("path graphlet");
    let graphlet = set.get(size, index).expect("path graphlet");
    let map = registry
        .isomorphism(&path, &graphlet.network, &options.allowed_aspects)?
        .expect("isomorphic to its graphlet");
    let orbit_of = |node: i64| Orbit {
        nodes: size,
        graphlet: index,
        orbit: graphlet.orbits.nodes[&map.apply(0, &Label::from(node))],
    };
    assert_eq!(counts.count(&Label::from(2), &orbit_of(2)), 1);
    assert_eq!(counts.count(&Label::from(1), &orbit_of(1)), 1);
    assert_eq!(counts.count(&Label::from(2), &orbit_of(1)), 0);

    let row: u64 = counts.of(&Label::from(3)).expect("row").iter().sum();
    assert_eq!(row, 2);
    Ok(())
}

#[test]
fn complete_multiplex_rows_coincide() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let set = graphlets(3, &labels([0, 1]), &GraphletOptions::default(), &registry)?;
    let net = full_multiplex(4, 2)?;
    let counts = orbit_counts_all(&net, &set, &registry)?;
    assert!(counts.counts.windows(2).all(|pair| pair[0] == pair[1]));
    // 3 partners and 3 triangles per node
    assert_eq!(counts.counts[0].iter().sum::<u64>(), 6);

    let matrix = gcm(&counts);
    for i in 0..matrix.nrows() {
        for j in 0..matrix.ncols() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(matrix[(i, j)], expected);
        }
    }
    Ok(())
}

#[test]
fn orbit_counts_reject_other_inputs() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let set = graphlets(3, &labels([0]), &GraphletOptions::default(), &registry)?;
    let err = orbit_counts_all(&full_multilayer(3, 1)?, &set, &registry).unwrap_err();
    assert!(matches!(err, MlnError::Unsupported(_)));
    assert_eq!(err.code(), "orbit-counts-network");

    let err = orbit_counts_all(&full_multiplex(3, 2)?, &set, &registry).unwrap_err();
    assert_eq!(err.code(), "layer-count");

    let fixed = GraphletOptions {
        allowed_aspects: vec![0],
    };
    let named = graphlets(3, &labels(["a"]), &fixed, &registry)?;
    let err = orbit_counts_all(&full_multiplex(3, 1)?, &named, &registry).unwrap_err();
    assert_eq!(err.code(), "layer-labels");
    Ok(())
}

#[test]
fn correlation_matrix_is_well_formed() -> Result<(), MlnError> {
    let registry = BackendRegistry::with_defaults();
    let set = graphlets(3, &labels([0]), &GraphletOptions::default(), &registry)?;
    let mut rng = RngHandle::from_seed(17);
    let first = orbit_counts_all(&er(12, &[0.35], &mut rng)?, &set, &registry)?;
    let second = orbit_counts_all(&er(12, &[0.35], &mut rng)?, &set, &registry)?;

    let a = gcm(&first);
    let b = gcm(&second);
    assert_eq!(a.shape(), (4, 4));
    assert_eq!(a, a.transpose());
    assert!(a.iter().all(|value| (-1.0 - 1e-12..=1.0 + 1e-12).contains(value)));
    assert_eq!(gcd(&a, &a)?, 0.0);
    assert_eq!(gcd(&a, &b)?, gcd(&b, &a)?);
    assert!(gcd(&a, &b)? >= 0.0);
    Ok(())
}

#[test]
fn options_deserialize_with_defaults() {
    let options: GraphletOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, GraphletOptions::default());
    let options: GraphletOptions = serde_json::from_str(r#"{"allowed_aspects": [0]}"#).unwrap();
    assert_eq!(options.allowed_aspects, vec![0]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn edge_orbits_count_linked_pairs(seed in any::<u64>(), p in 0.1f64..0.9) {
        let registry = BackendRegistry::with_defaults();
        let set = graphlets(3, &labels([0, 1]), &GraphletOptions::default(), &registry).unwrap();
        let mut rng = RngHandle::from_seed(seed);
        let net = er(6, &[p, p], &mut rng).unwrap();
        let counts = orbit_counts_all(&net, &set, &registry).unwrap();

        let linked: BTreeSet<(Label, Label)> = net
            .edges()
            .filter(|edge| edge.is_intra_layer())
            .map(|edge| {
                let (a, b) = (edge.source.node, edge.target.node);
                if a < b { (a, b) } else { (b, a) }
            })
            .collect();
        let pair_columns: Vec<usize> = counts
            .orbits
            .iter()
            .enumerate()
            .filter(|(_, orbit)| orbit.nodes == 2)
            .map(|(column, _)| column)
            .collect();
        let total: u64 = counts
            .counts
            .iter()
            .flat_map(|row| pair_columns.iter().map(move |&column| row[column]))
            .sum();
        prop_assert_eq!(total, 2 * linked.len() as u64);
    }
}
