use std::sync::Arc;

use mlnet_core::rng::RngHandle;
use mlnet_core::{labels, Label, MlnError, Network, NetworkMut, NodeLayer};
use mlnet_graph::{er, relabel, structurally_equal, MultilayerNetwork, MultiplexNetwork, Relabeling};
use mlnet_iso::{BackendRegistry, Capability, Invariant, IsomorphismBackend, PermutationBackend};
use proptest::prelude::*;

fn monoplex(edges: &[(i64, i64)]) -> Result<MultilayerNetwork, MlnError> {
    let mut net = MultilayerNetwork::monoplex();
    for &(a, b) in edges {
        net.set_weight(&NodeLayer::monoplex(a), &NodeLayer::monoplex(b), 1.0)?;
    }
    Ok(net)
}

fn two_layers(x: &[(i64, i64)], y: &[(i64, i64)]) -> Result<MultiplexNetwork, MlnError> {
    let mut net = MultiplexNetwork::categorical(1.0);
    for node in 1..=3 {
        net.add_node(Label::from(node));
    }
    for (layer, edges) in [("X", x), ("Y", y)] {
        net.add_layer(1, layer.into())?;
        for &(a, b) in edges {
            net.set_weight(&NodeLayer::single(a, layer), &NodeLayer::single(b, layer), 1.0)?;
        }
    }
    Ok(net)
}

#[test]
fn relabeled_network_maps_back() -> Result<(), MlnError> {
    let net = monoplex(&[(1, 2), (2, 3), (3, 4), (2, 4)])?;
    let mut map = Relabeling::new(0);
    for (from, to) in [(1, 40), (2, 10), (3, 30), (4, 20)] {
        map.nodes.insert(Label::from(from), Label::from(to));
    }
    let image = relabel(&net, &map)?;
    let backend = PermutationBackend::default();

    assert!(backend.is_isomorphic(&net, &image, &[0])?);
    let found = backend
        .isomorphism(&net, &image, &[0])?
        .expect("networks are isomorphic");
    assert!(structurally_equal(&relabel(&net, &found)?, &image));
    assert_eq!(
        backend.complete_invariant(&net, &[0])?,
        backend.complete_invariant(&image, &[0])?
    );
    Ok(())
}

#[test]
fn invariant_separates_non_isomorphic() -> Result<(), MlnError> {
    let backend = PermutationBackend::default();
    let path = monoplex(&[(1, 2), (2, 3), (3, 4)])?;
    let star = monoplex(&[(1, 2), (1, 3), (1, 4)])?;
    let a = backend.complete_invariant(&path, &[0])?;
    let b = backend.complete_invariant(&star, &[0])?;
    assert_ne!(a, b);
    assert_ne!(a.digest(), b.digest());
    assert_eq!(a.digest().len(), 16);
    assert!(!backend.is_isomorphic(&path, &star, &[0])?);
    assert_eq!(backend.isomorphism(&path, &star, &[0])?, None);
    Ok(())
}

#[test]
fn automorphisms_of_small_graphs() -> Result<(), MlnError> {
    let backend = PermutationBackend::default();
    let triangle = monoplex(&[(1, 2), (2, 3), (1, 3)])?;
    let generators = backend.automorphism_generators(&triangle, &[0])?;
    assert_eq!(generators.len(), 5);
    for map in &generators {
        assert!(structurally_equal(&relabel(&triangle, map)?, &triangle));
    }

    let path = monoplex(&[(1, 2), (2, 3)])?;
    let generators = backend.automorphism_generators(&path, &[0])?;
    assert_eq!(generators.len(), 1);
    assert_eq!(generators[0].apply(0, &Label::from(1)), Label::from(3));
    assert_eq!(generators[0].apply(0, &Label::from(2)), Label::from(2));
    Ok(())
}

#[test]
fn allowed_aspects_restrict_relabelings() -> Result<(), MlnError> {
    let backend = PermutationBackend::default();
    let a = two_layers(&[(1, 2), (2, 3)], &[(1, 2)])?;
    let b = two_layers(&[(1, 2)], &[(1, 2), (2, 3)])?;

    assert!(!backend.is_isomorphic(&a, &b, &[0])?);
    assert!(backend.is_isomorphic(&a, &b, &[1])?);
    assert!(backend.is_isomorphic(&a, &b, &[0, 1])?);

    let found = backend.isomorphism(&a, &b, &[1])?.expect("layer swap");
    assert!(found.nodes.is_empty());
    assert_eq!(found.apply(1, &"X".into()), Label::from("Y"));
    assert!(structurally_equal(&relabel(&a, &found)?, &b));

    // no relabeling at all compares labels verbatim
    assert!(backend.is_isomorphic(&a, &a, &[])?);
    assert!(!backend.is_isomorphic(&a, &b, &[])?);

    let err = backend.complete_invariant(&a, &[2]).unwrap_err();
    assert_eq!(err.code(), "allowed-aspects");
    Ok(())
}

#[test]
fn permutation_limit_is_enforced() -> Result<(), MlnError> {
    let triangle = monoplex(&[(1, 2), (2, 3), (1, 3)])?;
    let err = PermutationBackend::with_limit(2)
        .complete_invariant(&triangle, &[0])
        .unwrap_err();
    assert!(matches!(err, MlnError::Unsupported(_)));
    assert_eq!(err.code(), "permutation-limit");
    assert!(PermutationBackend::with_limit(6)
        .complete_invariant(&triangle, &[0])
        .is_ok());
    Ok(())
}

/// Backend that only hashes edge counts.
struct EdgeCount;

impl IsomorphismBackend for EdgeCount {
    fn name(&self) -> &str {
        "edge-count"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::CompleteInvariant]
    }

    fn complete_invariant(&self, net: &dyn Network, _allowed: &[usize]) -> Result<Invariant, MlnError> {
        Ok(Invariant::new(net.edge_count().to_string()))
    }
}

#[test]
fn registry_routes_by_capability() -> Result<(), MlnError> {
    let path = monoplex(&[(1, 2), (2, 3), (3, 4)])?;
    let star = monoplex(&[(1, 2), (1, 3), (1, 4)])?;

    let mut registry = BackendRegistry::new();
    registry.register(Arc::new(EdgeCount));
    assert_eq!(registry.names(), vec!["edge-count"]);
    assert_eq!(
        registry.complete_invariant(&path, &[0])?,
        registry.complete_invariant(&star, &[0])?
    );
    let err = registry.is_isomorphic(&path, &star, &[0]).unwrap_err();
    assert!(matches!(err, MlnError::BackendMissing(_)));
    let err = EdgeCount.automorphism_generators(&path, &[0]).unwrap_err();
    assert_eq!(err.code(), "capability-not-provided");

    registry.register(Arc::new(PermutationBackend::default()));
    assert!(!registry.is_isomorphic(&path, &star, &[0])?);
    assert_eq!(registry.backend_for(Capability::CompleteInvariant)?.name(), "edge-count");

    registry.prefer(Capability::CompleteInvariant, "permutation")?;
    assert_ne!(
        registry.complete_invariant(&path, &[0])?,
        registry.complete_invariant(&star, &[0])?
    );
    assert!(registry.prefer(Capability::Isomorphism, "edge-count").is_err());
    assert!(registry.prefer(Capability::Isomorphism, "nauty").is_err());
    Ok(())
}

#[test]
fn global_registry_accepts_backends() -> Result<(), MlnError> {
    mlnet_iso::init_backends();
    mlnet_iso::init_backends();
    assert_eq!(mlnet_iso::registry()?.names(), vec!["permutation"]);
    mlnet_iso::register_backend(Arc::new(EdgeCount))?;
    assert_eq!(
        mlnet_iso::backend_for(Capability::CompleteInvariant)?.name(),
        "permutation"
    );
    mlnet_iso::prefer_backend(Capability::CompleteInvariant, "edge-count")?;
    assert_eq!(
        mlnet_iso::backend_for(Capability::CompleteInvariant)?.name(),
        "edge-count"
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn shuffled_random_graphs_are_isomorphic(
        seed in any::<u64>(),
        order in Just((0i64..5).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut rng = RngHandle::from_seed(seed);
        let net = er(5, &[0.5], &mut rng).unwrap();
        let mut map = Relabeling::new(1);
        for (from, to) in labels(0..5).into_iter().zip(labels(order)) {
            map.nodes.insert(from, to);
        }
        let image = relabel(&net, &map).unwrap();
        let backend = PermutationBackend::default();
        prop_assert!(backend.is_isomorphic(&net, &image, &[0]).unwrap());
        let found = backend.isomorphism(&net, &image, &[0]).unwrap().unwrap();
        prop_assert!(structurally_equal(&relabel(&net, &found).unwrap(), &image));
    }
}
