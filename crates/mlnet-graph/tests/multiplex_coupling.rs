use mlnet_core::{labels, Direction, EdgeId, MlnError, Network, NetworkConfig, NetworkMut, NodeLayer};
use mlnet_graph::{empty_multiplex, full_multiplex, Coupling, MultilayerNetwork, MultiplexNetwork};

fn nl(node: i64, layer: i64) -> NodeLayer {
    NodeLayer::single(node, layer)
}

#[test]
fn categorical_coupling_contributes_layers_minus_one() -> Result<(), MlnError> {
    let net = full_multiplex(4, 3)?;
    for node_layer in net.node_layers() {
        assert_eq!(net.coupling_degree(&node_layer, Direction::Total), 2);
        assert_eq!(net.degree(&node_layer, Direction::Total), 3 + 2);
        assert_eq!(
            net.degree(&node_layer, Direction::Total),
            net.neighbors(&node_layer, Direction::Total).count()
        );
    }
    assert_eq!(net.weight(&nl(0, 0), &nl(0, 2)), 1.0);
    assert_eq!(net.weight(&nl(0, 0), &nl(1, 2)), 0.0);
    Ok(())
}

#[test]
fn coupling_edges_are_virtual_and_read_only() -> Result<(), MlnError> {
    let mut net = MultiplexNetwork::categorical(0.5);
    net.set_edge(&EdgeId::short(1, 2, labels([0])), 1.0)?;
    net.add_layer(1, 1.into())?;

    assert_eq!(net.edge(&EdgeId::full(1, 1, labels([0]), labels([1])))?, 0.5);
    let err = net
        .set_edge(&EdgeId::full(1, 1, labels([0]), labels([1])), 2.0)
        .unwrap_err();
    assert!(matches!(err, MlnError::Coupling(_)));
    assert_eq!(err.code(), "inter-layer-write");

    assert_eq!(net.intra_edges().count(), 1);
    // one intra edge plus the couplings of nodes 1 and 2 between layers 0 and 1
    assert_eq!(net.edge_count(), 3);
    Ok(())
}

#[test]
fn ordinal_coupling_links_adjacent_layers_only() -> Result<(), MlnError> {
    let net = empty_multiplex(Coupling::ordinal(1.0), 2, 4)?;
    assert_eq!(net.weight(&nl(0, 1), &nl(0, 2)), 1.0);
    assert_eq!(net.weight(&nl(0, 1), &nl(0, 3)), 0.0);
    assert_eq!(net.degree(&nl(0, 0), Direction::Total), 1);
    assert_eq!(net.degree(&nl(0, 2), Direction::Total), 2);
    assert_eq!(net.degree(&nl(1, 3), Direction::Total), 1);
    Ok(())
}

#[test]
fn network_coupling_follows_monoplex() -> Result<(), MlnError> {
    let mut coupling = MultilayerNetwork::monoplex();
    coupling.set_weight(&NodeLayer::monoplex(0), &NodeLayer::monoplex(2), 3.0)?;
    let net = empty_multiplex(Coupling::network(coupling)?, 1, 3)?;

    assert_eq!(net.weight(&nl(0, 0), &nl(0, 2)), 3.0);
    assert_eq!(net.weight(&nl(0, 0), &nl(0, 1)), 0.0);
    assert_eq!(net.degree(&nl(0, 0), Direction::Total), 1);
    assert_eq!(net.degree(&nl(0, 1), Direction::Total), 0);
    assert!(Coupling::network(MultilayerNetwork::with_aspects(1)).is_err());
    Ok(())
}

#[test]
fn partial_multiplex_restricts_couplings_to_existing_node_layers() -> Result<(), MlnError> {
    let config = NetworkConfig::with_aspects(1).fully_interconnected(false);
    let mut net = MultiplexNetwork::new(config, vec![Coupling::categorical(1.0)])?;
    net.set_weight(&nl(1, 0), &nl(2, 0), 1.0)?;
    net.set_weight(&nl(1, 1), &nl(3, 1), 1.0)?;
    net.add_node_layer(&nl(1, 2))?;

    assert_eq!(net.node_layers().count(), 5);
    assert_eq!(net.coupling_degree(&nl(1, 0), Direction::Total), 2);
    assert_eq!(net.coupling_degree(&nl(2, 0), Direction::Total), 0);
    assert_eq!(net.weight(&nl(2, 0), &nl(2, 1)), 0.0);
    assert_eq!(net.layers_of(&1.into()), vec![labels([0]), labels([1]), labels([2])]);
    assert_eq!(net.nodes_on(&labels([1])), labels([1, 3]));
    Ok(())
}

#[test]
fn two_aspect_coupling_requires_single_differing_aspect() -> Result<(), MlnError> {
    let config = NetworkConfig::with_aspects(2);
    let mut net = MultiplexNetwork::new(
        config,
        vec![Coupling::categorical(1.0), Coupling::categorical(2.0)],
    )?;
    let at = |node: i64, a: &str, b: &str| NodeLayer::new(node, labels([a, b]));
    net.set_weight(&at(1, "x", "p"), &at(2, "x", "p"), 1.0)?;
    net.add_layer(1, "y".into())?;
    net.add_layer(2, "q".into())?;

    assert_eq!(net.weight(&at(1, "x", "p"), &at(1, "y", "p")), 1.0);
    assert_eq!(net.weight(&at(1, "x", "p"), &at(1, "x", "q")), 2.0);
    assert_eq!(net.weight(&at(1, "x", "p"), &at(1, "y", "q")), 0.0);
    assert_eq!(net.degree(&at(1, "x", "p"), Direction::Total), 3);
    assert!(MultiplexNetwork::new(NetworkConfig::with_aspects(2), Vec::new()).is_err());
    Ok(())
}

#[test]
fn empty_like_keeps_couplings() -> Result<(), MlnError> {
    let net = full_multiplex(3, 2)?;
    let empty = net.empty_like();
    assert_eq!(empty.couplings(), net.couplings());
    assert_eq!(empty.node_layers().count(), 0);
    Ok(())
}

#[test]
fn ordinal_coupling_tracks_layers_added_out_of_order() -> Result<(), MlnError> {
    let mut net = MultiplexNetwork::new(NetworkConfig::with_aspects(1), vec![Coupling::ordinal(1.0)])?;
    net.add_node(7.into());
    for layer in [4, 0, 2, 1] {
        net.add_layer(1, layer.into())?;
    }
    let coupled = |net: &MultiplexNetwork, layer: i64| -> Vec<NodeLayer> {
        let mut found: Vec<NodeLayer> = net
            .neighbors(&nl(7, layer), Direction::Total)
            .map(|(other, _)| other)
            .collect();
        found.sort();
        found
    };
    assert_eq!(coupled(&net, 1), vec![nl(7, 0), nl(7, 2)]);
    assert_eq!(coupled(&net, 2), vec![nl(7, 1)]);
    assert_eq!(net.coupling_degree(&nl(7, 4), Direction::Total), 0);
    assert_eq!(net.elementary_layers(1)?, labels([0, 1, 2, 4]));

    net.add_layer(1, 3.into())?;
    assert_eq!(coupled(&net, 2), vec![nl(7, 1), nl(7, 3)]);
    assert_eq!(coupled(&net, 4), vec![nl(7, 3)]);
    assert_eq!(net.coupling_degree(&nl(7, 3), Direction::Total), 2);
    Ok(())
}
