use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::rng::RngHandle;
use mlnet_core::{Label, NetworkConfig, NetworkMut, NodeLayer};
use tracing::debug;

use crate::coupling::Coupling;
use crate::multilayer::MultilayerNetwork;
use crate::multiplex::MultiplexNetwork;

fn check_probability(p: f64) -> Result<(), MlnError> {
    if (0.0..=1.0).contains(&p) {
        return Ok(());
    }
    Err(MlnError::Requirement(
        ErrorInfo::new("invalid-probability", "edge probability must lie in [0, 1]")
            .with_context("p", p),
    ))
}

/// Erdős–Rényi multiplex: nodes `0..n`, one layer per entry of `ps`, every
/// intra-layer pair linked with that layer's probability, categorical
/// coupling of weight 1.
pub fn er(n: usize, ps: &[f64], rng: &mut RngHandle) -> Result<MultiplexNetwork, MlnError> {
    for &p in ps {
        check_probability(p)?;
    }
    let mut net = MultiplexNetwork::categorical(1.0);
    for node in 0..n {
        net.add_node(Label::from(node));
    }
    for (layer, &p) in ps.iter().enumerate() {
        net.add_layer(1, Label::from(layer))?;
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.bernoulli(p) {
                    net.set_weight(
                        &NodeLayer::single(i, layer),
                        &NodeLayer::single(j, layer),
                        1.0,
                    )?;
                }
            }
        }
    }
    debug!(nodes = n, layers = ps.len(), "generated er multiplex");
    Ok(net)
}

/// Erdős–Rényi multilayer network: nodes `0..n` on layers `0..layers`, every
/// pair of distinct node-layers linked with probability `p`.
pub fn er_multilayer(
    n: usize,
    layers: usize,
    p: f64,
    rng: &mut RngHandle,
) -> Result<MultilayerNetwork, MlnError> {
    check_probability(p)?;
    let mut net = MultilayerNetwork::with_aspects(1);
    for node in 0..n {
        net.add_node(Label::from(node));
    }
    for layer in 0..layers {
        net.add_layer(1, Label::from(layer))?;
    }
    let node_layers: Vec<NodeLayer> = (0..layers)
        .flat_map(|layer| (0..n).map(move |node| NodeLayer::single(node, layer)))
        .collect();
    link_pairs(&mut net, &node_layers, p, rng)?;
    Ok(net)
}

/// Partially interconnected multilayer network: layer `i` holds the nodes
/// listed in `nodes_per_layer[i]`, and every pair of distinct node-layers is
/// linked with probability `p`.
pub fn er_partially_interconnected(
    nodes_per_layer: &[Vec<Label>],
    p: f64,
    rng: &mut RngHandle,
) -> Result<MultilayerNetwork, MlnError> {
    check_probability(p)?;
    let mut net = MultilayerNetwork::new(NetworkConfig::with_aspects(1).fully_interconnected(false));
    let mut node_layers = Vec::new();
    for (layer, nodes) in nodes_per_layer.iter().enumerate() {
        for node in nodes {
            let nl = NodeLayer::single(node.clone(), layer);
            net.add_node_layer(&nl)?;
            node_layers.push(nl);
        }
    }
    node_layers.sort_by(|a, b| a.supra_key().cmp(&b.supra_key()));
    node_layers.dedup();
    link_pairs(&mut net, &node_layers, p, rng)?;
    Ok(net)
}

fn link_pairs(
    net: &mut MultilayerNetwork,
    node_layers: &[NodeLayer],
    p: f64,
    rng: &mut RngHandle,
) -> Result<(), MlnError> {
    for (i, a) in node_layers.iter().enumerate() {
        for b in &node_layers[i + 1..] {
            if rng.bernoulli(p) {
                net.set_weight(a, b, 1.0)?;
            }
        }
    }
    Ok(())
}

/// Multiplex whose every layer is a clique on nodes `0..n`, with categorical
/// coupling of weight 1.
pub fn full_multiplex(n: usize, layers: usize) -> Result<MultiplexNetwork, MlnError> {
    let mut net = MultiplexNetwork::categorical(1.0);
    for node in 0..n {
        net.add_node(Label::from(node));
    }
    for layer in 0..layers {
        net.add_layer(1, Label::from(layer))?;
        for i in 0..n {
            for j in (i + 1)..n {
                net.set_weight(&NodeLayer::single(i, layer), &NodeLayer::single(j, layer), 1.0)?;
            }
        }
    }
    Ok(net)
}

/// Multilayer network on nodes `0..n` and layers `0..layers` in which every
/// pair of distinct node-layers is linked.
pub fn full_multilayer(n: usize, layers: usize) -> Result<MultilayerNetwork, MlnError> {
    let mut rng = RngHandle::from_seed(0);
    er_multilayer(n, layers, 1.0, &mut rng)
}

/// Multiplex with `coupling` along its single aspect and no intra-layer edges.
pub fn empty_multiplex(coupling: Coupling, nodes: usize, layers: usize) -> Result<MultiplexNetwork, MlnError> {
    let mut net = MultiplexNetwork::new(NetworkConfig::with_aspects(1), vec![coupling])?;
    for node in 0..nodes {
        net.add_node(Label::from(node));
    }
    for layer in 0..layers {
        net.add_layer(1, Label::from(layer))?;
    }
    Ok(net)
}
