use std::collections::BTreeMap;

use mlnet_core::{Label, Network, NetworkConfig, NodeLayer};
use sha2::{Digest, Sha256};

/// Edge map keyed by endpoints; undirected pairs are stored with the smaller
/// endpoint first.
pub fn canonical_edges<N: Network + ?Sized>(net: &N) -> BTreeMap<(NodeLayer, NodeLayer), f64> {
    let directed = net.is_directed();
    net.edges()
        .map(|edge| {
            let key = if directed || edge.source <= edge.target {
                (edge.source, edge.target)
            } else {
                (edge.target, edge.source)
            };
            (key, edge.weight)
        })
        .collect()
}

fn same_config(a: &NetworkConfig, b: &NetworkConfig) -> bool {
    a.aspects == b.aspects
        && a.directed == b.directed
        && a.fully_interconnected == b.fully_interconnected
        && (a.no_edge == b.no_edge || (a.no_edge.is_nan() && b.no_edge.is_nan()))
}

/// Structural equality: kind, configuration, aspect domains, node-layers of
/// partially interconnected networks, and every stored edge with its weight.
pub fn structurally_equal<A, B>(a: &A, b: &B) -> bool
where
    A: Network + ?Sized,
    B: Network + ?Sized,
{
    if a.kind() != b.kind() || !same_config(a.config(), b.config()) {
        return false;
    }
    for aspect in 0..=a.aspects() {
        if a.elementary_layers(aspect).ok() != b.elementary_layers(aspect).ok() {
            return false;
        }
    }
    if !a.is_fully_interconnected() && !a.node_layers().eq(b.node_layers()) {
        return false;
    }
    canonical_edges(a) == canonical_edges(b)
}

/// Computes the canonical structural hash (hex encoded SHA-256) of a network.
///
/// The digest covers exactly what [`structurally_equal`] compares, so equal
/// networks hash identically regardless of insertion order.
pub fn canonical_hash<N: Network + ?Sized>(net: &N) -> String {
    let mut hasher = Sha256::new();
    let config = net.config();
    hasher.update(format!("{:?}", net.kind()).as_bytes());
    hasher.update((config.aspects as u64).to_le_bytes());
    hasher.update([config.directed as u8, config.fully_interconnected as u8]);
    hasher.update(config.no_edge.to_le_bytes());

    for aspect in 0..=config.aspects {
        let domain = net.elementary_layers(aspect).unwrap_or_default();
        hasher.update((domain.len() as u64).to_le_bytes());
        for label in &domain {
            update_label(label, &mut hasher);
        }
    }

    if !config.fully_interconnected {
        let node_layers: Vec<NodeLayer> = net.node_layers().collect();
        hasher.update((node_layers.len() as u64).to_le_bytes());
        for nl in &node_layers {
            update_node_layer(nl, &mut hasher);
        }
    }

    let edges = canonical_edges(net);
    hasher.update((edges.len() as u64).to_le_bytes());
    for ((source, target), weight) in &edges {
        update_node_layer(source, &mut hasher);
        update_node_layer(target, &mut hasher);
        hasher.update(weight.to_le_bytes());
    }

    hex::encode(hasher.finalize())
}

fn update_node_layer(nl: &NodeLayer, hasher: &mut Sha256) {
    for label in nl.coords() {
        update_label(label, hasher);
    }
}

fn update_label(label: &Label, hasher: &mut Sha256) {
    match label {
        Label::Int(value) => {
            hasher.update([0u8]);
            hasher.update(value.to_le_bytes());
        }
        Label::Str(value) => {
            hasher.update([1u8]);
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
    }
}
