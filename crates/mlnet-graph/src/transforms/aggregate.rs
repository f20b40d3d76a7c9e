use std::collections::{BTreeMap, BTreeSet};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Network, NetworkConfig, NetworkMut, NodeLayer};
use tracing::debug;

use super::{check_compatible, check_target_aspects, stores_edge, CoordinateMap};
use crate::multilayer::MultilayerNetwork;
use crate::multiplex::MultiplexNetwork;

/// Aggregates `net` over the listed aspects into a new multilayer network.
///
/// Edges whose endpoints agree on every removed aspect contribute their
/// weight to the image edge; image self-edges are dropped unless
/// `self_edges` is set.
pub fn aggregate<N: Network + ?Sized>(
    net: &N,
    aspects: &[usize],
    self_edges: bool,
) -> Result<MultilayerNetwork, MlnError> {
    let removed = removed_aspects(net.aspects(), aspects)?;
    let config = NetworkConfig {
        aspects: net.aspects() - removed.len(),
        ..net.config().clone()
    };
    let mut target = MultilayerNetwork::new(config);
    aggregate_into(net, aspects, self_edges, &mut target)?;
    Ok(target)
}

/// Aggregates `net` into a caller supplied (typically empty) network.
pub fn aggregate_into<N, T>(
    net: &N,
    aspects: &[usize],
    self_edges: bool,
    target: &mut T,
) -> Result<(), MlnError>
where
    N: Network + ?Sized,
    T: NetworkMut,
{
    let removed = removed_aspects(net.aspects(), aspects)?;
    check_target_aspects(target, net.aspects() - removed.len())?;
    check_compatible(net, target)?;

    let kept: Vec<usize> = (0..=net.aspects())
        .filter(|aspect| !removed.contains(aspect))
        .collect();
    let map = CoordinateMap::new(kept, |_, _| true, |_, label| label.clone());
    map.copy_skeleton(net, target)?;

    let directed = target.is_directed();
    let mut sums: BTreeMap<(NodeLayer, NodeLayer), f64> = BTreeMap::new();
    for edge in net.edges() {
        let collapses = removed
            .iter()
            .all(|&aspect| edge.source.coord(aspect) == edge.target.coord(aspect));
        if !collapses {
            continue;
        }
        let source = map.image(&edge.source);
        let target_nl = map.image(&edge.target);
        if source == target_nl && !self_edges {
            continue;
        }
        if !stores_edge(target, &source, &target_nl) {
            continue;
        }
        let key = if directed || source <= target_nl {
            (source, target_nl)
        } else {
            (target_nl, source)
        };
        *sums.entry(key).or_insert(0.0) += edge.weight;
    }

    for ((source, target_nl), weight) in &sums {
        let current = target.weight(source, target_nl);
        let base = if target.config().is_no_edge(current) {
            0.0
        } else {
            current
        };
        target.set_weight(source, target_nl, base + weight)?;
    }
    debug!(removed = ?removed, edges = sums.len(), "aggregated network");
    Ok(())
}

/// Sums the intra-layer edges of a single-aspect multiplex into a monoplex network.
pub fn overlay_network(net: &MultiplexNetwork) -> Result<MultilayerNetwork, MlnError> {
    if net.aspects() != 1 {
        return Err(MlnError::Shape(
            ErrorInfo::new("overlay-aspects", "overlay requires a single-aspect multiplex")
                .with_context("aspects", net.aspects()),
        ));
    }
    let config = NetworkConfig::default()
        .directed(net.is_directed())
        .no_edge(net.no_edge());
    let mut overlay = MultilayerNetwork::new(config);
    for node in net.nodes() {
        overlay.add_node(node);
    }
    let directed = net.is_directed();
    let mut sums: BTreeMap<(NodeLayer, NodeLayer), f64> = BTreeMap::new();
    for edge in net.intra_edges() {
        let a = NodeLayer::monoplex(edge.source.node);
        let b = NodeLayer::monoplex(edge.target.node);
        let key = if directed || a <= b { (a, b) } else { (b, a) };
        *sums.entry(key).or_insert(0.0) += edge.weight;
    }
    for ((a, b), weight) in &sums {
        overlay.set_weight(a, b, *weight)?;
    }
    Ok(overlay)
}

fn removed_aspects(aspects: usize, requested: &[usize]) -> Result<BTreeSet<usize>, MlnError> {
    let mut removed = BTreeSet::new();
    for &aspect in requested {
        if aspect == 0 || aspect > aspects || !removed.insert(aspect) {
            return Err(MlnError::Shape(
                ErrorInfo::new(
                    "aggregate-aspects",
                    "aggregated aspects must be distinct layer aspects",
                )
                .with_context("aspect", aspect)
                .with_context("aspects", aspects),
            ));
        }
    }
    Ok(removed)
}
