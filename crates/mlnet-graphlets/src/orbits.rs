use std::collections::{BTreeMap, BTreeSet, HashMap};

use mlnet_core::errors::MlnError;
use mlnet_core::{Label, Network, NetworkKind, NetworkMut, NodeLayer};
use mlnet_graph::MultiplexNetwork;
use mlnet_iso::BackendRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generate::Graphlets;

/// A node orbit of one graphlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Orbit {
    /// Node count of the graphlet.
    pub nodes: usize,
    /// Index of the graphlet among those with `nodes` nodes.
    pub graphlet: usize,
    /// Orbit number inside the graphlet.
    pub orbit: usize,
}

/// Every node orbit of every graphlet, smallest graphlets first.
pub fn orbit_list(graphlets: &Graphlets) -> Vec<Orbit> {
    graphlets
        .iter()
        .flat_map(|(nodes, graphlet, entry)| {
            (0..entry.orbits.node_orbit_count()).map(move |orbit| Orbit {
                nodes,
                graphlet,
                orbit,
            })
        })
        .collect()
}

/// How often each node of a network occupies each orbit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitCounts {
    /// Column labels.
    pub orbits: Vec<Orbit>,
    /// Row labels, sorted.
    pub nodes: Vec<Label>,
    /// One row per node, one column per orbit.
    pub counts: Vec<Vec<u64>>,
}

impl OrbitCounts {
    /// Row of `node`.
    pub fn of(&self, node: &Label) -> Option<&[u64]> {
        let row = self.nodes.binary_search(node).ok()?;
        Some(&self.counts[row])
    }

    /// Count of `node` in `orbit`, zero when either is unknown.
    pub fn count(&self, node: &Label, orbit: &Orbit) -> u64 {
        let column = self.orbits.iter().position(|candidate| candidate == orbit);
        match (self.of(node), column) {
            (Some(row), Some(column)) => row[column],
            _ => 0,
        }
    }

    /// Counts of every node in the `column`-th orbit.
    pub(crate) fn column(&self, column: usize) -> Vec<f64> {
        self.counts.iter().map(|row| row[column] as f64).collect()
    }
}

/// Counts, for every node of `net`, the orbits it occupies across all
/// connected node subsets of up to `graphlets.max_nodes()` nodes.
///
/// `net` must be an undirected, fully interconnected single-aspect multiplex
/// with as many layers as the graphlets; edge weights are ignored.
pub fn orbit_counts_all(
    net: &dyn Network,
    graphlets: &Graphlets,
    registry: &BackendRegistry,
) -> Result<OrbitCounts, MlnError> {
    let layers = check_input(net, graphlets)?;
    let nodes = net.nodes();
    let node_position: HashMap<&Label, usize> =
        nodes.iter().enumerate().map(|(idx, node)| (node, idx)).collect();
    let layer_position: HashMap<&Label, usize> =
        layers.iter().enumerate().map(|(idx, layer)| (layer, idx)).collect();

    let mut links: BTreeMap<(usize, usize), BTreeSet<usize>> = BTreeMap::new();
    let mut adjacency = vec![BTreeSet::new(); nodes.len()];
    for edge in net.edges().filter(|edge| edge.is_intra_layer()) {
        let endpoints = (
            node_position.get(&edge.source.node),
            node_position.get(&edge.target.node),
            edge.source.layer.first().and_then(|layer| layer_position.get(layer)),
        );
        let (Some(&a), Some(&b), Some(&layer)) = endpoints else {
            continue;
        };
        if a == b {
            continue;
        }
        links.entry((a.min(b), a.max(b))).or_default().insert(layer);
        adjacency[a].insert(b);
        adjacency[b].insert(a);
    }

    let orbits = orbit_list(graphlets);
    let column: HashMap<Orbit, usize> = orbits
        .iter()
        .enumerate()
        .map(|(idx, orbit)| (*orbit, idx))
        .collect();
    let allowed = graphlets.allowed_aspects();
    let mut counts = vec![vec![0u64; orbits.len()]; nodes.len()];
    let mut subsets = 0usize;

    let mut visit = |members: &[usize]| -> Result<(), MlnError> {
        let induced = induce(members, &nodes, &links, graphlets.layers())?;
        let invariant = registry.complete_invariant(&induced, allowed)?;
        let (size, index) = graphlets
            .locate(&invariant)
            .ok_or_else(|| missing_graphlet(members.len()))?;
        let graphlet = graphlets
            .get(size, index)
            .ok_or_else(|| missing_graphlet(members.len()))?;
        let map = registry
            .isomorphism(&induced, &graphlet.network, allowed)?
            .ok_or_else(|| missing_graphlet(members.len()))?;
        for &member in members {
            let image = map.apply(0, &nodes[member]);
            let orbit = graphlet
                .orbits
                .nodes
                .get(&image)
                .copied()
                .ok_or_else(|| missing_graphlet(members.len()))?;
            let key = Orbit {
                nodes: size,
                graphlet: index,
                orbit,
            };
            if let Some(&col) = column.get(&key) {
                counts[member][col] += 1;
            }
        }
        subsets += 1;
        Ok(())
    };
    connected_subsets(&adjacency, graphlets.max_nodes(), &mut visit)?;

    debug!(
        nodes = nodes.len(),
        subsets,
        orbits = orbits.len(),
        "orbit counts computed"
    );
    Ok(OrbitCounts {
        orbits,
        nodes,
        counts,
    })
}

fn missing_graphlet(size: usize) -> MlnError {
    MlnError::unsupported(
        "graphlet-missing",
        "induced subgraph matches no generated graphlet",
    )
    .with_context("nodes", size)
    .with_hint("generate the graphlets with the same layers and allowed aspects")
}

/// Validates `net` and returns its layers in graphlet order.
fn check_input(net: &dyn Network, graphlets: &Graphlets) -> Result<Vec<Label>, MlnError> {
    if net.kind() != NetworkKind::Multiplex
        || net.aspects() != 1
        || net.is_directed()
        || !net.is_fully_interconnected()
    {
        return Err(MlnError::unsupported(
            "orbit-counts-network",
            "orbit counts need an undirected fully interconnected single-aspect multiplex",
        )
        .with_context("aspects", net.aspects())
        .with_context("directed", net.is_directed()));
    }
    let layers = net.elementary_layers(1)?;
    if layers.len() != graphlets.layers().len() {
        return Err(MlnError::shape("layer-count", "network and graphlets differ in layer count")
            .with_context("network", layers.len())
            .with_context("graphlets", graphlets.layers().len()));
    }
    if !graphlets.allowed_aspects().contains(&1) && layers != graphlets.layers() {
        return Err(MlnError::shape(
            "layer-labels",
            "layers are compared verbatim but their labels differ",
        ));
    }
    Ok(layers)
}

/// Subnetwork induced by `members`, relabeled onto the graphlet layers.
fn induce(
    members: &[usize],
    nodes: &[Label],
    links: &BTreeMap<(usize, usize), BTreeSet<usize>>,
    layers: &[Label],
) -> Result<MultiplexNetwork, MlnError> {
    let mut net = MultiplexNetwork::categorical(1.0);
    for &member in members {
        net.add_node(nodes[member].clone());
    }
    for layer in layers {
        net.add_layer(1, layer.clone())?;
    }
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            let Some(on) = links.get(&(a.min(b), a.max(b))) else {
                continue;
            };
            for &layer in on {
                net.set_weight(
                    &NodeLayer::single(nodes[a].clone(), layers[layer].clone()),
                    &NodeLayer::single(nodes[b].clone(), layers[layer].clone()),
                    1.0,
                )?;
            }
        }
    }
    Ok(net)
}

type Visit<'a> = dyn FnMut(&[usize]) -> Result<(), MlnError> + 'a;

/// Visits every connected vertex set with 2 to `max` members exactly once.
fn connected_subsets(
    adjacency: &[BTreeSet<usize>],
    max: usize,
    visit: &mut Visit<'_>,
) -> Result<(), MlnError> {
    for v in 0..adjacency.len() {
        let extension: BTreeSet<usize> = adjacency[v].range(v + 1..).copied().collect();
        grow(adjacency, max, v, &mut vec![v], extension, visit)?;
    }
    Ok(())
}

fn grow(
    adjacency: &[BTreeSet<usize>],
    max: usize,
    v: usize,
    members: &mut Vec<usize>,
    mut extension: BTreeSet<usize>,
    visit: &mut Visit<'_>,
) -> Result<(), MlnError> {
    if members.len() >= 2 {
        visit(members)?;
    }
    if members.len() == max {
        return Ok(());
    }
    while let Some(w) = extension.pop_first() {
        let mut next = extension.clone();
        next.extend(adjacency[w].range(v + 1..).copied().filter(|u| {
            !members.contains(u) && !members.iter().any(|m| adjacency[*m].contains(u))
        }));
        members.push(w);
        grow(adjacency, max, v, members, next, visit)?;
        members.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(n: usize, edges: &[(usize, usize)]) -> Vec<BTreeSet<usize>> {
        let mut adjacency = vec![BTreeSet::new(); n];
        for &(a, b) in edges {
            adjacency[a].insert(b);
            adjacency[b].insert(a);
        }
        adjacency
    }

    fn subsets(adjacency: &[BTreeSet<usize>], max: usize) -> Vec<Vec<usize>> {
        let mut seen = Vec::new();
        connected_subsets(adjacency, max, &mut |members: &[usize]| {
            let mut sorted = members.to_vec();
            sorted.sort_unstable();
            seen.push(sorted);
            Ok(())
        })
        .unwrap();
        seen.sort();
        seen
    }

    #[test]
    fn square_has_every_connected_subset_once() {
        let square = adjacency(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let found = subsets(&square, 4);
        // 4 edges, 4 paths of length 2, the full cycle
        assert_eq!(found.len(), 9);
        let mut unique = found.clone();
        unique.dedup();
        assert_eq!(unique, found);
        assert!(!found.contains(&vec![0, 2]));
    }

    #[test]
    fn size_limit_is_respected() {
        let star = adjacency(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(subsets(&star, 2).len(), 3);
        assert_eq!(subsets(&star, 3).len(), 6);
    }
}
