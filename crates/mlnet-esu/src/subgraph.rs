use std::collections::{BTreeSet, HashMap, VecDeque};

use mlnet_core::errors::MlnError;
use mlnet_core::{Direction, Label, Network, NodeLayer};
use mlnet_graph::supra_ordering;
use serde::{Deserialize, Serialize};

/// Induced multilayer subgraph identified by its sorted nodes and layers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Subgraph {
    /// Sorted node labels.
    pub nodes: Vec<Label>,
    /// Sorted elementary layers.
    pub layers: Vec<Label>,
}

impl Subgraph {
    /// Builds a subgraph from unsorted labels.
    pub fn new(nodes: impl IntoIterator<Item = Label>, layers: impl IntoIterator<Item = Label>) -> Self {
        let mut nodes: Vec<Label> = nodes.into_iter().collect();
        let mut layers: Vec<Label> = layers.into_iter().collect();
        nodes.sort();
        nodes.dedup();
        layers.sort();
        layers.dedup();
        Self { nodes, layers }
    }

    /// Node-layers of `net` inside the subgraph.
    pub fn node_layers<N: Network + ?Sized>(&self, net: &N) -> Vec<NodeLayer> {
        self.layers
            .iter()
            .flat_map(|layer| {
                self.nodes
                    .iter()
                    .map(move |node| NodeLayer::single(node.clone(), layer.clone()))
            })
            .filter(|nl| net.has_node_layer(nl))
            .collect()
    }
}

/// Single-aspect network flattened to numbered node-layers.
///
/// Node-layers are numbered in supra-adjacency order; nodes and layers by
/// their sorted labels.
#[derive(Debug, Clone)]
pub(crate) struct SupraIndex {
    nodes: Vec<Label>,
    layers: Vec<Label>,
    node_of: Vec<usize>,
    layer_of: Vec<usize>,
    adjacency: Vec<Vec<usize>>,
    cells: HashMap<(usize, usize), usize>,
}

impl SupraIndex {
    pub(crate) fn new<N: Network + ?Sized>(net: &N) -> Result<Self, MlnError> {
        if net.aspects() != 1 {
            return Err(MlnError::unsupported(
                "esu-aspects",
                "subgraph sampling needs exactly one layer aspect",
            )
            .with_context("aspects", net.aspects()));
        }
        let order = supra_ordering(net);
        let nodes = net.nodes();
        let layers: Vec<Label> = net.elementary_layers(1)?;
        let node_index: HashMap<&Label, usize> = nodes.iter().enumerate().map(|(i, l)| (l, i)).collect();
        let layer_index: HashMap<&Label, usize> = layers.iter().enumerate().map(|(i, l)| (l, i)).collect();
        let position: HashMap<&NodeLayer, usize> = order.iter().enumerate().map(|(i, nl)| (nl, i)).collect();

        let mut node_of = Vec::with_capacity(order.len());
        let mut layer_of = Vec::with_capacity(order.len());
        let mut cells = HashMap::with_capacity(order.len());
        let mut adjacency = Vec::with_capacity(order.len());
        for (i, nl) in order.iter().enumerate() {
            let (Some(&node), Some(layer)) = (
                node_index.get(&nl.node),
                nl.coord(1).and_then(|layer| layer_index.get(layer)),
            ) else {
                return Err(MlnError::shape(
                    "unindexed-node-layer",
                    "node-layer outside the network's domains",
                )
                .with_context("node_layer", nl));
            };
            node_of.push(node);
            layer_of.push(*layer);
            cells.insert((node, *layer), i);
            let mut neighbours: Vec<usize> = net
                .neighbors(nl, Direction::Total)
                .filter_map(|(other, _)| position.get(&other).copied())
                .filter(|&j| j != i)
                .collect();
            neighbours.sort_unstable();
            neighbours.dedup();
            adjacency.push(neighbours);
        }
        Ok(Self {
            nodes,
            layers,
            node_of,
            layer_of,
            adjacency,
            cells,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.node_of.len()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub(crate) fn neighbours(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    /// Nodes and layers touched by a set of node-layers.
    pub(crate) fn project(&self, members: &[usize]) -> (BTreeSet<usize>, BTreeSet<usize>) {
        let nodes = members.iter().map(|&i| self.node_of[i]).collect();
        let layers = members.iter().map(|&i| self.layer_of[i]).collect();
        (nodes, layers)
    }

    /// Number of distinct nodes plus distinct layers touched by `members`.
    pub(crate) fn span(&self, members: &[usize]) -> usize {
        let (nodes, layers) = self.project(members);
        nodes.len() + layers.len()
    }

    /// Every existing node-layer on the product of `nodes` and `layers`.
    pub(crate) fn closure(&self, nodes: &BTreeSet<usize>, layers: &BTreeSet<usize>) -> Vec<usize> {
        let mut members: Vec<usize> = nodes
            .iter()
            .flat_map(|&n| layers.iter().filter_map(move |&l| self.cells.get(&(n, l)).copied()))
            .collect();
        members.sort_unstable();
        members
    }

    /// Whether `members` induce a connected subgraph.
    pub(crate) fn is_connected(&self, members: &[usize]) -> bool {
        let Some(&start) = members.first() else {
            return false;
        };
        let inside: BTreeSet<usize> = members.iter().copied().collect();
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &next in self.neighbours(current) {
                if inside.contains(&next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len() == inside.len()
    }

    /// Node sets per layer, in layer order.
    pub(crate) fn layer_profile(&self, members: &[usize], layers: &BTreeSet<usize>) -> Vec<BTreeSet<usize>> {
        layers
            .iter()
            .map(|&layer| {
                members
                    .iter()
                    .filter(|&&i| self.layer_of[i] == layer)
                    .map(|&i| self.node_of[i])
                    .collect()
            })
            .collect()
    }

    pub(crate) fn subgraph(&self, nodes: &BTreeSet<usize>, layers: &BTreeSet<usize>) -> Subgraph {
        Subgraph {
            nodes: nodes.iter().map(|&n| self.nodes[n].clone()).collect(),
            layers: layers.iter().map(|&l| self.layers[l].clone()).collect(),
        }
    }
}
