use std::collections::{BTreeMap, HashMap};

use mlnet_core::{Label, Network, NodeLayer};
use mlnet_graph::supra_ordering;
use nalgebra::DMatrix;
use tracing::trace;

/// Edge class traversed by one step of an alternating walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Intra-layer edge between distinct nodes (`a`).
    Intra,
    /// Coupling edge between copies of one node (`c`).
    Coupling,
    /// Edge of the complete reference graph on a layer (`F`).
    Reference,
}

/// Split of a network's supra-graph into the intra-layer part `A`, the
/// coupling part `C` and the complete per-layer reference `F`.
///
/// Edges joining different nodes on different layers belong to neither part
/// and are ignored; all parts are binary.
#[derive(Debug, Clone)]
pub struct Decomposition {
    order: Vec<NodeLayer>,
    index: HashMap<NodeLayer, usize>,
    intra: Vec<Vec<usize>>,
    coupling: Vec<Vec<usize>>,
    reference: Vec<Vec<usize>>,
}

impl Decomposition {
    /// Decomposes the supra-graph of `net`.
    pub fn new<N: Network + ?Sized>(net: &N) -> Self {
        let order = supra_ordering(net);
        let index: HashMap<NodeLayer, usize> = order
            .iter()
            .enumerate()
            .map(|(i, nl)| (nl.clone(), i))
            .collect();
        let n = order.len();
        let mut intra = vec![Vec::new(); n];
        let mut coupling = vec![Vec::new(); n];
        for edge in net.edges() {
            let (Some(&i), Some(&j)) = (index.get(&edge.source), index.get(&edge.target)) else {
                continue;
            };
            let same_node = edge.source.node == edge.target.node;
            let same_layer = edge.source.layer == edge.target.layer;
            let part = match (same_node, same_layer) {
                (false, true) => &mut intra,
                (true, false) => &mut coupling,
                _ => continue,
            };
            part[i].push(j);
            part[j].push(i);
        }
        let mut by_layer: BTreeMap<&[Label], Vec<usize>> = BTreeMap::new();
        for (i, nl) in order.iter().enumerate() {
            by_layer.entry(nl.layer.as_slice()).or_default().push(i);
        }
        let mut reference = vec![Vec::new(); n];
        for members in by_layer.values() {
            for &i in members {
                reference[i] = members.iter().copied().filter(|&j| j != i).collect();
            }
        }
        for list in intra.iter_mut().chain(coupling.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }
        trace!(node_layers = n, "decomposed supra-graph");
        Self {
            order,
            index,
            intra,
            coupling,
            reference,
        }
    }

    /// Node-layers in supra-adjacency order.
    pub fn order(&self) -> &[NodeLayer] {
        &self.order
    }

    /// Position of a node-layer in [`Decomposition::order`].
    pub fn position(&self, nl: &NodeLayer) -> Option<usize> {
        self.index.get(nl).copied()
    }

    /// Positions of every node-layer of `node`.
    pub fn positions_of(&self, node: &Label) -> Vec<usize> {
        self.order
            .iter()
            .enumerate()
            .filter(|(_, nl)| nl.node == *node)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of node-layers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the network has no node-layers.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn neighbours(&self, step: Step, i: usize) -> &[usize] {
        match step {
            Step::Intra => &self.intra[i],
            Step::Coupling => &self.coupling[i],
            Step::Reference => &self.reference[i],
        }
    }

    /// Dense integer matrix of one part.
    pub(crate) fn matrix(&self, step: Step) -> DMatrix<i64> {
        let n = self.len();
        let mut matrix = DMatrix::<i64>::zeros(n, n);
        for i in 0..n {
            for &j in self.neighbours(step, i) {
                matrix[(i, j)] = 1;
            }
        }
        matrix
    }
}
