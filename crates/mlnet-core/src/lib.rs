#![deny(missing_docs)]
#![doc = "Core traits and data types for multilayer network analysis: labels, \
node-layers, edge identifiers, the `Network` read/write contracts, the shared \
error surface and the deterministic RNG."]

mod config;
pub mod edge_id;
pub mod errors;
pub mod label;
pub mod rng;

use serde::{Deserialize, Serialize};

pub use config::{NetworkConfig, NetworkKind};
pub use edge_id::EdgeId;
pub use errors::{ErrorInfo, MlnError};
pub use label::{labels, Direction, Label, NodeLayer, Selector};
pub use rng::{derive_substream_seed, RngHandle};

/// Weighted edge between two node-layers as yielded by [`Network::edges`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source endpoint.
    pub source: NodeLayer,
    /// Target endpoint.
    pub target: NodeLayer,
    /// Stored weight (never the no-edge sentinel).
    pub weight: f64,
}

impl Edge {
    /// Whether both endpoints share the layer tuple.
    pub fn is_intra_layer(&self) -> bool {
        self.source.layer == self.target.layer
    }

    /// Full identifier of the edge.
    pub fn id(&self) -> EdgeId {
        EdgeId::between(&self.source, &self.target)
    }
}

/// Read contract shared by every multilayer network model.
///
/// Queries about absent nodes, layers or edges never fail: they return the
/// no-edge sentinel, zero degrees or empty iterators.
pub trait Network: Send + Sync {
    /// Structural configuration.
    fn config(&self) -> &NetworkConfig;

    /// Concrete model kind.
    fn kind(&self) -> NetworkKind;

    /// Number of aspects besides the node aspect.
    fn aspects(&self) -> usize {
        self.config().aspects
    }

    /// Whether the network is directed.
    fn is_directed(&self) -> bool {
        self.config().directed
    }

    /// Whether every node exists on every layer tuple.
    fn is_fully_interconnected(&self) -> bool {
        self.config().fully_interconnected
    }

    /// The no-edge sentinel.
    fn no_edge(&self) -> f64 {
        self.config().no_edge
    }

    /// Sorted elementary layers of `aspect` (aspect 0 yields the nodes).
    fn elementary_layers(&self, aspect: usize) -> Result<Vec<Label>, MlnError>;

    /// Sorted node labels.
    fn nodes(&self) -> Vec<Label> {
        self.elementary_layers(0).unwrap_or_default()
    }

    /// Sorted layer tuples that carry at least one node-layer.
    fn layers(&self) -> Vec<Vec<Label>>;

    /// Iterates over every node-layer once.
    fn node_layers(&self) -> Box<dyn Iterator<Item = NodeLayer> + '_>;

    /// Whether the node-layer exists.
    fn has_node_layer(&self, nl: &NodeLayer) -> bool;

    /// Sorted layer tuples on which `node` exists.
    fn layers_of(&self, node: &Label) -> Vec<Vec<Label>>;

    /// Sorted nodes existing on `layer`.
    fn nodes_on(&self, layer: &[Label]) -> Vec<Label>;

    /// Weight of the edge from `a` to `b`, or the no-edge sentinel.
    fn weight(&self, a: &NodeLayer, b: &NodeLayer) -> f64;

    /// Weight of the edge addressed by `id`.
    fn edge(&self, id: &EdgeId) -> Result<f64, MlnError> {
        let (a, b) = id.endpoints(self.aspects())?;
        Ok(self.weight(&a, &b))
    }

    /// Neighbours of a node-layer with the connecting weights.
    fn neighbors(
        &self,
        nl: &NodeLayer,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = (NodeLayer, f64)> + '_>;

    /// Neighbours restricted to those matching `selector`.
    fn neighbors_matching(
        &self,
        nl: &NodeLayer,
        direction: Direction,
        selector: &Selector,
    ) -> Result<Vec<(NodeLayer, f64)>, MlnError> {
        selector.validate(self.aspects())?;
        Ok(self
            .neighbors(nl, direction)
            .filter(|(neighbor, _)| selector.matches(neighbor))
            .collect())
    }

    /// Number of neighbours.
    fn degree(&self, nl: &NodeLayer, direction: Direction) -> usize {
        self.neighbors(nl, direction).count()
    }

    /// Number of neighbours matching `selector`.
    fn degree_matching(
        &self,
        nl: &NodeLayer,
        direction: Direction,
        selector: &Selector,
    ) -> Result<usize, MlnError> {
        if selector.is_wildcard() {
            selector.validate(self.aspects())?;
            return Ok(self.degree(nl, direction));
        }
        Ok(self.neighbors_matching(nl, direction, selector)?.len())
    }

    /// Sum of the weights to all neighbours.
    fn strength(&self, nl: &NodeLayer, direction: Direction) -> f64 {
        self.neighbors(nl, direction).map(|(_, weight)| weight).sum()
    }

    /// Sum of the weights to neighbours matching `selector`.
    fn strength_matching(
        &self,
        nl: &NodeLayer,
        direction: Direction,
        selector: &Selector,
    ) -> Result<f64, MlnError> {
        Ok(self
            .neighbors_matching(nl, direction, selector)?
            .iter()
            .map(|(_, weight)| weight)
            .sum())
    }

    /// Iterates over every edge once (each unordered pair once if undirected).
    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_>;

    /// Number of edges yielded by [`Network::edges`].
    fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

/// Mutation contract for networks that can be built incrementally.
pub trait NetworkMut: Network {
    /// Registers a node label.
    fn add_node(&mut self, node: Label);

    /// Registers an elementary layer of `aspect` (must be >= 1).
    fn add_layer(&mut self, aspect: usize, layer: Label) -> Result<(), MlnError>;

    /// Registers a node-layer (and its coordinates).
    fn add_node_layer(&mut self, nl: &NodeLayer) -> Result<(), MlnError>;

    /// Sets the weight between two node-layers; the no-edge sentinel removes the edge.
    fn set_weight(&mut self, a: &NodeLayer, b: &NodeLayer, weight: f64) -> Result<(), MlnError>;

    /// Sets the weight of the edge addressed by `id`.
    fn set_edge(&mut self, id: &EdgeId, weight: f64) -> Result<(), MlnError> {
        let (a, b) = id.endpoints(self.aspects())?;
        self.set_weight(&a, &b, weight)
    }

    /// Empty network with the same configuration (and coupling policies).
    fn empty_like(&self) -> Self
    where
        Self: Sized;
}
