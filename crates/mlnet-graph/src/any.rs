use mlnet_core::{
    Direction, Edge, Label, MlnError, Network, NetworkConfig, NetworkKind, NetworkMut, NodeLayer,
};

use crate::multilayer::MultilayerNetwork;
use crate::multiplex::MultiplexNetwork;

/// Either network model, for transforms whose output kind depends on the input.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyNetwork {
    /// General multilayer network.
    Multilayer(MultilayerNetwork),
    /// Multiplex network.
    Multiplex(MultiplexNetwork),
}

impl AnyNetwork {
    /// Returns the multilayer network, if this is one.
    pub fn as_multilayer(&self) -> Option<&MultilayerNetwork> {
        match self {
            AnyNetwork::Multilayer(net) => Some(net),
            AnyNetwork::Multiplex(_) => None,
        }
    }

    /// Returns the multiplex network, if this is one.
    pub fn as_multiplex(&self) -> Option<&MultiplexNetwork> {
        match self {
            AnyNetwork::Multilayer(_) => None,
            AnyNetwork::Multiplex(net) => Some(net),
        }
    }

    fn inner(&self) -> &dyn Network {
        match self {
            AnyNetwork::Multilayer(net) => net,
            AnyNetwork::Multiplex(net) => net,
        }
    }
}

impl From<MultilayerNetwork> for AnyNetwork {
    fn from(net: MultilayerNetwork) -> Self {
        AnyNetwork::Multilayer(net)
    }
}

impl From<MultiplexNetwork> for AnyNetwork {
    fn from(net: MultiplexNetwork) -> Self {
        AnyNetwork::Multiplex(net)
    }
}

impl Network for AnyNetwork {
    fn config(&self) -> &NetworkConfig {
        self.inner().config()
    }

    fn kind(&self) -> NetworkKind {
        self.inner().kind()
    }

    fn elementary_layers(&self, aspect: usize) -> Result<Vec<Label>, MlnError> {
        self.inner().elementary_layers(aspect)
    }

    fn layers(&self) -> Vec<Vec<Label>> {
        self.inner().layers()
    }

    fn node_layers(&self) -> Box<dyn Iterator<Item = NodeLayer> + '_> {
        self.inner().node_layers()
    }

    fn has_node_layer(&self, nl: &NodeLayer) -> bool {
        self.inner().has_node_layer(nl)
    }

    fn layers_of(&self, node: &Label) -> Vec<Vec<Label>> {
        self.inner().layers_of(node)
    }

    fn nodes_on(&self, layer: &[Label]) -> Vec<Label> {
        self.inner().nodes_on(layer)
    }

    fn weight(&self, a: &NodeLayer, b: &NodeLayer) -> f64 {
        self.inner().weight(a, b)
    }

    fn neighbors(
        &self,
        nl: &NodeLayer,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = (NodeLayer, f64)> + '_> {
        self.inner().neighbors(nl, direction)
    }

    fn degree(&self, nl: &NodeLayer, direction: Direction) -> usize {
        self.inner().degree(nl, direction)
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        self.inner().edges()
    }
}

impl NetworkMut for AnyNetwork {
    fn add_node(&mut self, node: Label) {
        match self {
            AnyNetwork::Multilayer(net) => net.add_node(node),
            AnyNetwork::Multiplex(net) => net.add_node(node),
        }
    }

    fn add_layer(&mut self, aspect: usize, layer: Label) -> Result<(), MlnError> {
        match self {
            AnyNetwork::Multilayer(net) => net.add_layer(aspect, layer),
            AnyNetwork::Multiplex(net) => net.add_layer(aspect, layer),
        }
    }

    fn add_node_layer(&mut self, nl: &NodeLayer) -> Result<(), MlnError> {
        match self {
            AnyNetwork::Multilayer(net) => net.add_node_layer(nl),
            AnyNetwork::Multiplex(net) => net.add_node_layer(nl),
        }
    }

    fn set_weight(&mut self, a: &NodeLayer, b: &NodeLayer, weight: f64) -> Result<(), MlnError> {
        match self {
            AnyNetwork::Multilayer(net) => net.set_weight(a, b, weight),
            AnyNetwork::Multiplex(net) => net.set_weight(a, b, weight),
        }
    }

    fn empty_like(&self) -> Self {
        match self {
            AnyNetwork::Multilayer(net) => AnyNetwork::Multilayer(net.empty_like()),
            AnyNetwork::Multiplex(net) => AnyNetwork::Multiplex(net.empty_like()),
        }
    }
}
