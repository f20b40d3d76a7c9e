use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Direction, Label, Network, NodeLayer};

use crate::multilayer::MultilayerNetwork;

/// Inter-layer coupling policy of one aspect of a multiplex network.
///
/// Coupling edges are never stored: they are evaluated from the policy when a
/// weight, neighbour or degree query reaches across layers.
#[derive(Debug, Clone, PartialEq)]
pub enum Coupling {
    /// Every pair of distinct elementary layers is coupled with `weight`.
    Categorical {
        /// Weight of every coupling edge.
        weight: f64,
    },
    /// Integer elementary layers are coupled to their predecessor and successor.
    Ordinal {
        /// Weight of every coupling edge.
        weight: f64,
    },
    /// No coupling edges along the aspect.
    None,
    /// Coupling edges follow a monoplex network over the elementary layers.
    Network(Box<MultilayerNetwork>),
}

impl Coupling {
    /// Categorical coupling with the provided weight.
    pub fn categorical(weight: f64) -> Self {
        Coupling::Categorical { weight }
    }

    /// Ordinal coupling with the provided weight.
    pub fn ordinal(weight: f64) -> Self {
        Coupling::Ordinal { weight }
    }

    /// Coupling that follows a monoplex network whose nodes are elementary layers.
    pub fn network(net: MultilayerNetwork) -> Result<Self, MlnError> {
        if net.aspects() != 0 {
            return Err(MlnError::Shape(
                ErrorInfo::new("coupling-network-aspects", "coupling networks must be monoplex")
                    .with_context("aspects", net.aspects()),
            ));
        }
        Ok(Coupling::Network(Box::new(net)))
    }

    /// Whether the policy never yields coupling edges.
    pub fn is_none(&self) -> bool {
        matches!(self, Coupling::None)
    }

    /// Coupling weight between two elementary layers, `None` if uncoupled.
    pub fn weight(&self, a: &Label, b: &Label) -> Option<f64> {
        match self {
            Coupling::Categorical { weight } => (a != b).then_some(*weight),
            Coupling::Ordinal { weight } => match (a.as_int(), b.as_int()) {
                (Some(x), Some(y)) if x.abs_diff(y) == 1 => Some(*weight),
                _ => None,
            },
            Coupling::None => None,
            Coupling::Network(net) => {
                let weight = net.weight(&NodeLayer::monoplex(a.clone()), &NodeLayer::monoplex(b.clone()));
                (a != b && !net.config().is_no_edge(weight)).then_some(weight)
            }
        }
    }

    /// Elementary layers of `domain` coupled to `layer`, with their weights.
    ///
    /// `domain` must be sorted.
    pub fn partners(&self, layer: &Label, domain: &[Label], direction: Direction) -> Vec<(Label, f64)> {
        match self {
            Coupling::Categorical { weight } => domain
                .iter()
                .filter(|other| *other != layer)
                .map(|other| (other.clone(), *weight))
                .collect(),
            Coupling::Ordinal { weight } => {
                let Some(position) = layer.as_int() else {
                    return Vec::new();
                };
                [position.checked_sub(1), position.checked_add(1)]
                    .into_iter()
                    .flatten()
                    .map(Label::Int)
                    .filter(|other| domain.binary_search(other).is_ok())
                    .map(|other| (other, *weight))
                    .collect()
            }
            Coupling::None => Vec::new(),
            Coupling::Network(net) => net
                .neighbors(&NodeLayer::monoplex(layer.clone()), direction)
                .filter(|(other, _)| other.node != *layer && domain.binary_search(&other.node).is_ok())
                .map(|(other, weight)| (other.node, weight))
                .collect(),
        }
    }
}
