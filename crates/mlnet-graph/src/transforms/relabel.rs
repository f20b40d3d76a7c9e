use std::collections::{BTreeMap, BTreeSet};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Label, Network, NetworkMut, NodeLayer};

use super::{stores_edge, CoordinateMap};
use crate::any::AnyNetwork;
use crate::coupling::Coupling;
use crate::multilayer::MultilayerNetwork;
use crate::multiplex::MultiplexNetwork;

/// Label bijection applied per aspect; unmapped labels keep their name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relabeling {
    /// Node relabeling.
    pub nodes: BTreeMap<Label, Label>,
    /// Elementary-layer relabeling, one map per aspect >= 1.
    pub layers: Vec<BTreeMap<Label, Label>>,
}

impl Relabeling {
    /// Identity relabeling for a network with `aspects` aspects.
    pub fn new(aspects: usize) -> Self {
        Self {
            nodes: BTreeMap::new(),
            layers: vec![BTreeMap::new(); aspects],
        }
    }

    /// Image of `label` in `aspect` (0 is the node aspect).
    pub fn apply(&self, aspect: usize, label: &Label) -> Label {
        let map = if aspect == 0 {
            Some(&self.nodes)
        } else {
            self.layers.get(aspect - 1)
        };
        map.and_then(|map| map.get(label))
            .cloned()
            .unwrap_or_else(|| label.clone())
    }

    /// Image of a node-layer.
    pub fn apply_node_layer(&self, nl: &NodeLayer) -> NodeLayer {
        NodeLayer::new(
            self.apply(0, &nl.node),
            nl.layer
                .iter()
                .enumerate()
                .map(|(index, label)| self.apply(index + 1, label))
                .collect(),
        )
    }

    /// Inverse bijection.
    pub fn inverse(&self) -> Self {
        let invert = |map: &BTreeMap<Label, Label>| {
            map.iter()
                .map(|(from, to)| (to.clone(), from.clone()))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            nodes: invert(&self.nodes),
            layers: self.layers.iter().map(invert).collect(),
        }
    }

    fn check_injective<N: Network + ?Sized>(&self, net: &N) -> Result<(), MlnError> {
        for aspect in 0..=net.aspects() {
            let domain = net.elementary_layers(aspect)?;
            let images: BTreeSet<Label> = domain.iter().map(|label| self.apply(aspect, label)).collect();
            if images.len() != domain.len() {
                return Err(MlnError::Shape(
                    ErrorInfo::new("relabel-not-injective", "relabeling merges distinct labels")
                        .with_context("aspect", aspect),
                ));
            }
        }
        Ok(())
    }
}

/// Networks that can produce an empty copy of themselves under a relabeling.
///
/// Multiplex networks relabel the nodes of network couplings alongside the
/// elementary layers they stand for.
pub trait Relabel: NetworkMut + Sized {
    /// Empty network with the configuration of `self`, relabeled by `map`.
    fn relabeled_shell(&self, map: &Relabeling) -> Result<Self, MlnError>;
}

impl Relabel for MultilayerNetwork {
    fn relabeled_shell(&self, _map: &Relabeling) -> Result<Self, MlnError> {
        Ok(self.empty_like())
    }
}

impl Relabel for MultiplexNetwork {
    fn relabeled_shell(&self, map: &Relabeling) -> Result<Self, MlnError> {
        let couplings = self
            .couplings()
            .iter()
            .enumerate()
            .map(|(index, coupling)| match coupling {
                Coupling::Network(net) => {
                    let mut layer_map = Relabeling::new(0);
                    layer_map.nodes = map.layers.get(index).cloned().unwrap_or_default();
                    Ok(Coupling::Network(Box::new(relabel(net.as_ref(), &layer_map)?)))
                }
                other => Ok(other.clone()),
            })
            .collect::<Result<Vec<_>, MlnError>>()?;
        MultiplexNetwork::new(self.config().clone(), couplings)
    }
}

impl Relabel for AnyNetwork {
    fn relabeled_shell(&self, map: &Relabeling) -> Result<Self, MlnError> {
        Ok(match self {
            AnyNetwork::Multilayer(net) => AnyNetwork::Multilayer(net.relabeled_shell(map)?),
            AnyNetwork::Multiplex(net) => AnyNetwork::Multiplex(net.relabeled_shell(map)?),
        })
    }
}

/// Applies a label bijection to every aspect of `net`.
pub fn relabel<N: Relabel>(net: &N, map: &Relabeling) -> Result<N, MlnError> {
    map.check_injective(net)?;
    let mut target = net.relabeled_shell(map)?;
    let coordinates = CoordinateMap::new(
        (0..=net.aspects()).collect(),
        |_, _| true,
        |aspect, label| map.apply(aspect, label),
    );
    coordinates.copy_skeleton(net, &mut target)?;
    for edge in net.edges() {
        let source = map.apply_node_layer(&edge.source);
        let dest = map.apply_node_layer(&edge.target);
        if stores_edge(&target, &source, &dest) {
            target.set_weight(&source, &dest, edge.weight)?;
        }
    }
    Ok(target)
}

/// Relabels nodes to `0..n` and every aspect's elementary layers to `0..b`
/// following their sorted order; returns the network and the bijection used.
pub fn normalize<N: Relabel>(net: &N) -> Result<(N, Relabeling), MlnError> {
    let mut map = Relabeling::new(net.aspects());
    for aspect in 0..=net.aspects() {
        let images: BTreeMap<Label, Label> = net
            .elementary_layers(aspect)?
            .into_iter()
            .enumerate()
            .map(|(index, label)| (label, Label::from(index)))
            .collect();
        if aspect == 0 {
            map.nodes = images;
        } else {
            map.layers[aspect - 1] = images;
        }
    }
    let normalized = relabel(net, &map)?;
    Ok((normalized, map))
}
