use std::collections::{BTreeSet, HashMap};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{
    Direction, Edge, Label, Network, NetworkConfig, NetworkKind, NetworkMut, NodeLayer,
};

use crate::canon::structurally_equal;
use crate::coupling::Coupling;
use crate::interner::{cartesian, Interner};
use crate::multilayer::{check_arity, check_aspect, MultilayerNetwork};

/// Interned layer tuple `[l1, …, lA]`.
type LayerKey = Box<[u32]>;

/// Intra-layer monoplex owned by the multiplex arena.
#[derive(Debug, Clone)]
struct IntraLayer {
    /// Position of the layer tuple in the parent's layer table.
    slot: usize,
    layer: Vec<Label>,
    net: MultilayerNetwork,
}

/// Multiplex network: one intra-layer monoplex per layer tuple plus one
/// coupling policy per aspect.
///
/// Only intra-layer edges are stored. Coupling edges join the copies of the
/// same node on layers that differ in exactly one aspect; their weights come
/// from the policy of that aspect.
#[derive(Debug, Clone)]
pub struct MultiplexNetwork {
    config: NetworkConfig,
    couplings: Vec<Coupling>,
    domains: Vec<Interner>,
    intra: Vec<IntraLayer>,
    layer_index: HashMap<LayerKey, usize>,
    layers_by_node: HashMap<u32, BTreeSet<usize>>,
}

impl MultiplexNetwork {
    /// Creates an empty multiplex network with one coupling policy per aspect.
    pub fn new(config: NetworkConfig, couplings: Vec<Coupling>) -> Result<Self, MlnError> {
        if couplings.len() != config.aspects {
            return Err(MlnError::Shape(
                ErrorInfo::new("coupling-arity", "one coupling policy is required per aspect")
                    .with_context("aspects", config.aspects)
                    .with_context("couplings", couplings.len()),
            ));
        }
        let domains = vec![Interner::default(); config.aspects + 1];
        Ok(Self {
            config,
            couplings,
            domains,
            intra: Vec::new(),
            layer_index: HashMap::new(),
            layers_by_node: HashMap::new(),
        })
    }

    /// Undirected, fully interconnected single-aspect multiplex with categorical coupling.
    pub fn categorical(weight: f64) -> Self {
        Self {
            config: NetworkConfig::with_aspects(1),
            couplings: vec![Coupling::categorical(weight)],
            domains: vec![Interner::default(); 2],
            intra: Vec::new(),
            layer_index: HashMap::new(),
            layers_by_node: HashMap::new(),
        }
    }

    /// Coupling policies, one per aspect.
    pub fn couplings(&self) -> &[Coupling] {
        &self.couplings
    }

    /// Intra-layer monoplex of a layer tuple, if any edge or node-layer was added to it.
    pub fn intra_layer(&self, layer: &[Label]) -> Option<&MultilayerNetwork> {
        self.slot(layer).map(|slot| &self.intra[slot].net)
    }

    /// Iterates over the stored intra-layer networks with their layer tuples.
    pub fn intra_layers(&self) -> impl Iterator<Item = (&[Label], &MultilayerNetwork)> + '_ {
        self.intra.iter().map(|entry| (entry.layer.as_slice(), &entry.net))
    }

    /// Iterates over the stored (intra-layer) edges only.
    pub fn intra_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.intra.iter().flat_map(|entry| {
            entry.net.edges().map(move |edge| Edge {
                source: NodeLayer::new(edge.source.node, entry.layer.clone()),
                target: NodeLayer::new(edge.target.node, entry.layer.clone()),
                weight: edge.weight,
            })
        })
    }

    /// Number of coupling neighbours of a node-layer.
    pub fn coupling_degree(&self, nl: &NodeLayer, direction: Direction) -> usize {
        if !self.has_node_layer(nl) {
            return 0;
        }
        let mut degree = 0;
        for (index, coupling) in self.couplings.iter().enumerate() {
            let aspect = index + 1;
            match coupling {
                Coupling::None => {}
                Coupling::Categorical { .. } if self.config.fully_interconnected => {
                    degree += self.domains[aspect].len().saturating_sub(1);
                }
                _ => degree += self.coupled_along(nl, index, direction).len(),
            }
        }
        degree
    }

    fn slot(&self, layer: &[Label]) -> Option<usize> {
        if layer.len() != self.config.aspects {
            return None;
        }
        let key = layer
            .iter()
            .zip(&self.domains[1..])
            .map(|(label, domain)| domain.get(label))
            .collect::<Option<Vec<u32>>>()?
            .into_boxed_slice();
        self.layer_index.get(&key).copied()
    }

    fn ensure_slot(&mut self, layer: &[Label]) -> usize {
        let key: LayerKey = layer
            .iter()
            .zip(self.domains[1..].iter_mut())
            .map(|(label, domain)| domain.intern(label))
            .collect::<Vec<u32>>()
            .into_boxed_slice();
        if let Some(slot) = self.layer_index.get(&key) {
            return *slot;
        }
        let slot = self.intra.len();
        let child = NetworkConfig::default()
            .directed(self.config.directed)
            .no_edge(self.config.no_edge);
        self.intra.push(IntraLayer {
            slot,
            layer: layer.to_vec(),
            net: MultilayerNetwork::new(child),
        });
        self.layer_index.insert(key, slot);
        slot
    }

    /// Records that the intra-layer network in `slot` now holds `node`.
    fn note_node(&mut self, slot: usize, node: &Label) {
        let id = self.domains[0].intern(node);
        if !self.config.fully_interconnected {
            self.layers_by_node
                .entry(id)
                .or_default()
                .insert(self.intra[slot].slot);
        }
    }

    fn coupled_along(&self, nl: &NodeLayer, index: usize, direction: Direction) -> Vec<(NodeLayer, f64)> {
        let aspect = index + 1;
        self.couplings[index]
            .partners(&nl.layer[index], self.domains[aspect].sorted(), direction)
            .into_iter()
            .filter_map(|(other, weight)| {
                let mut layer = nl.layer.clone();
                layer[index] = other;
                let candidate = NodeLayer::new(nl.node.clone(), layer);
                self.has_node_layer(&candidate).then_some((candidate, weight))
            })
            .collect()
    }

    fn coupling_neighbors(&self, nl: &NodeLayer, direction: Direction) -> Vec<(NodeLayer, f64)> {
        (0..self.couplings.len())
            .flat_map(|index| self.coupled_along(nl, index, direction))
            .collect()
    }

    fn coupling_weight(&self, a: &NodeLayer, b: &NodeLayer) -> Option<f64> {
        let mut differing = a
            .layer
            .iter()
            .zip(&b.layer)
            .enumerate()
            .filter(|(_, (x, y))| x != y);
        let (index, (x, y)) = differing.next()?;
        if differing.next().is_some() || !self.has_node_layer(a) || !self.has_node_layer(b) {
            return None;
        }
        self.couplings[index].weight(x, y)
    }
}

impl Network for MultiplexNetwork {
    fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn kind(&self) -> NetworkKind {
        NetworkKind::Multiplex
    }

    fn elementary_layers(&self, aspect: usize) -> Result<Vec<Label>, MlnError> {
        check_aspect(aspect, self.config.aspects, true)?;
        Ok(self.domains[aspect].sorted().to_vec())
    }

    fn layers(&self) -> Vec<Vec<Label>> {
        if self.config.fully_interconnected {
            let domains: Vec<Vec<Label>> = self.domains[1..].iter().map(|d| d.sorted().to_vec()).collect();
            return cartesian(&domains);
        }
        let mut layers: Vec<Vec<Label>> = self
            .intra
            .iter()
            .filter(|entry| entry.net.domain_size(0) > 0)
            .map(|entry| entry.layer.clone())
            .collect();
        layers.sort();
        layers
    }

    fn node_layers(&self) -> Box<dyn Iterator<Item = NodeLayer> + '_> {
        if self.config.fully_interconnected {
            let nodes = self.domains[0].sorted();
            return Box::new(self.layers().into_iter().flat_map(move |layer| {
                nodes
                    .iter()
                    .map(move |node| NodeLayer::new(node.clone(), layer.clone()))
            }));
        }
        let mut node_layers: Vec<NodeLayer> = self
            .intra
            .iter()
            .flat_map(|entry| {
                entry
                    .net
                    .nodes()
                    .into_iter()
                    .map(move |node| NodeLayer::new(node, entry.layer.clone()))
            })
            .collect();
        node_layers.sort_by(|a, b| a.supra_key().cmp(&b.supra_key()));
        Box::new(node_layers.into_iter())
    }

    fn has_node_layer(&self, nl: &NodeLayer) -> bool {
        if nl.aspects() != self.config.aspects || self.domains[0].get(&nl.node).is_none() {
            return false;
        }
        if self.config.fully_interconnected {
            return nl
                .layer
                .iter()
                .zip(&self.domains[1..])
                .all(|(label, domain)| domain.get(label).is_some());
        }
        self.slot(&nl.layer).map_or(false, |slot| {
            self.intra[slot]
                .net
                .has_node_layer(&NodeLayer::monoplex(nl.node.clone()))
        })
    }

    fn layers_of(&self, node: &Label) -> Vec<Vec<Label>> {
        let Some(id) = self.domains[0].get(node) else {
            return Vec::new();
        };
        if self.config.fully_interconnected {
            return self.layers();
        }
        let mut layers: Vec<Vec<Label>> = self
            .layers_by_node
            .get(&id)
            .into_iter()
            .flatten()
            .map(|slot| self.intra[*slot].layer.clone())
            .collect();
        layers.sort();
        layers
    }

    fn nodes_on(&self, layer: &[Label]) -> Vec<Label> {
        if self.config.fully_interconnected {
            let known = layer.len() == self.config.aspects
                && layer
                    .iter()
                    .zip(&self.domains[1..])
                    .all(|(label, domain)| domain.get(label).is_some());
            return if known { self.domains[0].sorted().to_vec() } else { Vec::new() };
        }
        self.slot(layer)
            .map(|slot| self.intra[slot].net.nodes())
            .unwrap_or_default()
    }

    fn weight(&self, a: &NodeLayer, b: &NodeLayer) -> f64 {
        if a.aspects() != self.config.aspects || b.aspects() != self.config.aspects {
            return self.config.no_edge;
        }
        if a.layer == b.layer {
            return self.slot(&a.layer).map_or(self.config.no_edge, |slot| {
                self.intra[slot].net.weight(
                    &NodeLayer::monoplex(a.node.clone()),
                    &NodeLayer::monoplex(b.node.clone()),
                )
            });
        }
        if a.node != b.node {
            return self.config.no_edge;
        }
        self.coupling_weight(a, b).unwrap_or(self.config.no_edge)
    }

    fn neighbors(
        &self,
        nl: &NodeLayer,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = (NodeLayer, f64)> + '_> {
        if !self.has_node_layer(nl) {
            return Box::new(std::iter::empty());
        }
        let layer = nl.layer.clone();
        let intra: Vec<(NodeLayer, f64)> = self
            .slot(&nl.layer)
            .map(|slot| {
                self.intra[slot]
                    .net
                    .neighbors(&NodeLayer::monoplex(nl.node.clone()), direction)
                    .map(|(other, weight)| (NodeLayer::new(other.node, layer.clone()), weight))
                    .collect()
            })
            .unwrap_or_default();
        Box::new(intra.into_iter().chain(self.coupling_neighbors(nl, direction)))
    }

    fn degree(&self, nl: &NodeLayer, direction: Direction) -> usize {
        let intra = self.slot(&nl.layer).map_or(0, |slot| {
            self.intra[slot]
                .net
                .degree(&NodeLayer::monoplex(nl.node.clone()), direction)
        });
        intra + self.coupling_degree(nl, direction)
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        let directed = self.config.directed;
        let coupling_edges: Vec<Edge> = self
            .node_layers()
            .flat_map(|nl| {
                self.coupling_neighbors(&nl, Direction::Out)
                    .into_iter()
                    .filter(|(other, _)| directed || nl < *other)
                    .map(|(other, weight)| Edge {
                        source: nl.clone(),
                        target: other,
                        weight,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Box::new(self.intra_edges().chain(coupling_edges))
    }
}

impl NetworkMut for MultiplexNetwork {
    fn add_node(&mut self, node: Label) {
        self.domains[0].intern(&node);
    }

    fn add_layer(&mut self, aspect: usize, layer: Label) -> Result<(), MlnError> {
        check_aspect(aspect, self.config.aspects, false)?;
        self.domains[aspect].intern(&layer);
        Ok(())
    }

    fn add_node_layer(&mut self, nl: &NodeLayer) -> Result<(), MlnError> {
        check_arity(nl, self.config.aspects)?;
        let slot = self.ensure_slot(&nl.layer);
        self.intra[slot].net.add_node(nl.node.clone());
        self.note_node(slot, &nl.node);
        Ok(())
    }

    fn set_weight(&mut self, a: &NodeLayer, b: &NodeLayer, weight: f64) -> Result<(), MlnError> {
        check_arity(a, self.config.aspects)?;
        check_arity(b, self.config.aspects)?;
        if a.layer != b.layer {
            return Err(MlnError::Coupling(
                ErrorInfo::new(
                    "inter-layer-write",
                    "multiplex networks only store intra-layer edges",
                )
                .with_context("source", a)
                .with_context("target", b)
                .with_hint("coupling edges follow the coupling policy of each aspect"),
            ));
        }
        let source = NodeLayer::monoplex(a.node.clone());
        let target = NodeLayer::monoplex(b.node.clone());
        if self.config.is_no_edge(weight) {
            if let Some(slot) = self.slot(&a.layer) {
                self.intra[slot].net.set_weight(&source, &target, weight)?;
            }
            return Ok(());
        }
        let slot = self.ensure_slot(&a.layer);
        self.intra[slot].net.set_weight(&source, &target, weight)?;
        self.note_node(slot, &a.node);
        self.note_node(slot, &b.node);
        Ok(())
    }

    fn empty_like(&self) -> Self {
        Self {
            config: self.config.clone(),
            couplings: self.couplings.clone(),
            domains: vec![Interner::default(); self.config.aspects + 1],
            intra: Vec::new(),
            layer_index: HashMap::new(),
            layers_by_node: HashMap::new(),
        }
    }
}

impl PartialEq for MultiplexNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.couplings == other.couplings && structurally_equal(self, other)
    }
}
