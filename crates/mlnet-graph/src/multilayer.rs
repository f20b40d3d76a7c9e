use std::collections::{BTreeSet, HashMap, HashSet};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Direction, Edge, Label, Network, NetworkConfig, NetworkKind, NetworkMut, NodeLayer};

use crate::canon::structurally_equal;
use crate::interner::{cartesian, Interner};

/// Interned coordinates of a node-layer: `[node, l1, …, lA]`.
type Key = Box<[u32]>;

/// General multilayer network storing every edge explicitly.
///
/// Coordinates are interned per aspect. Undirected networks keep a symmetric
/// adjacency; directed networks additionally keep the reverse adjacency and a
/// per node-layer counter of distinct neighbours so total degree stays O(1).
/// Networks that are not fully interconnected keep an explicit node-layer set
/// together with the `node -> layers` and `layer -> nodes` maps.
#[derive(Debug, Clone)]
pub struct MultilayerNetwork {
    config: NetworkConfig,
    domains: Vec<Interner>,
    out_adj: HashMap<Key, HashMap<Key, f64>>,
    in_adj: HashMap<Key, HashMap<Key, f64>>,
    total_degree: HashMap<Key, usize>,
    node_layers: HashSet<Key>,
    layers_by_node: HashMap<u32, BTreeSet<Key>>,
    nodes_by_layer: HashMap<Key, BTreeSet<u32>>,
}

impl MultilayerNetwork {
    /// Creates an empty network with the provided configuration.
    pub fn new(config: NetworkConfig) -> Self {
        let domains = vec![Interner::default(); config.aspects + 1];
        Self {
            config,
            domains,
            out_adj: HashMap::new(),
            in_adj: HashMap::new(),
            total_degree: HashMap::new(),
            node_layers: HashSet::new(),
            layers_by_node: HashMap::new(),
            nodes_by_layer: HashMap::new(),
        }
    }

    /// Creates an empty undirected monoplex network.
    pub fn monoplex() -> Self {
        Self::new(NetworkConfig::default())
    }

    /// Creates an empty undirected, fully interconnected network.
    pub fn with_aspects(aspects: usize) -> Self {
        Self::new(NetworkConfig::with_aspects(aspects))
    }

    /// Number of labels registered in the domain of `aspect`.
    pub fn domain_size(&self, aspect: usize) -> usize {
        self.domains.get(aspect).map_or(0, Interner::len)
    }

    fn lookup(&self, nl: &NodeLayer) -> Option<Key> {
        if nl.aspects() != self.config.aspects {
            return None;
        }
        nl.coords()
            .zip(&self.domains)
            .map(|(label, domain)| domain.get(label))
            .collect::<Option<Vec<u32>>>()
            .map(Vec::into_boxed_slice)
    }

    fn lookup_layer(&self, layer: &[Label]) -> Option<Key> {
        if layer.len() != self.config.aspects {
            return None;
        }
        layer
            .iter()
            .zip(&self.domains[1..])
            .map(|(label, domain)| domain.get(label))
            .collect::<Option<Vec<u32>>>()
            .map(Vec::into_boxed_slice)
    }

    fn intern(&mut self, nl: &NodeLayer) -> Key {
        nl.coords()
            .zip(self.domains.iter_mut())
            .map(|(label, domain)| domain.intern(label))
            .collect::<Vec<u32>>()
            .into_boxed_slice()
    }

    fn decode(&self, key: &[u32]) -> NodeLayer {
        NodeLayer::new(self.domains[0].label(key[0]).clone(), self.decode_layer(&key[1..]))
    }

    fn decode_layer(&self, layer: &[u32]) -> Vec<Label> {
        layer
            .iter()
            .zip(&self.domains[1..])
            .map(|(id, domain)| domain.label(*id).clone())
            .collect()
    }

    fn register(&mut self, key: &Key) {
        if self.config.fully_interconnected || !self.node_layers.insert(key.clone()) {
            return;
        }
        let layer: Key = key[1..].into();
        self.layers_by_node
            .entry(key[0])
            .or_default()
            .insert(layer.clone());
        self.nodes_by_layer.entry(layer).or_default().insert(key[0]);
    }

    fn connected(&self, a: &Key, b: &Key) -> bool {
        let forward = self.out_adj.get(a).map_or(false, |targets| targets.contains_key(b));
        let backward = self.out_adj.get(b).map_or(false, |targets| targets.contains_key(a));
        forward || backward
    }

    fn bump_total(&mut self, key: &Key, delta: isize) {
        let entry = self.total_degree.entry(key.clone()).or_insert(0);
        *entry = entry.saturating_add_signed(delta);
        if *entry == 0 {
            self.total_degree.remove(key);
        }
    }

    fn insert_edge(&mut self, a: Key, b: Key, weight: f64) {
        if self.config.directed {
            let was_connected = self.connected(&a, &b);
            self.out_adj
                .entry(a.clone())
                .or_default()
                .insert(b.clone(), weight);
            self.in_adj
                .entry(b.clone())
                .or_default()
                .insert(a.clone(), weight);
            if !was_connected {
                self.bump_total(&a, 1);
                if a != b {
                    self.bump_total(&b, 1);
                }
            }
        } else {
            self.out_adj
                .entry(a.clone())
                .or_default()
                .insert(b.clone(), weight);
            self.out_adj.entry(b).or_default().insert(a, weight);
        }
    }

    fn remove_edge(&mut self, a: &Key, b: &Key) {
        if !remove_entry(&mut self.out_adj, a, b) {
            return;
        }
        if self.config.directed {
            remove_entry(&mut self.in_adj, b, a);
            if !self.connected(a, b) {
                self.bump_total(a, -1);
                if a != b {
                    self.bump_total(b, -1);
                }
            }
        } else {
            remove_entry(&mut self.out_adj, b, a);
        }
    }
}

fn remove_entry(adjacency: &mut HashMap<Key, HashMap<Key, f64>>, a: &Key, b: &Key) -> bool {
    let Some(targets) = adjacency.get_mut(a) else {
        return false;
    };
    let removed = targets.remove(b).is_some();
    if targets.is_empty() {
        adjacency.remove(a);
    }
    removed
}

/// Validates the aspect count of a node-layer.
pub(crate) fn check_arity(nl: &NodeLayer, aspects: usize) -> Result<(), MlnError> {
    if nl.aspects() == aspects {
        return Ok(());
    }
    Err(MlnError::Shape(
        ErrorInfo::new("node-layer-arity", "node-layer arity does not match aspects")
            .with_context("node_layer", nl)
            .with_context("aspects", aspects),
    ))
}

/// Validates an aspect index addressing an elementary-layer domain.
pub(crate) fn check_aspect(aspect: usize, aspects: usize, allow_nodes: bool) -> Result<(), MlnError> {
    if aspect > aspects || (aspect == 0 && !allow_nodes) {
        return Err(MlnError::Shape(
            ErrorInfo::new("aspect-out-of-range", "aspect index is not a layer aspect")
                .with_context("aspect", aspect)
                .with_context("aspects", aspects),
        ));
    }
    Ok(())
}

impl Network for MultilayerNetwork {
    fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn kind(&self) -> NetworkKind {
        NetworkKind::Multilayer
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
            .nodes_by_layer
            .keys()
            .map(|layer| self.decode_layer(layer))
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
        let mut node_layers: Vec<NodeLayer> =
            self.node_layers.iter().map(|key| self.decode(key)).collect();
        node_layers.sort_by(|a, b| a.supra_key().cmp(&b.supra_key()));
        Box::new(node_layers.into_iter())
    }

    fn has_node_layer(&self, nl: &NodeLayer) -> bool {
        match self.lookup(nl) {
            Some(key) => self.config.fully_interconnected || self.node_layers.contains(&key),
            None => false,
        }
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
            .map(|layer| self.decode_layer(layer))
            .collect();
        layers.sort();
        layers
    }

    fn nodes_on(&self, layer: &[Label]) -> Vec<Label> {
        let Some(key) = self.lookup_layer(layer) else {
            return Vec::new();
        };
        if self.config.fully_interconnected {
            return self.domains[0].sorted().to_vec();
        }
        let mut nodes: Vec<Label> = self
            .nodes_by_layer
            .get(&key)
            .into_iter()
            .flatten()
            .map(|id| self.domains[0].label(*id).clone())
            .collect();
        nodes.sort();
        nodes
    }

    fn weight(&self, a: &NodeLayer, b: &NodeLayer) -> f64 {
        let (Some(a), Some(b)) = (self.lookup(a), self.lookup(b)) else {
            return self.config.no_edge;
        };
        self.out_adj
            .get(&a)
            .and_then(|targets| targets.get(&b))
            .copied()
            .unwrap_or(self.config.no_edge)
    }

    fn neighbors(
        &self,
        nl: &NodeLayer,
        direction: Direction,
    ) -> Box<dyn Iterator<Item = (NodeLayer, f64)> + '_> {
        let Some(key) = self.lookup(nl) else {
            return Box::new(std::iter::empty());
        };
        let outgoing = self.out_adj.get(&key);
        let incoming = self.in_adj.get(&key);
        let pairs: Box<dyn Iterator<Item = (&Key, &f64)> + '_> =
            match (self.config.directed, direction) {
                (true, Direction::In) => Box::new(incoming.into_iter().flatten()),
                (true, Direction::Total) => {
                    // Pairs linked both ways are reported once, with the outgoing weight.
                    let reverse_only = incoming.into_iter().flatten().filter(move |(source, _)| {
                        outgoing.map_or(true, |targets| !targets.contains_key(*source))
                    });
                    Box::new(outgoing.into_iter().flatten().chain(reverse_only))
                }
                _ => Box::new(outgoing.into_iter().flatten()),
            };
        Box::new(pairs.map(move |(other, weight)| (self.decode(other), *weight)))
    }

    fn degree(&self, nl: &NodeLayer, direction: Direction) -> usize {
        let Some(key) = self.lookup(nl) else {
            return 0;
        };
        match (self.config.directed, direction) {
            (true, Direction::In) => self.in_adj.get(&key).map_or(0, HashMap::len),
            (true, Direction::Total) => self.total_degree.get(&key).copied().unwrap_or(0),
            _ => self.out_adj.get(&key).map_or(0, HashMap::len),
        }
    }

    fn edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        let directed = self.config.directed;
        Box::new(self.out_adj.iter().flat_map(move |(source, targets)| {
            targets
                .iter()
                .filter(move |(target, _)| directed || source <= *target)
                .map(move |(target, weight)| Edge {
                    source: self.decode(source),
                    target: self.decode(target),
                    weight: *weight,
                })
        }))
    }
}

impl NetworkMut for MultilayerNetwork {
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
        let key = self.intern(nl);
        self.register(&key);
        Ok(())
    }

    fn set_weight(&mut self, a: &NodeLayer, b: &NodeLayer, weight: f64) -> Result<(), MlnError> {
        check_arity(a, self.config.aspects)?;
        check_arity(b, self.config.aspects)?;
        if self.config.is_no_edge(weight) {
            if let (Some(a), Some(b)) = (self.lookup(a), self.lookup(b)) {
                self.remove_edge(&a, &b);
            }
            return Ok(());
        }
        let a = self.intern(a);
        let b = self.intern(b);
        self.register(&a);
        self.register(&b);
        self.insert_edge(a, b, weight);
        Ok(())
    }

    fn empty_like(&self) -> Self {
        Self::new(self.config.clone())
    }
}

impl PartialEq for MultilayerNetwork {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other)
    }
}
