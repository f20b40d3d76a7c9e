use std::collections::{BTreeMap, HashMap};

use mlnet_core::errors::MlnError;
use mlnet_core::{Label, Network, NetworkMut, NodeLayer};
use mlnet_graph::{MultiplexNetwork, Relabeling};
use mlnet_iso::{BackendRegistry, Invariant};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Largest number of candidate edges a single growth step may enumerate.
const MAX_EXTENSION_BITS: usize = 24;

/// Options for graphlet generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphletOptions {
    /// Aspects whose labels may be permuted when comparing graphlets; must
    /// contain the node aspect 0.
    pub allowed_aspects: Vec<usize>,
}

impl Default for GraphletOptions {
    fn default() -> Self {
        Self {
            allowed_aspects: vec![0, 1],
        }
    }
}

/// Automorphism orbits of a network, numbered from 0 in label order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orbits {
    /// Orbit of every node.
    pub nodes: BTreeMap<Label, usize>,
    /// Orbit of every node-layer.
    pub node_layers: BTreeMap<NodeLayer, usize>,
}

impl Orbits {
    /// Number of distinct node orbits.
    pub fn node_orbit_count(&self) -> usize {
        self.nodes.values().max().map_or(0, |last| last + 1)
    }
}

/// One generated graphlet.
#[derive(Debug, Clone)]
pub struct Graphlet {
    /// Multiplex on nodes `0..k` with categorical coupling of weight 1.
    pub network: MultiplexNetwork,
    /// Complete invariant under the generation's allowed aspects.
    pub invariant: Invariant,
    /// Automorphism orbits of `network`.
    pub orbits: Orbits,
}

/// Every connected graphlet from 2 up to `max_nodes()` nodes, grouped by
/// node count and indexed by invariant.
#[derive(Debug, Clone)]
pub struct Graphlets {
    layers: Vec<Label>,
    allowed: Vec<usize>,
    levels: Vec<Vec<Graphlet>>,
    index: HashMap<Invariant, (usize, usize)>,
}

impl Graphlets {
    /// Sorted layer labels shared by every graphlet.
    pub fn layers(&self) -> &[Label] {
        &self.layers
    }

    /// Aspects permuted when the graphlets were told apart.
    pub fn allowed_aspects(&self) -> &[usize] {
        &self.allowed
    }

    /// Largest graphlet size.
    pub fn max_nodes(&self) -> usize {
        self.levels.len() + 1
    }

    /// Graphlets with exactly `nodes` nodes, in generation order.
    pub fn with_nodes(&self, nodes: usize) -> &[Graphlet] {
        nodes
            .checked_sub(2)
            .and_then(|level| self.levels.get(level))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The `index`-th graphlet on `nodes` nodes.
    pub fn get(&self, nodes: usize, index: usize) -> Option<&Graphlet> {
        self.with_nodes(nodes).get(index)
    }

    /// Position `(nodes, index)` of the graphlet with the given invariant.
    pub fn locate(&self, invariant: &Invariant) -> Option<(usize, usize)> {
        self.index.get(invariant).copied()
    }

    /// Total number of graphlets.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no graphlet was generated.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Every graphlet with its `(nodes, index)` position, smallest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Graphlet)> + '_ {
        self.levels.iter().enumerate().flat_map(|(level, graphlets)| {
            graphlets
                .iter()
                .enumerate()
                .map(move |(index, graphlet)| (level + 2, index, graphlet))
        })
    }
}

/// Generates every connected graphlet with 2 to `n` nodes on `layers`.
///
/// Each graphlet on `k + 1` nodes is grown from one on `k` nodes by adding a
/// node linked, on any non-empty set of (existing node, layer) pairs; the
/// canonical invariant keeps one representative per isomorphism class.
pub fn graphlets(
    n: usize,
    layers: &[Label],
    options: &GraphletOptions,
    registry: &BackendRegistry,
) -> Result<Graphlets, MlnError> {
    if n < 2 {
        return Err(MlnError::shape("graphlet-size", "graphlets need at least two nodes")
            .with_context("n", n));
    }
    let mut sorted = layers.to_vec();
    sorted.sort();
    sorted.dedup();
    if sorted.is_empty() || sorted.len() != layers.len() {
        return Err(
            MlnError::shape("graphlet-layers", "layers must be distinct and non-empty")
                .with_context("layers", layers.len()),
        );
    }
    let allowed = &options.allowed_aspects;
    if !allowed.contains(&0) || allowed.iter().any(|&aspect| aspect > 1) {
        return Err(MlnError::shape(
            "allowed-aspects",
            "graphlet comparison must permute nodes and may only add the layer aspect",
        )
        .with_context("allowed", format!("{allowed:?}")));
    }

    let mut seed = MultiplexNetwork::categorical(1.0);
    seed.add_node(Label::from(0));
    for layer in &sorted {
        seed.add_layer(1, layer.clone())?;
    }

    let mut set = Graphlets {
        layers: sorted,
        allowed: allowed.clone(),
        levels: Vec::new(),
        index: HashMap::new(),
    };
    let mut frontier = vec![seed];
    for size in 2..=n {
        let mut level: Vec<Graphlet> = Vec::new();
        for base in &frontier {
            for candidate in extensions(base, size - 1, &set.layers)? {
                let invariant = registry.complete_invariant(&candidate, &set.allowed)?;
                if set.index.contains_key(&invariant) {
                    continue;
                }
                let orbits = automorphism_orbits(&candidate, &set.allowed, registry)?;
                trace!(nodes = size, digest = %invariant.digest(), "new graphlet");
                set.index.insert(invariant.clone(), (size, level.len()));
                level.push(Graphlet {
                    network: candidate,
                    invariant,
                    orbits,
                });
            }
        }
        debug!(nodes = size, graphlets = level.len(), "graphlet level generated");
        frontier = level.iter().map(|graphlet| graphlet.network.clone()).collect();
        set.levels.push(level);
    }
    Ok(set)
}

/// Every way of attaching node `existing` to `base` by at least one edge.
fn extensions(
    base: &MultiplexNetwork,
    existing: usize,
    layers: &[Label],
) -> Result<Vec<MultiplexNetwork>, MlnError> {
    let bits = existing * layers.len();
    if bits > MAX_EXTENSION_BITS {
        return Err(MlnError::unsupported(
            "graphlet-growth",
            "too many candidate edges for exhaustive graphlet growth",
        )
        .with_context("nodes", existing + 1)
        .with_context("layers", layers.len()));
    }
    let added = Label::from(existing);
    (1u64..1 << bits)
        .map(|mask| {
            let mut net = base.clone();
            net.add_node(added.clone());
            for bit in (0..bits).filter(|bit| (mask >> bit) & 1 == 1) {
                let layer = &layers[bit % layers.len()];
                net.set_weight(
                    &NodeLayer::single(bit / layers.len(), layer.clone()),
                    &NodeLayer::single(added.clone(), layer.clone()),
                    1.0,
                )?;
            }
            Ok(net)
        })
        .collect()
}

/// Node and node-layer orbits of `net` under its automorphism group.
pub fn automorphism_orbits(
    net: &dyn Network,
    allowed: &[usize],
    registry: &BackendRegistry,
) -> Result<Orbits, MlnError> {
    let generators = registry.automorphism_generators(net, allowed)?;
    Ok(Orbits {
        nodes: classes(net.nodes(), &generators, |map, node| map.apply(0, node)),
        node_layers: classes(net.node_layers().collect(), &generators, |map, nl| {
            map.apply_node_layer(nl)
        }),
    })
}

fn classes<T, F>(mut items: Vec<T>, generators: &[Relabeling], image: F) -> BTreeMap<T, usize>
where
    T: Ord + Clone,
    F: Fn(&Relabeling, &T) -> T,
{
    items.sort();
    let position: BTreeMap<T, usize> = items
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.clone(), idx))
        .collect();
    let mut parent: Vec<usize> = (0..items.len()).collect();
    for map in generators {
        for (idx, item) in items.iter().enumerate() {
            if let Some(&mapped) = position.get(&image(map, item)) {
                union(&mut parent, idx, mapped);
            }
        }
    }
    let mut numbering: HashMap<usize, usize> = HashMap::new();
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let root = find(&mut parent, idx);
            let next = numbering.len();
            (item.clone(), *numbering.entry(root).or_insert(next))
        })
        .collect()
}

fn find(parent: &mut [usize], idx: usize) -> usize {
    if parent[idx] != idx {
        let root = find(parent, parent[idx]);
        parent[idx] = root;
    }
    parent[idx]
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_find_numbers_orbits_in_order() {
        let mut parent: Vec<usize> = (0..4).collect();
        union(&mut parent, 3, 1);
        assert_eq!(find(&mut parent, 3), 1);
        assert_eq!(find(&mut parent, 2), 2);

        let mut swap = Relabeling::new(0);
        swap.nodes.insert(Label::from(0), Label::from(2));
        swap.nodes.insert(Label::from(2), Label::from(0));
        let orbits = classes(mlnet_core::labels(0..3), &[swap], |map, node| map.apply(0, node));
        assert_eq!(orbits[&Label::from(0)], 0);
        assert_eq!(orbits[&Label::from(1)], 1);
        assert_eq!(orbits[&Label::from(2)], 0);
    }
}
