use std::collections::{BTreeSet, HashSet};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Direction, Label, Network, NetworkMut, NodeLayer};
use tracing::debug;

use super::{check_compatible, check_target_aspects, stores_edge, CoordinateMap};

/// Node and per-aspect layer filter of an induced subnetwork.
///
/// `None` entries admit every label of the corresponding aspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    nodes: Option<BTreeSet<Label>>,
    layers: Vec<Option<BTreeSet<Label>>>,
}

impl Selection {
    /// Selection admitting every node-layer of a network with `aspects` aspects.
    pub fn all(aspects: usize) -> Self {
        Self {
            nodes: None,
            layers: vec![None; aspects],
        }
    }

    /// Restricts the selection to the given nodes.
    pub fn with_nodes<I, T>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Label>,
    {
        self.nodes = Some(nodes.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts aspect `aspect` (>= 1) to the given elementary layers.
    pub fn with_layers<I, T>(mut self, aspect: usize, layers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Label>,
    {
        if aspect == 0 {
            return self.with_nodes(layers);
        }
        if self.layers.len() < aspect {
            self.layers.resize(aspect, None);
        }
        self.layers[aspect - 1] = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `label` passes the filter of `aspect` (0 is the node aspect).
    pub fn admits_label(&self, aspect: usize, label: &Label) -> bool {
        let filter = if aspect == 0 {
            self.nodes.as_ref()
        } else {
            self.layers.get(aspect - 1).and_then(Option::as_ref)
        };
        filter.map_or(true, |allowed| allowed.contains(label))
    }

    /// Whether every coordinate of `nl` passes the filter.
    pub fn admits(&self, nl: &NodeLayer) -> bool {
        nl.coords()
            .enumerate()
            .all(|(aspect, label)| self.admits_label(aspect, label))
    }

    fn validate(&self, aspects: usize) -> Result<(), MlnError> {
        if self.layers.len() == aspects {
            return Ok(());
        }
        Err(MlnError::Shape(
            ErrorInfo::new("selection-arity", "layer selection does not match aspects")
                .with_context("expected", aspects)
                .with_context("actual", self.layers.len()),
        ))
    }
}

/// Induced subnetwork of the same kind as `net`.
///
/// With `nolinks` set only the node and layer structure is copied.
pub fn subnet<N: NetworkMut>(net: &N, selection: &Selection, nolinks: bool) -> Result<N, MlnError> {
    let mut target = net.empty_like();
    subnet_into(net, selection, nolinks, &mut target)?;
    Ok(target)
}

/// Induced subnetwork written into a caller supplied network.
pub fn subnet_into<N, T>(
    net: &N,
    selection: &Selection,
    nolinks: bool,
    target: &mut T,
) -> Result<(), MlnError>
where
    N: Network + ?Sized,
    T: NetworkMut,
{
    selection.validate(net.aspects())?;
    check_target_aspects(target, net.aspects())?;
    check_compatible(net, target)?;

    let map = CoordinateMap::new(
        (0..=net.aspects()).collect(),
        |aspect, label| selection.admits_label(aspect, label),
        |_, label| label.clone(),
    );
    map.copy_skeleton(net, target)?;
    if nolinks {
        return Ok(());
    }

    let selected: Vec<NodeLayer> = net.node_layers().filter(|nl| selection.admits(nl)).collect();
    let members: HashSet<&NodeLayer> = selected.iter().collect();
    let directed = net.is_directed();
    let mut written = 0usize;
    for source in &selected {
        // Walk whichever side is smaller: the neighbourhood or the selection.
        let links: Vec<(NodeLayer, f64)> = if net.degree(source, Direction::Out) <= selected.len() {
            net.neighbors(source, Direction::Out)
                .filter(|(other, _)| members.contains(other))
                .collect()
        } else {
            selected
                .iter()
                .filter_map(|other| {
                    let weight = net.weight(source, other);
                    (!net.config().is_no_edge(weight)).then(|| (other.clone(), weight))
                })
                .collect()
        };
        for (other, weight) in links {
            if (!directed && other < *source) || !stores_edge(target, source, &other) {
                continue;
            }
            target.set_weight(source, &other, weight)?;
            written += 1;
        }
    }
    debug!(node_layers = selected.len(), edges = written, "induced subnetwork");
    Ok(())
}
