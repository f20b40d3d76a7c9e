//! Labels for nodes and elementary layers, node-layer records and selectors.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MlnError};

/// Value drawn from one aspect domain (aspect 0 is the node domain).
///
/// Integer labels order before string labels; within a variant the natural
/// order applies. Ordinal couplings interpret integer labels as positions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer label.
    Int(i64),
    /// String label.
    Str(String),
}

impl Label {
    /// Returns the integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Label::Int(value) => Some(*value),
            Label::Str(_) => None,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Int(_) => None,
            Label::Str(value) => Some(value),
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(value) => write!(f, "{value}"),
            Label::Str(value) => write!(f, "'{value}'"),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Int(value as i64)
    }
}

impl From<u32> for Label {
    fn from(value: u32) -> Self {
        Label::Int(value as i64)
    }
}

impl From<usize> for Label {
    fn from(value: usize) -> Self {
        Label::Int(value as i64)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value)
    }
}

impl From<&Label> for Label {
    fn from(value: &Label) -> Self {
        value.clone()
    }
}

/// Collects any iterable of label-convertible values into a `Vec<Label>`.
pub fn labels<I, T>(values: I) -> Vec<Label>
where
    I: IntoIterator<Item = T>,
    T: Into<Label>,
{
    values.into_iter().map(Into::into).collect()
}

/// A (node, layer) pair: the vertex set of the supra-graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeLayer {
    /// Node coordinate (aspect 0).
    pub node: Label,
    /// Layer tuple, one elementary layer per aspect >= 1.
    pub layer: Vec<Label>,
}

impl NodeLayer {
    /// Creates a node-layer from a node and a layer tuple.
    pub fn new(node: impl Into<Label>, layer: Vec<Label>) -> Self {
        Self {
            node: node.into(),
            layer,
        }
    }

    /// Node-layer of a monoplex network (no aspects).
    pub fn monoplex(node: impl Into<Label>) -> Self {
        Self::new(node, Vec::new())
    }

    /// Node-layer of a single-aspect network.
    pub fn single(node: impl Into<Label>, layer: impl Into<Label>) -> Self {
        Self::new(node, vec![layer.into()])
    }

    /// Number of aspects encoded by this node-layer.
    pub fn aspects(&self) -> usize {
        self.layer.len()
    }

    /// Returns the coordinate for `aspect` (0 is the node).
    pub fn coord(&self, aspect: usize) -> Option<&Label> {
        if aspect == 0 {
            Some(&self.node)
        } else {
            self.layer.get(aspect - 1)
        }
    }

    /// Iterates over all coordinates, node first.
    pub fn coords(&self) -> impl Iterator<Item = &Label> + '_ {
        std::iter::once(&self.node).chain(self.layer.iter())
    }

    /// Ordering key of the supra-adjacency view: layer tuple first, node last.
    pub fn supra_key(&self) -> (&[Label], &Label) {
        (&self.layer, &self.node)
    }

    /// Canonical string used when node-layers become monoplex vertices.
    pub fn canonical_string(&self) -> String {
        self.to_string()
    }
}

impl Display for NodeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.node)?;
        for layer in &self.layer {
            write!(f, ", {layer}")?;
        }
        write!(f, ")")
    }
}

/// Direction used by neighbour, degree and strength queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Outgoing edges (all edges for undirected networks).
    Out,
    /// Incoming edges (all edges for undirected networks).
    In,
    /// Union of outgoing and incoming edges.
    #[default]
    Total,
}

/// Aspect filter: one optional fixed label per coordinate, node first.
///
/// `None` positions are wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    coords: Vec<Option<Label>>,
}

impl Selector {
    /// Selector matching every node-layer of a network with `aspects` aspects.
    pub fn any(aspects: usize) -> Self {
        Self {
            coords: vec![None; aspects + 1],
        }
    }

    /// Selector from explicit coordinates (node first).
    pub fn from_coords(coords: Vec<Option<Label>>) -> Self {
        Self { coords }
    }

    /// Fixes the coordinate of `aspect` (0 is the node).
    pub fn fix(mut self, aspect: usize, label: impl Into<Label>) -> Self {
        if aspect >= self.coords.len() {
            self.coords.resize(aspect + 1, None);
        }
        self.coords[aspect] = Some(label.into());
        self
    }

    /// Number of aspects the selector addresses.
    pub fn aspects(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    /// Returns the selector coordinates.
    pub fn coords(&self) -> &[Option<Label>] {
        &self.coords
    }

    /// Whether every coordinate is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.coords.iter().all(Option::is_none)
    }

    /// Validates the selector arity against the network aspect count.
    pub fn validate(&self, aspects: usize) -> Result<(), MlnError> {
        if self.coords.len() != aspects + 1 {
            return Err(MlnError::Shape(
                ErrorInfo::new("selector-arity", "selector arity does not match aspects")
                    .with_context("expected", aspects + 1)
                    .with_context("actual", self.coords.len()),
            ));
        }
        Ok(())
    }

    /// Whether the node-layer satisfies every fixed coordinate.
    pub fn matches(&self, nl: &NodeLayer) -> bool {
        self.coords
            .iter()
            .zip(nl.coords())
            .all(|(fixed, value)| fixed.as_ref().map_or(true, |f| f == value))
    }
}
