use serde::{Deserialize, Serialize};

/// Structural configuration fixed when a network is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of aspects besides the node aspect.
    #[serde(default)]
    pub aspects: usize,
    /// Whether `(u, v, …)` and `(v, u, …)` denote distinct edges.
    #[serde(default)]
    pub directed: bool,
    /// Whether every node exists on every layer tuple.
    #[serde(default = "default_fully_interconnected")]
    pub fully_interconnected: bool,
    /// Weight sentinel meaning "no edge".
    #[serde(default)]
    pub no_edge: f64,
}

fn default_fully_interconnected() -> bool {
    true
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            aspects: 0,
            directed: false,
            fully_interconnected: default_fully_interconnected(),
            no_edge: 0.0,
        }
    }
}

impl NetworkConfig {
    /// Undirected, fully interconnected configuration with `aspects` aspects.
    pub fn with_aspects(aspects: usize) -> Self {
        Self {
            aspects,
            ..Self::default()
        }
    }

    /// Returns a copy with the directedness flag set.
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Returns a copy with the interconnectivity flag set.
    pub fn fully_interconnected(mut self, fully: bool) -> Self {
        self.fully_interconnected = fully;
        self
    }

    /// Returns a copy with a different no-edge sentinel.
    pub fn no_edge(mut self, no_edge: f64) -> Self {
        self.no_edge = no_edge;
        self
    }

    /// Whether `weight` denotes absence under this configuration.
    pub fn is_no_edge(&self, weight: f64) -> bool {
        weight == self.no_edge || (weight.is_nan() && self.no_edge.is_nan())
    }
}

/// Concrete model behind a [`Network`](crate::Network) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkKind {
    /// General multilayer network with stored inter-layer edges.
    Multilayer,
    /// Multiplex network with virtual coupling edges.
    Multiplex,
}
