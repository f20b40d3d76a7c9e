use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use mlnet_core::errors::MlnError;
use mlnet_core::{Label, Network, NodeLayer};
use mlnet_graph::Relabeling;
use tracing::trace;

use crate::backend::{Capability, Invariant, IsomorphismBackend};

const CAPABILITIES: [Capability; 4] = Capability::ALL;

/// Exhaustive backend: tries every permutation of the allowed aspects'
/// elementary layers and keeps the lexicographically smallest encoding.
///
/// Only practical for small networks such as graphlets; inputs needing more
/// than `limit` relabelings are rejected.
#[derive(Debug, Clone)]
pub struct PermutationBackend {
    limit: usize,
}

impl Default for PermutationBackend {
    fn default() -> Self {
        Self { limit: 362_880 }
    }
}

impl PermutationBackend {
    /// Backend trying at most `limit` relabelings per network.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }
}

/// A network flattened for repeated encoding under different relabelings.
struct Encoder {
    header: String,
    allowed: Vec<bool>,
    positions: Vec<HashMap<Label, usize>>,
    domains: Vec<Vec<Label>>,
    node_layers: Vec<NodeLayer>,
    edges: Vec<(NodeLayer, NodeLayer, f64)>,
    directed: bool,
}

/// One permutation per aspect; empty for aspects that stay fixed.
type Assignment = Vec<Vec<usize>>;

impl Encoder {
    fn new(net: &dyn Network, allowed: &[usize]) -> Result<Self, MlnError> {
        let aspects = net.aspects();
        if let Some(&bad) = allowed.iter().find(|&&aspect| aspect > aspects) {
            return Err(MlnError::shape("allowed-aspects", "allowed aspect out of range")
                .with_context("aspect", bad)
                .with_context("aspects", aspects));
        }
        let domains = (0..=aspects)
            .map(|aspect| net.elementary_layers(aspect))
            .collect::<Result<Vec<_>, _>>()?;
        let positions = domains
            .iter()
            .map(|domain| domain.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect())
            .collect();
        let sizes = domains.iter().map(Vec::len).join(",");
        Ok(Self {
            header: format!(
                "a{aspects}|d{}|f{}|s{sizes}",
                u8::from(net.is_directed()),
                u8::from(net.is_fully_interconnected())
            ),
            allowed: (0..=aspects).map(|aspect| allowed.contains(&aspect)).collect(),
            positions,
            domains,
            node_layers: net.node_layers().collect(),
            edges: net
                .edges()
                .map(|edge| (edge.source, edge.target, edge.weight))
                .collect(),
            directed: net.is_directed(),
        })
    }

    fn assignment_count(&self) -> usize {
        self.domains
            .iter()
            .zip(&self.allowed)
            .filter(|(_, allowed)| **allowed)
            .map(|(domain, _)| (1..=domain.len()).product::<usize>())
            .fold(1usize, |acc, count| acc.saturating_mul(count))
    }

    fn assignments(&self) -> Vec<Assignment> {
        self.domains
            .iter()
            .zip(&self.allowed)
            .fold(vec![Vec::new()], |partial, (domain, &allowed)| {
                let choices: Vec<Vec<usize>> = if allowed {
                    (0..domain.len()).permutations(domain.len()).collect()
                } else {
                    vec![Vec::new()]
                };
                partial
                    .iter()
                    .flat_map(|prefix| {
                        choices.iter().map(move |choice| {
                            let mut next = prefix.clone();
                            next.push(choice.clone());
                            next
                        })
                    })
                    .collect()
            })
    }

    fn coordinate(&self, assignment: &Assignment, aspect: usize, label: &Label) -> String {
        match self.positions[aspect].get(label) {
            Some(&position) if self.allowed[aspect] => format!("#{}", assignment[aspect][position]),
            _ => format!("{label:?}"),
        }
    }

    fn node_layer(&self, assignment: &Assignment, nl: &NodeLayer) -> String {
        std::iter::once(self.coordinate(assignment, 0, &nl.node))
            .chain(
                nl.layer
                    .iter()
                    .enumerate()
                    .map(|(index, label)| self.coordinate(assignment, index + 1, label)),
            )
            .join(" ")
    }

    fn encode(&self, assignment: &Assignment) -> String {
        let mut node_layers: Vec<String> = self
            .node_layers
            .iter()
            .map(|nl| self.node_layer(assignment, nl))
            .collect();
        node_layers.sort();
        let mut edges: Vec<String> = self
            .edges
            .iter()
            .map(|(source, target, weight)| {
                let mut ends = [self.node_layer(assignment, source), self.node_layer(assignment, target)];
                if !self.directed {
                    ends.sort();
                }
                format!("{}>{}={weight:?}", ends[0], ends[1])
            })
            .collect();
        edges.sort();
        format!("{}|{}|{}", self.header, node_layers.join(";"), edges.join(";"))
    }

    fn check_limit(&self, limit: usize) -> Result<usize, MlnError> {
        let count = self.assignment_count();
        if count > limit {
            return Err(MlnError::unsupported(
                "permutation-limit",
                "too many relabelings for exhaustive search",
            )
            .with_context("relabelings", count)
            .with_context("limit", limit));
        }
        Ok(count)
    }

    /// Smallest encoding and one assignment producing it.
    fn canonical(&self, limit: usize) -> Result<(String, Assignment), MlnError> {
        let count = self.check_limit(limit)?;
        let best = self
            .assignments()
            .into_iter()
            .map(|assignment| (self.encode(&assignment), assignment))
            .min_by(|a, b| a.0.cmp(&b.0));
        trace!(relabelings = count, "canonical encoding searched");
        Ok(best.unwrap_or_else(|| (self.encode(&Vec::new()), Vec::new())))
    }

    /// Sends each label of `self` to the label of `target` that `backward`
    /// gives the index `forward` gives it.
    fn relabeling(&self, forward: &Assignment, target: &Encoder, backward: &Assignment) -> Relabeling {
        let aspects = self.domains.len() - 1;
        let mut map = Relabeling::new(aspects);
        for aspect in 0..=aspects {
            if !self.allowed[aspect] {
                continue;
            }
            let inverse: HashMap<usize, &Label> = target.domains[aspect]
                .iter()
                .enumerate()
                .map(|(position, label)| (backward[aspect][position], label))
                .collect();
            let images: BTreeMap<Label, Label> = self.domains[aspect]
                .iter()
                .enumerate()
                .filter_map(|(position, label)| {
                    inverse
                        .get(&forward[aspect][position])
                        .map(|image| (label.clone(), (*image).clone()))
                })
                .collect();
            if aspect == 0 {
                map.nodes = images;
            } else {
                map.layers[aspect - 1] = images;
            }
        }
        map
    }
}

fn is_identity(map: &Relabeling) -> bool {
    let fixed = |images: &BTreeMap<Label, Label>| images.iter().all(|(from, to)| from == to);
    fixed(&map.nodes) && map.layers.iter().all(fixed)
}

impl IsomorphismBackend for PermutationBackend {
    fn name(&self) -> &str {
        "permutation"
    }

    fn capabilities(&self) -> &[Capability] {
        &CAPABILITIES
    }

    fn is_isomorphic(&self, a: &dyn Network, b: &dyn Network, allowed: &[usize]) -> Result<bool, MlnError> {
        if a.aspects() != b.aspects() {
            return Ok(false);
        }
        Ok(self.complete_invariant(a, allowed)? == self.complete_invariant(b, allowed)?)
    }

    fn complete_invariant(&self, net: &dyn Network, allowed: &[usize]) -> Result<Invariant, MlnError> {
        let (encoding, _) = Encoder::new(net, allowed)?.canonical(self.limit)?;
        Ok(Invariant::new(encoding))
    }

    fn automorphism_generators(
        &self,
        net: &dyn Network,
        allowed: &[usize],
    ) -> Result<Vec<Relabeling>, MlnError> {
        let encoder = Encoder::new(net, allowed)?;
        let (reference, base) = encoder.canonical(self.limit)?;
        Ok(encoder
            .assignments()
            .into_iter()
            .filter(|assignment| encoder.encode(assignment) == reference)
            .map(|assignment| encoder.relabeling(&assignment, &encoder, &base))
            .filter(|map| !is_identity(map))
            .collect())
    }

    fn isomorphism(
        &self,
        a: &dyn Network,
        b: &dyn Network,
        allowed: &[usize],
    ) -> Result<Option<Relabeling>, MlnError> {
        if a.aspects() != b.aspects() {
            return Ok(None);
        }
        let source = Encoder::new(a, allowed)?;
        let target = Encoder::new(b, allowed)?;
        let (encoding, backward) = target.canonical(self.limit)?;
        source.check_limit(self.limit)?;
        Ok(source
            .assignments()
            .into_iter()
            .find(|assignment| source.encode(assignment) == encoding)
            .map(|forward| source.relabeling(&forward, &target, &backward)))
    }
}
