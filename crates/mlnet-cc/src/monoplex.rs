use std::collections::BTreeMap;

use mlnet_core::{Direction, Label, MlnError, Network, NodeLayer};
use mlnet_graph::{aggregate, MultilayerNetwork};

use crate::{ratio, require_undirected};

/// Aggregates every layer aspect away; self-edges are dropped.
fn aggregated<N: Network + ?Sized>(net: &N, metric: &str) -> Result<MultilayerNetwork, MlnError> {
    require_undirected(net, metric)?;
    let aspects: Vec<usize> = (1..=net.aspects()).collect();
    aggregate(net, &aspects, false)
}

fn neighbourhood(net: &MultilayerNetwork, node: &Label) -> BTreeMap<Label, f64> {
    net.neighbors(&NodeLayer::monoplex(node.clone()), Direction::Total)
        .filter(|(other, _)| other.node != *node)
        .map(|(other, weight)| (other.node, weight))
        .collect()
}

fn linked(net: &MultilayerNetwork, a: &Label, b: &Label) -> Option<f64> {
    let weight = net.weight(&NodeLayer::monoplex(a.clone()), &NodeLayer::monoplex(b.clone()));
    (!net.config().is_no_edge(weight)).then_some(weight)
}

fn max_weight(net: &MultilayerNetwork) -> f64 {
    net.edges().map(|edge| edge.weight).fold(0.0, f64::max)
}

/// Ordered neighbour pairs `(j, k)`, `j != k`, closing a triangle through `node`.
fn closed_pairs(net: &MultilayerNetwork, node: &Label) -> (usize, usize) {
    let neighbours: Vec<Label> = neighbourhood(net, node).into_keys().collect();
    let degree = neighbours.len();
    let mut closed = 0;
    for j in &neighbours {
        for k in &neighbours {
            if j != k && linked(net, j, k).is_some() {
                closed += 1;
            }
        }
    }
    (closed, degree)
}

/// Local clustering coefficient of `node` in the aggregated network.
pub fn lcc<N: Network + ?Sized>(net: &N, node: &Label, undefined: Option<f64>) -> Result<f64, MlnError> {
    let agg = aggregated(net, "lcc")?;
    let (closed, degree) = closed_pairs(&agg, node);
    ratio(
        closed as f64,
        (degree * degree.saturating_sub(1)) as f64,
        undefined,
        "lcc",
    )
}

/// Global transitivity of the aggregated network.
pub fn gcc<N: Network + ?Sized>(net: &N, undefined: Option<f64>) -> Result<f64, MlnError> {
    let agg = aggregated(net, "gcc")?;
    let mut closed = 0usize;
    let mut pairs = 0usize;
    for node in agg.nodes() {
        let (node_closed, degree) = closed_pairs(&agg, &node);
        closed += node_closed;
        pairs += degree * degree.saturating_sub(1);
    }
    ratio(closed as f64, pairs as f64, undefined, "gcc")
}

/// Zhang's weighted local clustering coefficient.
pub fn lcc_zhang<N: Network + ?Sized>(
    net: &N,
    node: &Label,
    undefined: Option<f64>,
) -> Result<f64, MlnError> {
    let agg = aggregated(net, "lcc_zhang")?;
    let weights = neighbourhood(&agg, node);
    let mut numerator = 0.0;
    for (j, w_ij) in &weights {
        for (k, w_ik) in &weights {
            if j != k {
                if let Some(w_jk) = linked(&agg, j, k) {
                    numerator += w_ij * w_jk * w_ik;
                }
            }
        }
    }
    let strength: f64 = weights.values().sum();
    let squares: f64 = weights.values().map(|w| w * w).sum();
    let denominator = max_weight(&agg) * (strength * strength - squares);
    ratio(numerator, denominator, undefined, "lcc_zhang")
}

/// Onnela's weighted local clustering coefficient (geometric mean of triangle weights).
pub fn lcc_onnela<N: Network + ?Sized>(
    net: &N,
    node: &Label,
    undefined: Option<f64>,
) -> Result<f64, MlnError> {
    let agg = aggregated(net, "lcc_onnela")?;
    let weights = neighbourhood(&agg, node);
    let mut numerator = 0.0;
    for (j, w_ij) in &weights {
        for (k, w_ik) in &weights {
            if j != k {
                if let Some(w_jk) = linked(&agg, j, k) {
                    numerator += (w_ij * w_jk * w_ik).cbrt();
                }
            }
        }
    }
    let degree = weights.len() as f64;
    let denominator = max_weight(&agg) * degree * (degree - 1.0).max(0.0);
    ratio(numerator, denominator, undefined, "lcc_onnela")
}

/// Barrat's weighted local clustering coefficient.
pub fn lcc_barrat<N: Network + ?Sized>(
    net: &N,
    node: &Label,
    undefined: Option<f64>,
) -> Result<f64, MlnError> {
    let agg = aggregated(net, "lcc_barrat")?;
    let weights = neighbourhood(&agg, node);
    let mut numerator = 0.0;
    for (j, w_ij) in &weights {
        for (k, w_ik) in &weights {
            if j != k && linked(&agg, j, k).is_some() {
                numerator += (w_ij + w_ik) / 2.0;
            }
        }
    }
    let strength: f64 = weights.values().sum();
    let degree = weights.len() as f64;
    let denominator = strength * (degree - 1.0).max(0.0);
    ratio(numerator, denominator, undefined, "lcc_barrat")
}
