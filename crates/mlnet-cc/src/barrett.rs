use std::collections::HashMap;

use mlnet_core::{Label, MlnError, Network};
use nalgebra::DMatrix;

use crate::{ratio, require_undirected};

/// Binary intra-layer adjacency per layer tuple, indexed by sorted node order.
struct LayerCounts {
    index: HashMap<Label, usize>,
    layers: Vec<DMatrix<i64>>,
    /// Number of layers in which each node pair is linked.
    total: DMatrix<i64>,
}

impl LayerCounts {
    fn build<N: Network + ?Sized>(net: &N) -> Self {
        let nodes = net.nodes();
        let n = nodes.len();
        let index: HashMap<Label, usize> =
            nodes.into_iter().enumerate().map(|(i, node)| (node, i)).collect();
        let layer_index: HashMap<Vec<Label>, usize> = net
            .layers()
            .into_iter()
            .enumerate()
            .map(|(i, layer)| (layer, i))
            .collect();
        let mut layers = vec![DMatrix::<i64>::zeros(n, n); layer_index.len()];
        for edge in net.edges() {
            if !edge.is_intra_layer() || edge.source.node == edge.target.node {
                continue;
            }
            let (Some(&l), Some(&i), Some(&j)) = (
                layer_index.get(&edge.source.layer),
                index.get(&edge.source.node),
                index.get(&edge.target.node),
            ) else {
                continue;
            };
            layers[l][(i, j)] = 1;
            layers[l][(j, i)] = 1;
        }
        let total = layers
            .iter()
            .fold(DMatrix::<i64>::zeros(n, n), |acc, layer| acc + layer);
        Self {
            index,
            layers,
            total,
        }
    }

    fn size(&self) -> usize {
        self.total.nrows()
    }
}

/// Barrett's multiplex clustering coefficient from the layer-summed adjacency.
///
/// `Σ_{j≠k} W_ij W_jk W_ki / ((L - 1) Σ_{j≠k} W_ij W_ik)` where `W` counts
/// the layers in which a pair is linked and `L` is the number of layers.
pub fn cc_barrett_optimized<N: Network + ?Sized>(
    net: &N,
    node: &Label,
    undefined: Option<f64>,
) -> Result<f64, MlnError> {
    require_undirected(net, "cc_barrett")?;
    let counts = LayerCounts::build(net);
    let Some(&i) = counts.index.get(node) else {
        return ratio(0.0, 0.0, undefined, "cc_barrett");
    };
    let w = &counts.total;
    let mut numerator: i64 = 0;
    let mut open: i64 = 0;
    for j in 0..counts.size() {
        for k in 0..counts.size() {
            if j == k || j == i || k == i {
                continue;
            }
            numerator += w[(i, j)] * w[(j, k)] * w[(k, i)];
            open += w[(i, j)] * w[(i, k)];
        }
    }
    let spare_layers = counts.layers.len().saturating_sub(1) as i64;
    ratio(
        numerator as f64,
        (spare_layers * open) as f64,
        undefined,
        "cc_barrett",
    )
}

/// Barrett's coefficient evaluated layer triple by layer triple.
pub fn cc_barrett_explicit<N: Network + ?Sized>(
    net: &N,
    node: &Label,
    undefined: Option<f64>,
) -> Result<f64, MlnError> {
    require_undirected(net, "cc_barrett")?;
    let counts = LayerCounts::build(net);
    let Some(&i) = counts.index.get(node) else {
        return ratio(0.0, 0.0, undefined, "cc_barrett");
    };
    let layers = &counts.layers;
    let n = counts.size();
    let mut numerator: i64 = 0;
    let mut denominator: i64 = 0;
    for (alpha, a) in layers.iter().enumerate() {
        for b in layers {
            for (gamma, c) in layers.iter().enumerate() {
                for j in (0..n).filter(|&j| j != i) {
                    for k in (0..n).filter(|&k| k != i && k != j) {
                        numerator += a[(i, j)] * b[(j, k)] * c[(k, i)];
                        if gamma != alpha {
                            denominator += a[(i, j)] * b[(i, k)];
                        }
                    }
                }
            }
        }
    }
    ratio(numerator as f64, denominator as f64, undefined, "cc_barrett")
}

/// Triangle and connected-pair counts of `node` in the networks thresholded
/// at "linked in at least `k` layers", for `k = 1..=L`.
///
/// Both counts are over unordered neighbour pairs.
pub fn cc_sequence<N: Network + ?Sized>(
    net: &N,
    node: &Label,
) -> Result<(Vec<u64>, Vec<u64>), MlnError> {
    require_undirected(net, "cc_sequence")?;
    let counts = LayerCounts::build(net);
    let levels = counts.layers.len();
    let Some(&i) = counts.index.get(node) else {
        return Ok((vec![0; levels], vec![0; levels]));
    };
    let w = &counts.total;
    let mut triangles = Vec::with_capacity(levels);
    let mut tuples = Vec::with_capacity(levels);
    for level in 1..=levels as i64 {
        let neighbours: Vec<usize> = (0..counts.size())
            .filter(|&j| j != i && w[(i, j)] >= level)
            .collect();
        let degree = neighbours.len() as u64;
        let mut closed = 0u64;
        for (position, &j) in neighbours.iter().enumerate() {
            for &k in &neighbours[position + 1..] {
                if w[(j, k)] >= level {
                    closed += 1;
                }
            }
        }
        triangles.push(closed);
        tuples.push(degree * degree.saturating_sub(1) / 2);
    }
    Ok((triangles, tuples))
}
