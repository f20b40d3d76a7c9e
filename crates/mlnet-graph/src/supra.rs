use std::collections::HashMap;

use mlnet_core::{Network, NodeLayer};
use nalgebra::DMatrix;

/// Node-layers in supra-adjacency order: layer tuple first, node last.
pub fn supra_ordering<N: Network + ?Sized>(net: &N) -> Vec<NodeLayer> {
    let mut order: Vec<NodeLayer> = net.node_layers().collect();
    order.sort_by(|a, b| a.supra_key().cmp(&b.supra_key()));
    order
}

/// Dense supra-adjacency matrix together with its node-layer ordering.
///
/// Cell `(i, j)` holds the weight of the edge from the i-th to the j-th
/// node-layer and `0.0` where there is none. With `include_couplings` unset,
/// edges between distinct layer tuples are left out.
pub fn supra_adjacency<N: Network + ?Sized>(
    net: &N,
    include_couplings: bool,
) -> (DMatrix<f64>, Vec<NodeLayer>) {
    let order = supra_ordering(net);
    let index: HashMap<&NodeLayer, usize> = order.iter().enumerate().map(|(i, nl)| (nl, i)).collect();
    let mut matrix = DMatrix::<f64>::zeros(order.len(), order.len());
    let directed = net.is_directed();
    for edge in net.edges() {
        if !include_couplings && !edge.is_intra_layer() {
            continue;
        }
        let (Some(&i), Some(&j)) = (index.get(&edge.source), index.get(&edge.target)) else {
            continue;
        };
        matrix[(i, j)] = edge.weight;
        if !directed {
            matrix[(j, i)] = edge.weight;
        }
    }
    (matrix, order)
}
