use std::collections::BTreeSet;

use itertools::Itertools;
use mlnet_core::errors::MlnError;
use mlnet_core::Network;

use crate::esu::Check;
use crate::requirement::{Mode, Requirement};
use crate::subgraph::{Subgraph, SupraIndex};

/// Every subgraph accepted by `requirement`, found by trying all node and
/// layer subsets within the count bounds. Returned sorted.
///
/// Exponential in the network size; meant as a reference for checking the
/// ESU enumerator on small inputs.
pub fn brute_force<N: Network + ?Sized>(
    net: &N,
    requirement: &Requirement,
    mode: Mode,
    check: Option<&Check<'_>>,
) -> Result<Vec<Subgraph>, MlnError> {
    let bounds = requirement.bounds(mode)?;
    let index = SupraIndex::new(net)?;
    let mut found = Vec::new();
    for node_count in bounds.min_nodes..=bounds.max_nodes.min(index.node_count()) {
        for layer_count in bounds.min_layers..=bounds.max_layers.min(index.layer_count()) {
            for nodes in (0..index.node_count()).combinations(node_count) {
                let nodes: BTreeSet<usize> = nodes.into_iter().collect();
                for layers in (0..index.layer_count()).combinations(layer_count) {
                    let layers: BTreeSet<usize> = layers.into_iter().collect();
                    let members = index.closure(&nodes, &layers);
                    if index.project(&members) != (nodes.clone(), layers.clone()) {
                        continue;
                    }
                    if !index.is_connected(&members) {
                        continue;
                    }
                    let profile = index.layer_profile(&members, &layers);
                    if !requirement.accepts(mode, &profile) {
                        continue;
                    }
                    let subgraph = index.subgraph(&nodes, &layers);
                    if check.map_or(true, |check| check(&subgraph)) {
                        found.push(subgraph);
                    }
                }
            }
        }
    }
    found.sort();
    Ok(found)
}
