use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Edge, Label, NetworkMut};

use super::{stores_edge, subnet, Selection};

/// Dimensions varied by [`subnet_iter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetIterOptions {
    /// Vary the node subset.
    pub vary_nodes: bool,
    /// Layer aspects (>= 1) whose elementary-layer subset is varied.
    pub vary_aspects: Vec<usize>,
    /// Additionally vary the subset of edges kept in each induced subnetwork.
    pub vary_edges: bool,
}

const MAX_VARIED: usize = 63;

/// Lazy enumeration of induced subnetworks.
///
/// Every varied dimension ranges over its non-empty label subsets; the
/// remaining dimensions keep all labels. With `vary_edges` each induced
/// subnetwork is further expanded into all of its edge subsets.
pub struct SubnetIter<'a, N: NetworkMut> {
    net: &'a N,
    domains: Vec<Vec<Label>>,
    masks: Vec<u64>,
    first: Vec<u64>,
    last: Vec<u64>,
    vary_edges: bool,
    pending: Option<(N, Vec<Edge>, u64)>,
    exhausted: bool,
}

/// Starts a lazy [`SubnetIter`] over `net`.
pub fn subnet_iter<'a, N: NetworkMut>(
    net: &'a N,
    options: &SubnetIterOptions,
) -> Result<SubnetIter<'a, N>, MlnError> {
    let mut varied = vec![false; net.aspects() + 1];
    varied[0] = options.vary_nodes;
    for &aspect in &options.vary_aspects {
        if aspect == 0 || aspect > net.aspects() {
            return Err(MlnError::Shape(
                ErrorInfo::new("aspect-out-of-range", "varied aspect is not a layer aspect")
                    .with_context("aspect", aspect),
            ));
        }
        varied[aspect] = true;
    }
    let domains = (0..=net.aspects())
        .map(|aspect| net.elementary_layers(aspect))
        .collect::<Result<Vec<_>, _>>()?;
    let mut first = Vec::with_capacity(domains.len());
    let mut last = Vec::with_capacity(domains.len());
    let mut exhausted = false;
    for (domain, &vary) in domains.iter().zip(&varied) {
        if domain.len() > MAX_VARIED {
            return Err(too_many("labels", domain.len()));
        }
        let full = (1u64 << domain.len()) - 1;
        if vary {
            exhausted |= domain.is_empty();
            first.push(1);
        } else {
            first.push(full);
        }
        last.push(full);
    }
    Ok(SubnetIter {
        net,
        domains,
        masks: first.clone(),
        first,
        last,
        vary_edges: options.vary_edges,
        pending: None,
        exhausted,
    })
}

fn too_many(what: &str, count: usize) -> MlnError {
    MlnError::Shape(
        ErrorInfo::new("too-many-subsets", "subset enumeration exceeds 63 elements")
            .with_context("dimension", what)
            .with_context("count", count),
    )
}

impl<'a, N: NetworkMut> SubnetIter<'a, N> {
    fn selection(&self) -> Selection {
        let mut selection = Selection::all(self.net.aspects());
        for (aspect, (domain, mask)) in self.domains.iter().zip(&self.masks).enumerate() {
            let chosen = domain
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, label)| label.clone());
            selection = selection.with_layers(aspect, chosen);
        }
        selection
    }

    fn advance(&mut self) {
        for position in 0..self.masks.len() {
            if self.masks[position] < self.last[position] {
                self.masks[position] += 1;
                return;
            }
            self.masks[position] = self.first[position];
        }
        self.exhausted = true;
    }

    fn edge_subset(&self, base: &N, edges: &[Edge], mask: u64) -> Result<N, MlnError> {
        let mut copy = subnet(base, &Selection::all(base.aspects()), true)?;
        for (bit, edge) in edges.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                copy.set_weight(&edge.source, &edge.target, edge.weight)?;
            }
        }
        Ok(copy)
    }
}

impl<'a, N: NetworkMut> Iterator for SubnetIter<'a, N> {
    type Item = Result<N, MlnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((base, edges, mask)) = self.pending.take() {
            let item = self.edge_subset(&base, &edges, mask);
            if mask + 1 < (1u64 << edges.len()) {
                self.pending = Some((base, edges, mask + 1));
            }
            return Some(item);
        }
        if self.exhausted {
            return None;
        }
        let selection = self.selection();
        self.advance();
        let induced = match subnet(self.net, &selection, false) {
            Ok(induced) => induced,
            Err(err) => return Some(Err(err)),
        };
        if !self.vary_edges {
            return Some(Ok(induced));
        }
        let edges: Vec<Edge> = induced
            .edges()
            .filter(|edge| stores_edge(&induced, &edge.source, &edge.target))
            .collect();
        if edges.len() > MAX_VARIED {
            self.exhausted = true;
            return Some(Err(too_many("edges", edges.len())));
        }
        self.pending = Some((induced, edges, 0));
        self.next()
    }
}
