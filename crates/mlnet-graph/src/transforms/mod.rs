//! Structural transforms producing new networks from existing ones.
//!
//! Every transform maps node-layers coordinate-wise: aggregation drops
//! aspects, subnetworks filter labels, relabeling renames them. The shared
//! [`CoordinateMap`] copies the node/layer skeleton accordingly; each
//! transform then decides which edges to write.

mod aggregate;
mod relabel;
mod subnet;
mod subnet_iter;
mod threshold;
mod underlying;

pub use aggregate::{aggregate, aggregate_into, overlay_network};
pub use relabel::{normalize, relabel, Relabel, Relabeling};
pub use subnet::{subnet, subnet_into, Selection};
pub use subnet_iter::{subnet_iter, SubnetIter, SubnetIterOptions};
pub use threshold::{threshold, threshold_multiplex, Comparison};
pub use underlying::underlying_graph;

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Label, Network, NetworkKind, NetworkMut, NodeLayer};

/// Coordinate-wise image of node-layers from a source into a target network.
pub(crate) struct CoordinateMap<K, R> {
    /// Source aspect feeding each target coordinate (node first).
    aspects: Vec<usize>,
    keep: K,
    rename: R,
}

impl<K, R> CoordinateMap<K, R>
where
    K: Fn(usize, &Label) -> bool,
    R: Fn(usize, &Label) -> Label,
{
    pub(crate) fn new(aspects: Vec<usize>, keep: K, rename: R) -> Self {
        Self {
            aspects,
            keep,
            rename,
        }
    }

    pub(crate) fn admits(&self, nl: &NodeLayer) -> bool {
        nl.coords()
            .enumerate()
            .all(|(aspect, label)| (self.keep)(aspect, label))
    }

    pub(crate) fn image(&self, nl: &NodeLayer) -> NodeLayer {
        let coords: Vec<&Label> = nl.coords().collect();
        let node = (self.rename)(0, coords[0]);
        let layer = self.aspects[1..]
            .iter()
            .map(|&aspect| (self.rename)(aspect, coords[aspect]))
            .collect();
        NodeLayer::new(node, layer)
    }

    /// Copies the admitted domains (fully interconnected target) or the
    /// admitted node-layers (partially interconnected target).
    pub(crate) fn copy_skeleton<N, T>(&self, source: &N, target: &mut T) -> Result<(), MlnError>
    where
        N: Network + ?Sized,
        T: NetworkMut,
    {
        if target.is_fully_interconnected() {
            for (target_aspect, &source_aspect) in self.aspects.iter().enumerate() {
                for label in source.elementary_layers(source_aspect)? {
                    if !(self.keep)(source_aspect, &label) {
                        continue;
                    }
                    let image = (self.rename)(source_aspect, &label);
                    if target_aspect == 0 {
                        target.add_node(image);
                    } else {
                        target.add_layer(target_aspect, image)?;
                    }
                }
            }
            return Ok(());
        }
        for nl in source.node_layers() {
            if self.admits(&nl) {
                target.add_node_layer(&self.image(&nl))?;
            }
        }
        Ok(())
    }
}

/// Rejects copies that would coerce a partially interconnected network into
/// a fully interconnected one, or a multilayer network into a multiplex.
pub(crate) fn check_compatible<N, T>(source: &N, target: &T) -> Result<(), MlnError>
where
    N: Network + ?Sized,
    T: Network + ?Sized,
{
    if !source.is_fully_interconnected() && target.is_fully_interconnected() {
        return Err(MlnError::Interconnectivity(
            ErrorInfo::new(
                "coerce-to-full",
                "cannot copy a partially interconnected network into a fully interconnected one",
            )
            .with_hint("construct the target with fully_interconnected(false)"),
        ));
    }
    if source.kind() == NetworkKind::Multilayer && target.kind() == NetworkKind::Multiplex {
        return Err(MlnError::Interconnectivity(
            ErrorInfo::new(
                "multilayer-into-multiplex",
                "cannot copy a multilayer network into a multiplex network",
            )
            .with_hint("use a multilayer target"),
        ));
    }
    Ok(())
}

pub(crate) fn check_target_aspects<T: Network + ?Sized>(target: &T, expected: usize) -> Result<(), MlnError> {
    if target.aspects() == expected {
        return Ok(());
    }
    Err(MlnError::Shape(
        ErrorInfo::new("target-aspects", "target network has the wrong number of aspects")
            .with_context("expected", expected)
            .with_context("actual", target.aspects()),
    ))
}

/// Whether `target` stores an edge between the two node-layers (multiplex
/// targets keep intra-layer edges only).
pub(crate) fn stores_edge<T: Network + ?Sized>(target: &T, a: &NodeLayer, b: &NodeLayer) -> bool {
    target.kind() != NetworkKind::Multiplex || a.layer == b.layer
}
