use mlnet_core::{Label, MlnError, Network, NetworkConfig, NetworkMut};
use tracing::debug;

use super::CoordinateMap;
use crate::any::AnyNetwork;
use crate::multilayer::MultilayerNetwork;
use crate::multiplex::MultiplexNetwork;

/// Weight comparison used by [`threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `weight > theta`
    Greater,
    /// `weight >= theta`
    GreaterEq,
    /// `weight < theta`
    Less,
    /// `weight <= theta`
    LessEq,
}

impl Comparison {
    /// Whether `weight` passes against `theta`.
    pub fn holds(self, weight: f64, theta: f64) -> bool {
        match self {
            Comparison::Greater => weight > theta,
            Comparison::GreaterEq => weight >= theta,
            Comparison::Less => weight < theta,
            Comparison::LessEq => weight <= theta,
        }
    }
}

/// Copies the skeleton of `net` and keeps the edges passing `cmp(weight, theta)`.
///
/// The result stores every surviving edge explicitly, coupling edges of a
/// multiplex input included.
pub fn threshold<N: Network + ?Sized>(
    net: &N,
    theta: f64,
    cmp: Comparison,
) -> Result<MultilayerNetwork, MlnError> {
    let config: NetworkConfig = net.config().clone();
    let mut target = MultilayerNetwork::new(config);
    identity(net.aspects()).copy_skeleton(net, &mut target)?;
    let mut kept = 0usize;
    for edge in net.edges() {
        if cmp.holds(edge.weight, theta) {
            target.set_weight(&edge.source, &edge.target, edge.weight)?;
            kept += 1;
        }
    }
    debug!(theta, kept, "thresholded network");
    Ok(target)
}

/// Thresholds a multiplex network; the result stays a multiplex when every
/// coupling policy is `None`.
pub fn threshold_multiplex(
    net: &MultiplexNetwork,
    theta: f64,
    cmp: Comparison,
) -> Result<AnyNetwork, MlnError> {
    if !net.couplings().iter().all(|coupling| coupling.is_none()) {
        return threshold(net, theta, cmp).map(AnyNetwork::Multilayer);
    }
    let mut target = net.empty_like();
    identity(net.aspects()).copy_skeleton(net, &mut target)?;
    for edge in net.intra_edges() {
        if cmp.holds(edge.weight, theta) {
            target.set_weight(&edge.source, &edge.target, edge.weight)?;
        }
    }
    Ok(AnyNetwork::Multiplex(target))
}

fn identity(
    aspects: usize,
) -> CoordinateMap<impl Fn(usize, &Label) -> bool, impl Fn(usize, &Label) -> Label> {
    CoordinateMap::new((0..=aspects).collect(), |_, _| true, |_, label| label.clone())
}
