#![deny(missing_docs)]

//! Multilayer and multiplex network models implementing the `mlnet-core`
//! contracts, together with structural transforms, the supra-adjacency view,
//! canonical hashing and random/complete network generators.

mod any;
mod canon;
mod coupling;
mod generators;
mod interner;
mod multilayer;
mod multiplex;
mod supra;
pub mod transforms;

pub use any::AnyNetwork;
pub use canon::{canonical_edges, canonical_hash, structurally_equal};
pub use coupling::Coupling;
pub use generators::{
    empty_multiplex, er, er_multilayer, er_partially_interconnected, full_multilayer,
    full_multiplex,
};
pub use multilayer::MultilayerNetwork;
pub use multiplex::MultiplexNetwork;
pub use supra::{supra_adjacency, supra_ordering};
pub use transforms::{
    aggregate, aggregate_into, normalize, overlay_network, relabel, subnet, subnet_into,
    subnet_iter, threshold, threshold_multiplex, underlying_graph, Comparison, Relabel,
    Relabeling, Selection, SubnetIter, SubnetIterOptions,
};
