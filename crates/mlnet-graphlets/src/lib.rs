#![deny(missing_docs)]

//! Graphlet analysis for multiplex networks: generation of every connected
//! graphlet up to a node count, automorphism orbits, per-node orbit counts
//! and the graphlet correlation matrix and distance built on them.
//!
//! Every operation takes the [`mlnet_iso::BackendRegistry`] it queries;
//! pass `mlnet_iso::registry()?` to use the process-wide one.

mod correlation;
mod generate;
mod orbits;

pub use correlation::{gcd, gcm};
pub use generate::{automorphism_orbits, graphlets, Graphlet, GraphletOptions, Graphlets, Orbits};
pub use orbits::{orbit_counts_all, orbit_list, Orbit, OrbitCounts};
