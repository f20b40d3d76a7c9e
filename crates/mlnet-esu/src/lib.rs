#![deny(missing_docs)]

//! Multilayer ESU: exact enumeration and RAND-ESU style sampling of
//! connected induced subgraphs of single-aspect multilayer networks that
//! match node/layer size and intersection requirements.

mod config;
mod esu;
mod reference;
mod requirement;
mod subgraph;

pub use config::SamplerConfig;
pub use esu::{sample, sample_to_vec, Check, Esu, EsuStats, Sink};
pub use reference::brute_force;
pub use requirement::{Bounds, Mode, Requirement};
pub use subgraph::Subgraph;
