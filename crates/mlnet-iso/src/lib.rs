#![deny(missing_docs)]

//! Isomorphism interface for multilayer networks: the backend trait, a
//! capability registry and an exhaustive permutation backend.
//!
//! The process-wide registry only exists after [`init_backends`]; every
//! query made before that fails with `BackendMissing`. Callers that want
//! isolation can build their own [`BackendRegistry`] value instead.

mod backend;
mod permutation;
mod registry;

pub use backend::{Capability, Invariant, IsomorphismBackend};
pub use permutation::PermutationBackend;
pub use registry::{
    backend_for, init_backends, prefer_backend, register_backend, registry, BackendRegistry,
};
