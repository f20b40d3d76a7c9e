use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::Network;
use mlnet_graph::Relabeling;
use tracing::debug;

use crate::backend::{Capability, Invariant, IsomorphismBackend};
use crate::permutation::PermutationBackend;

/// Ordered set of backends queried by capability.
///
/// The first registered backend declaring a capability answers for it unless
/// [`BackendRegistry::prefer`] names another one. A capability nobody
/// declares fails with [`MlnError::BackendMissing`].
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn IsomorphismBackend>>,
    preferred: BTreeMap<Capability, String>,
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .field("preferred", &self.preferred)
            .finish()
    }
}

impl BackendRegistry {
    /// Registry without backends.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in [`PermutationBackend`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PermutationBackend::default()));
        registry
    }

    /// Appends a backend; a backend with the same name is replaced in place.
    pub fn register(&mut self, backend: Arc<dyn IsomorphismBackend>) {
        debug!(
            backend = backend.name(),
            capabilities = ?backend.capabilities(),
            "registering isomorphism backend"
        );
        match self
            .backends
            .iter_mut()
            .find(|existing| existing.name() == backend.name())
        {
            Some(slot) => *slot = backend,
            None => self.backends.push(backend),
        }
    }

    /// Routes `capability` to the backend called `name`.
    pub fn prefer(&mut self, capability: Capability, name: &str) -> Result<(), MlnError> {
        let declared = self
            .backends
            .iter()
            .any(|backend| backend.name() == name && backend.supports(capability));
        if !declared {
            return Err(missing(capability).with_context("backend", name));
        }
        self.preferred.insert(capability, name.to_string());
        Ok(())
    }

    /// Registered backend names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    /// Backend answering for `capability`.
    pub fn backend_for(&self, capability: Capability) -> Result<Arc<dyn IsomorphismBackend>, MlnError> {
        let chosen = match self.preferred.get(&capability) {
            Some(name) => self.backends.iter().find(|backend| backend.name() == name),
            None => self.backends.iter().find(|backend| backend.supports(capability)),
        };
        chosen.cloned().ok_or_else(|| missing(capability))
    }

    /// Whether `a` and `b` are isomorphic.
    pub fn is_isomorphic(&self, a: &dyn Network, b: &dyn Network, allowed: &[usize]) -> Result<bool, MlnError> {
        self.backend_for(Capability::IsIsomorphic)?
            .is_isomorphic(a, b, allowed)
    }

    /// Complete invariant of `net`.
    pub fn complete_invariant(&self, net: &dyn Network, allowed: &[usize]) -> Result<Invariant, MlnError> {
        self.backend_for(Capability::CompleteInvariant)?
            .complete_invariant(net, allowed)
    }

    /// Automorphism group generators of `net`.
    pub fn automorphism_generators(
        &self,
        net: &dyn Network,
        allowed: &[usize],
    ) -> Result<Vec<Relabeling>, MlnError> {
        self.backend_for(Capability::AutomorphismGenerators)?
            .automorphism_generators(net, allowed)
    }

    /// Relabeling mapping `a` onto `b`, if any.
    pub fn isomorphism(
        &self,
        a: &dyn Network,
        b: &dyn Network,
        allowed: &[usize],
    ) -> Result<Option<Relabeling>, MlnError> {
        self.backend_for(Capability::Isomorphism)?
            .isomorphism(a, b, allowed)
    }
}

fn missing(capability: Capability) -> MlnError {
    MlnError::BackendMissing(
        ErrorInfo::new("no-backend", "no registered backend provides the capability")
            .with_context("capability", capability.name()),
    )
}

static REGISTRY: OnceLock<RwLock<BackendRegistry>> = OnceLock::new();

/// Installs the process-wide registry with the built-in backends.
///
/// Idempotent; later calls leave registered backends untouched.
pub fn init_backends() {
    REGISTRY.get_or_init(|| RwLock::new(BackendRegistry::with_defaults()));
}

fn installed() -> Result<&'static RwLock<BackendRegistry>, MlnError> {
    REGISTRY.get().ok_or_else(|| {
        MlnError::BackendMissing(
            ErrorInfo::new("registry-uninitialised", "isomorphism backends are not initialised")
                .with_hint("call mlnet_iso::init_backends() first"),
        )
    })
}

/// Adds a backend to the process-wide registry.
pub fn register_backend(backend: Arc<dyn IsomorphismBackend>) -> Result<(), MlnError> {
    installed()?
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(backend);
    Ok(())
}

/// Routes a capability of the process-wide registry to a named backend.
pub fn prefer_backend(capability: Capability, name: &str) -> Result<(), MlnError> {
    installed()?
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .prefer(capability, name)
}

/// Snapshot of the process-wide registry.
pub fn registry() -> Result<BackendRegistry, MlnError> {
    Ok(installed()?
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone())
}

/// Backend of the process-wide registry answering for `capability`.
pub fn backend_for(capability: Capability) -> Result<Arc<dyn IsomorphismBackend>, MlnError> {
    installed()?
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .backend_for(capability)
}
