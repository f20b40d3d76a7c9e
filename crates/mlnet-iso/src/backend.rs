use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::Network;
use mlnet_graph::Relabeling;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Operation a backend may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Decide whether two networks are isomorphic.
    IsIsomorphic,
    /// Produce an invariant that is equal exactly for isomorphic networks.
    CompleteInvariant,
    /// Produce generators of the automorphism group.
    AutomorphismGenerators,
    /// Produce an explicit isomorphism.
    Isomorphism,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 4] = [
        Capability::IsIsomorphic,
        Capability::CompleteInvariant,
        Capability::AutomorphismGenerators,
        Capability::Isomorphism,
    ];

    /// Stable kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Capability::IsIsomorphic => "is-isomorphic",
            Capability::CompleteInvariant => "complete-invariant",
            Capability::AutomorphismGenerators => "automorphism-generators",
            Capability::Isomorphism => "isomorphism",
        }
    }
}

/// Complete invariant: equal for two networks iff they are isomorphic under
/// the same allowed aspects (and produced by the same backend).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Invariant(String);

impl Invariant {
    /// Wraps a backend specific canonical encoding.
    pub fn new(encoding: impl Into<String>) -> Self {
        Self(encoding.into())
    }

    /// The canonical encoding.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 digest for display and logging.
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.0.as_bytes());
        hex::encode(&hash[..8])
    }
}

pub(crate) fn not_provided(backend: &str, capability: Capability) -> MlnError {
    MlnError::BackendMissing(
        ErrorInfo::new("capability-not-provided", "backend does not provide the capability")
            .with_context("backend", backend)
            .with_context("capability", capability.name()),
    )
}

/// Isomorphism engine for multilayer networks.
///
/// `allowed` lists the aspects (0 is the node aspect) whose elementary
/// layers may be permuted; the other aspects must match label for label.
/// Backends implement the capabilities they declare; the remaining methods
/// fail with [`MlnError::BackendMissing`].
pub trait IsomorphismBackend: Send + Sync {
    /// Unique backend name.
    fn name(&self) -> &str;

    /// Declared capabilities.
    fn capabilities(&self) -> &[Capability];

    /// Whether `capability` is declared.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Whether `a` and `b` are isomorphic.
    fn is_isomorphic(&self, _a: &dyn Network, _b: &dyn Network, _allowed: &[usize]) -> Result<bool, MlnError> {
        Err(not_provided(self.name(), Capability::IsIsomorphic))
    }

    /// Complete invariant of `net`.
    fn complete_invariant(&self, _net: &dyn Network, _allowed: &[usize]) -> Result<Invariant, MlnError> {
        Err(not_provided(self.name(), Capability::CompleteInvariant))
    }

    /// Generators of the automorphism group as per-aspect label permutations.
    fn automorphism_generators(
        &self,
        _net: &dyn Network,
        _allowed: &[usize],
    ) -> Result<Vec<Relabeling>, MlnError> {
        Err(not_provided(self.name(), Capability::AutomorphismGenerators))
    }

    /// A relabeling mapping `a` onto `b`, or `None` if they are not isomorphic.
    fn isomorphism(
        &self,
        _a: &dyn Network,
        _b: &dyn Network,
        _allowed: &[usize],
    ) -> Result<Option<Relabeling>, MlnError> {
        Err(not_provided(self.name(), Capability::Isomorphism))
    }
}
