//! Edge identifiers in the three tensor-index shorthands.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MlnError};
use crate::label::{Label, NodeLayer};

/// Identifier of an edge between two node-layers.
///
/// * `NodeOnly` addresses `(u, v)` and is only meaningful without aspects.
/// * `Short` addresses `(u, v, s1, …, sA)`: both endpoints share the layer.
/// * `Full` addresses `(u, v, s1, r1, …, sA, rA)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "kebab-case")]
pub enum EdgeId {
    /// Node-only identifier.
    NodeOnly {
        /// Source node.
        u: Label,
        /// Target node.
        v: Label,
    },
    /// Intra-layer identifier.
    Short {
        /// Source node.
        u: Label,
        /// Target node.
        v: Label,
        /// Shared layer tuple.
        layer: Vec<Label>,
    },
    /// Fully specified identifier.
    Full {
        /// Source node.
        u: Label,
        /// Target node.
        v: Label,
        /// Layer tuple of the source endpoint.
        source: Vec<Label>,
        /// Layer tuple of the target endpoint.
        target: Vec<Label>,
    },
}

impl EdgeId {
    /// Builds a node-only identifier.
    pub fn nodes(u: impl Into<Label>, v: impl Into<Label>) -> Self {
        EdgeId::NodeOnly {
            u: u.into(),
            v: v.into(),
        }
    }

    /// Builds a short (intra-layer) identifier.
    pub fn short(u: impl Into<Label>, v: impl Into<Label>, layer: Vec<Label>) -> Self {
        EdgeId::Short {
            u: u.into(),
            v: v.into(),
            layer,
        }
    }

    /// Builds a full identifier.
    pub fn full(
        u: impl Into<Label>,
        v: impl Into<Label>,
        source: Vec<Label>,
        target: Vec<Label>,
    ) -> Self {
        EdgeId::Full {
            u: u.into(),
            v: v.into(),
            source,
            target,
        }
    }

    /// Builds the full identifier joining two node-layers.
    pub fn between(a: &NodeLayer, b: &NodeLayer) -> Self {
        EdgeId::Full {
            u: a.node.clone(),
            v: b.node.clone(),
            source: a.layer.clone(),
            target: b.layer.clone(),
        }
    }

    /// Parses a flat index tuple against the network aspect count.
    ///
    /// Accepted arities are `2` (node-only), `2 + A` (short) and `2 + 2A`
    /// (full, with elementary layers interleaved as `s1, r1, s2, r2, …`).
    pub fn parse(indices: &[Label], aspects: usize) -> Result<Self, MlnError> {
        let len = indices.len();
        if len < 2 {
            return Err(arity_error(len, aspects));
        }
        let u = indices[0].clone();
        let v = indices[1].clone();
        let rest = &indices[2..];
        if rest.is_empty() {
            return Ok(EdgeId::NodeOnly { u, v });
        }
        if rest.len() == aspects {
            return Ok(EdgeId::Short {
                u,
                v,
                layer: rest.to_vec(),
            });
        }
        if rest.len() == 2 * aspects {
            let source = rest.iter().step_by(2).cloned().collect();
            let target = rest.iter().skip(1).step_by(2).cloned().collect();
            return Ok(EdgeId::Full {
                u,
                v,
                source,
                target,
            });
        }
        Err(arity_error(len, aspects))
    }

    /// Resolves the identifier into its two endpoint node-layers.
    pub fn endpoints(&self, aspects: usize) -> Result<(NodeLayer, NodeLayer), MlnError> {
        match self {
            EdgeId::NodeOnly { u, v } => {
                if aspects != 0 {
                    return Err(MlnError::Shape(
                        ErrorInfo::new(
                            "node-only-with-aspects",
                            "node-only identifiers address networks without aspects",
                        )
                        .with_context("aspects", aspects)
                        .with_hint("use a short or full identifier"),
                    ));
                }
                Ok((NodeLayer::monoplex(u.clone()), NodeLayer::monoplex(v.clone())))
            }
            EdgeId::Short { u, v, layer } => {
                if layer.len() != aspects {
                    return Err(arity_error(2 + layer.len(), aspects));
                }
                Ok((
                    NodeLayer::new(u.clone(), layer.clone()),
                    NodeLayer::new(v.clone(), layer.clone()),
                ))
            }
            EdgeId::Full {
                u,
                v,
                source,
                target,
            } => {
                if source.len() != aspects || target.len() != aspects {
                    return Err(arity_error(2 + source.len() + target.len(), aspects));
                }
                Ok((
                    NodeLayer::new(u.clone(), source.clone()),
                    NodeLayer::new(v.clone(), target.clone()),
                ))
            }
        }
    }
}

fn arity_error(len: usize, aspects: usize) -> MlnError {
    MlnError::Shape(
        ErrorInfo::new("invalid-arity", "edge index arity does not match aspects")
            .with_context("indices", len)
            .with_context("aspects", aspects)
            .with_hint(format!(
                "expected 2, {} or {} indices",
                2 + aspects,
                2 + 2 * aspects
            )),
    )
}
