use std::collections::BTreeSet;

use itertools::Itertools;
use mlnet_core::errors::MlnError;
use serde::{Deserialize, Serialize};

/// Largest number of layer roles a size/intersection requirement may name.
const MAX_ROLES: usize = 16;

/// Shape a sampled subgraph has to match.
///
/// Layer roles are matched against the subgraph's layers under every
/// permutation; a subgraph is accepted when one assignment fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Requirement {
    /// Node count per layer role and the size of every intersection of two
    /// or more roles.
    Strict {
        /// Nodes on each layer role.
        sizes: Vec<usize>,
        /// `2^L - L - 1` intersection sizes, ordered by subset cardinality
        /// and then lexicographically; `None` matches anything.
        intersections: Vec<Option<usize>>,
        /// Total node count; derived by inclusion-exclusion when omitted.
        #[serde(default)]
        nnodes: Option<usize>,
    },
    /// Node count per layer role and the size of the intersection of all roles.
    Common {
        /// Nodes on each layer role.
        sizes: Vec<usize>,
        /// Nodes shared by every role.
        common: usize,
        /// Total node count.
        nnodes: usize,
    },
    /// Only the node and layer counts.
    Relaxed {
        /// Number of nodes.
        nnodes: usize,
        /// Number of layers.
        nlayers: usize,
    },
}

/// How intersection sizes (and relaxed counts) are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Equal to the requested value.
    #[default]
    Exact,
    /// At most the requested value.
    LessOrEqual,
}

/// Admissible node, layer and node-layer counts derived from a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Fewest nodes.
    pub min_nodes: usize,
    /// Most nodes.
    pub max_nodes: usize,
    /// Fewest layers.
    pub min_layers: usize,
    /// Most layers.
    pub max_layers: usize,
    /// Most node-layers a reported subgraph can hold.
    pub max_node_layers: usize,
}

impl Bounds {
    /// Levels of the node-and-layer search tree, one sampling probability each.
    pub fn sampling_depth(&self) -> usize {
        (self.max_nodes + self.max_layers).saturating_sub(1)
    }

    /// Whether the counts fall within the bounds.
    pub fn admits(&self, nodes: usize, layers: usize) -> bool {
        (self.min_nodes..=self.max_nodes).contains(&nodes)
            && (self.min_layers..=self.max_layers).contains(&layers)
    }
}

/// Role subsets of cardinality two and up, in intersection order.
pub(crate) fn role_subsets(roles: usize) -> Vec<Vec<usize>> {
    (2..=roles)
        .flat_map(|size| (0..roles).combinations(size))
        .collect()
}

fn check_sizes(sizes: &[usize]) -> Result<(), MlnError> {
    if sizes.is_empty() || sizes.contains(&0) {
        return Err(MlnError::requirement(
            "invalid-sizes",
            "layer sizes must be non-empty and positive",
        )
        .with_context("sizes", format!("{sizes:?}")));
    }
    if sizes.len() > MAX_ROLES {
        return Err(MlnError::requirement("too-many-layers", "too many layer roles")
            .with_context("roles", sizes.len())
            .with_context("max", MAX_ROLES));
    }
    Ok(())
}

/// Union size by inclusion-exclusion, `None` if any slot is a wildcard.
fn union_size(sizes: &[usize], intersections: &[Option<usize>]) -> Option<i64> {
    let mut total: i64 = sizes.iter().map(|&s| s as i64).sum();
    for (subset, slot) in role_subsets(sizes.len()).iter().zip(intersections) {
        let value = (*slot)? as i64;
        if subset.len() % 2 == 0 {
            total -= value;
        } else {
            total += value;
        }
    }
    Some(total)
}

impl Requirement {
    /// Strict requirement with the node count left to inclusion-exclusion.
    pub fn strict(sizes: Vec<usize>, intersections: Vec<Option<usize>>) -> Self {
        Self::Strict {
            sizes,
            intersections,
            nnodes: None,
        }
    }

    /// Validates the requirement and derives its count bounds.
    pub fn bounds(&self, mode: Mode) -> Result<Bounds, MlnError> {
        match self {
            Self::Strict {
                sizes,
                intersections,
                nnodes,
            } => {
                check_sizes(sizes)?;
                let expected = (1usize << sizes.len()) - sizes.len() - 1;
                if intersections.len() != expected {
                    return Err(MlnError::requirement(
                        "intersection-count",
                        "wrong number of intersections for the layer count",
                    )
                    .with_context("expected", expected)
                    .with_context("actual", intersections.len()));
                }
                let derived = match mode {
                    Mode::Exact => union_size(sizes, intersections),
                    Mode::LessOrEqual => None,
                };
                let nodes = match (derived, *nnodes) {
                    (Some(derived), _) if derived < 1 => {
                        return Err(MlnError::requirement(
                            "inconsistent-intersections",
                            "intersections imply a non-positive node count",
                        )
                        .with_context("nodes", derived));
                    }
                    (Some(derived), Some(given)) if derived as usize != given => {
                        return Err(MlnError::requirement(
                            "nnodes-mismatch",
                            "node count disagrees with the intersections",
                        )
                        .with_context("derived", derived)
                        .with_context("given", given));
                    }
                    (Some(derived), _) => derived as usize,
                    (None, Some(given)) => given,
                    (None, None) => {
                        return Err(MlnError::requirement(
                            "nnodes-required",
                            "node count cannot be derived from the intersections",
                        )
                        .with_hint("set nnodes explicitly"));
                    }
                };
                Ok(Self::fixed(nodes, sizes))
            }
            Self::Common {
                sizes,
                common,
                nnodes,
            } => {
                check_sizes(sizes)?;
                if sizes.len() < 2 {
                    return Err(MlnError::requirement(
                        "common-needs-two-layers",
                        "a common intersection needs at least two layer roles",
                    ));
                }
                if *nnodes == 0 || sizes.iter().any(|&s| s < *common) {
                    return Err(MlnError::requirement(
                        "inconsistent-common",
                        "common intersection exceeds a layer size",
                    )
                    .with_context("common", common));
                }
                Ok(Self::fixed(*nnodes, sizes))
            }
            Self::Relaxed { nnodes, nlayers } => {
                if *nnodes == 0 || *nlayers == 0 {
                    return Err(MlnError::requirement(
                        "invalid-sizes",
                        "node and layer counts must be positive",
                    ));
                }
                let (min_nodes, min_layers) = match mode {
                    Mode::Exact => (*nnodes, *nlayers),
                    Mode::LessOrEqual => (1, 1),
                };
                Ok(Bounds {
                    min_nodes,
                    max_nodes: *nnodes,
                    min_layers,
                    max_layers: *nlayers,
                    max_node_layers: nnodes * nlayers,
                })
            }
        }
    }

    fn fixed(nodes: usize, sizes: &[usize]) -> Bounds {
        Bounds {
            min_nodes: nodes,
            max_nodes: nodes,
            min_layers: sizes.len(),
            max_layers: sizes.len(),
            max_node_layers: sizes.iter().sum(),
        }
    }

    /// Whether a subgraph with the given node sets per layer fits some
    /// assignment of layers to roles. Counts are checked by [`Bounds`].
    pub(crate) fn accepts(&self, mode: Mode, layer_nodes: &[BTreeSet<usize>]) -> bool {
        let (sizes, slots): (&[usize], Vec<(Vec<usize>, Option<usize>)>) = match self {
            Self::Relaxed { .. } => return true,
            Self::Strict {
                sizes,
                intersections,
                ..
            } => (
                sizes.as_slice(),
                role_subsets(sizes.len())
                    .into_iter()
                    .zip(intersections.iter().copied())
                    .collect(),
            ),
            Self::Common { sizes, common, .. } => {
                (sizes.as_slice(), vec![((0..sizes.len()).collect(), Some(*common))])
            }
        };
        if layer_nodes.len() != sizes.len() {
            return false;
        }
        (0..sizes.len()).permutations(sizes.len()).any(|roles| {
            let sizes_fit = roles
                .iter()
                .zip(sizes)
                .all(|(&layer, &size)| layer_nodes[layer].len() == size);
            sizes_fit
                && slots.iter().all(|(subset, slot)| {
                    let Some(expected) = *slot else {
                        return true;
                    };
                    let actual = intersection_size(subset.iter().map(|&role| &layer_nodes[roles[role]]));
                    match mode {
                        Mode::Exact => actual == expected,
                        Mode::LessOrEqual => actual <= expected,
                    }
                })
        })
    }
}

fn intersection_size<'a>(mut sets: impl Iterator<Item = &'a BTreeSet<usize>>) -> usize {
    let Some(first) = sets.next() else {
        return 0;
    };
    let mut shared = first.clone();
    for set in sets {
        shared.retain(|node| set.contains(node));
    }
    shared.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsets_follow_cardinality_then_lexicographic_order() {
        assert_eq!(
            role_subsets(3),
            vec![vec![0, 1], vec![0, 2], vec![1, 2], vec![0, 1, 2]]
        );
        assert_eq!(role_subsets(1), Vec::<Vec<usize>>::new());
    }

    #[test]
    fn inclusion_exclusion_derives_node_count() {
        let req = Requirement::strict(vec![2, 3, 2], vec![Some(1), Some(1), Some(2), Some(1)]);
        let bounds = req.bounds(Mode::Exact).unwrap();
        // 7 - 4 + 1
        assert_eq!(bounds.max_nodes, 4);
        assert_eq!(bounds.max_layers, 3);
        assert_eq!(bounds.max_node_layers, 7);
        assert_eq!(bounds.sampling_depth(), 6);
    }

    #[test]
    fn wildcards_need_explicit_node_count() {
        let req = Requirement::strict(vec![2, 2], vec![None]);
        assert_eq!(req.bounds(Mode::Exact).unwrap_err().code(), "nnodes-required");
        let req = Requirement::Strict {
            sizes: vec![2, 2],
            intersections: vec![None],
            nnodes: Some(3),
        };
        assert_eq!(req.bounds(Mode::Exact).unwrap().max_nodes, 3);
    }

    #[test]
    fn accepts_under_some_role_assignment() {
        let req = Requirement::strict(vec![1, 2], vec![Some(1)]);
        let layers = vec![BTreeSet::from([0, 1]), BTreeSet::from([0])];
        assert!(req.accepts(Mode::Exact, &layers));
        let disjoint = vec![BTreeSet::from([0, 1]), BTreeSet::from([2])];
        assert!(!req.accepts(Mode::Exact, &disjoint));
        assert!(req.accepts(Mode::LessOrEqual, &disjoint));
    }
}
