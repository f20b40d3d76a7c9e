use std::iter::Sum;
use std::ops::{Add, AddAssign};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::{Direction, Network, NodeLayer};
use nalgebra::{DMatrix, RowDVector};
use serde::{Deserialize, Serialize};

use crate::decomposition::Step::{self, Coupling as C, Intra as A, Reference as F};
use crate::decomposition::Decomposition;
use crate::require_undirected;

/// Closed alternating-walk counts at one node-layer, one entry per pattern.
///
/// `a` steps stay on a layer, `c` steps move along a coupling edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleVector {
    /// Triangles within a layer.
    pub aaa: i64,
    /// `a a c a c`.
    pub aacac: i64,
    /// `a c a a c`.
    pub acaac: i64,
    /// `a c a c a`.
    pub acaca: i64,
    /// `a c a c a c`.
    pub acacac: i64,
}

impl CycleVector {
    /// Cycles using one layer.
    pub fn t1(&self) -> i64 {
        self.aaa
    }

    /// Cycles using two layers; the transposed patterns coincide on
    /// undirected networks and are counted twice.
    pub fn t2(&self) -> i64 {
        2 * self.aacac + 2 * self.acaac + self.acaca
    }

    /// Cycles using three layers.
    pub fn t3(&self) -> i64 {
        2 * self.acacac
    }

    fn from_patterns(values: [i64; 5]) -> Self {
        let [aaa, aacac, acaac, acaca, acacac] = values;
        Self {
            aaa,
            aacac,
            acaac,
            acaca,
            acacac,
        }
    }
}

impl Add for CycleVector {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for CycleVector {
    fn add_assign(&mut self, rhs: Self) {
        self.aaa += rhs.aaa;
        self.aacac += rhs.aacac;
        self.acaac += rhs.acaac;
        self.acaca += rhs.acaca;
        self.acacac += rhs.acacac;
    }
}

impl Sum for CycleVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Cycle vector of a node-layer together with the vector of the same
/// patterns closed through the complete reference graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounts {
    /// Realised cycles.
    pub numerator: CycleVector,
    /// Potential cycles.
    pub denominator: CycleVector,
}

impl Add for CycleCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            numerator: self.numerator + rhs.numerator,
            denominator: self.denominator + rhs.denominator,
        }
    }
}

impl Sum for CycleCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Numerator and denominator walk for each entry of [`CycleVector`]. The
/// denominator swaps the middle intra-layer step for the reference graph.
const PATTERNS: [(&[Step], &[Step]); 5] = [
    (&[A, A, A], &[A, F, A]),
    (&[A, A, C, A, C], &[A, F, C, A, C]),
    (&[A, C, A, A, C], &[A, C, F, A, C]),
    (&[A, C, A, C, A], &[A, C, F, C, A]),
    (&[A, C, A, C, A, C], &[A, C, F, C, A, C]),
];

/// Alternating walks read straight off the network's neighbour lists,
/// without going through a [`Decomposition`].
pub(crate) struct Walker<'n, N: ?Sized> {
    net: &'n N,
}

impl<'n, N: Network + ?Sized> Walker<'n, N> {
    /// Walk enumeration agrees with the algebraic path only when coupling
    /// edges join every pair of copies of a node.
    pub(crate) fn new(net: &'n N) -> Result<Self, MlnError> {
        let walker = Self { net };
        if net.is_fully_interconnected() || walker.coupling_is_complete() {
            return Ok(walker);
        }
        Err(MlnError::Unsupported(
            ErrorInfo::new(
                "walk-enumeration-coupling",
                "walk enumeration on partially interconnected networks needs categorical coupling",
            )
            .with_hint("use the matrix path"),
        ))
    }

    fn coupling_is_complete(&self) -> bool {
        self.net.node_layers().all(|nl| {
            self.step(Step::Coupling, &nl).len() + 1 == self.net.layers_of(&nl.node).len()
        })
    }

    /// Node-layers one `step` away from `from`.
    fn step(&self, step: Step, from: &NodeLayer) -> Vec<NodeLayer> {
        match step {
            Step::Intra => self
                .net
                .neighbors(from, Direction::Out)
                .map(|(to, _)| to)
                .filter(|to| to.layer == from.layer && to.node != from.node)
                .collect(),
            Step::Coupling => self
                .net
                .neighbors(from, Direction::Out)
                .map(|(to, _)| to)
                .filter(|to| to.node == from.node && to.layer != from.layer)
                .collect(),
            Step::Reference => self
                .net
                .nodes_on(&from.layer)
                .into_iter()
                .filter(|node| *node != from.node)
                .map(|node| NodeLayer::new(node, from.layer.clone()))
                .collect(),
        }
    }

    /// Number of closed walks from `current` back to `start` following `pattern`.
    fn walks(&self, current: &NodeLayer, start: &NodeLayer, pattern: &[Step]) -> i64 {
        match pattern.split_first() {
            None => i64::from(current == start),
            Some((step, rest)) => self
                .step(*step, current)
                .iter()
                .map(|next| self.walks(next, start, rest))
                .sum(),
        }
    }

    /// Cycle counts of `nl`; all zero when it does not exist.
    pub(crate) fn counts(&self, nl: &NodeLayer) -> CycleCounts {
        if !self.net.has_node_layer(nl) {
            return CycleCounts::default();
        }
        CycleCounts {
            numerator: CycleVector::from_patterns(PATTERNS.map(|(num, _)| self.walks(nl, nl, num))),
            denominator: CycleVector::from_patterns(
                PATTERNS.map(|(_, den)| self.walks(nl, nl, den)),
            ),
        }
    }
}

/// Dense `A`, `C` and `F` matrices for the algebraic evaluation.
pub(crate) struct Parts {
    intra: DMatrix<i64>,
    coupling: DMatrix<i64>,
    reference: DMatrix<i64>,
}

impl Parts {
    pub(crate) fn new(dec: &Decomposition) -> Self {
        Self {
            intra: dec.matrix(Step::Intra),
            coupling: dec.matrix(Step::Coupling),
            reference: dec.matrix(Step::Reference),
        }
    }

    fn get(&self, step: Step) -> &DMatrix<i64> {
        match step {
            Step::Intra => &self.intra,
            Step::Coupling => &self.coupling,
            Step::Reference => &self.reference,
        }
    }

    /// Diagonal entry `i` of the product of the pattern's matrices.
    fn closed(&self, i: usize, pattern: &[Step]) -> i64 {
        let n = self.intra.nrows();
        let mut row = RowDVector::<i64>::zeros(n);
        row[i] = 1;
        for step in pattern {
            row = &row * self.get(*step);
        }
        row[i]
    }

    pub(crate) fn counts(&self, i: usize) -> CycleCounts {
        CycleCounts {
            numerator: CycleVector::from_patterns(PATTERNS.map(|(num, _)| self.closed(i, num))),
            denominator: CycleVector::from_patterns(PATTERNS.map(|(_, den)| self.closed(i, den))),
        }
    }
}

/// Cycle counts of `nl` by enumerating alternating walks over the
/// network's own neighbour lists.
///
/// An absent node-layer has all-zero counts.
pub fn cycle_counts_bf<N: Network + ?Sized>(net: &N, nl: &NodeLayer) -> Result<CycleCounts, MlnError> {
    require_undirected(net, "cycle_counts")?;
    Ok(Walker::new(net)?.counts(nl))
}

/// Cycle counts of `nl` as diagonal entries of matrix products over the
/// supra-graph decomposition.
pub fn cycle_counts_adj<N: Network + ?Sized>(net: &N, nl: &NodeLayer) -> Result<CycleCounts, MlnError> {
    require_undirected(net, "cycle_counts")?;
    let dec = Decomposition::new(net);
    Ok(dec
        .position(nl)
        .map(|i| Parts::new(&dec).counts(i))
        .unwrap_or_default())
}
