use mlnet_core::errors::MlnError;
use mlnet_core::{Label, Network, NodeLayer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cycles::{CycleCounts, Parts, Walker};
use crate::decomposition::Decomposition;
use crate::{or_undefined, require_undirected};

/// How the one-, two- and three-layer cycle classes are combined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "kebab-case")]
pub enum AwWeights {
    /// `Σ w_i t_i / d_i`; a class with a zero denominator and non-zero
    /// weight makes the coefficient undefined.
    Linear {
        /// Weight of one-layer cycles.
        w1: f64,
        /// Weight of two-layer cycles.
        w2: f64,
        /// Weight of three-layer cycles.
        w3: f64,
    },
    /// `(t1 α³ + t2 α β² + t3 β³) / (d1 α³ + d2 α β² + d3 β³)`.
    Polynomial {
        /// Weight of an intra-layer step.
        alpha: f64,
        /// Weight of a coupling step.
        beta: f64,
    },
}

impl Default for AwWeights {
    fn default() -> Self {
        Self::Linear {
            w1: 1.0 / 3.0,
            w2: 1.0 / 3.0,
            w3: 1.0 / 3.0,
        }
    }
}

impl AwWeights {
    /// Combines cycle counts into a coefficient, `None` when undefined.
    pub fn evaluate(&self, counts: &CycleCounts) -> Option<f64> {
        let (num, den) = (&counts.numerator, &counts.denominator);
        let t = [num.t1(), num.t2(), num.t3()].map(|x| x as f64);
        let d = [den.t1(), den.t2(), den.t3()].map(|x| x as f64);
        match *self {
            Self::Linear { w1, w2, w3 } => {
                let mut total = 0.0;
                for ((w, t), d) in [w1, w2, w3].into_iter().zip(t).zip(d) {
                    if w == 0.0 {
                        continue;
                    }
                    if d == 0.0 {
                        return None;
                    }
                    total += w * t / d;
                }
                Some(total)
            }
            Self::Polynomial { alpha, beta } => {
                let scale = [alpha.powi(3), alpha * beta * beta, beta.powi(3)];
                let top: f64 = scale.iter().zip(t).map(|(s, x)| s * x).sum();
                let bottom: f64 = scale.iter().zip(d).map(|(s, x)| s * x).sum();
                (bottom != 0.0).then(|| top / bottom)
            }
        }
    }
}

/// Evaluation strategy for cycle vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePath {
    /// Enumerate alternating walks one by one.
    BruteForce,
    /// Read diagonal entries of matrix products.
    #[default]
    Matrix,
}

/// Options shared by the alternating-walk coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CcOptions {
    /// Combination of the cycle classes.
    pub weights: AwWeights,
    /// Evaluation strategy.
    pub path: CyclePath,
    /// Value returned for an undefined coefficient; `None` raises
    /// [`MlnError::UndefinedMetric`] instead.
    pub undefined: Option<f64>,
}

/// Cycle counts summed over `positions` of a decomposed network.
fn summed_counts<N: Network + ?Sized>(
    net: &N,
    dec: &Decomposition,
    positions: &[usize],
    path: CyclePath,
) -> Result<CycleCounts, MlnError> {
    match path {
        CyclePath::BruteForce => {
            let walker = Walker::new(net)?;
            Ok(positions.iter().map(|&i| walker.counts(&dec.order()[i])).sum())
        }
        CyclePath::Matrix => {
            let parts = Parts::new(dec);
            Ok(positions.iter().map(|&i| parts.counts(i)).sum())
        }
    }
}

/// Local alternating-walk clustering coefficient of a node-layer.
pub fn lcc_aw<N: Network + ?Sized>(net: &N, nl: &NodeLayer, opts: &CcOptions) -> Result<f64, MlnError> {
    require_undirected(net, "lcc_aw")?;
    let dec = Decomposition::new(net);
    let positions: Vec<usize> = dec.position(nl).into_iter().collect();
    let counts = summed_counts(net, &dec, &positions, opts.path)?;
    or_undefined(opts.weights.evaluate(&counts), opts.undefined, "lcc_aw")
}

/// Alternating-walk coefficient of a node, summing cycles over all of its
/// node-layers before dividing.
pub fn sncc_aw<N: Network + ?Sized>(net: &N, node: &Label, opts: &CcOptions) -> Result<f64, MlnError> {
    require_undirected(net, "sncc_aw")?;
    let dec = Decomposition::new(net);
    let positions = dec.positions_of(node);
    let counts = summed_counts(net, &dec, &positions, opts.path)?;
    or_undefined(opts.weights.evaluate(&counts), opts.undefined, "sncc_aw")
}

/// Global alternating-walk coefficient, summing cycles over every node-layer.
pub fn gcc_aw<N: Network + ?Sized>(net: &N, opts: &CcOptions) -> Result<f64, MlnError> {
    require_undirected(net, "gcc_aw")?;
    let dec = Decomposition::new(net);
    let positions: Vec<usize> = (0..dec.len()).collect();
    let counts = summed_counts(net, &dec, &positions, opts.path)?;
    debug!(
        node_layers = dec.len(),
        triangles = counts.numerator.aaa,
        "evaluated global cycle counts"
    );
    or_undefined(opts.weights.evaluate(&counts), opts.undefined, "gcc_aw")
}

/// Mean of the defined local coefficients over every node-layer.
pub fn avg_lcc_aw<N: Network + ?Sized>(net: &N, opts: &CcOptions) -> Result<f64, MlnError> {
    require_undirected(net, "avg_lcc_aw")?;
    let dec = Decomposition::new(net);
    let walker = match opts.path {
        CyclePath::BruteForce => Some(Walker::new(net)?),
        CyclePath::Matrix => None,
    };
    let parts = (opts.path == CyclePath::Matrix).then(|| Parts::new(&dec));
    let mut total = 0.0;
    let mut defined = 0usize;
    for (i, nl) in dec.order().iter().enumerate() {
        let counts = match (&parts, &walker) {
            (Some(parts), _) => parts.counts(i),
            (None, Some(walker)) => walker.counts(nl),
            (None, None) => CycleCounts::default(),
        };
        if let Some(value) = opts.weights.evaluate(&counts) {
            total += value;
            defined += 1;
        }
    }
    let mean = (defined > 0).then(|| total / defined as f64);
    or_undefined(mean, opts.undefined, "avg_lcc_aw")
}
