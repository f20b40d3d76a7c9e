#![deny(missing_docs)]

//! Multilayer clustering coefficients: classical monoplex coefficients on
//! the aggregated network, Barrett's multiplex coefficient, the cc sequence
//! and alternating-walk coefficients built on cycle vectors.
//!
//! Every coefficient takes an `undefined` sentinel. A zero denominator yields
//! the sentinel when one is supplied and [`MlnError::UndefinedMetric`]
//! otherwise.

mod aw;
mod barrett;
mod cycles;
mod decomposition;
mod monoplex;

pub use aw::{avg_lcc_aw, gcc_aw, lcc_aw, sncc_aw, AwWeights, CcOptions, CyclePath};
pub use barrett::{cc_barrett_explicit, cc_barrett_optimized, cc_sequence};
pub use cycles::{cycle_counts_adj, cycle_counts_bf, CycleCounts, CycleVector};
pub use decomposition::Decomposition;
pub use monoplex::{gcc, lcc, lcc_barrat, lcc_onnela, lcc_zhang};

use mlnet_core::errors::{ErrorInfo, MlnError};
use mlnet_core::Network;

/// Divides `numerator` by `denominator`, mapping a zero denominator to the sentinel.
pub(crate) fn ratio(
    numerator: f64,
    denominator: f64,
    undefined: Option<f64>,
    metric: &str,
) -> Result<f64, MlnError> {
    if denominator == 0.0 {
        return or_undefined(None, undefined, metric);
    }
    Ok(numerator / denominator)
}

/// Resolves an undefined coefficient to the sentinel, or fails without one.
pub(crate) fn or_undefined(
    value: Option<f64>,
    undefined: Option<f64>,
    metric: &str,
) -> Result<f64, MlnError> {
    value.or(undefined).ok_or_else(|| {
        MlnError::UndefinedMetric(
            ErrorInfo::new("zero-denominator", "coefficient denominator is zero")
                .with_context("metric", metric)
                .with_hint("pass an undefined sentinel to receive a value instead"),
        )
    })
}

/// Rejects directed inputs.
pub(crate) fn require_undirected<N: Network + ?Sized>(net: &N, metric: &str) -> Result<(), MlnError> {
    if !net.is_directed() {
        return Ok(());
    }
    Err(MlnError::Unsupported(
        ErrorInfo::new("directed-network", "clustering coefficients require undirected networks")
            .with_context("metric", metric),
    ))
}
