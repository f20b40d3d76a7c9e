use mlnet_core::errors::MlnError;
use nalgebra::DMatrix;

use crate::orbits::OrbitCounts;

/// Graphlet correlation matrix: Spearman correlation between every pair of
/// orbit columns across the nodes.
///
/// Orbits whose counts do not vary across nodes correlate as 0 with every
/// other orbit; the diagonal is 1.
pub fn gcm(counts: &OrbitCounts) -> DMatrix<f64> {
    let size = counts.orbits.len();
    let ranked: Vec<Vec<f64>> = (0..size).map(|column| rank(&counts.column(column))).collect();
    DMatrix::from_fn(size, size, |i, j| {
        if i == j {
            1.0
        } else {
            pearson(&ranked[i], &ranked[j])
        }
    })
}

/// Graphlet correlation distance: Euclidean norm of the strictly upper
/// triangular part of `a - b`.
pub fn gcd(a: &DMatrix<f64>, b: &DMatrix<f64>) -> Result<f64, MlnError> {
    if a.shape() != b.shape() || a.nrows() != a.ncols() {
        return Err(MlnError::shape("gcm-shape", "correlation matrices must be square and alike")
            .with_context("left", format!("{:?}", a.shape()))
            .with_context("right", format!("{:?}", b.shape())));
    }
    let mut total = 0.0;
    for i in 0..a.nrows() {
        for j in (i + 1)..a.ncols() {
            let diff = a[(i, j)] - b[(i, j)];
            total += diff * diff;
        }
    }
    Ok(total.sqrt())
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let len = xs.len();
    if len == 0 {
        return 0.0;
    }
    let mean_x = xs.iter().sum::<f64>() / len as f64;
    let mean_y = ys.iter().sum::<f64>() / len as f64;
    let mut num = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        num += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }
    if denom_x == 0.0 || denom_y == 0.0 {
        return 0.0;
    }
    num / (denom_x.sqrt() * denom_y.sqrt())
}

/// Ranks from 1, ties sharing their average rank.
fn rank(values: &[f64]) -> Vec<f64> {
    let mut pairs: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    pairs.sort_by(|a, b| a.1.total_cmp(&b.1));
    let mut ranks = vec![0.0; values.len()];
    let mut idx = 0;
    while idx < pairs.len() {
        let start = idx;
        while idx < pairs.len() && pairs[idx].1 == pairs[start].1 {
            idx += 1;
        }
        let shared = (start + idx - 1) as f64 / 2.0 + 1.0;
        for &(original, _) in &pairs[start..idx] {
            ranks[original] = shared;
        }
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_share_average_rank() {
        assert_eq!(rank(&[3.0, 1.0, 3.0, 2.0]), vec![3.5, 1.0, 3.5, 2.0]);
    }

    #[test]
    fn constant_series_correlate_as_zero() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_uses_upper_triangle() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 1.0]);
        let b = DMatrix::from_row_slice(2, 2, &[1.0, -0.5, -0.5, 1.0]);
        assert!((gcd(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(gcd(&a, &a).unwrap(), 0.0);
        assert!(gcd(&a, &DMatrix::identity(3, 3)).is_err());
    }
}
