//! Singular value decomposition
//!
//! For an `m × n` matrix A with `k = min(m, n)`, computes `A = U * Σ * Vᵗ`
//! where U is `m × k`, V is `n × k`, both with orthonormal columns, and Σ
//! holds the singular values in non-increasing order. Wide matrices are
//! handled by decomposing `Aᵗ` and exchanging the roles of U and V.

mod golub_kahan;

use tracing::debug;

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::traits::{HasRank, Solvable};
use crate::utils::matrix::{diag, dims, tabulate, transpose, zeros, Matrix};
use crate::utils::validation::{ensure_nonempty, ensure_rows};

use golub_kahan::{golub_kahan, GolubKahan};

/// Which factors to form and how long to iterate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SVDConfig {
    /// Form the left singular vectors
    pub want_u: bool,
    /// Form the right singular vectors
    pub want_v: bool,
    /// QR sweeps allowed per singular value before giving up
    pub max_iterations: usize,
}

impl SVDConfig {
    pub fn new(want_u: bool, want_v: bool) -> Self {
        Self {
            want_u,
            want_v,
            max_iterations: 100,
        }
    }

    /// Singular values only
    pub fn values_only() -> Self {
        Self::new(false, false)
    }
}

impl Default for SVDConfig {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Result of singular value decomposition
#[derive(Debug, Clone)]
pub struct SingularValueDecomposition<T: Precision> {
    u: Option<Matrix<T>>,
    s: Vec<T>,
    v: Option<Matrix<T>>,
    rows: usize,
    cols: usize,
}

impl<T: Precision> SingularValueDecomposition<T> {
    /// Full decomposition with both singular vector sets
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        Self::with_config(a, SVDConfig::default())
    }

    pub fn with_config(a: &Matrix<T>, config: SVDConfig) -> Result<Self> {
        let (m, n) = ensure_nonempty(a)?;

        let (u, s, v) = if m >= n {
            let GolubKahan { u, s, v } =
                golub_kahan(a.clone(), config.want_u, config.want_v, config.max_iterations)?;
            (u, s, v)
        } else {
            // A = (Aᵗ)ᵗ = (U' Σ V'ᵗ)ᵗ = V' Σ U'ᵗ
            let GolubKahan { u, s, v } =
                golub_kahan(transpose(a), config.want_v, config.want_u, config.max_iterations)?;
            (v, s, u)
        };

        let svd = Self {
            u,
            s,
            v,
            rows: m,
            cols: n,
        };
        debug!(
            rows = m,
            cols = n,
            rank = svd.rank(),
            sigma_max = svd.norm2().to_f64(),
            "SVD complete"
        );
        Ok(svd)
    }

    /// Left singular vectors (`m × min(m, n)`), if requested
    pub fn u(&self) -> Option<&Matrix<T>> {
        self.u.as_ref()
    }

    /// Right singular vectors (`n × min(m, n)`), if requested
    pub fn v(&self) -> Option<&Matrix<T>> {
        self.v.as_ref()
    }

    /// Singular values, largest first
    pub fn singular_values(&self) -> &[T] {
        &self.s
    }

    /// Diagonal matrix Σ
    pub fn s(&self) -> Matrix<T> {
        diag(&self.s)
    }

    /// Largest singular value
    pub fn norm2(&self) -> T {
        self.s[0]
    }

    /// Ratio of the largest to the smallest singular value
    pub fn cond(&self) -> T {
        self.s[0] / self.s[self.s.len() - 1]
    }

    /// Singular values at or below this are treated as zero
    fn rank_tolerance(&self) -> T {
        let scale = T::from(self.rows.max(self.cols) as f64);
        scale * self.s[0] * T::epsilon()
    }
}

impl<T: Precision> HasRank for SingularValueDecomposition<T> {
    fn rank(&self) -> usize {
        let tol = self.rank_tolerance();
        self.s.iter().filter(|&&x| x > tol).count()
    }
}

impl<T: Precision> Solvable<T> for SingularValueDecomposition<T> {
    fn order(&self) -> usize {
        self.rows
    }

    /// Minimum-norm least-squares solution `X = V * Σ⁺ * Uᵗ * B`
    fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        ensure_rows(b, self.rows)?;
        let u = self.u.as_ref().ok_or(DecompError::MissingFactor("U"))?;
        let v = self.v.as_ref().ok_or(DecompError::MissingFactor("V"))?;

        let nx = dims(b).1;
        let k = self.s.len();
        let tol = self.rank_tolerance();

        // Σ⁺ * Uᵗ * B, rows beyond the numerical rank dropped
        let mut c: Matrix<T> = zeros(k, nx);
        for l in 0..k {
            if self.s[l] <= tol {
                continue;
            }
            for j in 0..nx {
                let mut sum = T::zero();
                for i in 0..self.rows {
                    sum += u[[i, l]] * b[[i, j]];
                }
                c[[l, j]] = sum / self.s[l];
            }
        }

        Ok(tabulate(self.cols, nx, |row, col| {
            let mut sum = T::zero();
            for l in 0..k {
                sum += v[[row, l]] * c[[l, col]];
            }
            sum
        }))
    }
}
