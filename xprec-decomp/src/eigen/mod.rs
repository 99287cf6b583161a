//! Eigenvalue decomposition of a real square matrix
//!
//! Symmetric input takes the tridiagonal QL path and yields real
//! eigenvalues in ascending order with orthonormal eigenvectors, so
//! `A = V * D * Vᵗ`. Anything else is reduced to Hessenberg form and then
//! to real Schur form; eigenvalues come out in deflation order, possibly as
//! complex-conjugate pairs, and `A * V = V * D` with V not necessarily
//! orthogonal.
//!
//! For a pair `λ ± iμ` at indices `i, i + 1` the eigenvector `u ± iw` is
//! stored as `u` in column `i` and `w` in column `i + 1`.

mod schur;
mod symmetric;

use num_complex::Complex;
use tracing::debug;

use crate::error::Result;
use crate::hessenberg::HessenbergDecomposition;
use crate::precision::Precision;
use crate::traits::HasDeterminant;
use crate::utils::matrix::{is_symmetric, tabulate, Matrix};
use crate::utils::validation::ensure_square;

/// Iteration limits for the eigenvalue solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EigenConfig {
    /// QL or QR sweeps allowed per eigenvalue before giving up
    pub max_iterations: usize,
}

impl EigenConfig {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Result of eigenvalue decomposition
#[derive(Debug, Clone)]
pub struct EigenDecomposition<T: Precision> {
    /// Real parts of the eigenvalues
    d: Vec<T>,
    /// Imaginary parts of the eigenvalues
    e: Vec<T>,
    v: Matrix<T>,
    symmetric: bool,
}

impl<T: Precision> EigenDecomposition<T> {
    /// Decompose `a` with the default iteration limits
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        Self::with_config(a, EigenConfig::default())
    }

    /// Decompose `a`, choosing the algorithm by an exact symmetry test
    pub fn with_config(a: &Matrix<T>, config: EigenConfig) -> Result<Self> {
        let n = ensure_square(a)?;
        let symmetric = is_symmetric(a);

        let mut d = vec![T::zero(); n];
        let mut e = vec![T::zero(); n];

        let v = if symmetric {
            let mut v = a.clone();
            symmetric::tred2(&mut v, &mut d, &mut e);
            symmetric::tql2(&mut v, &mut d, &mut e, config.max_iterations)?;
            symmetric::sort_ascending(&mut v, &mut d);
            v
        } else {
            let (mut h, mut v) = HessenbergDecomposition::new(a)?.into_parts();
            schur::hqr2(&mut h, &mut v, &mut d, &mut e, config.max_iterations)?;
            v
        };

        let complex_pairs = e.iter().filter(|x| **x > T::zero()).count();
        debug!(n, symmetric, complex_pairs, "eigendecomposition complete");

        Ok(Self { d, e, v, symmetric })
    }

    /// Whether the symmetric algorithm was used
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    pub fn real_eigenvalues(&self) -> &[T] {
        &self.d
    }

    pub fn imag_eigenvalues(&self) -> &[T] {
        &self.e
    }

    /// Eigenvalues as complex numbers, in storage order
    pub fn eigenvalues(&self) -> Vec<Complex<T>> {
        self.d
            .iter()
            .zip(&self.e)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }

    /// Eigenvector matrix
    pub fn v(&self) -> &Matrix<T> {
        &self.v
    }

    /// Block diagonal eigenvalue matrix
    ///
    /// Real eigenvalues sit on the diagonal; a pair `λ ± iμ` becomes the
    /// block `[λ, μ; -μ, λ]`.
    pub fn d(&self) -> Matrix<T> {
        let n = self.d.len();
        tabulate(n, n, |i, j| {
            if i == j {
                self.d[i]
            } else if j == i + 1 && self.e[i] > T::zero() {
                self.e[i]
            } else if i == j + 1 && self.e[i] < T::zero() {
                self.e[i]
            } else {
                T::zero()
            }
        })
    }
}

impl<T: Precision> HasDeterminant<T> for EigenDecomposition<T> {
    /// Product of the eigenvalues; each conjugate pair contributes `λ² + μ²`
    fn determinant(&self) -> Result<T> {
        let n = self.d.len();
        let mut det = T::one();
        let mut i = 0;
        while i < n {
            if self.e[i] > T::zero() && i + 1 < n {
                det *= self.d[i] * self.d[i] + self.e[i] * self.e[i];
                i += 2;
            } else {
                det *= self.d[i];
                i += 1;
            }
        }
        Ok(det)
    }
}
