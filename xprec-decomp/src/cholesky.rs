//! Cholesky decomposition `A = L * Lᵗ`
//!
//! Symmetry and positive definiteness are not validated up front. Both are
//! checked while the factor is formed; a failed check clears
//! [`CholeskyDecomposition::is_spd`] and the factorization still runs to
//! completion, clamping negative diagonal residues to zero. The resulting
//! `L` is then only a partial factor and callers must consult `is_spd`.

use tracing::debug;

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::traits::{HasDeterminant, Solvable};
use crate::utils::matrix::{dims, zeros, Matrix};
use crate::utils::validation::{ensure_rows, ensure_square};

/// Loop order used to form the factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CholeskyVariant {
    /// Row oriented: each row of L is completed before the next
    #[default]
    Banachiewicz,
    /// Column oriented: each column of L is completed before the next
    Crout,
}

/// Result of Cholesky factorization
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T: Precision> {
    l: Matrix<T>,
    is_spd: bool,
    variant: CholeskyVariant,
}

impl<T: Precision> CholeskyDecomposition<T> {
    /// Factor `a` with the row-oriented variant
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        Self::with_variant(a, CholeskyVariant::default())
    }

    /// Factor `a` with the given loop order
    pub fn with_variant(a: &Matrix<T>, variant: CholeskyVariant) -> Result<Self> {
        let n = ensure_square(a)?;

        let (l, is_spd) = match variant {
            CholeskyVariant::Banachiewicz => banachiewicz(a, n),
            CholeskyVariant::Crout => crout(a, n),
        };

        if is_spd {
            debug!(n, ?variant, "Cholesky factorization complete");
        } else {
            debug!(n, ?variant, "matrix is not symmetric positive definite");
        }

        Ok(Self { l, is_spd, variant })
    }

    /// Whether the input was symmetric positive definite
    pub fn is_spd(&self) -> bool {
        self.is_spd
    }

    /// Loop order the factor was formed with
    pub fn variant(&self) -> CholeskyVariant {
        self.variant
    }

    /// Lower triangular factor
    pub fn lower(&self) -> &Matrix<T> {
        &self.l
    }
}

fn banachiewicz<T: Precision>(a: &Matrix<T>, n: usize) -> (Matrix<T>, bool) {
    let mut l = zeros(n, n);
    let mut is_spd = true;

    for j in 0..n {
        let mut d = T::zero();
        for k in 0..j {
            let mut s = T::zero();
            for i in 0..k {
                s += l[[k, i]] * l[[j, i]];
            }
            s = (a[[j, k]] - s) / l[[k, k]];
            l[[j, k]] = s;
            d += s * s;
            is_spd = is_spd && a[[k, j]] == a[[j, k]];
        }
        d = a[[j, j]] - d;
        is_spd = is_spd && d > T::zero();
        l[[j, j]] = d.max(T::zero()).sqrt();
    }

    (l, is_spd)
}

fn crout<T: Precision>(a: &Matrix<T>, n: usize) -> (Matrix<T>, bool) {
    let mut l = zeros(n, n);
    let mut is_spd = true;

    for j in 0..n {
        let mut d = a[[j, j]];
        for k in 0..j {
            d -= l[[j, k]] * l[[j, k]];
        }
        is_spd = is_spd && d > T::zero();
        let l_jj = d.max(T::zero()).sqrt();
        l[[j, j]] = l_jj;

        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / l_jj;
            is_spd = is_spd && a[[i, j]] == a[[j, i]];
        }
    }

    (l, is_spd)
}

impl<T: Precision> HasDeterminant<T> for CholeskyDecomposition<T> {
    fn determinant(&self) -> Result<T> {
        if !self.is_spd {
            return Err(DecompError::NotPositiveDefinite);
        }
        let n = dims(&self.l).0;
        let mut d = T::one();
        for j in 0..n {
            d *= self.l[[j, j]] * self.l[[j, j]];
        }
        Ok(d)
    }
}

impl<T: Precision> Solvable<T> for CholeskyDecomposition<T> {
    fn order(&self) -> usize {
        dims(&self.l).0
    }

    fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let n = self.order();
        ensure_rows(b, n)?;
        if !self.is_spd {
            return Err(DecompError::NotPositiveDefinite);
        }

        let nx = dims(b).1;
        let l = &self.l;
        let mut x = b.clone();

        // Solve L*Y = B
        for k in 0..n {
            for j in 0..nx {
                for i in 0..k {
                    let x_ij = x[[i, j]];
                    x[[k, j]] -= x_ij * l[[k, i]];
                }
                x[[k, j]] /= l[[k, k]];
            }
        }

        // Solve Lᵗ*X = Y
        for k in (0..n).rev() {
            for j in 0..nx {
                for i in (k + 1)..n {
                    let x_ij = x[[i, j]];
                    x[[k, j]] -= x_ij * l[[i, k]];
                }
                x[[k, j]] /= l[[k, k]];
            }
        }

        Ok(x)
    }
}
