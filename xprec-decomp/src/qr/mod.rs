//! QR decomposition by Householder reflections
//!
//! For an `m × n` matrix A with `m >= n`, computes an orthogonal Q (economy
//! size, `m × n`) and an upper triangular R (`n × n`) with `A = Q * R`.
//! Rank deficiency does not stop the factorization; it shows up as an exact
//! zero on the diagonal of R.

mod householder;

use tracing::debug;

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::traits::{HasRank, Solvable};
use crate::utils::matrix::{dims, tabulate, zeros, Matrix};
use crate::utils::validation::{ensure_nonempty, ensure_rows};

use householder::{apply_reflector, form_reflector, reflector};

/// Result of Householder QR factorization
#[derive(Debug, Clone)]
pub struct QRDecomposition<T: Precision> {
    /// Householder vectors in the lower trapezoid, strict upper part of R above
    qr: Matrix<T>,
    /// Diagonal of R
    rdiag: Vec<T>,
}

impl<T: Precision> QRDecomposition<T> {
    /// Factor `a`, which must have at least as many rows as columns
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        let (m, n) = ensure_nonempty(a)?;
        if m < n {
            return Err(DecompError::WideMatrix { rows: m, cols: n });
        }

        let mut qr = a.clone();
        let mut rdiag = vec![T::zero(); n];

        for k in 0..n {
            let nu = form_reflector(&mut qr, k);
            if !nu.is_zero() {
                let v = reflector(&qr, k);
                for j in (k + 1)..n {
                    apply_reflector(&v, k, &mut qr, j);
                }
            }
            rdiag[k] = -nu;
        }

        let qr = Self { qr, rdiag };
        debug!(
            rows = m,
            cols = n,
            rank = qr.rank(),
            "QR factorization complete"
        );
        Ok(qr)
    }

    /// Whether R has no exactly-zero diagonal entry
    pub fn is_full_rank(&self) -> bool {
        self.rdiag.iter().all(|r| !r.is_zero())
    }

    /// Diagonal of R
    pub fn rdiag(&self) -> &[T] {
        &self.rdiag
    }

    /// Lower trapezoidal matrix whose columns are the Householder vectors
    pub fn householder(&self) -> Matrix<T> {
        let (m, n) = dims(&self.qr);
        tabulate(m, n, |row, col| {
            if row >= col {
                self.qr[[row, col]]
            } else {
                T::zero()
            }
        })
    }

    /// Upper triangular factor R
    pub fn r(&self) -> Matrix<T> {
        let n = self.rdiag.len();
        tabulate(n, n, |i, j| {
            if i < j {
                self.qr[[i, j]]
            } else if i == j {
                self.rdiag[i]
            } else {
                T::zero()
            }
        })
    }

    /// Economy-size orthogonal factor Q (`m × n`)
    pub fn q(&self) -> Matrix<T> {
        let (m, n) = dims(&self.qr);
        let mut q: Matrix<T> = zeros(m, n);

        // Apply reflectors to the identity, last one first
        for k in (0..n).rev() {
            q[[k, k]] = T::one();
            if self.qr[[k, k]].is_zero() {
                continue;
            }
            let v = reflector(&self.qr, k);
            for j in k..n {
                apply_reflector(&v, k, &mut q, j);
            }
        }
        q
    }
}

impl<T: Precision> HasRank for QRDecomposition<T> {
    fn rank(&self) -> usize {
        self.rdiag.iter().filter(|r| !r.is_zero()).count()
    }
}

impl<T: Precision> Solvable<T> for QRDecomposition<T> {
    fn order(&self) -> usize {
        dims(&self.qr).0
    }

    /// Least-squares solution of `A * X = B`
    fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let (m, n) = dims(&self.qr);
        ensure_rows(b, m)?;
        if !self.is_full_rank() {
            return Err(DecompError::RankDeficient);
        }

        let nx = dims(b).1;
        let mut x = b.clone();

        // Compute Qᵗ*B
        for k in 0..n {
            let v = reflector(&self.qr, k);
            for j in 0..nx {
                apply_reflector(&v, k, &mut x, j);
            }
        }

        // Solve R*X = Qᵗ*B
        for k in (0..n).rev() {
            for j in 0..nx {
                x[[k, j]] /= self.rdiag[k];
            }
            for i in 0..k {
                let r_ik = self.qr[[i, k]];
                for j in 0..nx {
                    let x_kj = x[[k, j]];
                    x[[i, j]] -= x_kj * r_ik;
                }
            }
        }

        Ok(tabulate(n, nx, |row, col| x[[row, col]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::matrix::{eye, from_rows, matmul, transpose};
    use crate::utils::validation::{is_orthogonal, reconstruction_error};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_qr_identity_sign_convention() {
        let a: Matrix<f64> = eye(3);
        let qr = QRDecomposition::new(&a).unwrap();

        let q = qr.q();
        let r = qr.r();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { -1.0 } else { 0.0 };
                assert_abs_diff_eq!(q[[i, j]], expected, epsilon = 1e-15);
                assert_abs_diff_eq!(r[[i, j]], expected, epsilon = 1e-15);
            }
        }
        assert_eq!(qr.rank(), 3);
        assert!(reconstruction_error(&a, &matmul(&q, &r)) < 1e-15);
    }

    #[test]
    fn test_qr_tall_matrix() {
        let a: Matrix<f64> = from_rows(&[
            &[12.0, -51.0, 4.0],
            &[6.0, 167.0, -68.0],
            &[-4.0, 24.0, -41.0],
            &[1.0, 1.0, 1.0],
        ]);
        let qr = QRDecomposition::new(&a).unwrap();

        let q = qr.q();
        assert_eq!(dims(&q), (4, 3));
        assert!(is_orthogonal(&q, 1e-12));
        assert!(reconstruction_error(&a, &matmul(&q, &qr.r())) < 1e-13);

        let h = qr.householder();
        assert_eq!(h[[0, 1]], 0.0);
        assert!(h[[0, 0]] >= 1.0);
    }

    #[test]
    fn test_qr_least_squares() {
        // Fit y = c0 + c1 * t through (0, 1), (1, 3), (2, 5), exactly on a line
        let a: Matrix<f64> = from_rows(&[&[1.0, 0.0], &[1.0, 1.0], &[1.0, 2.0]]);
        let b: Matrix<f64> = from_rows(&[&[1.0], &[3.0], &[5.0]]);
        let x = QRDecomposition::new(&a).unwrap().solve(&b).unwrap();

        assert_eq!(dims(&x), (2, 1));
        assert_abs_diff_eq!(x[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[[1, 0]], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_qr_normal_equations_residual() {
        let a: Matrix<f64> = from_rows(&[&[1.0, 1.0], &[1.0, 2.0], &[1.0, 3.0], &[1.0, 4.0]]);
        let b: Matrix<f64> = from_rows(&[&[6.0], &[5.0], &[7.0], &[10.0]]);
        let x = QRDecomposition::new(&a).unwrap().solve(&b).unwrap();

        // Aᵗ(Ax - b) = 0 at the least-squares optimum
        let ax = matmul(&a, &x);
        let residual = tabulate(4, 1, |row, col| ax[[row, col]] - b[[row, col]]);
        let normal = matmul(&transpose(&a), &residual);
        assert_abs_diff_eq!(normal[[0, 0]], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(normal[[1, 0]], 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(x[[0, 0]], 3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(x[[1, 0]], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_qr_rank_deficient() {
        let a: Matrix<f64> = from_rows(&[&[0.0, 1.0], &[0.0, 2.0], &[0.0, 3.0]]);
        let qr = QRDecomposition::new(&a).unwrap();

        assert!(!qr.is_full_rank());
        assert_eq!(qr.rank(), 1);
        assert_eq!(
            qr.solve(&zeros(3, 1)).unwrap_err(),
            DecompError::RankDeficient
        );
    }

    #[test]
    fn test_qr_rejects_wide() {
        let a: Matrix<f64> = zeros(2, 3);
        assert_eq!(
            QRDecomposition::new(&a).unwrap_err(),
            DecompError::WideMatrix { rows: 2, cols: 3 }
        );
    }
}
