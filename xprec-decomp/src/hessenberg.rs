//! Reduction to upper Hessenberg form by orthogonal similarity
//!
//! `A = P * H * Pᵗ` with P orthogonal and H zero below the first
//! sub-diagonal. Each step scales the sub-column before forming the
//! Householder vector, so badly scaled columns neither overflow nor lose
//! their small entries.

use tracing::debug;

use crate::error::Result;
use crate::precision::Precision;
use crate::utils::matrix::{dims, eye, Matrix};
use crate::utils::validation::ensure_square;

/// Result of Hessenberg reduction
#[derive(Debug, Clone)]
pub struct HessenbergDecomposition<T: Precision> {
    h: Matrix<T>,
    p: Matrix<T>,
}

impl<T: Precision> HessenbergDecomposition<T> {
    /// Reduce the square matrix `a`
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        let n = ensure_square(a)?;
        let mut h = a.clone();
        let p = orthes(&mut h);

        for j in 0..n {
            for i in (j + 2)..n {
                h[[i, j]] = T::zero();
            }
        }

        debug!(n, "Hessenberg reduction complete");
        Ok(Self { h, p })
    }

    /// Upper Hessenberg factor
    pub fn h(&self) -> &Matrix<T> {
        &self.h
    }

    /// Orthogonal similarity transform
    pub fn p(&self) -> &Matrix<T> {
        &self.p
    }

    pub(crate) fn into_parts(self) -> (Matrix<T>, Matrix<T>) {
        (self.h, self.p)
    }
}

/// Householder reduction of `h` in place; returns the accumulated transform.
///
/// Entries below the first sub-diagonal are left holding stale values and
/// must be cleared by the caller.
fn orthes<T: Precision>(h: &mut Matrix<T>) -> Matrix<T> {
    let n = dims(h).0;
    let high = n - 1;
    let mut ort = vec![T::zero(); n];

    for m in 1..high {
        let mut scale = T::zero();
        for i in m..=high {
            scale += h[[i, m - 1]].abs();
        }
        if scale.is_zero() {
            continue;
        }

        let mut hh = T::zero();
        for i in (m..=high).rev() {
            ort[i] = h[[i, m - 1]] / scale;
            hh += ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > T::zero() {
            g = -g;
        }
        hh -= ort[m] * g;
        ort[m] -= g;

        // H = (I - u*uᵗ/h) * H * (I - u*uᵗ/h)
        for j in m..n {
            let mut f = T::zero();
            for i in (m..=high).rev() {
                f += ort[i] * h[[i, j]];
            }
            f /= hh;
            for i in m..=high {
                h[[i, j]] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = T::zero();
            for j in (m..=high).rev() {
                f += ort[j] * h[[i, j]];
            }
            f /= hh;
            for j in m..=high {
                h[[i, j]] -= f * ort[j];
            }
        }
        ort[m] = scale * ort[m];
        h[[m, m - 1]] = scale * g;
    }

    let mut v = eye(n);
    for m in (1..high).rev() {
        if h[[m, m - 1]].is_zero() {
            continue;
        }
        for i in (m + 1)..=high {
            ort[i] = h[[i, m - 1]];
        }
        for j in m..=high {
            let mut g = T::zero();
            for i in m..=high {
                g += ort[i] * v[[i, j]];
            }
            // Two divisions keep g from underflowing
            g = (g / ort[m]) / h[[m, m - 1]];
            for i in m..=high {
                v[[i, j]] += g * ort[i];
            }
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::matrix::{from_rows, matmul, transpose};
    use crate::utils::validation::{is_orthogonal, reconstruction_error};

    #[test]
    fn test_hessenberg_4x4() {
        let a: Matrix<f64> = from_rows(&[
            &[4.0, 1.0, -2.0, 2.0],
            &[1.0, 2.0, 0.0, 1.0],
            &[-2.0, 0.0, 3.0, -2.0],
            &[2.0, 1.0, -2.0, -1.0],
        ]);
        let hess = HessenbergDecomposition::new(&a).unwrap();

        let h = hess.h();
        for j in 0..4 {
            for i in (j + 2)..4 {
                assert_eq!(h[[i, j]], 0.0);
            }
        }
        assert!(is_orthogonal(hess.p(), 1e-12));

        let pht = matmul(&matmul(hess.p(), h), &transpose(hess.p()));
        assert!(reconstruction_error(&a, &pht) < 1e-13);
    }

    #[test]
    fn test_hessenberg_nonsymmetric() {
        let a: Matrix<f64> = from_rows(&[
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[0.5, -1.0, 2.0, 0.0, 1.0],
            &[3.0, 1.0, 4.0, 1.0, 5.0],
            &[-2.0, 7.0, 1.0, 8.0, 2.0],
            &[0.0, 1.0, -3.0, 2.0, 6.0],
        ]);
        let hess = HessenbergDecomposition::new(&a).unwrap();

        assert!(is_orthogonal(hess.p(), 1e-12));
        let pht = matmul(&matmul(hess.p(), hess.h()), &transpose(hess.p()));
        assert!(reconstruction_error(&a, &pht) < 1e-13);
    }

    #[test]
    fn test_hessenberg_small_orders() {
        let one: Matrix<f64> = from_rows(&[&[7.0]]);
        let hess = HessenbergDecomposition::new(&one).unwrap();
        assert_eq!(hess.h()[[0, 0]], 7.0);
        assert_eq!(hess.p()[[0, 0]], 1.0);

        let two: Matrix<f64> = from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let hess = HessenbergDecomposition::new(&two).unwrap();
        assert_eq!(hess.h()[[1, 0]], 3.0);
    }
}
