//! LU decomposition with partial pivoting (Doolittle)
//!
//! For an `m × n` matrix A the factorization produces a unit lower
//! triangular L, an upper triangular U and a row permutation `piv` with
//! `A[piv, :] = L * U`. The factorization always completes; a zero pivot
//! simply leaves U singular, which [`LUDecomposition::is_nonsingular`]
//! reports afterwards.

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::traits::{HasDeterminant, Solvable};
use crate::utils::matrix::{dims, swap_rows, tabulate, Matrix};
use crate::utils::pivoting::permute_rows;
use crate::utils::validation::{ensure_nonempty, ensure_rows};

/// Result of LU factorization with partial pivoting
#[derive(Debug, Clone)]
pub struct LUDecomposition<T: Precision> {
    /// Packed factors: strict lower part is L, upper part is U
    lu: Matrix<T>,
    /// Row permutation
    piv: Vec<usize>,
    /// Parity of `piv`, +1 or -1
    pivot_sign: i32,
}

impl<T: Precision> LUDecomposition<T> {
    /// Factor `a` using left-looking (column by column) elimination
    pub fn new(a: &Matrix<T>) -> Result<Self> {
        let (m, n) = ensure_nonempty(a)?;

        let mut lu = a.clone();
        let mut piv: Vec<usize> = (0..m).collect();
        let mut pivot_sign = 1;
        let mut lu_colj = vec![T::zero(); m];

        for j in 0..n {
            for i in 0..m {
                lu_colj[i] = lu[[i, j]];
            }

            // Apply previous transformations
            for i in 0..m {
                let kmax = i.min(j);
                let mut s = T::zero();
                for k in 0..kmax {
                    s += lu[[i, k]] * lu_colj[k];
                }
                lu_colj[i] -= s;
                lu[[i, j]] = lu_colj[i];
            }

            // Strictly larger magnitude wins, so ties keep the earliest row
            let mut p = j;
            for i in (j + 1)..m {
                if lu_colj[i].abs().compare(&lu_colj[p].abs()) == Ordering::Greater {
                    p = i;
                }
            }
            if p != j {
                swap_rows(&mut lu, p, j);
                piv.swap(p, j);
                pivot_sign = -pivot_sign;
            }

            if j < m && !lu[[j, j]].is_zero() {
                let pivot = lu[[j, j]];
                for i in (j + 1)..m {
                    lu[[i, j]] /= pivot;
                }
            }
        }

        debug!(rows = m, cols = n, pivot_sign, "LU factorization complete");

        Ok(Self {
            lu,
            piv,
            pivot_sign,
        })
    }

    /// Packed factors as computed
    pub fn factors(&self) -> &Matrix<T> {
        &self.lu
    }

    /// Whether every stored pivot is non-zero
    pub fn is_nonsingular(&self) -> bool {
        let (m, n) = dims(&self.lu);
        (0..m.min(n)).all(|j| !self.lu[[j, j]].is_zero())
    }

    /// Unit lower triangular factor, `m × min(m, n)`
    pub fn lower(&self) -> Matrix<T> {
        let (m, n) = dims(&self.lu);
        let k = m.min(n);
        tabulate(m, k, |row, col| match row.cmp(&col) {
            Ordering::Greater => self.lu[[row, col]],
            Ordering::Equal => T::one(),
            Ordering::Less => T::zero(),
        })
    }

    /// Upper triangular factor, `min(m, n) × n`
    pub fn upper(&self) -> Matrix<T> {
        let (m, n) = dims(&self.lu);
        let k = m.min(n);
        tabulate(k, n, |row, col| {
            if row <= col {
                self.lu[[row, col]]
            } else {
                T::zero()
            }
        })
    }

    /// Row permutation: row `i` of `L * U` is row `pivot()[i]` of A
    pub fn pivot(&self) -> &[usize] {
        &self.piv
    }

    /// Parity of the row permutation
    pub fn pivot_sign(&self) -> i32 {
        self.pivot_sign
    }

    fn ensure_square(&self) -> Result<usize> {
        let (m, n) = dims(&self.lu);
        if m != n {
            return Err(DecompError::NotSquare { rows: m, cols: n });
        }
        Ok(n)
    }
}

impl<T: Precision> HasDeterminant<T> for LUDecomposition<T> {
    fn determinant(&self) -> Result<T> {
        let n = self.ensure_square()?;
        let mut d = if self.pivot_sign < 0 {
            -T::one()
        } else {
            T::one()
        };
        for j in 0..n {
            d *= self.lu[[j, j]];
        }
        Ok(d)
    }
}

impl<T: Precision> Solvable<T> for LUDecomposition<T> {
    fn order(&self) -> usize {
        dims(&self.lu).0
    }

    fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>> {
        let n = self.ensure_square()?;
        ensure_rows(b, n)?;
        if !self.is_nonsingular() {
            return Err(DecompError::Singular);
        }

        let nx = dims(b).1;
        let mut x = permute_rows(b, &self.piv, 0..nx);

        // Solve L*Y = B(piv,:)
        for k in 0..n {
            for i in (k + 1)..n {
                let l_ik = self.lu[[i, k]];
                for j in 0..nx {
                    let x_kj = x[[k, j]];
                    x[[i, j]] -= x_kj * l_ik;
                }
            }
        }

        // Solve U*X = Y
        for k in (0..n).rev() {
            let u_kk = self.lu[[k, k]];
            for j in 0..nx {
                x[[k, j]] /= u_kk;
            }
            for i in 0..k {
                let u_ik = self.lu[[i, k]];
                for j in 0..nx {
                    let x_kj = x[[k, j]];
                    x[[i, j]] -= x_kj * u_ik;
                }
            }
        }

        Ok(x)
    }
}
