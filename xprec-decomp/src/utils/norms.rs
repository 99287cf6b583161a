//! Vector and matrix norm computations

use crate::precision::Precision;
use crate::utils::matrix::{dims, Matrix};

/// Compute the Frobenius norm of a matrix
pub fn norm_frobenius<T: Precision>(mat: &Matrix<T>) -> T {
    let (m, n) = dims(mat);
    let mut f = T::zero();
    for i in 0..m {
        for j in 0..n {
            f = f.hypot(mat[[i, j]]);
        }
    }
    f
}

/// Compute the maximum absolute value in a matrix
pub fn norm_max<T: Precision>(mat: &Matrix<T>) -> T {
    let (m, n) = dims(mat);
    let mut max_val = T::zero();
    for i in 0..m {
        for j in 0..n {
            max_val = max_val.max(mat[[i, j]].abs());
        }
    }
    max_val
}

/// One norm: maximum absolute column sum
pub fn norm_1<T: Precision>(mat: &Matrix<T>) -> T {
    let (m, n) = dims(mat);
    let mut f = T::zero();
    for j in 0..n {
        let mut s = T::zero();
        for i in 0..m {
            s += mat[[i, j]].abs();
        }
        f = f.max(s);
    }
    f
}

/// Infinity norm: maximum absolute row sum
pub fn norm_inf<T: Precision>(mat: &Matrix<T>) -> T {
    let (m, n) = dims(mat);
    let mut f = T::zero();
    for i in 0..m {
        let mut s = T::zero();
        for j in 0..n {
            s += mat[[i, j]].abs();
        }
        f = f.max(s);
    }
    f
}
