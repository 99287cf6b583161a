//! Householder reflection kernels shared by the QR factorization
//!
//! A reflector for column `k` is stored in rows `k..m` of that column with
//! `v[k] = 1 + x[k] / ν`, so applying it to a vector `y` reads
//! `y -= (vᵗy / v[k]) · v`.

use crate::precision::Precision;
use crate::utils::matrix::{dims, Matrix};

/// Overflow-safe 2-norm of `a[k.., k]`
pub(crate) fn column_norm<T: Precision>(a: &Matrix<T>, k: usize) -> T {
    let m = dims(a).0;
    let mut nrm = T::zero();
    for i in k..m {
        nrm = nrm.hypot(a[[i, k]]);
    }
    nrm
}

/// Turn `a[k.., k]` into a Householder vector and return `ν`
///
/// `ν` carries the sign of `a[k, k]`, and the matching diagonal entry of R
/// is `-ν`. A zero column is left untouched and yields `ν = 0`.
pub(crate) fn form_reflector<T: Precision>(a: &mut Matrix<T>, k: usize) -> T {
    let m = dims(a).0;
    let mut nu = column_norm(a, k);
    if nu.is_zero() {
        return nu;
    }
    if a[[k, k]] < T::zero() {
        nu = -nu;
    }
    for i in k..m {
        a[[i, k]] /= nu;
    }
    a[[k, k]] += T::one();
    nu
}

/// Copy of the reflector stored below (and on) the diagonal of column `k`
pub(crate) fn reflector<T: Precision>(a: &Matrix<T>, k: usize) -> Vec<T> {
    let m = dims(a).0;
    (k..m).map(|i| a[[i, k]]).collect()
}

/// Reflect rows `k..` of column `j` of `x` by `v`
///
/// `v[0]` pairs with row `k`. Callers skip zero reflectors.
pub(crate) fn apply_reflector<T: Precision>(v: &[T], k: usize, x: &mut Matrix<T>, j: usize) {
    let mut s = T::zero();
    for (offset, &vi) in v.iter().enumerate() {
        s += vi * x[[k + offset, j]];
    }
    s = -s / v[0];
    for (offset, &vi) in v.iter().enumerate() {
        x[[k + offset, j]] += s * vi;
    }
}
