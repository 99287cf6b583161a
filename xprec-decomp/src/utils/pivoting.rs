//! Row permutation utilities

use std::ops::Range;

use crate::precision::Precision;
use crate::utils::matrix::{tabulate, Matrix};

/// Select rows of a matrix in permutation order
///
/// Row `i` of the result is row `permutation[i]` of `matrix`, restricted to
/// the columns in `cols`.
pub fn permute_rows<T: Precision>(
    matrix: &Matrix<T>,
    permutation: &[usize],
    cols: Range<usize>,
) -> Matrix<T> {
    let c0 = cols.start;
    tabulate(permutation.len(), cols.len(), |row, col| {
        matrix[[permutation[row], c0 + col]]
    })
}

/// Create permutation matrix from permutation vector
///
/// Given a permutation vector `p`, creates the corresponding
/// permutation matrix P such that P[i, p[i]] = 1, so `P * A` equals
/// `permute_rows(A, p, ..)`.
pub fn permutation_matrix<T: Precision>(permutation: &[usize]) -> Matrix<T> {
    let n = permutation.len();
    tabulate(n, n, |row, col| {
        if permutation[row] == col {
            T::one()
        } else {
            T::zero()
        }
    })
}
