//! Input checks and result validation utilities

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::utils::matrix::{dims, tabulate, Matrix};
use crate::utils::norms::norm_frobenius;

/// Reject matrices with a zero dimension, returning `(rows, cols)`
pub fn ensure_nonempty<T>(matrix: &Matrix<T>) -> Result<(usize, usize)> {
    let (m, n) = dims(matrix);
    if m == 0 || n == 0 {
        return Err(DecompError::EmptyMatrix);
    }
    Ok((m, n))
}

/// Reject empty or non-square matrices, returning the order
pub fn ensure_square<T>(matrix: &Matrix<T>) -> Result<usize> {
    let (m, n) = ensure_nonempty(matrix)?;
    if m != n {
        return Err(DecompError::NotSquare { rows: m, cols: n });
    }
    Ok(n)
}

/// Reject a right-hand side whose row count differs from `rows`
pub fn ensure_rows<T>(rhs: &Matrix<T>, rows: usize) -> Result<()> {
    let got = dims(rhs).0;
    if got != rows {
        return Err(DecompError::DimensionMismatch {
            expected: rows,
            got,
        });
    }
    Ok(())
}

/// Validate SVD result
///
/// Checks that the SVD decomposition A = U * S * V^T is correct
/// and that U and V have orthonormal columns.
pub fn validate_svd<T: Precision>(
    original: &Matrix<T>,
    u: &Matrix<T>,
    s: &[T],
    v: &Matrix<T>,
    tolerance: T,
) -> bool {
    let (m, n) = dims(original);
    let k = s.len();

    let (um, uk) = dims(u);
    let (vn, vk) = dims(v);
    if um != m || uk < k || vn != n || vk < k {
        return false;
    }

    if !is_orthogonal(u, tolerance) || !is_orthogonal(v, tolerance) {
        return false;
    }

    if !is_singular_values_valid(s) {
        return false;
    }

    let reconstructed = tabulate(m, n, |row, col| {
        let mut sum = T::zero();
        for l in 0..k {
            sum += u[[row, l]] * s[l] * v[[col, l]];
        }
        sum
    });
    reconstruction_error(original, &reconstructed) < tolerance
}

/// Check if a matrix has orthonormal columns (`QᵗQ ≈ I`)
pub fn is_orthogonal<T: Precision>(matrix: &Matrix<T>, tolerance: T) -> bool {
    let (rows, k) = dims(matrix);

    for i in 0..k {
        for j in 0..k {
            let mut sum = T::zero();
            for row in 0..rows {
                sum += matrix[[row, i]] * matrix[[row, j]];
            }
            let expected = if i == j { T::one() } else { T::zero() };
            if (sum - expected).abs() > tolerance {
                return false;
            }
        }
    }

    true
}

/// Singular values must be non-negative and non-increasing
fn is_singular_values_valid<T: Precision>(s: &[T]) -> bool {
    s.iter().all(|&x| x >= T::zero()) && s.windows(2).all(|w| w[0] >= w[1])
}

/// Relative Frobenius distance `‖A - B‖ / ‖A‖` (absolute when `A = 0`)
pub fn reconstruction_error<T: Precision>(original: &Matrix<T>, candidate: &Matrix<T>) -> T {
    let (m, n) = dims(original);
    assert_eq!((m, n), dims(candidate), "shapes must agree");

    let diff = tabulate(m, n, |row, col| {
        original[[row, col]] - candidate[[row, col]]
    });
    let diff_norm = norm_frobenius(&diff);
    let orig_norm = norm_frobenius(original);

    if orig_norm.is_zero() {
        diff_norm
    } else {
        diff_norm / orig_norm
    }
}
