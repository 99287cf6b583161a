//! Dense matrix helpers on top of `mdarray::DTensor`

use std::ops::Range;

use mdarray::DTensor;

use crate::precision::Precision;

/// Dense row/column indexable matrix used throughout the crate
pub type Matrix<T> = DTensor<T, 2>;

/// `(rows, cols)` of a matrix
#[inline]
pub fn dims<T>(a: &Matrix<T>) -> (usize, usize) {
    *a.shape()
}

/// All-zero `m × n` matrix
pub fn zeros<T: Precision>(m: usize, n: usize) -> Matrix<T> {
    DTensor::<T, 2>::from_elem([m, n], T::zero())
}

/// `m × n` matrix whose entry `(row, col)` is `f(row, col)`.
///
/// Shapes with a zero extent skip `DTensor::from_fn`, which faults on an
/// empty leading dimension.
pub fn tabulate<T: Precision>(m: usize, n: usize, f: impl Fn(usize, usize) -> T) -> Matrix<T> {
    if m == 0 || n == 0 {
        return zeros(m, n);
    }
    DTensor::<T, 2>::from_fn([m, n], |idx| f(idx[0], idx[1]))
}

/// `n × n` identity
pub fn eye<T: Precision>(n: usize) -> Matrix<T> {
    tabulate(n, n, |row, col| {
        if row == col {
            T::one()
        } else {
            T::zero()
        }
    })
}

/// Square matrix with `values` on the diagonal
pub fn diag<T: Precision>(values: &[T]) -> Matrix<T> {
    let n = values.len();
    tabulate(n, n, |row, col| {
        if row == col {
            values[row]
        } else {
            T::zero()
        }
    })
}

/// Build a matrix from `f64` row literals.
///
/// Panics if the rows are ragged.
pub fn from_rows<T: Precision>(rows: &[&[f64]]) -> Matrix<T> {
    let m = rows.len();
    let n = rows.first().map_or(0, |r| r.len());
    assert!(
        rows.iter().all(|r| r.len() == n),
        "all rows must have the same length"
    );
    tabulate(m, n, |row, col| {
        <T as From<f64>>::from(rows[row][col])
    })
}

/// Matrix transpose
pub fn transpose<T: Precision>(a: &Matrix<T>) -> Matrix<T> {
    let (m, n) = dims(a);
    tabulate(n, m, |row, col| a[[col, row]])
}

/// Matrix multiplication: C = A * B
///
/// Panics if the inner dimensions disagree.
pub fn matmul<T: Precision>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let (m, k) = dims(a);
    let (kb, n) = dims(b);
    assert_eq!(k, kb, "inner dimensions must agree");

    tabulate(m, n, |row, col| {
        let mut sum = T::zero();
        for l in 0..k {
            sum += a[[row, l]] * b[[l, col]];
        }
        sum
    })
}

/// Copy of the block `a[rows, cols]`
pub fn submatrix<T: Precision>(a: &Matrix<T>, rows: Range<usize>, cols: Range<usize>) -> Matrix<T> {
    let (r0, c0) = (rows.start, cols.start);
    tabulate(rows.len(), cols.len(), |row, col| a[[r0 + row, c0 + col]])
}

/// Exact element-wise symmetry test
pub fn is_symmetric<T: Precision>(a: &Matrix<T>) -> bool {
    let (m, n) = dims(a);
    if m != n {
        return false;
    }
    for j in 0..n {
        for i in 0..j {
            if a[[i, j]] != a[[j, i]] {
                return false;
            }
        }
    }
    true
}

/// Swap columns `i` and `j` in place
pub fn swap_columns<T: Precision>(a: &mut Matrix<T>, i: usize, j: usize) {
    if i == j {
        return;
    }
    let m = dims(a).0;
    for row in 0..m {
        let temp = a[[row, i]];
        a[[row, i]] = a[[row, j]];
        a[[row, j]] = temp;
    }
}

/// Swap rows `i` and `j` in place
pub fn swap_rows<T: Precision>(a: &mut Matrix<T>, i: usize, j: usize) {
    if i == j {
        return;
    }
    let n = dims(a).1;
    for col in 0..n {
        let temp = a[[i, col]];
        a[[i, col]] = a[[j, col]];
        a[[j, col]] = temp;
    }
}

/// Flip the sign of the first `rows` entries of column `j`
pub fn negate_column<T: Precision>(a: &mut Matrix<T>, j: usize, rows: usize) {
    for i in 0..rows {
        a[[i, j]] = -a[[i, j]];
    }
}
