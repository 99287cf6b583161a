//! Symmetric eigenproblem: Householder tridiagonalization followed by
//! implicit QL iteration

use std::cmp::Ordering;

use tracing::{trace, warn};

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::utils::matrix::{swap_columns, Matrix};

/// Reduce the symmetric matrix held in `v` to tridiagonal form.
///
/// On return `d` holds the diagonal, `e[1..]` the sub-diagonal and `v` the
/// accumulated orthogonal transform.
pub(super) fn tred2<T: Precision>(v: &mut Matrix<T>, d: &mut [T], e: &mut [T]) {
    let n = d.len();
    for j in 0..n {
        d[j] = v[[n - 1, j]];
    }

    for i in (1..n).rev() {
        let mut scale = T::zero();
        let mut h = T::zero();
        for k in 0..i {
            scale += d[k].abs();
        }

        if scale.is_zero() {
            // Row already reduced
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[[i - 1, j]];
                v[[i, j]] = T::zero();
                v[[j, i]] = T::zero();
            }
        } else {
            for k in 0..i {
                d[k] /= scale;
                h += d[k] * d[k];
            }
            let mut f = d[i - 1];
            let mut g = h.sqrt();
            if f > T::zero() {
                g = -g;
            }
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            for j in 0..i {
                e[j] = T::zero();
            }

            // Apply similarity transformation to remaining columns
            for j in 0..i {
                f = d[j];
                v[[j, i]] = f;
                g = e[j] + v[[j, j]] * f;
                for k in (j + 1)..i {
                    g += v[[k, j]] * d[k];
                    e[k] += v[[k, j]] * f;
                }
                e[j] = g;
            }
            f = T::zero();
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                f = d[j];
                g = e[j];
                for k in j..i {
                    v[[k, j]] -= f * e[k] + g * d[k];
                }
                d[j] = v[[i - 1, j]];
                v[[i, j]] = T::zero();
            }
        }
        d[i] = h;
    }

    // Accumulate transformations
    for i in 0..n - 1 {
        v[[n - 1, i]] = v[[i, i]];
        v[[i, i]] = T::one();
        let h = d[i + 1];
        if !h.is_zero() {
            for k in 0..=i {
                d[k] = v[[k, i + 1]] / h;
            }
            for j in 0..=i {
                let mut g = T::zero();
                for k in 0..=i {
                    g += v[[k, i + 1]] * v[[k, j]];
                }
                for k in 0..=i {
                    v[[k, j]] -= g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[[k, i + 1]] = T::zero();
        }
    }
    for j in 0..n {
        d[j] = v[[n - 1, j]];
        v[[n - 1, j]] = T::zero();
    }
    v[[n - 1, n - 1]] = T::one();
    e[0] = T::zero();
}

/// Diagonalize the tridiagonal matrix `(d, e)` produced by [`tred2`],
/// rotating `v` along.
///
/// Each eigenvalue gets at most `max_iterations` QL sweeps.
pub(super) fn tql2<T: Precision>(
    v: &mut Matrix<T>,
    d: &mut [T],
    e: &mut [T],
    max_iterations: usize,
) -> Result<()> {
    let n = d.len();
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = T::zero();

    let eps = T::epsilon();
    let two = T::from(2.0);
    let mut f = T::zero();
    let mut tst1 = T::zero();

    for l in 0..n {
        tst1 = tst1.max(d[l].abs() + e[l].abs());

        // Find small sub-diagonal element; e[n-1] is always zero
        let m = (l..n)
            .find(|&m| e[m].abs() <= eps * tst1)
            .unwrap_or(n - 1);

        if m > l {
            let mut iter = 0;
            loop {
                iter += 1;
                if iter > max_iterations {
                    warn!(index = l, max_iterations, "tql2 failed to converge");
                    return Err(DecompError::ConvergenceFailed {
                        algorithm: "tql2",
                        iterations: max_iterations,
                    });
                }

                // Compute implicit shift
                let mut g = d[l];
                let mut p = (d[l + 1] - g) / (two * e[l]);
                let mut r = p.hypot(T::one());
                if p < T::zero() {
                    r = -r;
                }
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let mut h = g - d[l];
                for i in (l + 2)..n {
                    d[i] -= h;
                }
                f += h;

                // Implicit QL transformation
                p = d[m];
                let mut c = T::one();
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = T::zero();
                let mut s2 = T::zero();
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    g = c * e[i];
                    h = c * p;
                    r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    for k in 0..n {
                        h = v[[k, i + 1]];
                        v[[k, i + 1]] = s * v[[k, i]] + c * h;
                        v[[k, i]] = c * v[[k, i]] - s * h;
                    }
                }
                p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;

                if e[l].abs() <= eps * tst1 {
                    break;
                }
            }
            trace!(index = l, iterations = iter, "tql2 deflated eigenvalue");
        }
        d[l] += f;
        e[l] = T::zero();
    }

    Ok(())
}

/// Selection sort of `d` into ascending order, permuting columns of `v` alongside
pub(super) fn sort_ascending<T: Precision>(v: &mut Matrix<T>, d: &mut [T]) {
    let n = d.len();
    for i in 0..n.saturating_sub(1) {
        let mut k = i;
        let mut p = d[i];
        for j in (i + 1)..n {
            if d[j].compare(&p) == Ordering::Less {
                k = j;
                p = d[j];
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            swap_columns(v, i, k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::matrix::{eye, from_rows};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tred2_keeps_tridiagonal_input() {
        let mut v: Matrix<f64> = from_rows(&[&[2.0, 1.0, 0.0], &[1.0, 2.0, 1.0], &[0.0, 1.0, 2.0]]);
        let mut d = [0.0; 3];
        let mut e = [0.0; 3];
        tred2(&mut v, &mut d, &mut e);

        // Trace and Frobenius norm survive the similarity transform
        assert_abs_diff_eq!(d.iter().sum::<f64>(), 6.0, epsilon = 1e-12);
        let frob: f64 = d.iter().map(|x| x * x).sum::<f64>()
            + 2.0 * e.iter().map(|x| x * x).sum::<f64>();
        assert_abs_diff_eq!(frob, 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tql2_diagonal_input() {
        let mut v: Matrix<f64> = eye(3);
        let mut d = [3.0, 1.0, 2.0];
        let mut e = [0.0; 3];
        tql2(&mut v, &mut d, &mut e, 100).unwrap();
        assert_eq!(d, [3.0, 1.0, 2.0]);

        sort_ascending(&mut v, &mut d);
        assert_eq!(d, [1.0, 2.0, 3.0]);
        // column 0 of the sorted basis is the old column 1
        assert_eq!(v[[1, 0]], 1.0);
        assert_eq!(v[[0, 2]], 1.0);
    }

    #[test]
    fn test_tql2_iteration_cap() {
        let mut v: Matrix<f64> = from_rows(&[&[2.0, 1.0], &[1.0, 2.0]]);
        let mut d = [0.0; 2];
        let mut e = [0.0; 2];
        tred2(&mut v, &mut d, &mut e);

        let err = tql2(&mut v, &mut d, &mut e, 0).unwrap_err();
        assert_eq!(
            err,
            DecompError::ConvergenceFailed {
                algorithm: "tql2",
                iterations: 0
            }
        );
    }
}
