//! Nonsymmetric eigenproblem: Francis double-shift QR on an upper Hessenberg
//! matrix down to real Schur form, then back-substitution for eigenvectors

use tracing::{trace, warn};

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::utils::matrix::{dims, Matrix};

/// Complex scalar division `(xr + i·xi) / (yr + i·yi)`
pub(super) fn cdiv<T: Precision>(xr: T, xi: T, yr: T, yi: T) -> (T, T) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Reduce the Hessenberg matrix `h` to real Schur form and compute the
/// eigenvectors, accumulating into the Hessenberg transform `v`.
///
/// Eigenvalues land in `d` (real parts) and `e` (imaginary parts). A
/// complex pair occupies consecutive slots with `e[i] > 0` first.
/// `h` is consumed as scratch space.
pub(super) fn hqr2<T: Precision>(
    h: &mut Matrix<T>,
    v: &mut Matrix<T>,
    d: &mut [T],
    e: &mut [T],
    max_iterations: usize,
) -> Result<()> {
    let nn = dims(h).0;
    let high = nn - 1;
    let zero = T::zero();
    let one = T::one();
    let eps = T::epsilon();

    let mut exshift = zero;
    // r, s and z carry values between iterations of the back-substitution
    let (mut r, mut s, mut z) = (zero, zero, zero);
    let (mut p, mut q, mut t, mut w, mut x, mut y): (T, T, T, T, T, T);

    let mut norm = zero;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[[i, j]].abs();
        }
    }

    // Outer loop over eigenvalue index; `top` is one past the active block
    let mut iter = 0;
    let mut top = nn;
    while top > 0 {
        let n = top - 1;

        // Look for single small sub-diagonal element
        let mut l = n;
        while l > 0 {
            s = h[[l - 1, l - 1]].abs() + h[[l, l]].abs();
            if s.is_zero() {
                s = norm;
            }
            if h[[l, l - 1]].abs() < eps * s {
                break;
            }
            l -= 1;
        }

        if l == n {
            // One root found
            h[[n, n]] += exshift;
            d[n] = h[[n, n]];
            e[n] = zero;
            trace!(index = n, iterations = iter, "hqr2 deflated real eigenvalue");
            top -= 1;
            iter = 0;
        } else if l + 1 == n {
            // Two roots found
            w = h[[n, n - 1]] * h[[n - 1, n]];
            p = (h[[n - 1, n - 1]] - h[[n, n]]) / T::from(2.0);
            q = p * p + w;
            z = q.abs().sqrt();
            h[[n, n]] += exshift;
            h[[n - 1, n - 1]] += exshift;
            x = h[[n, n]];

            if q >= zero {
                // Real pair
                z = if p >= zero { p + z } else { p - z };
                d[n - 1] = x + z;
                d[n] = d[n - 1];
                if !z.is_zero() {
                    d[n] = x - w / z;
                }
                e[n - 1] = zero;
                e[n] = zero;
                x = h[[n, n - 1]];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;

                // Row modification
                for j in (n - 1)..nn {
                    z = h[[n - 1, j]];
                    h[[n - 1, j]] = q * z + p * h[[n, j]];
                    h[[n, j]] = q * h[[n, j]] - p * z;
                }
                // Column modification
                for i in 0..=n {
                    z = h[[i, n - 1]];
                    h[[i, n - 1]] = q * z + p * h[[i, n]];
                    h[[i, n]] = q * h[[i, n]] - p * z;
                }
                // Accumulate transformations
                for i in 0..=high {
                    z = v[[i, n - 1]];
                    v[[i, n - 1]] = q * z + p * v[[i, n]];
                    v[[i, n]] = q * v[[i, n]] - p * z;
                }
            } else {
                // Complex pair
                d[n - 1] = x + p;
                d[n] = x + p;
                e[n - 1] = z;
                e[n] = -z;
            }
            trace!(index = n - 1, iterations = iter, "hqr2 deflated eigenvalue pair");
            top -= 2;
            iter = 0;
        } else {
            // No convergence yet
            x = h[[n, n]];
            y = h[[n - 1, n - 1]];
            w = h[[n, n - 1]] * h[[n - 1, n]];

            // Wilkinson's original ad hoc shift
            if iter == 10 {
                exshift += x;
                for i in 0..=n {
                    h[[i, i]] -= x;
                }
                s = h[[n, n - 1]].abs() + h[[n - 1, n - 2]].abs();
                x = T::from(0.75) * s;
                y = x;
                w = T::from(-0.4375) * s * s;
            }

            // Second ad hoc shift, used once stagnation persists
            if iter == 30 {
                s = (y - x) / T::from(2.0);
                s = s * s + w;
                if s > zero {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / T::from(2.0) + s);
                    for i in 0..=n {
                        h[[i, i]] -= s;
                    }
                    exshift += s;
                    x = T::from(0.964);
                    y = x;
                    w = x;
                }
            }

            iter += 1;
            if iter > max_iterations {
                warn!(index = n, max_iterations, "hqr2 failed to converge");
                return Err(DecompError::ConvergenceFailed {
                    algorithm: "hqr2",
                    iterations: max_iterations,
                });
            }

            // Look for two consecutive small sub-diagonal elements
            let mut m = n - 2;
            loop {
                z = h[[m, m]];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[[m + 1, m]] + h[[m, m + 1]];
                q = h[[m + 1, m + 1]] - z - r - s;
                r = h[[m + 2, m + 1]];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                let lhs = h[[m, m - 1]].abs() * (q.abs() + r.abs());
                let rhs = eps * (p.abs() * (h[[m - 1, m - 1]].abs() + z.abs() + h[[m + 1, m + 1]].abs()));
                if lhs < rhs {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=n {
                h[[i, i - 2]] = zero;
                if i > m + 2 {
                    h[[i, i - 3]] = zero;
                }
            }

            // Double QR step involving rows l..=n and columns m..=n
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = h[[k, k - 1]];
                    q = h[[k + 1, k - 1]];
                    r = if notlast { h[[k + 2, k - 1]] } else { zero };
                    x = p.abs() + q.abs() + r.abs();
                    if x.is_zero() {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }

                s = (p * p + q * q + r * r).sqrt();
                if p < zero {
                    s = -s;
                }
                if s.is_zero() {
                    continue;
                }

                if k != m {
                    h[[k, k - 1]] = -s * x;
                } else if l != m {
                    h[[k, k - 1]] = -h[[k, k - 1]];
                }
                p += s;
                x = p / s;
                y = q / s;
                z = r / s;
                q /= p;
                r /= p;

                // Row modification
                for j in k..nn {
                    p = h[[k, j]] + q * h[[k + 1, j]];
                    if notlast {
                        p += r * h[[k + 2, j]];
                        h[[k + 2, j]] -= p * z;
                    }
                    h[[k, j]] -= p * x;
                    h[[k + 1, j]] -= p * y;
                }

                // Column modification
                for i in 0..=n.min(k + 3) {
                    p = x * h[[i, k]] + y * h[[i, k + 1]];
                    if notlast {
                        p += z * h[[i, k + 2]];
                        h[[i, k + 2]] -= p * r;
                    }
                    h[[i, k]] -= p;
                    h[[i, k + 1]] -= p * q;
                }

                // Accumulate transformations
                for i in 0..=high {
                    p = x * v[[i, k]] + y * v[[i, k + 1]];
                    if notlast {
                        p += z * v[[i, k + 2]];
                        v[[i, k + 2]] -= p * r;
                    }
                    v[[i, k]] -= p;
                    v[[i, k + 1]] -= p * q;
                }
            }
        }
    }

    // Backsubstitute to find vectors of upper triangular form
    if norm.is_zero() {
        return Ok(());
    }

    for n in (0..nn).rev() {
        p = d[n];
        q = e[n];

        if q.is_zero() {
            // Real vector
            let mut l = n;
            h[[n, n]] = one;
            for i in (0..n).rev() {
                w = h[[i, i]] - p;
                r = zero;
                for j in l..=n {
                    r += h[[i, j]] * h[[j, n]];
                }
                if e[i] < zero {
                    z = w;
                    s = r;
                    continue;
                }

                l = i;
                if e[i].is_zero() {
                    h[[i, n]] = if !w.is_zero() {
                        -r / w
                    } else {
                        -r / (eps * norm)
                    };
                } else {
                    // Solve real equations
                    x = h[[i, i + 1]];
                    y = h[[i + 1, i]];
                    q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                    t = (x * s - z * r) / q;
                    h[[i, n]] = t;
                    h[[i + 1, n]] = if x.abs() > z.abs() {
                        (-r - w * t) / x
                    } else {
                        (-s - y * t) / z
                    };
                }

                // Overflow control
                t = h[[i, n]].abs();
                if (eps * t) * t > one {
                    for j in i..=n {
                        h[[j, n]] /= t;
                    }
                }
            }
        } else if q < zero {
            // Complex vector; the last component is chosen imaginary so the
            // system is triangular
            let mut l = n - 1;
            if h[[n, n - 1]].abs() > h[[n - 1, n]].abs() {
                h[[n - 1, n - 1]] = q / h[[n, n - 1]];
                h[[n - 1, n]] = -(h[[n, n]] - p) / h[[n, n - 1]];
            } else {
                let (cr, ci) = cdiv(zero, -h[[n - 1, n]], h[[n - 1, n - 1]] - p, q);
                h[[n - 1, n - 1]] = cr;
                h[[n - 1, n]] = ci;
            }
            h[[n, n - 1]] = zero;
            h[[n, n]] = one;

            for i in (0..n - 1).rev() {
                let mut ra = zero;
                let mut sa = zero;
                for j in l..=n {
                    ra += h[[i, j]] * h[[j, n - 1]];
                    sa += h[[i, j]] * h[[j, n]];
                }
                w = h[[i, i]] - p;

                if e[i] < zero {
                    z = w;
                    r = ra;
                    s = sa;
                    continue;
                }

                l = i;
                if e[i].is_zero() {
                    let (cr, ci) = cdiv(-ra, -sa, w, q);
                    h[[i, n - 1]] = cr;
                    h[[i, n]] = ci;
                } else {
                    // Solve complex equations
                    x = h[[i, i + 1]];
                    y = h[[i + 1, i]];
                    let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                    let vi = (d[i] - p) * T::from(2.0) * q;
                    if vr.is_zero() && vi.is_zero() {
                        vr = eps * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                    }
                    let (cr, ci) = cdiv(
                        x * r - z * ra + q * sa,
                        x * s - z * sa - q * ra,
                        vr,
                        vi,
                    );
                    h[[i, n - 1]] = cr;
                    h[[i, n]] = ci;
                    if x.abs() > z.abs() + q.abs() {
                        h[[i + 1, n - 1]] = (-ra - w * h[[i, n - 1]] + q * h[[i, n]]) / x;
                        h[[i + 1, n]] = (-sa - w * h[[i, n]] - q * h[[i, n - 1]]) / x;
                    } else {
                        let (cr, ci) = cdiv(-r - y * h[[i, n - 1]], -s - y * h[[i, n]], z, q);
                        h[[i + 1, n - 1]] = cr;
                        h[[i + 1, n]] = ci;
                    }
                }

                // Overflow control
                t = h[[i, n - 1]].abs().max(h[[i, n]].abs());
                if (eps * t) * t > one {
                    for j in i..=n {
                        h[[j, n - 1]] /= t;
                        h[[j, n]] /= t;
                    }
                }
            }
        }
    }

    // Back transformation to get eigenvectors of the original matrix
    for j in (0..nn).rev() {
        for i in 0..=high {
            z = zero;
            for k in 0..=j.min(high) {
                z += v[[i, k]] * h[[k, j]];
            }
            v[[i, j]] = z;
        }
    }

    Ok(())
}
