//! Golub–Kahan SVD of a tall matrix
//!
//! Householder bidiagonalization followed by implicit-shift QR on the
//! bidiagonal. Each pass of the reduction loop picks one of four outcomes
//! by scanning for negligible entries against `tiny + eps·scale`:
//!
//! 1. `s[p-1]` is negligible: chase the last super-diagonal entry out.
//! 2. `s[k]` is negligible: split the bidiagonal at `k`.
//! 3. No negligible entry: one shifted QR sweep over the block `k..p`.
//! 4. `e[p-2]` is negligible: `s[p-1]` has converged; fix its sign,
//!    move it into descending position and shrink the active block.

use tracing::{trace, warn};

use crate::error::{DecompError, Result};
use crate::precision::Precision;
use crate::utils::matrix::{dims, negate_column, swap_columns, zeros, Matrix};

/// Factors produced for a tall input; U is `m × n`, V is `n × n`
#[derive(Debug)]
pub(super) struct GolubKahan<T: Precision> {
    pub u: Option<Matrix<T>>,
    pub s: Vec<T>,
    pub v: Option<Matrix<T>>,
}

/// Replace columns `j` and `k` of `a` by `(cs·a_j + sn·a_k, -sn·a_j + cs·a_k)`
fn rotate_columns<T: Precision>(a: &mut Matrix<T>, j: usize, k: usize, cs: T, sn: T) {
    let rows = dims(a).0;
    for i in 0..rows {
        let t = cs * a[[i, j]] + sn * a[[i, k]];
        a[[i, k]] = -sn * a[[i, j]] + cs * a[[i, k]];
        a[[i, j]] = t;
    }
}

/// Decompose `a`, which must satisfy `rows >= cols >= 1`
pub(super) fn golub_kahan<T: Precision>(
    mut a: Matrix<T>,
    want_u: bool,
    want_v: bool,
    max_iterations: usize,
) -> Result<GolubKahan<T>> {
    let (m, n) = dims(&a);
    debug_assert!(m >= n && n > 0);

    let mut s = vec![T::zero(); n];
    let mut e = vec![T::zero(); n];
    let mut u = if want_u { zeros(m, n) } else { zeros(0, 0) };
    let mut v = if want_v { zeros(n, n) } else { zeros(0, 0) };
    let mut work = vec![T::zero(); m];

    // Reduce A to bidiagonal form, storing the diagonal in s and the
    // super-diagonal in e
    let nct = (m - 1).min(n);
    let nrt = n.saturating_sub(2).min(m);
    for k in 0..nct.max(nrt) {
        if k < nct {
            // Householder for column k
            s[k] = T::zero();
            for i in k..m {
                s[k] = s[k].hypot(a[[i, k]]);
            }
            if !s[k].is_zero() {
                if a[[k, k]] < T::zero() {
                    s[k] = -s[k];
                }
                for i in k..m {
                    a[[i, k]] /= s[k];
                }
                a[[k, k]] += T::one();
            }
            s[k] = -s[k];
        }

        for j in (k + 1)..n {
            if k < nct && !s[k].is_zero() {
                let mut t = T::zero();
                for i in k..m {
                    t += a[[i, k]] * a[[i, j]];
                }
                t = -t / a[[k, k]];
                for i in k..m {
                    let a_ik = a[[i, k]];
                    a[[i, j]] += t * a_ik;
                }
            }
            // Row k of A feeds the next row transformation
            e[j] = a[[k, j]];
        }

        if want_u && k < nct {
            for i in k..m {
                u[[i, k]] = a[[i, k]];
            }
        }

        if k < nrt {
            // Householder for row k, applied from the right
            e[k] = T::zero();
            for i in (k + 1)..n {
                e[k] = e[k].hypot(e[i]);
            }
            if !e[k].is_zero() {
                if e[k + 1] < T::zero() {
                    e[k] = -e[k];
                }
                for i in (k + 1)..n {
                    let e_k = e[k];
                    e[i] /= e_k;
                }
                e[k + 1] += T::one();
            }
            e[k] = -e[k];

            if k + 1 < m && !e[k].is_zero() {
                for w in work.iter_mut().skip(k + 1) {
                    *w = T::zero();
                }
                for j in (k + 1)..n {
                    for i in (k + 1)..m {
                        work[i] += e[j] * a[[i, j]];
                    }
                }
                for j in (k + 1)..n {
                    let t = -e[j] / e[k + 1];
                    for i in (k + 1)..m {
                        a[[i, j]] += t * work[i];
                    }
                }
            }

            if want_v {
                for i in (k + 1)..n {
                    v[[i, k]] = e[i];
                }
            }
        }
    }

    // Final bidiagonal matrix of order p = n
    let mut p = n;
    if nct < n {
        s[nct] = a[[nct, nct]];
    }
    if nrt + 1 < p {
        e[nrt] = a[[nrt, p - 1]];
    }
    e[p - 1] = T::zero();

    if want_u {
        for j in nct..n {
            for i in 0..m {
                u[[i, j]] = T::zero();
            }
            u[[j, j]] = T::one();
        }
        for k in (0..nct).rev() {
            if s[k].is_zero() {
                for i in 0..m {
                    u[[i, k]] = T::zero();
                }
                u[[k, k]] = T::one();
                continue;
            }
            for j in (k + 1)..n {
                let mut t = T::zero();
                for i in k..m {
                    t += u[[i, k]] * u[[i, j]];
                }
                t = -t / u[[k, k]];
                for i in k..m {
                    let u_ik = u[[i, k]];
                    u[[i, j]] += t * u_ik;
                }
            }
            for i in k..m {
                u[[i, k]] = -u[[i, k]];
            }
            u[[k, k]] += T::one();
            for i in 0..k {
                u[[i, k]] = T::zero();
            }
        }
    }

    if want_v {
        for k in (0..n).rev() {
            if k < nrt && !e[k].is_zero() {
                for j in (k + 1)..n {
                    let mut t = T::zero();
                    for i in (k + 1)..n {
                        t += v[[i, k]] * v[[i, j]];
                    }
                    t = -t / v[[k + 1, k]];
                    for i in (k + 1)..n {
                        let v_ik = v[[i, k]];
                        v[[i, j]] += t * v_ik;
                    }
                }
            }
            for i in 0..n {
                v[[i, k]] = T::zero();
            }
            v[[k, k]] = T::one();
        }
    }

    // Main iteration loop for the singular values
    let pp = p - 1;
    let eps = T::epsilon();
    let tiny = T::tiny();
    let mut iter = 0;

    while p > 0 {
        // `k` below is the first index of the active block; the block is
        // `k..p` and e[k-1] (if any) is negligible
        let mut k = p - 1;
        while k > 0 {
            let j = k - 1;
            if e[j].abs() <= tiny + eps * (s[j].abs() + s[j + 1].abs()) {
                e[j] = T::zero();
                break;
            }
            k -= 1;
        }

        let kase = if k == p - 1 {
            4
        } else {
            let mut split = None;
            for ks in (k..p).rev() {
                let mut t = e[ks].abs();
                if ks != k {
                    t += e[ks - 1].abs();
                }
                if s[ks].abs() <= tiny + eps * t {
                    s[ks] = T::zero();
                    split = Some(ks);
                    break;
                }
            }
            match split {
                None => 3,
                Some(ks) if ks == p - 1 => 1,
                Some(ks) => {
                    k = ks + 1;
                    2
                }
            }
        };

        match kase {
            // Deflate negligible s[p-1]
            1 => {
                let mut f = e[p - 2];
                e[p - 2] = T::zero();
                for j in (k..=p - 2).rev() {
                    let t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    if j != k {
                        f = -sn * e[j - 1];
                        e[j - 1] = cs * e[j - 1];
                    }
                    if want_v {
                        rotate_columns(&mut v, j, p - 1, cs, sn);
                    }
                }
                trace!(p, k, "svd deflated negligible trailing singular value");
            }

            // Split at negligible s[k-1]
            2 => {
                let mut f = e[k - 1];
                e[k - 1] = T::zero();
                for j in k..p {
                    let t = s[j].hypot(f);
                    let cs = s[j] / t;
                    let sn = f / t;
                    s[j] = t;
                    f = -sn * e[j];
                    e[j] = cs * e[j];
                    if want_u {
                        rotate_columns(&mut u, j, k - 1, cs, sn);
                    }
                }
                trace!(p, k, "svd split bidiagonal");
            }

            // One QR step
            3 => {
                iter += 1;
                if iter > max_iterations {
                    warn!(index = p - 1, max_iterations, "svd failed to converge");
                    return Err(DecompError::ConvergenceFailed {
                        algorithm: "svd",
                        iterations: max_iterations,
                    });
                }

                // Shift from the trailing 2×2 block, computed on scaled values
                let scale = s[p - 1]
                    .abs()
                    .max(s[p - 2].abs())
                    .max(e[p - 2].abs())
                    .max(s[k].abs())
                    .max(e[k].abs());
                let sp = s[p - 1] / scale;
                let spm1 = s[p - 2] / scale;
                let epm1 = e[p - 2] / scale;
                let sk = s[k] / scale;
                let ek = e[k] / scale;
                let b = ((spm1 + sp) * (spm1 - sp) + epm1 * epm1) / T::from(2.0);
                let c = (sp * epm1) * (sp * epm1);
                let mut shift = T::zero();
                if !b.is_zero() || !c.is_zero() {
                    shift = (b * b + c).sqrt();
                    if b < T::zero() {
                        shift = -shift;
                    }
                    shift = c / (b + shift);
                }
                let mut f = (sk + sp) * (sk - sp) + shift;
                let mut g = sk * ek;

                // Chase zeros
                for j in k..(p - 1) {
                    let mut t = f.hypot(g);
                    let mut cs = f / t;
                    let mut sn = g / t;
                    if j != k {
                        e[j - 1] = t;
                    }
                    f = cs * s[j] + sn * e[j];
                    e[j] = cs * e[j] - sn * s[j];
                    g = sn * s[j + 1];
                    s[j + 1] = cs * s[j + 1];
                    if want_v {
                        rotate_columns(&mut v, j, j + 1, cs, sn);
                    }

                    t = f.hypot(g);
                    cs = f / t;
                    sn = g / t;
                    s[j] = t;
                    f = cs * e[j] + sn * s[j + 1];
                    s[j + 1] = -sn * e[j] + cs * s[j + 1];
                    g = sn * e[j + 1];
                    e[j + 1] = cs * e[j + 1];
                    if want_u && j < m - 1 {
                        rotate_columns(&mut u, j, j + 1, cs, sn);
                    }
                }
                e[p - 2] = f;
            }

            // Convergence
            _ => {
                // Make the singular value non-negative
                if s[k] <= T::zero() {
                    s[k] = if s[k] < T::zero() { -s[k] } else { T::zero() };
                    if want_v {
                        negate_column(&mut v, k, pp + 1);
                    }
                }

                // Order the singular values
                while k < pp {
                    if s[k] >= s[k + 1] {
                        break;
                    }
                    s.swap(k, k + 1);
                    if want_v && k < n - 1 {
                        swap_columns(&mut v, k, k + 1);
                    }
                    if want_u && k < m - 1 {
                        swap_columns(&mut u, k, k + 1);
                    }
                    k += 1;
                }

                trace!(index = p - 1, iterations = iter, "svd singular value converged");
                iter = 0;
                p -= 1;
            }
        }
    }

    Ok(GolubKahan {
        u: want_u.then_some(u),
        s,
        v: want_v.then_some(v),
    })
}
