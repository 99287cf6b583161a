//! Common test utilities

#![allow(dead_code)]

use xprec_decomp::{matmul, transpose, DTensor, Matrix, Precision, TwoFloatPrecision};

/// Simple deterministic pseudo-random number generator (LCG)
///
/// Linear Congruential Generator for reproducible random numbers in tests.
/// Uses the common parameters: a = 1664525, c = 1013904223 (from Numerical Recipes)
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Map to [0, 1) using upper 48 bits
        ((self.state >> 16) as f64) / ((1u64 << 48) as f64)
    }

    /// Next f64 in [-1, 1)
    pub fn next_signed(&mut self) -> f64 {
        2.0 * self.next_f64() - 1.0
    }

    pub fn next<T: RandomGenerate>(&mut self) -> T {
        T::generate(self)
    }
}

/// Types that can be drawn from [`SimpleRng`], uniform in [-1, 1)
pub trait RandomGenerate {
    fn generate(rng: &mut SimpleRng) -> Self;
}

impl RandomGenerate for f64 {
    fn generate(rng: &mut SimpleRng) -> Self {
        rng.next_signed()
    }
}

impl RandomGenerate for TwoFloatPrecision {
    fn generate(rng: &mut SimpleRng) -> Self {
        // Fill the low word too so values use the full significand
        let hi = rng.next_signed();
        let lo = rng.next_signed() * f64::EPSILON * hi.abs();
        TwoFloatPrecision::new(hi, lo)
    }
}

/// `m × n` matrix with uniform entries in [-1, 1)
pub fn random_matrix<T: Precision + RandomGenerate>(rng: &mut SimpleRng, m: usize, n: usize) -> Matrix<T> {
    let mut a: Matrix<T> = xprec_decomp::zeros(m, n);
    for i in 0..m {
        for j in 0..n {
            a[[i, j]] = rng.next();
        }
    }
    a
}

/// Random symmetric matrix `(B + Bᵗ) / 2`
pub fn random_symmetric<T: Precision + RandomGenerate>(rng: &mut SimpleRng, n: usize) -> Matrix<T> {
    let b: Matrix<T> = random_matrix(rng, n, n);
    let half = <T as From<f64>>::from(0.5);
    DTensor::<T, 2>::from_fn([n, n], |idx| {
        let (i, j) = (idx[0], idx[1]);
        if i <= j {
            (b[[i, j]] + b[[j, i]]) * half
        } else {
            (b[[j, i]] + b[[i, j]]) * half
        }
    })
}

/// Random symmetric positive definite matrix `Bᵗ B + n I`
pub fn random_spd<T: Precision + RandomGenerate>(rng: &mut SimpleRng, n: usize) -> Matrix<T> {
    let b: Matrix<T> = random_matrix(rng, n, n);
    let mut a = matmul(&transpose(&b), &b);
    let shift = <T as From<f64>>::from(n as f64);
    for i in 0..n {
        a[[i, i]] += shift;
    }
    // Force exact symmetry; the product may differ in the last bit
    for j in 0..n {
        for i in (j + 1)..n {
            a[[i, j]] = a[[j, i]];
        }
    }
    a
}

/// Hilbert matrix `H[i, j] = 1 / (i + j + 1)`
pub fn hilbert<T: Precision>(n: usize) -> Matrix<T> {
    DTensor::<T, 2>::from_fn([n, n], |idx| {
        T::one() / <T as From<f64>>::from((idx[0] + idx[1] + 1) as f64)
    })
}

/// Largest element-wise difference, as f64
pub fn max_abs_diff<T: Precision>(a: &Matrix<T>, b: &Matrix<T>) -> f64 {
    let (m, n) = *a.shape();
    assert_eq!((m, n), *b.shape(), "shapes must agree");
    let mut max = 0.0_f64;
    for i in 0..m {
        for j in 0..n {
            max = max.max((a[[i, j]] - b[[i, j]]).abs().to_f64());
        }
    }
    max
}

/// Largest deviation of a matrix from the identity, as f64
pub fn identity_error<T: Precision>(a: &Matrix<T>) -> f64 {
    let (m, n) = *a.shape();
    assert_eq!(m, n, "matrix must be square");
    max_abs_diff(a, &xprec_decomp::eye(n))
}
