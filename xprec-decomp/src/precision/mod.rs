//! Precision type definitions and implementations
//!
//! Every decomposition in this crate is written against [`Precision`], an
//! ordered field with square roots. `f64` is the specialized fast path;
//! [`TwoFloatPrecision`] carries roughly twice the significand bits.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::AbsDiffEq;
use num_traits::{One, Zero};

/// Trait for element types the decompositions operate on
pub trait Precision:
    Copy
    + Debug
    + PartialOrd
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Zero
    + One
{
    /// Unit roundoff used by convergence and negligibility tests
    fn epsilon() -> Self;

    /// Smallest magnitude the SVD still distinguishes from zero
    fn tiny() -> Self;

    /// Square root function
    fn sqrt(self) -> Self;

    /// Absolute value function
    fn abs(self) -> Self;

    /// `sqrt(self² + other²)` without destructive overflow or underflow
    fn hypot(self, other: Self) -> Self {
        let a = self.abs();
        let b = other.abs();
        let (big, small) = if a.compare(&b) == Ordering::Greater {
            (a, b)
        } else {
            (b, a)
        };
        if big.is_zero() {
            return Self::zero();
        }
        let r = small / big;
        big * (Self::one() + r * r).sqrt()
    }

    /// Total order used for every pivot and tie decision.
    ///
    /// Incomparable values (NaN) compare as equal, so ties keep the earlier
    /// candidate.
    fn compare(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }

    /// Maximum of two values
    fn max(self, other: Self) -> Self {
        if self.compare(&other) == Ordering::Less {
            other
        } else {
            self
        }
    }

    /// Minimum of two values
    fn min(self, other: Self) -> Self {
        if other.compare(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }

    /// Lossy projection to `f64`, for diagnostics
    fn to_f64(self) -> f64;
}

// f64 implementation
impl Precision for f64 {
    fn epsilon() -> f64 {
        f64::EPSILON
    }

    fn tiny() -> f64 {
        2.0_f64.powi(-966)
    }

    #[inline]
    fn sqrt(self) -> f64 {
        self.sqrt()
    }

    #[inline]
    fn abs(self) -> f64 {
        self.abs()
    }

    #[inline]
    fn hypot(self, other: f64) -> f64 {
        self.hypot(other)
    }

    #[inline]
    fn max(self, other: f64) -> f64 {
        self.max(other)
    }

    #[inline]
    fn min(self, other: f64) -> f64 {
        self.min(other)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

// TwoFloat wrapper to avoid orphan rule issues
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TwoFloatPrecision(twofloat::TwoFloat);

impl TwoFloatPrecision {
    pub fn new(hi: f64, lo: f64) -> Self {
        Self(twofloat::TwoFloat::new_add(hi, lo))
    }

    pub fn from_f64(x: f64) -> Self {
        Self(twofloat::TwoFloat::from(x))
    }

    pub fn hi(self) -> f64 {
        self.0.hi()
    }

    pub fn lo(self) -> f64 {
        self.0.lo()
    }
}

impl Precision for TwoFloatPrecision {
    // 2^-96: a few ulps above the ~106-bit significand, since twofloat
    // division and sqrt are not correctly rounded
    fn epsilon() -> Self {
        Self::from_f64(2.0_f64.powi(-96))
    }

    fn tiny() -> Self {
        Self::from_f64(2.0_f64.powi(-966))
    }

    #[inline]
    fn sqrt(self) -> Self {
        if self.0 == twofloat::TwoFloat::from(0.0) {
            return self;
        }
        Self(self.0.sqrt())
    }

    #[inline]
    fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.0.hi() + self.0.lo()
    }
}

impl From<f64> for TwoFloatPrecision {
    fn from(x: f64) -> Self {
        Self::from_f64(x)
    }
}

impl From<TwoFloatPrecision> for f64 {
    fn from(x: TwoFloatPrecision) -> f64 {
        x.to_f64()
    }
}

// Arithmetic operations
impl Add for TwoFloatPrecision {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for TwoFloatPrecision {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Mul for TwoFloatPrecision {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }
}

impl Div for TwoFloatPrecision {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        // twofloat's quotient is only f64-accurate; one correction step
        // against the exact residual restores the low word
        let q = self.0 / other.0;
        Self(q + (self.0 - q * other.0) / other.0)
    }
}

impl Neg for TwoFloatPrecision {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl AddAssign for TwoFloatPrecision {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for TwoFloatPrecision {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl MulAssign for TwoFloatPrecision {
    fn mul_assign(&mut self, other: Self) {
        self.0 *= other.0;
    }
}

impl DivAssign for TwoFloatPrecision {
    fn div_assign(&mut self, other: Self) {
        *self = *self / other;
    }
}

impl Zero for TwoFloatPrecision {
    fn zero() -> Self {
        Self(twofloat::TwoFloat::from(0.0))
    }

    fn is_zero(&self) -> bool {
        self.0 == twofloat::TwoFloat::from(0.0)
    }
}

impl One for TwoFloatPrecision {
    fn one() -> Self {
        Self(twofloat::TwoFloat::from(1.0))
    }
}

// Implement AbsDiffEq for TwoFloatPrecision
impl AbsDiffEq for TwoFloatPrecision {
    type Epsilon = TwoFloatPrecision;

    fn default_epsilon() -> Self::Epsilon {
        <Self as Precision>::epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let diff = Precision::abs(*self - *other);
        diff <= epsilon
    }
}
