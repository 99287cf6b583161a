//! Capabilities shared across decompositions

use crate::error::Result;
use crate::precision::Precision;
use crate::utils::matrix::{eye, Matrix};

/// A factorization that can solve `A * X = B`
pub trait Solvable<T: Precision> {
    /// Row count a right-hand side must have
    fn order(&self) -> usize;

    /// Solve `A * X = B`, in the least-squares sense for tall factorizations
    fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>>;

    /// `solve(I)`: the inverse, or the pseudo-inverse for tall full-rank inputs
    fn inverse(&self) -> Result<Matrix<T>> {
        self.solve(&eye(self.order()))
    }
}

/// A factorization that exposes `det(A)`
pub trait HasDeterminant<T: Precision> {
    fn determinant(&self) -> Result<T>;
}

/// A factorization that exposes a (numerical) rank
pub trait HasRank {
    fn rank(&self) -> usize;
}
