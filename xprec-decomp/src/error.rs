//! Error types shared by all decompositions

/// Error types for decomposition and solve calls
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecompError {
    #[error("Matrix is empty")]
    EmptyMatrix,

    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Matrix must have at least as many rows as columns, got {rows}x{cols}")]
    WideMatrix { rows: usize, cols: usize },

    #[error("Row dimensions must agree: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Matrix is singular")]
    Singular,

    #[error("Matrix is rank deficient")]
    RankDeficient,

    #[error("Matrix is not symmetric positive definite")]
    NotPositiveDefinite,

    #[error("{algorithm} failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        algorithm: &'static str,
        iterations: usize,
    },

    #[error("{0} singular vectors were not computed")]
    MissingFactor(&'static str),
}

pub type Result<T> = std::result::Result<T, DecompError>;
