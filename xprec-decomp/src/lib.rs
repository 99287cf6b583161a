//! # xprec-decomp: Dense Matrix Decompositions in Extended Precision
//!
//! Classical dense factorizations written once against the [`Precision`]
//! trait, so the same code runs in `f64` and in double-double
//! ([`TwoFloatPrecision`]):
//!
//! - [`LUDecomposition`]: Doolittle elimination with partial pivoting
//! - [`CholeskyDecomposition`]: row- or column-oriented `L * Lᵗ`
//! - [`QRDecomposition`]: Householder QR for tall matrices
//! - [`HessenbergDecomposition`]: orthogonal reduction to Hessenberg form
//! - [`EigenDecomposition`]: symmetric (QL) or general (real Schur) eigensolver
//! - [`SingularValueDecomposition`]: Golub–Kahan SVD
//!
//! Matrices are `mdarray` tensors; see [`Matrix`].

pub mod cholesky;
pub mod decompose;
pub mod eigen;
pub mod error;
pub mod hessenberg;
pub mod lu;
pub mod precision;
pub mod qr;
pub mod svd;
pub mod traits;
pub mod utils;

pub use cholesky::{CholeskyDecomposition, CholeskyVariant};
pub use decompose::Decompose;
pub use eigen::{EigenConfig, EigenDecomposition};
pub use error::{DecompError, Result};
pub use hessenberg::HessenbergDecomposition;
pub use lu::LUDecomposition;
pub use precision::{Precision, TwoFloatPrecision};
pub use qr::QRDecomposition;
pub use svd::{SVDConfig, SingularValueDecomposition};
pub use traits::{HasDeterminant, HasRank, Solvable};
pub use utils::{
    diag, eye, from_rows, is_orthogonal, matmul, norm_frobenius, reconstruction_error, transpose,
    validate_svd, zeros, Matrix,
};

// Re-export mdarray types
pub use mdarray::DTensor;
