//! Decomposition entry points as methods on [`Matrix`]

use crate::cholesky::{CholeskyDecomposition, CholeskyVariant};
use crate::eigen::{EigenConfig, EigenDecomposition};
use crate::error::Result;
use crate::hessenberg::HessenbergDecomposition;
use crate::lu::LUDecomposition;
use crate::precision::Precision;
use crate::qr::QRDecomposition;
use crate::svd::{SVDConfig, SingularValueDecomposition};
use crate::utils::matrix::Matrix;

/// Build any supported decomposition directly from a matrix
///
/// ```
/// use xprec_decomp::{from_rows, Decompose, HasDeterminant, Matrix};
///
/// let a: Matrix<f64> = from_rows(&[&[4.0, 3.0], &[6.0, 3.0]]);
/// let lu = a.lu().unwrap();
/// assert_eq!(lu.pivot(), &[1, 0]);
/// assert!((lu.determinant().unwrap() + 6.0).abs() < 1e-12);
/// ```
pub trait Decompose<T: Precision> {
    fn lu(&self) -> Result<LUDecomposition<T>>;

    fn cholesky(&self) -> Result<CholeskyDecomposition<T>>;

    fn cholesky_with(&self, variant: CholeskyVariant) -> Result<CholeskyDecomposition<T>>;

    fn qr(&self) -> Result<QRDecomposition<T>>;

    fn hessenberg(&self) -> Result<HessenbergDecomposition<T>>;

    /// Symmetric or general eigensolver, picked by exact symmetry of `self`
    fn eigen(&self) -> Result<EigenDecomposition<T>>;

    fn eigen_with(&self, config: EigenConfig) -> Result<EigenDecomposition<T>>;

    fn svd(&self) -> Result<SingularValueDecomposition<T>>;

    fn svd_with(&self, config: SVDConfig) -> Result<SingularValueDecomposition<T>>;
}

impl<T: Precision> Decompose<T> for Matrix<T> {
    fn lu(&self) -> Result<LUDecomposition<T>> {
        LUDecomposition::new(self)
    }

    fn cholesky(&self) -> Result<CholeskyDecomposition<T>> {
        CholeskyDecomposition::new(self)
    }

    fn cholesky_with(&self, variant: CholeskyVariant) -> Result<CholeskyDecomposition<T>> {
        CholeskyDecomposition::with_variant(self, variant)
    }

    fn qr(&self) -> Result<QRDecomposition<T>> {
        QRDecomposition::new(self)
    }

    fn hessenberg(&self) -> Result<HessenbergDecomposition<T>> {
        HessenbergDecomposition::new(self)
    }

    fn eigen(&self) -> Result<EigenDecomposition<T>> {
        EigenDecomposition::new(self)
    }

    fn eigen_with(&self, config: EigenConfig) -> Result<EigenDecomposition<T>> {
        EigenDecomposition::with_config(self, config)
    }

    fn svd(&self) -> Result<SingularValueDecomposition<T>> {
        SingularValueDecomposition::new(self)
    }

    fn svd_with(&self, config: SVDConfig) -> Result<SingularValueDecomposition<T>> {
        SingularValueDecomposition::with_config(self, config)
    }
}
