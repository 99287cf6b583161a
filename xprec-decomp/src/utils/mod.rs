//! Matrix helpers, norms, permutations and result validation

pub mod matrix;
pub mod norms;
pub mod pivoting;
pub mod validation;

pub use matrix::{
    diag, dims, eye, from_rows, is_symmetric, matmul, negate_column, submatrix, swap_columns,
    swap_rows, tabulate, transpose, zeros, Matrix,
};
pub use norms::{norm_1, norm_frobenius, norm_inf, norm_max};
pub use pivoting::{permutation_matrix, permute_rows};
pub use validation::{is_orthogonal, reconstruction_error, validate_svd};
