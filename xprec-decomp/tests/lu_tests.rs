//! LU factorization on random and structured inputs

mod common;

use approx::assert_abs_diff_eq;
use common::{max_abs_diff, random_matrix, SimpleRng};
use xprec_decomp::utils::{dims, permutation_matrix, permute_rows};
use xprec_decomp::{
    from_rows, matmul, Decompose, DecompError, EigenDecomposition, HasDeterminant, LUDecomposition,
    Matrix,
};

fn assert_reconstructs(a: &Matrix<f64>, tol: f64) {
    let lu = LUDecomposition::new(a).unwrap();
    let (m, n) = dims(a);
    let product = matmul(&lu.lower(), &lu.upper());
    let permuted = permute_rows(a, lu.pivot(), 0..n);
    assert_eq!(dims(&product), (m, n));
    assert!(
        max_abs_diff(&product, &permuted) < tol,
        "L*U differs from A[piv, :] for {}x{}",
        m,
        n
    );
}

#[test]
fn test_lu_reconstruction_square() {
    let mut rng = SimpleRng::new(42);
    for n in [1, 2, 3, 5, 8] {
        let a: Matrix<f64> = random_matrix(&mut rng, n, n);
        assert_reconstructs(&a, 1e-13);
    }
}

#[test]
fn test_lu_reconstruction_rectangular() {
    let mut rng = SimpleRng::new(7);
    let tall: Matrix<f64> = random_matrix(&mut rng, 7, 4);
    assert_reconstructs(&tall, 1e-13);

    let wide: Matrix<f64> = random_matrix(&mut rng, 3, 6);
    assert_reconstructs(&wide, 1e-13);

    let lu = wide.lu().unwrap();
    assert_eq!(dims(&lu.lower()), (3, 3));
    assert_eq!(dims(&lu.upper()), (3, 6));
}

#[test]
fn test_lu_permutation_matrix_form() {
    // P * A = L * U with P built from the pivot vector
    let mut rng = SimpleRng::new(314);
    let a: Matrix<f64> = random_matrix(&mut rng, 5, 5);
    let lu = a.lu().unwrap();

    let pa = matmul(&permutation_matrix(lu.pivot()), &a);
    assert!(max_abs_diff(&pa, &matmul(&lu.lower(), &lu.upper())) < 1e-13);
}

#[test]
fn test_lu_multipliers_bounded_by_one() {
    let mut rng = SimpleRng::new(99);
    let a: Matrix<f64> = random_matrix(&mut rng, 6, 6);
    let l = LUDecomposition::new(&a).unwrap().lower();
    for i in 0..6 {
        for j in 0..i {
            assert!(l[[i, j]].abs() <= 1.0);
        }
    }
}

#[test]
fn test_lu_determinant_matches_eigenvalues() {
    let mut rng = SimpleRng::new(2024);
    let a: Matrix<f64> = random_matrix(&mut rng, 5, 5);

    let det_lu = LUDecomposition::new(&a).unwrap().determinant().unwrap();
    let det_eig = EigenDecomposition::new(&a).unwrap().determinant().unwrap();
    assert_abs_diff_eq!(det_lu, det_eig, epsilon = 1e-12);
}

#[test]
fn test_lu_scenario_pivot_and_determinant() {
    let a: Matrix<f64> = from_rows(&[&[4.0, 3.0], &[6.0, 3.0]]);
    let lu = a.lu().unwrap();

    assert_eq!(lu.pivot(), &[1, 0]);
    assert_eq!(lu.pivot_sign(), -1);
    assert_abs_diff_eq!(lu.determinant().unwrap(), -6.0, epsilon = 1e-12);
}

#[test]
fn test_lu_permutation_parity() {
    // Reversal of 3 rows is a single swap: odd
    let a: Matrix<f64> = from_rows(&[&[0.0, 0.0, 1.0], &[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]]);
    let lu = a.lu().unwrap();

    assert_eq!(lu.pivot(), &[2, 1, 0]);
    assert_eq!(lu.pivot_sign(), -1);
    assert_abs_diff_eq!(lu.determinant().unwrap(), -1.0, epsilon = 1e-15);
}

#[test]
fn test_lu_empty_matrix() {
    let a: Matrix<f64> = xprec_decomp::zeros(0, 0);
    assert_eq!(a.lu().unwrap_err(), DecompError::EmptyMatrix);
}
