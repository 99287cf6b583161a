mod common;

use approx::assert_abs_diff_eq;
use common::{identity_error, max_abs_diff, random_matrix, SimpleRng};
use xprec_decomp::utils::{dims, norm_1, norm_frobenius, norm_inf, norm_max};
use xprec_decomp::{
    eye, from_rows, matmul, transpose, validate_svd, DTensor, Decompose, EigenDecomposition, HasRank, Matrix,
    SVDConfig, SingularValueDecomposition,
};

#[test]
fn test_svd_random_shapes() {
    let mut rng = SimpleRng::new(1234);
    for (m, n) in [(1, 1), (1, 4), (4, 1), (5, 5), (8, 3), (3, 8), (10, 7)] {
        let a: Matrix<f64> = random_matrix(&mut rng, m, n);
        let svd = SingularValueDecomposition::new(&a).unwrap();
        let k = m.min(n);

        let u = svd.u().unwrap();
        let v = svd.v().unwrap();
        assert_eq!(dims(u), (m, k));
        assert_eq!(dims(v), (n, k));
        assert_eq!(svd.singular_values().len(), k);
        assert!(
            validate_svd(&a, u, svd.singular_values(), v, 1e-12),
            "SVD check failed for {}x{}",
            m,
            n
        );

        let usvt = matmul(&matmul(u, &svd.s()), &transpose(v));
        assert!(max_abs_diff(&usvt, &a) < 1e-13);
    }
}

#[test]
fn test_svd_values_are_sqrt_of_gram_eigenvalues() {
    let mut rng = SimpleRng::new(77);
    let a: Matrix<f64> = random_matrix(&mut rng, 7, 4);
    let svd = a.svd().unwrap();

    let gram = matmul(&transpose(&a), &a);
    // Enforce exact symmetry so the symmetric path is taken
    let gram = DTensor::<f64, 2>::from_fn([4, 4], |idx| {
        let (i, j) = (idx[0].min(idx[1]), idx[0].max(idx[1]));
        gram[[i, j]]
    });
    let eig = EigenDecomposition::new(&gram).unwrap();
    assert!(eig.is_symmetric());

    // Ascending eigenvalues against descending singular values
    for (sigma, lambda) in svd
        .singular_values()
        .iter()
        .zip(eig.real_eigenvalues().iter().rev())
    {
        assert_abs_diff_eq!(sigma * sigma, *lambda, epsilon = 1e-12);
    }
}

#[test]
fn test_svd_rank_deficient() {
    // Columns are in arithmetic progression, so only two are independent
    let a: Matrix<f64> = from_rows(&[
        &[1.0, 4.0, 7.0, 10.0],
        &[2.0, 5.0, 8.0, 11.0],
        &[3.0, 6.0, 9.0, 12.0],
    ]);

    assert_eq!(a.svd().unwrap().rank(), 2);
    assert_eq!(transpose(&a).svd().unwrap().rank(), 2);
}

#[test]
fn test_svd_norms() {
    let mut rng = SimpleRng::new(9);
    let a: Matrix<f64> = random_matrix(&mut rng, 5, 4);
    let svd = a.svd().unwrap();
    let s = svd.singular_values();

    // ‖A‖_F² = Σ σ²
    let frob: f64 = s.iter().map(|x| x * x).sum::<f64>().sqrt();
    assert_abs_diff_eq!(frob, norm_frobenius(&a), epsilon = 1e-13);
    assert_eq!(svd.norm2(), s[0]);
    assert_abs_diff_eq!(svd.cond(), s[0] / s[3], epsilon = 1e-12);
    assert!(svd.cond() >= 1.0);

    // max |a_ij| <= ‖A‖₂ <= sqrt(‖A‖₁ ‖A‖∞)
    assert!(norm_max(&a) <= svd.norm2());
    assert!(svd.norm2() <= (norm_1(&a) * norm_inf(&a)).sqrt() * (1.0 + 1e-14));
}

#[test]
fn test_svd_identity_scenario() {
    let svd = eye::<f64>(3).svd().unwrap();

    assert_eq!(svd.singular_values(), &[1.0, 1.0, 1.0]);
    assert!(identity_error(&svd.s()) == 0.0);
    let u = svd.u().unwrap();
    let v = svd.v().unwrap();
    assert!(identity_error(&matmul(u, &transpose(v))) < 1e-15);
    assert!(max_abs_diff(u, v) == 0.0);
}

#[test]
fn test_svd_partial_factors() {
    let mut rng = SimpleRng::new(13);
    let a: Matrix<f64> = random_matrix(&mut rng, 6, 4);

    let full = a.svd().unwrap();
    let left_only = a.svd_with(SVDConfig::new(true, false)).unwrap();
    let right_only = a.svd_with(SVDConfig::new(false, true)).unwrap();

    assert!(left_only.u().is_some() && left_only.v().is_none());
    assert!(right_only.u().is_none() && right_only.v().is_some());

    for (x, y) in full
        .singular_values()
        .iter()
        .zip(left_only.singular_values())
    {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-14);
    }
    for (x, y) in full
        .singular_values()
        .iter()
        .zip(right_only.singular_values())
    {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-14);
    }
}

#[test]
fn test_svd_zero_matrix() {
    let a: Matrix<f64> = xprec_decomp::zeros(3, 2);
    let svd = a.svd().unwrap();

    assert_eq!(svd.singular_values(), &[0.0, 0.0]);
    assert_eq!(svd.rank(), 0);
}
