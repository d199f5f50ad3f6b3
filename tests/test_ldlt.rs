// Tests for the LDLt solver against nalgebra's Cholesky and LU solvers.

use approx::assert_abs_diff_eq;
use nalgebra::{DMatrix, DVector};
use neuro_ldl::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_spd(n: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let m = Array2::random_using((n + 3, n), Uniform::new(-2.0, 2.0), &mut rng);
    m.t().dot(&m) + Array2::<f64>::eye(n) * 1e-3
}

fn to_nalgebra(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_row_slice(a.nrows(), a.ncols(), a.as_slice().unwrap())
}

#[test]
fn test_matches_nalgebra_cholesky() {
    for (n, seed) in [(2, 1), (9, 2), (33, 3), (120, 4)] {
        let a = random_spd(n, seed);
        let b = Array1::from_shape_fn(n, |i| 1.0 + i as f64 * 0.5);

        let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();
        let x = decomposition.solve(b.view()).unwrap();

        let reference = to_nalgebra(&a)
            .cholesky()
            .unwrap()
            .solve(&DVector::from_column_slice(b.as_slice().unwrap()));

        for i in 0..n {
            assert_abs_diff_eq!(x[i], reference[i], epsilon = 1e-6 * (1.0 + reference[i].abs()));
        }
    }
}

#[test]
fn test_determinant_matches_nalgebra() {
    let a = random_spd(12, 8);
    let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();
    let expected = to_nalgebra(&a).determinant();
    assert_abs_diff_eq!(
        decomposition.determinant().unwrap(),
        expected,
        epsilon = 1e-8 * expected.abs()
    );
}

#[test]
fn test_robust_solve_of_indefinite_matrix() {
    // Symmetric, nonsingular leading minors, mixed-sign pivots.
    let a = array![
        [2.0, 1.0, 0.0, 3.0],
        [1.0, -1.0, 2.0, 0.0],
        [0.0, 2.0, 1.0, 1.0],
        [3.0, 0.0, 1.0, -2.0]
    ];
    let b = array![1.0, 2.0, 3.0, 4.0];

    let strict = LdltDecomposition::new(a.clone(), false).unwrap();
    assert!(!strict.is_positive_definite());
    assert!(matches!(strict.solve(b.view()), Err(NNError::NotPositiveDefinite)));

    let robust = LdltDecomposition::new(a.clone(), true).unwrap();
    let x = robust.solve(b.view()).unwrap();
    let reference = to_nalgebra(&a)
        .lu()
        .solve(&DVector::from_column_slice(b.as_slice().unwrap()))
        .unwrap();
    for i in 0..4 {
        assert_abs_diff_eq!(x[i], reference[i], epsilon = 1e-10);
    }
}

#[test]
fn test_factor_is_unit_lower_triangular() {
    let a = random_spd(25, 5);
    let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();
    let l = decomposition.lower_triangular_factor();
    for r in 0..25 {
        assert_eq!(l[[r, r]], 1.0);
        for c in r + 1..25 {
            assert_eq!(l[[r, c]], 0.0);
        }
    }
    assert!(decomposition.diagonal().iter().all(|&d| d > 0.0));
    let rebuilt = l.dot(&Array2::from_diag(&decomposition.diagonal())).dot(&l.t());
    assert_abs_diff_eq!(rebuilt, a, epsilon = 1e-9);
}

#[test]
fn test_leading_zero_minor_is_undefined() {
    let a = array![[1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]];
    let decomposition = LdltDecomposition::new(a, true).unwrap();
    assert!(decomposition.is_undefined());
    assert!(matches!(
        decomposition.solve(array![1.0, 1.0, 1.0].view()),
        Err(NNError::UndefinedDecomposition)
    ));
}
