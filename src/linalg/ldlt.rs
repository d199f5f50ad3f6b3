use crate::prelude::*;
use ndarray::parallel::prelude::*;
use tracing::{debug, trace, warn};

/// Relative tolerance for the positive-definiteness check on each pivot.
const POSITIVE_TOLERANCE: f64 = 1e-14;

/// Trailing rows handed to one rayon task during a row update.
const MIN_ROWS_PER_TASK: usize = 32;

/// Square-root free Cholesky (LDLᵀ) decomposition of a symmetric matrix.
///
/// The matrix buffer is taken by value and factorized in place: the strict
/// lower triangle ends up holding `L` (unit diagonal), while the strict upper
/// triangle keeps the original entries. Row updates read the original upper
/// triangle, so the input must be symmetric.
///
/// Factorization never fails once the shape is accepted. A zero pivot marks
/// the decomposition as undefined and `solve` reports it.
#[derive(Debug, Clone)]
pub struct LdltDecomposition {
    l: Array2<f64>,
    d: Array1<f64>,
    robust: bool,
    positive_definite: bool,
    undefined: bool,
}

impl LdltDecomposition {
    /// Factorize `matrix`. With `robust` set, `solve` also accepts matrices
    /// that failed the positive-definiteness check.
    pub fn new(matrix: Array2<f64>, robust: bool) -> Result<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(NNError::ShapeError(format!(
                "Matrix is not square: {}x{}",
                rows, cols
            )));
        }
        if rows == 0 {
            return Err(NNError::ShapeError("Matrix is empty".to_string()));
        }

        let l = if matrix.is_standard_layout() {
            matrix
        } else {
            matrix.as_standard_layout().into_owned()
        };

        let mut decomposition = Self {
            l,
            d: Array1::zeros(rows),
            robust,
            positive_definite: true,
            undefined: false,
        };
        decomposition.factorize();

        debug!(
            n = rows,
            robust,
            positive_definite = decomposition.positive_definite,
            undefined = decomposition.undefined,
            "LDLt factorization finished"
        );
        if !decomposition.undefined && !decomposition.positive_definite {
            warn!(n = rows, "factorized matrix is not positive definite");
        }
        Ok(decomposition)
    }

    fn factorize(&mut self) {
        let n = self.l.nrows();
        let mut v = Array1::<f64>::zeros(n);

        for i in 0..n {
            for j in 0..i {
                v[j] = self.l[[i, j]] * self.d[j];
            }

            let diagonal = self.l[[i, i]];
            let pivot = diagonal - self.l.slice(s![i, ..i]).dot(&v.slice(s![..i]));
            self.d[i] = pivot;
            v[i] = pivot;

            self.positive_definite &= pivot > POSITIVE_TOLERANCE * diagonal.abs();

            // Without pivoting a zero on the diagonal leaves the rest undefined.
            if pivot == 0.0 {
                warn!(row = i, "zero pivot, LDLt decomposition is undefined");
                self.undefined = true;
                return;
            }
            trace!(row = i, pivot, "row factorized");

            // Rows below i only write their own column i and read finalized
            // columns < i, so they are updated independently. The for_each
            // returns once every row is done.
            let (head, mut tail) = self.l.view_mut().split_at(Axis(0), i + 1);
            let upper = head.slice(s![i, i + 1..]);
            let scaled = v.slice(s![..i]);
            tail.axis_iter_mut(Axis(0))
                .into_par_iter()
                .with_min_len(MIN_ROWS_PER_TASK)
                .enumerate()
                .for_each(|(offset, mut row)| {
                    let s = row.slice(s![..i]).dot(&scaled);
                    row[i] = (upper[offset] - s) / pivot;
                });
        }

        self.l.diag_mut().fill(1.0);
    }

    pub fn dimension(&self) -> usize {
        self.d.len()
    }

    pub fn is_robust(&self) -> bool {
        self.robust
    }

    /// True when a zero pivot stopped the factorization.
    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    pub fn is_positive_definite(&self) -> bool {
        self.positive_definite
    }

    /// Diagonal factor `D`.
    pub fn diagonal(&self) -> ArrayView1<'_, f64> {
        self.d.view()
    }

    /// Unit lower triangular factor `L`, with zeros above the diagonal.
    pub fn lower_triangular_factor(&self) -> Array2<f64> {
        let n = self.dimension();
        Array2::from_shape_fn((n, n), |(r, c)| match r.cmp(&c) {
            std::cmp::Ordering::Greater => self.l[[r, c]],
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        })
    }

    pub fn determinant(&self) -> Result<f64> {
        if self.undefined {
            return Err(NNError::UndefinedDecomposition);
        }
        Ok(self.d.product())
    }

    pub fn log_determinant(&self) -> Result<f64> {
        if self.undefined {
            return Err(NNError::UndefinedDecomposition);
        }
        if !self.positive_definite {
            return Err(NNError::NotPositiveDefinite);
        }
        Ok(self.d.mapv(f64::ln).sum())
    }

    /// Solve `A·x = value`. The right-hand side is left untouched.
    pub fn solve(&self, value: ArrayView1<f64>) -> Result<Array1<f64>> {
        let n = self.dimension();
        if value.len() != n {
            return Err(NNError::InvalidArgument(format!(
                "Argument vector should have the same length as rows in the decomposed matrix: expected {}, got {}",
                n,
                value.len()
            )));
        }
        self.check_solvable()?;

        let mut x = value.to_owned();

        // L·y = b
        for k in 0..n {
            let s = self.l.slice(s![k, ..k]).dot(&x.slice(s![..k]));
            x[k] -= s;
        }

        x /= &self.d;

        // Lᵀ·x = y
        for k in (0..n).rev() {
            let s = self.l.slice(s![k + 1.., k]).dot(&x.slice(s![k + 1..]));
            x[k] -= s;
        }

        Ok(x)
    }

    /// Solve `A·X = value` column by column.
    pub fn solve_matrix(&self, value: ArrayView2<f64>) -> Result<Array2<f64>> {
        let n = self.dimension();
        if value.nrows() != n {
            return Err(NNError::InvalidArgument(format!(
                "Argument matrix should have the same number of rows as the decomposed matrix: expected {}, got {}",
                n,
                value.nrows()
            )));
        }
        self.check_solvable()?;

        let columns = value
            .axis_iter(Axis(1))
            .into_par_iter()
            .map(|column| self.solve(column))
            .collect::<Result<Vec<_>>>()?;

        let mut result = Array2::zeros(value.raw_dim());
        for (mut target, column) in result.axis_iter_mut(Axis(1)).zip(columns.iter()) {
            target.assign(column);
        }
        Ok(result)
    }

    pub fn inverse(&self) -> Result<Array2<f64>> {
        self.solve_matrix(Array2::eye(self.dimension()).view())
    }

    fn check_solvable(&self) -> Result<()> {
        if self.undefined {
            return Err(NNError::UndefinedDecomposition);
        }
        if !self.robust && !self.positive_definite {
            return Err(NNError::NotPositiveDefinite);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spd_matrix(n: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let m = Array2::random_using((n, n), Uniform::new(-1.0, 1.0), &mut rng);
        m.t().dot(&m) + Array2::<f64>::eye(n) * (n as f64)
    }

    fn reconstruct(decomposition: &LdltDecomposition) -> Array2<f64> {
        let l = decomposition.lower_triangular_factor();
        let d = Array2::from_diag(&decomposition.diagonal());
        l.dot(&d).dot(&l.t())
    }

    #[test]
    fn test_two_by_two_example() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();

        assert!(decomposition.is_positive_definite());
        assert!(!decomposition.is_undefined());
        assert_eq!(
            decomposition.lower_triangular_factor(),
            array![[1.0, 0.0], [0.5, 1.0]]
        );
        assert_eq!(decomposition.diagonal(), array![4.0, 2.0].view());

        let b = array![1.0, 1.0];
        let x = decomposition.solve(b.view()).unwrap();
        assert_abs_diff_eq!(x[0], 0.125, epsilon = 1e-15);
        assert_abs_diff_eq!(x[1], 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(a.dot(&x), b, epsilon = 1e-12);
        assert_eq!(b, array![1.0, 1.0]);
    }

    #[test]
    fn test_factor_reconstructs_matrix() {
        // 80 rows exercises the parallel row update
        for &n in &[1usize, 3, 17, 80] {
            let a = spd_matrix(n, n as u64);
            let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();
            assert!(decomposition.is_positive_definite());
            let rebuilt = reconstruct(&decomposition);
            assert_abs_diff_eq!(rebuilt, a, epsilon = 1e-9 * n as f64);
        }
    }

    #[test]
    fn test_solve_satisfies_system() {
        let n = 64;
        let a = spd_matrix(n, 99);
        let b = Array1::from_shape_fn(n, |i| (i as f64).sin());
        for robust in [false, true] {
            let decomposition = LdltDecomposition::new(a.clone(), robust).unwrap();
            let x = decomposition.solve(b.view()).unwrap();
            assert_abs_diff_eq!(a.dot(&x), b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_pivot_is_undefined() {
        let decomposition = LdltDecomposition::new(array![[0.0, 0.0], [0.0, 1.0]], false).unwrap();
        assert!(decomposition.is_undefined());
        assert!(matches!(
            decomposition.solve(array![1.0, 1.0].view()),
            Err(NNError::UndefinedDecomposition)
        ));
        assert!(matches!(
            decomposition.determinant(),
            Err(NNError::UndefinedDecomposition)
        ));

        let robust = LdltDecomposition::new(array![[0.0, 0.0], [0.0, 1.0]], true).unwrap();
        assert!(matches!(
            robust.solve(array![1.0, 1.0].view()),
            Err(NNError::UndefinedDecomposition)
        ));
    }

    #[test]
    fn test_non_square_matrix() {
        let result = LdltDecomposition::new(Array2::zeros((2, 3)), false);
        assert!(matches!(result, Err(NNError::ShapeError(_))));
        let empty = LdltDecomposition::new(Array2::zeros((0, 0)), true);
        assert!(matches!(empty, Err(NNError::ShapeError(_))));
    }

    #[test]
    fn test_indefinite_matrix_needs_robust_mode() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        let strict = LdltDecomposition::new(a.clone(), false).unwrap();
        assert!(!strict.is_positive_definite());
        assert!(!strict.is_undefined());
        assert!(matches!(
            strict.solve(array![1.0, 0.0].view()),
            Err(NNError::NotPositiveDefinite)
        ));
        assert!(matches!(
            strict.log_determinant(),
            Err(NNError::NotPositiveDefinite)
        ));

        let robust = LdltDecomposition::new(a.clone(), true).unwrap();
        assert_eq!(robust.diagonal(), array![1.0, -3.0].view());
        let b = array![1.0, 0.0];
        let x = robust.solve(b.view()).unwrap();
        assert_abs_diff_eq!(a.dot(&x), b, epsilon = 1e-12);
        assert_abs_diff_eq!(robust.determinant().unwrap(), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_rhs_length() {
        let decomposition = LdltDecomposition::new(array![[2.0]], false).unwrap();
        assert!(matches!(
            decomposition.solve(array![1.0, 2.0].view()),
            Err(NNError::InvalidArgument(_))
        ));
        assert!(matches!(
            decomposition.solve_matrix(Array2::zeros((3, 1)).view()),
            Err(NNError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_inverse_and_determinants() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();
        let inverse = decomposition.inverse().unwrap();
        assert_abs_diff_eq!(a.dot(&inverse), Array2::<f64>::eye(2), epsilon = 1e-12);
        assert_abs_diff_eq!(decomposition.determinant().unwrap(), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(decomposition.log_determinant().unwrap(), 8f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_solve_matrix_columns() {
        let a = spd_matrix(40, 3);
        let b = Array2::from_shape_fn((40, 5), |(r, c)| (r * 5 + c) as f64 * 0.1);
        let decomposition = LdltDecomposition::new(a.clone(), false).unwrap();
        let x = decomposition.solve_matrix(b.view()).unwrap();
        assert_abs_diff_eq!(a.dot(&x), b, epsilon = 1e-9);
        let first = decomposition.solve(b.column(0)).unwrap();
        assert_abs_diff_eq!(x.column(0), first.view(), epsilon = 1e-12);
    }

    #[test]
    fn test_column_major_input() {
        let a = array![[4.0, 2.0], [2.0, 3.0]].reversed_axes();
        assert!(!a.is_standard_layout());
        let decomposition = LdltDecomposition::new(a, false).unwrap();
        assert_eq!(decomposition.diagonal(), array![4.0, 2.0].view());
    }
}
