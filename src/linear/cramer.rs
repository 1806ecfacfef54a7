//! Cramer's Rule.

use crate::{linear::matrix, result::LinearError};
use nalgebra::{DMatrix, DVector};

/// The determinant of a square matrix, calculated by cofactor expansion along
/// the first row.
///
/// This is the textbook recursive definition and takes `O(n!)` time, so it is
/// only suitable for small matrices.
pub fn determinant(m: &DMatrix<f64>) -> f64 {
    debug_assert!(m.is_square(), "Determinants need a square matrix");

    match m.nrows() {
        0 => 1.0,
        1 => m[(0, 0)],
        n => (0..n)
            .map(|j| {
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sign * m[(0, j)] * determinant(&matrix::minor(m, 0, j))
            })
            .sum(),
    }
}

/// Solve `A·x = b` using Cramer's Rule, `x_i = det(A_i) / det(A)`, where
/// `A_i` is `A` with its `i`'th column replaced by `b`.
pub fn cramers_rule(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    tolerance: f64,
) -> Result<DVector<f64>, LinearError> {
    let n = a.nrows();

    if n == 0 || !a.is_square() || b.len() != n {
        return Err(LinearError::MatrixMismatch);
    }

    let det = determinant(a);

    if !(det.abs() >= tolerance) {
        log::debug!("det(A) = {}, there is no unique solution", det);
        return Err(LinearError::NoSolution);
    }

    let solution = (0..n)
        .map(|i| determinant(&matrix::with_column(a, i, b)) / det)
        .collect::<Vec<_>>();

    Ok(DVector::from_vec(solution))
}
