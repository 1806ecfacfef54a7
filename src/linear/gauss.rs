//! Gauss-Jordan elimination.

use crate::{linear::matrix, result::LinearError};
use nalgebra::{DMatrix, DVector};

/// Solve `A·x = b` by reducing the augmented matrix `[A|b]` to reduced row
/// echelon form.
///
/// Each pivot is the entry with the largest magnitude in its column (partial
/// pivoting). A pivot smaller than `tolerance` means the system is singular.
/// Systems with no solution and systems with infinitely many solutions are
/// both reported as [`LinearError::NoSolution`].
pub fn gauss_jordan(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    tolerance: f64,
) -> Result<DVector<f64>, LinearError> {
    let n = a.nrows();

    if n == 0 || !a.is_square() || b.len() != n {
        return Err(LinearError::MatrixMismatch);
    }

    let mut m = matrix::augment(a, b);

    for i in 0..n {
        let pivot_row = find_pivot(&m, i);
        m.swap_rows(i, pivot_row);

        let pivot = m[(i, i)];

        // the negated comparison also catches NaN
        if !(pivot.abs() >= tolerance) {
            log::debug!("Column {} has no usable pivot ({})", i, pivot);
            return Err(LinearError::NoSolution);
        }

        for j in i..=n {
            m[(i, j)] /= pivot;
        }

        for k in 0..n {
            if k == i {
                continue;
            }

            let factor = m[(k, i)];
            if factor == 0.0 {
                continue;
            }

            for j in i..=n {
                m[(k, j)] -= factor * m[(i, j)];
            }
        }
    }

    Ok(m.column(n).into_owned())
}

/// The row in `[column, n)` with the largest magnitude in `column`, preferring
/// the topmost row on ties.
fn find_pivot(m: &DMatrix<f64>, column: usize) -> usize {
    let mut best = column;

    for row in column + 1..m.nrows() {
        if m[(row, column)].abs() > m[(best, column)].abs() {
            best = row;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn two_by_two() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, -1.0]);
        let b = DVector::from_vec(vec![5.0, 1.0]);

        let got = gauss_jordan(&a, &b, 1e-9).unwrap();

        assert_relative_eq!(got, DVector::from_vec(vec![2.0, 1.0]), epsilon = 1e-12);
    }

    #[test]
    fn needs_a_row_swap() {
        // the first pivot is zero without pivoting
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 0.0],
        );
        let x = DVector::from_vec(vec![1.0, -2.0, 3.0]);
        let b = &a * &x;

        let got = gauss_jordan(&a, &b, 1e-9).unwrap();

        assert_relative_eq!(got, x, epsilon = 1e-12);
    }

    #[test]
    fn one_by_one() {
        let a = DMatrix::from_element(1, 1, 4.0);
        let b = DVector::from_element(1, 2.0);

        let got = gauss_jordan(&a, &b, 1e-9).unwrap();

        assert_eq!(got[0], 0.5);
    }

    #[test]
    fn singular_matrices_have_no_solution() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 2.0, 2.0]);
        let b = DVector::from_vec(vec![2.0, 4.0]);

        let got = gauss_jordan(&a, &b, 1e-9);

        assert_eq!(got, Err(LinearError::NoSolution));
    }

    #[test]
    fn inconsistent_systems_have_no_solution() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);

        let got = gauss_jordan(&a, &b, 1e-9);

        assert_eq!(got, Err(LinearError::NoSolution));
    }

    #[test]
    fn dimensions_must_match() {
        let square = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
        let wide = DMatrix::from_row_slice(2, 3, &[1.0; 6]);

        assert_eq!(
            gauss_jordan(&wide, &DVector::from_vec(vec![1.0, 2.0]), 1e-9),
            Err(LinearError::MatrixMismatch)
        );
        assert_eq!(
            gauss_jordan(&square, &DVector::from_vec(vec![1.0]), 1e-9),
            Err(LinearError::MatrixMismatch)
        );
        assert_eq!(
            gauss_jordan(&DMatrix::zeros(0, 0), &DVector::zeros(0), 1e-9),
            Err(LinearError::MatrixMismatch)
        );
    }

    #[test]
    fn agrees_with_lu_decomposition() {
        let a = DMatrix::from_row_slice(
            4,
            4,
            &[
                4.0, -2.0, 1.0, 3.0, //
                3.0, 6.0, -4.0, 2.0, //
                2.0, 1.0, 8.0, -5.0, //
                1.0, 2.0, 3.0, 9.0,
            ],
        );
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);

        let got = gauss_jordan(&a, &b, 1e-9).unwrap();
        let should_be = a.clone().lu().solve(&b).unwrap();

        assert_relative_eq!(got, should_be, epsilon = 1e-9);
    }
}
