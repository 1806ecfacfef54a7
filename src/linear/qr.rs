//! QR decomposition and eigenvalue estimation.

use crate::result::LinearError;
use nalgebra::{DMatrix, DVector};

/// Factor `A = Q·R` using classical Gram-Schmidt orthogonalisation.
///
/// `A` needs at least as many rows as columns, and its columns must be
/// linearly independent.
pub fn gram_schmidt(
    a: &DMatrix<f64>,
    tolerance: f64,
) -> Result<(DMatrix<f64>, DMatrix<f64>), LinearError> {
    let (rows, columns) = a.shape();

    if columns == 0 || rows < columns {
        return Err(LinearError::MatrixMismatch);
    }

    let mut q = a.clone();
    let mut r = DMatrix::zeros(columns, columns);

    for i in 0..columns {
        for j in 0..i {
            let projection = q.column(j).dot(&a.column(i));
            r[(j, i)] = projection;

            let q_j = q.column(j).into_owned();
            let mut q_i = q.column_mut(i);
            q_i -= q_j * projection;
        }

        let norm = q.column(i).norm();
        r[(i, i)] = norm;

        if !(norm > tolerance) {
            log::debug!("Column {} is linearly dependent on the others", i);
            return Err(LinearError::NoSolution);
        }

        let mut q_i = q.column_mut(i);
        q_i /= norm;
    }

    Ok((q, r))
}

/// Estimate the eigenvalues of a square matrix using the unshifted QR
/// algorithm, repeatedly replacing `A` with `R·Q`.
///
/// The iteration stops early if a decomposition fails, in which case the
/// diagonal of the latest iterate is returned.
pub fn eigenvalues(
    a: &DMatrix<f64>,
    iterations: usize,
    tolerance: f64,
) -> Result<DVector<f64>, LinearError> {
    if a.nrows() == 0 || !a.is_square() {
        return Err(LinearError::MatrixMismatch);
    }

    let mut current = a.clone();

    for iteration in 0..iterations {
        match gram_schmidt(&current, tolerance) {
            Ok((q, r)) => current = r * q,
            Err(e) => {
                log::debug!(
                    "Stopping QR iteration after {} rounds: {}",
                    iteration,
                    e
                );
                break;
            },
        }
    }

    Ok(current.diagonal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn q_is_orthonormal_and_r_is_upper_triangular() {
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
        );

        let (q, r) = gram_schmidt(&a, 1e-9).unwrap();

        assert_relative_eq!(
            q.transpose() * &q,
            DMatrix::identity(3, 3),
            epsilon = 1e-9
        );
        assert_relative_eq!(&q * &r, a, epsilon = 1e-9);
        for row in 0..3 {
            for column in 0..row {
                assert_eq!(r[(row, column)], 0.0);
            }
        }
    }

    #[test]
    fn known_decomposition() {
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
        );

        let (q, r) = gram_schmidt(&a, 1e-9).unwrap();

        let first_column = DVector::from_vec(vec![6.0 / 7.0, 3.0 / 7.0, -2.0 / 7.0]);
        assert_relative_eq!(q.column(0).into_owned(), first_column, epsilon = 1e-12);
        assert_relative_eq!(r[(0, 0)], 14.0, epsilon = 1e-12);
        assert_relative_eq!(r[(1, 1)], 175.0, epsilon = 1e-9);
        assert_relative_eq!(r[(2, 2)], 35.0, epsilon = 1e-9);
    }

    #[test]
    fn tall_matrices_are_fine() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);

        let (q, r) = gram_schmidt(&a, 1e-9).unwrap();

        assert_eq!(q.shape(), (3, 2));
        assert_eq!(r.shape(), (2, 2));
        assert_relative_eq!(&q * &r, a, epsilon = 1e-12);
    }

    #[test]
    fn wide_matrices_are_rejected() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert_eq!(gram_schmidt(&a, 1e-9), Err(LinearError::MatrixMismatch));
    }

    #[test]
    fn dependent_columns_are_rejected() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);

        assert_eq!(gram_schmidt(&a, 1e-9), Err(LinearError::NoSolution));
    }

    #[test]
    fn eigenvalues_of_a_symmetric_matrix() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);

        let got = eigenvalues(&a, 100, 1e-9).unwrap();

        assert_relative_eq!(got, DVector::from_vec(vec![3.0, 1.0]), epsilon = 1e-9);
    }

    #[test]
    fn eigenvalues_of_a_triangular_matrix() {
        let a = DMatrix::from_row_slice(
            3,
            3,
            &[5.0, 1.0, 2.0, 0.0, 3.0, 4.0, 0.0, 0.0, 1.0],
        );

        let got = eigenvalues(&a, 200, 1e-9).unwrap();

        assert_relative_eq!(
            got,
            DVector::from_vec(vec![5.0, 3.0, 1.0]),
            epsilon = 1e-6
        );
    }

    #[test]
    fn eigenvalues_need_a_square_matrix() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        assert_eq!(eigenvalues(&a, 10, 1e-9), Err(LinearError::MatrixMismatch));
    }

    #[test]
    fn singular_matrices_stop_early() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);

        let got = eigenvalues(&a, 10, 1e-9).unwrap();

        // the very first decomposition fails, so we get the original diagonal
        assert_eq!(got, DVector::from_vec(vec![1.0, 4.0]));
    }
}
