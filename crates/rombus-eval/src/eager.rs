//! Eager affine summation for already-numeric operands.
//!
//! Rebuilds Σ θᵢ·opᵢ from scratch on every call. Operand counts are small
//! (the number of affine terms, typically tens) and the operands are
//! plain tensors, so caching buys nothing here.

use nalgebra::{DMatrix, DVector};

use rombus_core::Error as CoreError;

use crate::error::Result;

/// Sum scalar operands: Σ θᵢ·opᵢ.
pub fn sum_scalars(thetas: &[f64], operators: &[f64]) -> f64 {
    thetas
        .iter()
        .zip(operators)
        .map(|(theta, op)| theta * op)
        .sum()
}

/// Sum vector operands into a zeroed vector shaped like `operators[0]`.
pub fn sum_vectors(thetas: &[f64], operators: &[&DVector<f64>]) -> Result<DVector<f64>> {
    let len = operators[0].len();
    let mut output = DVector::zeros(len);
    for (theta, op) in thetas.iter().zip(operators) {
        if op.len() != len {
            return Err(CoreError::DimensionMismatch {
                expected: len,
                actual: op.len(),
            }
            .into());
        }
        output.axpy(*theta, *op, 1.0);
    }
    Ok(output)
}

/// Sum matrix operands into a zeroed matrix shaped like `operators[0]`.
pub fn sum_matrices(thetas: &[f64], operators: &[&DMatrix<f64>]) -> Result<DMatrix<f64>> {
    let (nrows, ncols) = operators[0].shape();
    let mut output = DMatrix::zeros(nrows, ncols);
    for (theta, op) in thetas.iter().zip(operators) {
        if op.nrows() != nrows {
            return Err(CoreError::DimensionMismatch {
                expected: nrows,
                actual: op.nrows(),
            }
            .into());
        }
        if op.ncols() != ncols {
            return Err(CoreError::DimensionMismatch {
                expected: ncols,
                actual: op.ncols(),
            }
            .into());
        }
        output.zip_apply(*op, |out, value| *out += theta * value);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_sum_scalars() {
        let result = sum_scalars(&[2.0, 3.0], &[10.0, 100.0]);
        assert!((result - 320.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum_vectors() {
        let a = dvector![1.0, 0.0];
        let b = dvector![0.0, 1.0];
        let result = sum_vectors(&[2.0, 3.0], &[&a, &b]).unwrap();
        assert!((result[0] - 2.0).abs() < 1e-12);
        assert!((result[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum_matrices_identity_and_diagonal() {
        // theta = [2, 3], ops = [I3, diag(2,2,2)] -> diag(8, 8, 8)
        let identity = DMatrix::<f64>::identity(3, 3);
        let diagonal = DMatrix::from_diagonal(&dvector![2.0, 2.0, 2.0]);
        let result = sum_matrices(&[2.0, 3.0], &[&identity, &diagonal]).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 8.0 } else { 0.0 };
                assert!((result[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_sum_vectors_shape_mismatch() {
        let a = dvector![1.0, 0.0];
        let b = dvector![1.0, 0.0, 0.0];
        let result = sum_vectors(&[1.0, 1.0], &[&a, &b]);
        assert!(matches!(
            result,
            Err(Error::Core(CoreError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_sum_matrices_shape_mismatch() {
        let a = dmatrix![1.0, 0.0; 0.0, 1.0];
        let b = dmatrix![1.0];
        let result = sum_matrices(&[1.0, 1.0], &[&a, &b]);
        assert!(matches!(
            result,
            Err(Error::Core(CoreError::DimensionMismatch { .. }))
        ));
    }
}
