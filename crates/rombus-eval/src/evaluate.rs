//! Top-level evaluation of one affine term.

use std::rc::Rc;

use nalgebra::{DMatrix, DVector};

use rombus_core::{
    AffineExpansionStorage, AffineOperator, AssemblyBackend, ConstraintSet, Form, TensorFactory,
};

use crate::classify::{classify, OperandKind};
use crate::constraints::merge_constraints;
use crate::eager::{sum_matrices, sum_scalars, sum_vectors};
use crate::error::{Error, Result};
use crate::lazy::ExpansionCache;
use crate::mixed::promote_and_sum;
use crate::result::EvaluationResult;

/// Evaluator for affine expansions Σ θᵢ·Opᵢ.
///
/// Owns the lazy-combination cache, so the recommended scoping is one
/// evaluator per truth/reduced problem instance: distinct problems never
/// collide on cache keys and the cache dies with its owner. Evaluation is
/// synchronous; a result always reflects exactly the theta passed to the
/// call that produced it.
#[derive(Debug, Default)]
pub struct ExpansionEvaluator {
    cache: ExpansionCache,
}

impl ExpansionEvaluator {
    /// Create an evaluator with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one term of an affine expansion.
    ///
    /// Classifies the operand set once, then dispatches: numeric operands
    /// are summed eagerly, symbolic operands are combined lazily through
    /// the cache, constraint sets are merged by location, and mixed sets
    /// are promoted through the backend.
    pub fn evaluate(
        &mut self,
        backend: &dyn AssemblyBackend,
        thetas: &[f64],
        operators: &AffineExpansionStorage,
    ) -> Result<EvaluationResult> {
        self.evaluate_operators(backend, thetas, operators.as_slice())
    }

    /// Evaluate over a raw operator slice (see [`evaluate`](Self::evaluate)).
    pub fn evaluate_operators(
        &mut self,
        backend: &dyn AssemblyBackend,
        thetas: &[f64],
        operators: &[AffineOperator],
    ) -> Result<EvaluationResult> {
        if thetas.len() != operators.len() {
            return Err(Error::ShapeMismatch {
                thetas: thetas.len(),
                operators: operators.len(),
            });
        }

        match classify(operators)? {
            OperandKind::Scalars => {
                let values = collect_scalars(operators)?;
                Ok(EvaluationResult::Scalar(sum_scalars(thetas, &values)))
            }
            OperandKind::Vectors => {
                let vectors = collect_vectors(operators)?;
                Ok(EvaluationResult::Vector(sum_vectors(thetas, &vectors)?))
            }
            OperandKind::Matrices => {
                let matrices = collect_matrices(operators)?;
                Ok(EvaluationResult::Matrix(sum_matrices(thetas, &matrices)?))
            }
            OperandKind::Forms => {
                let forms = collect_forms(operators)?;
                Ok(EvaluationResult::Form(
                    self.cache.combine_forms(thetas, &forms)?,
                ))
            }
            OperandKind::Factories => {
                let factories = collect_factories(operators)?;
                Ok(EvaluationResult::Factory(
                    self.cache.combine_factories(thetas, &factories)?,
                ))
            }
            OperandKind::Constraints => {
                let sets = collect_constraints(operators)?;
                Ok(EvaluationResult::Constraints(merge_constraints(
                    backend, thetas, &sets,
                )?))
            }
            OperandKind::Mixed => promote_and_sum(backend, thetas, operators),
        }
    }

    /// Number of cached symbolic combinations (diagnostics).
    pub fn cached_combinations(&self) -> usize {
        self.cache.form_entries() + self.cache.factory_entries()
    }
}

fn kind_error(op: &AffineOperator, expected: &'static str) -> Error {
    Error::UnsupportedOperandKind(format!(
        "{} operand in a set classified as {}",
        op.kind_name(),
        expected
    ))
}

fn collect_scalars(operators: &[AffineOperator]) -> Result<Vec<f64>> {
    operators
        .iter()
        .map(|op| match op {
            AffineOperator::Scalar(value) => Ok(*value),
            other => Err(kind_error(other, "scalars")),
        })
        .collect()
}

fn collect_vectors(operators: &[AffineOperator]) -> Result<Vec<&DVector<f64>>> {
    operators
        .iter()
        .map(|op| match op {
            AffineOperator::Vector(vector) => Ok(vector.as_ref()),
            other => Err(kind_error(other, "vectors")),
        })
        .collect()
}

fn collect_matrices(operators: &[AffineOperator]) -> Result<Vec<&DMatrix<f64>>> {
    operators
        .iter()
        .map(|op| match op {
            AffineOperator::Matrix(matrix) => Ok(matrix.as_ref()),
            other => Err(kind_error(other, "matrices")),
        })
        .collect()
}

fn collect_forms(operators: &[AffineOperator]) -> Result<Vec<Rc<Form>>> {
    operators
        .iter()
        .map(|op| match op {
            AffineOperator::Form(form) => Ok(Rc::clone(form)),
            other => Err(kind_error(other, "forms")),
        })
        .collect()
}

fn collect_factories(operators: &[AffineOperator]) -> Result<Vec<Rc<TensorFactory>>> {
    operators
        .iter()
        .map(|op| match op {
            AffineOperator::Factory(factory) => Ok(Rc::clone(factory)),
            other => Err(kind_error(other, "factories")),
        })
        .collect()
}

fn collect_constraints(operators: &[AffineOperator]) -> Result<Vec<Rc<ConstraintSet>>> {
    operators
        .iter()
        .map(|op| match op {
            AffineOperator::Constraints(constraints) => Ok(Rc::clone(constraints)),
            other => Err(kind_error(other, "constraints")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector, DMatrix};
    use rombus_backend_dense::DenseBackend;

    fn matrix_storage() -> AffineExpansionStorage {
        AffineExpansionStorage::from_operators(vec![
            AffineOperator::Matrix(Rc::new(DMatrix::identity(3, 3))),
            AffineOperator::Matrix(Rc::new(DMatrix::from_diagonal(&dvector![2.0, 2.0, 2.0]))),
        ])
    }

    #[test]
    fn test_matrix_expansion() {
        // theta = [2, 3], ops = [I3, diag(2,2,2)] -> diag(8, 8, 8)
        let backend = DenseBackend::new();
        let mut evaluator = ExpansionEvaluator::new();
        let storage = matrix_storage();

        let result = evaluator.evaluate(&backend, &[2.0, 3.0], &storage).unwrap();
        let matrix = result.as_matrix().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 8.0 } else { 0.0 };
                assert!((matrix[(i, j)] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let backend = DenseBackend::new();
        let mut evaluator = ExpansionEvaluator::new();
        let storage = AffineExpansionStorage::from_operators(vec![
            AffineOperator::Scalar(1.0),
            AffineOperator::Scalar(2.0),
            AffineOperator::Scalar(3.0),
        ]);

        let result = evaluator.evaluate(&backend, &[1.0, 2.0], &storage);
        assert!(matches!(
            result,
            Err(Error::ShapeMismatch {
                thetas: 2,
                operators: 3
            })
        ));
    }

    #[test]
    fn test_form_expansion_defers_assembly() {
        let mut backend = DenseBackend::new();
        let stiffness = backend.matrix_form(dmatrix![2.0, 0.0; 0.0, 2.0]);
        let mass = backend.matrix_form(dmatrix![1.0, 1.0; 1.0, 1.0]);
        let storage = AffineExpansionStorage::from_operators(vec![
            AffineOperator::Form(stiffness),
            AffineOperator::Form(mass),
        ]);

        let mut evaluator = ExpansionEvaluator::new();
        let result = evaluator.evaluate(&backend, &[1.0, 10.0], &storage).unwrap();
        // Nothing assembled yet.
        assert_eq!(backend.assembly_count(), 0);

        let assembled = result.as_form().unwrap().assemble_matrix(&backend).unwrap();
        assert_eq!(backend.assembly_count(), 2);
        assert!((assembled[(0, 0)] - 12.0).abs() < 1e-12);
        assert!((assembled[(0, 1)] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_cache_transparency_across_theta_changes() {
        let mut backend = DenseBackend::new();
        let a = backend.matrix_form(dmatrix![1.0, 0.0; 0.0, 1.0]);
        let b = backend.matrix_form(dmatrix![0.0, 1.0; 1.0, 0.0]);
        let storage = AffineExpansionStorage::from_operators(vec![
            AffineOperator::Form(a),
            AffineOperator::Form(b),
        ]);

        let mut evaluator = ExpansionEvaluator::new();
        let theta1 = [2.0, 3.0];
        let theta2 = [-1.0, 4.0];

        let first = evaluator.evaluate(&backend, &theta1, &storage).unwrap();
        let first = first.as_form().unwrap().assemble_matrix(&backend).unwrap();

        let second = evaluator.evaluate(&backend, &theta2, &storage).unwrap();
        let second = second.as_form().unwrap().assemble_matrix(&backend).unwrap();

        let third = evaluator.evaluate(&backend, &theta1, &storage).unwrap();
        let third = third.as_form().unwrap().assemble_matrix(&backend).unwrap();

        // No coefficient leakage between calls: theta1 twice gives
        // bit-identical results, and only one expression was ever built.
        assert_eq!(first, third);
        assert_ne!(first, second);
        assert_eq!(evaluator.cached_combinations(), 1);
    }

    #[test]
    fn test_idempotent_repeat_evaluation() {
        let backend = DenseBackend::new();
        let mut evaluator = ExpansionEvaluator::new();
        let storage = matrix_storage();

        let first = evaluator.evaluate(&backend, &[0.5, 0.25], &storage).unwrap();
        let second = evaluator.evaluate(&backend, &[0.5, 0.25], &storage).unwrap();
        assert_eq!(first.as_matrix().unwrap(), second.as_matrix().unwrap());
    }

    #[test]
    fn test_substituted_operators_get_fresh_cache_entry() {
        let mut backend = DenseBackend::new();
        let first_set = AffineExpansionStorage::from_operators(vec![AffineOperator::Form(
            backend.matrix_form(dmatrix![1.0]),
        )]);
        let second_set = AffineExpansionStorage::from_operators(vec![AffineOperator::Form(
            backend.matrix_form(dmatrix![1.0]),
        )]);

        let mut evaluator = ExpansionEvaluator::new();
        evaluator.evaluate(&backend, &[1.0], &first_set).unwrap();
        evaluator.evaluate(&backend, &[1.0], &second_set).unwrap();
        assert_eq!(evaluator.cached_combinations(), 2);
    }

    #[test]
    fn test_scalar_expansion() {
        let backend = DenseBackend::new();
        let mut evaluator = ExpansionEvaluator::new();
        let storage = AffineExpansionStorage::from_operators(vec![
            AffineOperator::Scalar(10.0),
            AffineOperator::Scalar(100.0),
        ]);

        let result = evaluator.evaluate(&backend, &[2.0, 3.0], &storage).unwrap();
        assert!((result.as_scalar().unwrap() - 320.0).abs() < 1e-12);
    }
}
