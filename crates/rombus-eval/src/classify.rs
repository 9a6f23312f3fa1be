//! Operand set classification.

use rombus_core::AffineOperator;

use crate::error::{Error, Result};

/// Representation kind of an operand set.
///
/// Classification happens once per `evaluate` call; the evaluator
/// dispatches on the result instead of re-inspecting operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Still-symbolic forms; combined lazily with cached expressions.
    Forms,
    /// Operator factories; like forms, plus ownership tracking.
    Factories,
    /// Pre-assembled matrices; summed eagerly.
    Matrices,
    /// Pre-assembled vectors; summed eagerly.
    Vectors,
    /// Plain scalars; summed eagerly.
    Scalars,
    /// Constraint sets; merged by location.
    Constraints,
    /// Symbolic and pre-assembled operands in one set; the symbolic
    /// members are force-assembled, then summed eagerly.
    Mixed,
}

/// Determine the representation kind of an operand set.
///
/// Homogeneous sets map to their kind. Sets mixing symbolic operands
/// (forms, factories) with at most one numeric tensor rank map to
/// [`OperandKind::Mixed`]. Everything else — empty sets, scalar or
/// constraint operands mixed with anything, matrices mixed with
/// vectors — has no combiner and fails.
pub fn classify(operators: &[AffineOperator]) -> Result<OperandKind> {
    if operators.is_empty() {
        return Err(Error::UnsupportedOperandKind(
            "empty operator set".to_string(),
        ));
    }

    let mut has_form = false;
    let mut has_factory = false;
    let mut has_matrix = false;
    let mut has_vector = false;
    let mut has_scalar = false;
    let mut has_constraints = false;

    for op in operators {
        match op {
            AffineOperator::Form(_) => has_form = true,
            AffineOperator::Factory(_) => has_factory = true,
            AffineOperator::Matrix(_) => has_matrix = true,
            AffineOperator::Vector(_) => has_vector = true,
            AffineOperator::Scalar(_) => has_scalar = true,
            AffineOperator::Constraints(_) => has_constraints = true,
        }
    }

    let kinds = [
        has_form,
        has_factory,
        has_matrix,
        has_vector,
        has_scalar,
        has_constraints,
    ]
    .iter()
    .filter(|&&present| present)
    .count();

    if kinds == 1 {
        return Ok(if has_form {
            OperandKind::Forms
        } else if has_factory {
            OperandKind::Factories
        } else if has_matrix {
            OperandKind::Matrices
        } else if has_vector {
            OperandKind::Vectors
        } else if has_scalar {
            OperandKind::Scalars
        } else {
            OperandKind::Constraints
        });
    }

    // Scalars and constraints never combine with other kinds, and a set
    // cannot sum to both a matrix and a vector.
    if has_scalar || has_constraints || (has_matrix && has_vector) {
        return Err(Error::UnsupportedOperandKind(describe(operators)));
    }

    Ok(OperandKind::Mixed)
}

fn describe(operators: &[AffineOperator]) -> String {
    let mut names: Vec<&'static str> = operators.iter().map(AffineOperator::kind_name).collect();
    names.dedup();
    names.join(" mixed with ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};
    use rombus_core::{Form, ProblemId, TensorFactory};
    use std::rc::Rc;

    fn form_op() -> AffineOperator {
        AffineOperator::Form(Rc::new(Form::bilinear()))
    }

    fn matrix_op() -> AffineOperator {
        AffineOperator::Matrix(Rc::new(dmatrix![1.0, 0.0; 0.0, 1.0]))
    }

    fn vector_op() -> AffineOperator {
        AffineOperator::Vector(Rc::new(dvector![1.0, 2.0]))
    }

    #[test]
    fn test_homogeneous_kinds() {
        assert_eq!(classify(&[form_op(), form_op()]).unwrap(), OperandKind::Forms);
        assert_eq!(
            classify(&[matrix_op(), matrix_op()]).unwrap(),
            OperandKind::Matrices
        );
        assert_eq!(classify(&[vector_op()]).unwrap(), OperandKind::Vectors);
        assert_eq!(
            classify(&[AffineOperator::Scalar(1.0)]).unwrap(),
            OperandKind::Scalars
        );
    }

    #[test]
    fn test_factories() {
        let problem = ProblemId::fresh();
        let factory = AffineOperator::Factory(Rc::new(TensorFactory::new(
            Rc::new(Form::bilinear()),
            problem,
        )));
        assert_eq!(classify(&[factory]).unwrap(), OperandKind::Factories);
    }

    #[test]
    fn test_symbolic_numeric_mix() {
        assert_eq!(
            classify(&[form_op(), matrix_op()]).unwrap(),
            OperandKind::Mixed
        );
    }

    #[test]
    fn test_form_factory_mix_is_mixed() {
        let problem = ProblemId::fresh();
        let factory = AffineOperator::Factory(Rc::new(TensorFactory::new(
            Rc::new(Form::bilinear()),
            problem,
        )));
        assert_eq!(classify(&[form_op(), factory]).unwrap(), OperandKind::Mixed);
    }

    #[test]
    fn test_matrix_vector_mix_unsupported() {
        let result = classify(&[matrix_op(), vector_op()]);
        assert!(matches!(result, Err(Error::UnsupportedOperandKind(_))));
    }

    #[test]
    fn test_scalar_mix_unsupported() {
        let result = classify(&[AffineOperator::Scalar(1.0), matrix_op()]);
        assert!(matches!(result, Err(Error::UnsupportedOperandKind(_))));
    }

    #[test]
    fn test_empty_set_unsupported() {
        let result = classify(&[]);
        assert!(matches!(result, Err(Error::UnsupportedOperandKind(_))));
    }
}
