//! Evaluation results.

use nalgebra::{DMatrix, DVector};

use rombus_core::{CombinedFactory, CombinedForm, ConstraintSet};

/// The outcome of evaluating one affine term: a single "already combined"
/// value, tagged by representation.
///
/// Results from different terms (stiffness, mass, load, ...) are joined
/// by [`sum_results`](crate::sum::sum_results) before the caller solves
/// or projects with them.
#[derive(Debug, Clone)]
pub enum EvaluationResult {
    /// A deferred symbolic sum; assembly has not happened yet.
    Form(CombinedForm),
    /// A deferred symbolic sum carrying its owning problem.
    Factory(CombinedFactory),
    /// An assembled matrix.
    Matrix(DMatrix<f64>),
    /// An assembled vector.
    Vector(DVector<f64>),
    /// A plain scalar.
    Scalar(f64),
    /// A merged constraint set.
    Constraints(ConstraintSet),
}

impl EvaluationResult {
    /// Short name of the result kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EvaluationResult::Form(_) => "form",
            EvaluationResult::Factory(_) => "factory",
            EvaluationResult::Matrix(_) => "matrix",
            EvaluationResult::Vector(_) => "vector",
            EvaluationResult::Scalar(_) => "scalar",
            EvaluationResult::Constraints(_) => "constraints",
        }
    }

    /// The combined symbolic sum, if this is a form result.
    pub fn as_form(&self) -> Option<&CombinedForm> {
        match self {
            EvaluationResult::Form(form) => Some(form),
            _ => None,
        }
    }

    /// The combined factory, if this is a factory result.
    pub fn as_factory(&self) -> Option<&CombinedFactory> {
        match self {
            EvaluationResult::Factory(factory) => Some(factory),
            _ => None,
        }
    }

    /// The assembled matrix, if this is a matrix result.
    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            EvaluationResult::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    /// The assembled vector, if this is a vector result.
    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            EvaluationResult::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    /// The scalar value, if this is a scalar result.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            EvaluationResult::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// The merged constraint set, if this is a constraints result.
    pub fn as_constraints(&self) -> Option<&ConstraintSet> {
        match self {
            EvaluationResult::Constraints(constraints) => Some(constraints),
            _ => None,
        }
    }
}
