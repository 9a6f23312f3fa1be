//! Promotion of mixed symbolic/pre-assembled operand sets.
//!
//! When a caller mixes still-symbolic operands with pre-assembled tensors
//! in one set, laziness cannot be preserved: every symbolic member is
//! force-assembled through the backend and the now-homogeneous set is
//! summed eagerly. This path is intentionally uncached; mixing
//! representations is a rare, non-hot case.

use std::rc::Rc;

use nalgebra::{DMatrix, DVector};

use rombus_core::{AffineOperator, AssemblyBackend, FormRank};

use crate::eager::{sum_matrices, sum_vectors};
use crate::error::{Error, Result};
use crate::result::EvaluationResult;

/// Assemble the symbolic members of a mixed set, then sum eagerly.
pub fn promote_and_sum(
    backend: &dyn AssemblyBackend,
    thetas: &[f64],
    operators: &[AffineOperator],
) -> Result<EvaluationResult> {
    match target_rank(operators)? {
        FormRank::Bilinear => {
            let mut promoted: Vec<Rc<DMatrix<f64>>> = Vec::with_capacity(operators.len());
            for op in operators {
                let matrix = match op {
                    AffineOperator::Matrix(matrix) => Rc::clone(matrix),
                    AffineOperator::Form(form) => Rc::new(backend.assemble_matrix(form)?),
                    AffineOperator::Factory(factory) => {
                        Rc::new(backend.assemble_matrix(factory.form())?)
                    }
                    other => return Err(unexpected(other)),
                };
                promoted.push(matrix);
            }
            let refs: Vec<&DMatrix<f64>> = promoted.iter().map(Rc::as_ref).collect();
            Ok(EvaluationResult::Matrix(sum_matrices(thetas, &refs)?))
        }
        FormRank::Linear => {
            let mut promoted: Vec<Rc<DVector<f64>>> = Vec::with_capacity(operators.len());
            for op in operators {
                let vector = match op {
                    AffineOperator::Vector(vector) => Rc::clone(vector),
                    AffineOperator::Form(form) => Rc::new(backend.assemble_vector(form)?),
                    AffineOperator::Factory(factory) => {
                        Rc::new(backend.assemble_vector(factory.form())?)
                    }
                    other => return Err(unexpected(other)),
                };
                promoted.push(vector);
            }
            let refs: Vec<&DVector<f64>> = promoted.iter().map(Rc::as_ref).collect();
            Ok(EvaluationResult::Vector(sum_vectors(thetas, &refs)?))
        }
    }
}

/// What every operand in the set must sum to. Classification already
/// excluded matrix/vector mixes of pre-assembled tensors, but symbolic
/// ranks still have to agree with them and with each other.
fn target_rank(operators: &[AffineOperator]) -> Result<FormRank> {
    let mut rank: Option<FormRank> = None;
    for op in operators {
        let op_rank = match op {
            AffineOperator::Matrix(_) => FormRank::Bilinear,
            AffineOperator::Vector(_) => FormRank::Linear,
            AffineOperator::Form(form) => form.rank(),
            AffineOperator::Factory(factory) => factory.form().rank(),
            other => return Err(unexpected(other)),
        };
        match rank {
            None => rank = Some(op_rank),
            Some(expected) if expected != op_rank => {
                return Err(Error::UnsupportedOperandKind(format!(
                    "{} operands mixed with {} operands",
                    expected, op_rank
                )));
            }
            Some(_) => {}
        }
    }
    rank.ok_or_else(|| Error::UnsupportedOperandKind("empty operator set".to_string()))
}

fn unexpected(op: &AffineOperator) -> Error {
    Error::UnsupportedOperandKind(format!("{} operand in a mixed set", op.kind_name()))
}
