//! The addition step over per-term evaluation results.
//!
//! An affine problem evaluates each term name separately (stiffness,
//! mass, load, ...) and then adds the results. Numeric results add
//! elementwise; symbolic results concatenate their weighted terms so the
//! final assembly still happens at most once.

use rombus_core::{CombinedFactory, Error as CoreError};

use crate::error::{Error, Result};
use crate::result::EvaluationResult;

/// Add evaluation results of the same kind.
pub fn sum_results(
    results: impl IntoIterator<Item = EvaluationResult>,
) -> Result<EvaluationResult> {
    let mut iter = results.into_iter();
    let first = iter.next().ok_or_else(|| {
        Error::UnsupportedOperandKind("no evaluation results to sum".to_string())
    })?;
    iter.try_fold(first, add)
}

fn add(acc: EvaluationResult, next: EvaluationResult) -> Result<EvaluationResult> {
    match (acc, next) {
        (EvaluationResult::Scalar(a), EvaluationResult::Scalar(b)) => {
            Ok(EvaluationResult::Scalar(a + b))
        }
        (EvaluationResult::Vector(mut a), EvaluationResult::Vector(b)) => {
            if a.len() != b.len() {
                return Err(CoreError::DimensionMismatch {
                    expected: a.len(),
                    actual: b.len(),
                }
                .into());
            }
            a += &b;
            Ok(EvaluationResult::Vector(a))
        }
        (EvaluationResult::Matrix(mut a), EvaluationResult::Matrix(b)) => {
            if a.shape() != b.shape() {
                return Err(CoreError::DimensionMismatch {
                    expected: a.nrows(),
                    actual: b.nrows(),
                }
                .into());
            }
            a += &b;
            Ok(EvaluationResult::Matrix(a))
        }
        (EvaluationResult::Form(a), EvaluationResult::Form(b)) => {
            Ok(EvaluationResult::Form(a.merge(b)?))
        }
        (EvaluationResult::Factory(a), EvaluationResult::Factory(b)) => {
            if a.problem() != b.problem() {
                return Err(Error::InconsistentOwnership {
                    expected: a.problem(),
                    found: b.problem(),
                });
            }
            let problem = a.problem();
            let merged = a.form().clone().merge(b.form().clone())?;
            Ok(EvaluationResult::Factory(CombinedFactory::new(
                merged, problem,
            )))
        }
        (EvaluationResult::Constraints(mut a), EvaluationResult::Constraints(b)) => {
            a.extend(b);
            Ok(EvaluationResult::Constraints(a))
        }
        (acc, next) => Err(Error::UnsupportedOperandKind(format!(
            "cannot add {} and {} results",
            acc.kind_name(),
            next.kind_name()
        ))),
    }
}
