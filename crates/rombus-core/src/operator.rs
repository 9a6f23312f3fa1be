//! Affine operators and combined symbolic sums.
//!
//! One term of an affine decomposition Σ θᵢ(μ)·Opᵢ is an
//! [`AffineOperator`]: a tagged variant over symbolic forms, operator
//! factories, pre-assembled tensors, scalars, and constraint sets. The
//! evaluation engine borrows operators and never mutates them; the only
//! mutable state is the coefficient slot array inside a cached
//! [`CombinedForm`].

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::{DMatrix, DVector};

use crate::backend::AssemblyBackend;
use crate::coefficients::CoefficientSlots;
use crate::constraint::ConstraintSet;
use crate::error::{Error, Result};
use crate::form::{Form, FormRank};

static NEXT_PROBLEM_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a truth or reduced problem instance.
///
/// Operator factories carry the id of the problem that produced them, so
/// downstream lookups can recover "which problem produced this combined
/// operator" without a process-wide registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProblemId(u64);

impl ProblemId {
    /// Allocate a fresh problem identity.
    pub fn fresh() -> Self {
        ProblemId(NEXT_PROBLEM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "problem {}", self.0)
    }
}

/// An operator factory: a symbolic form together with a back-reference to
/// the problem that owns it.
#[derive(Debug, Clone)]
pub struct TensorFactory {
    form: Rc<Form>,
    problem: ProblemId,
}

impl TensorFactory {
    /// Wrap a form, recording its owning problem.
    pub fn new(form: Rc<Form>, problem: ProblemId) -> Self {
        Self { form, problem }
    }

    /// The wrapped form.
    pub fn form(&self) -> &Rc<Form> {
        &self.form
    }

    /// The owning problem.
    pub fn problem(&self) -> ProblemId {
        self.problem
    }
}

/// One term of an affine decomposition.
#[derive(Debug, Clone)]
pub enum AffineOperator {
    /// A still-symbolic form; assembly is deferred.
    Form(Rc<Form>),
    /// A still-symbolic form wrapping an owning-problem reference.
    Factory(Rc<TensorFactory>),
    /// A pre-assembled matrix.
    Matrix(Rc<DMatrix<f64>>),
    /// A pre-assembled vector.
    Vector(Rc<DVector<f64>>),
    /// A plain scalar.
    Scalar(f64),
    /// A set of Dirichlet-type constraints.
    Constraints(Rc<ConstraintSet>),
}

impl AffineOperator {
    /// Short name of the operand kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AffineOperator::Form(_) => "form",
            AffineOperator::Factory(_) => "factory",
            AffineOperator::Matrix(_) => "matrix",
            AffineOperator::Vector(_) => "vector",
            AffineOperator::Scalar(_) => "scalar",
            AffineOperator::Constraints(_) => "constraints",
        }
    }
}

impl PartialEq for AffineOperator {
    /// Value equality: symbolic operands compare by identity, numeric
    /// operands by content. Used by storage round-trip checks.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AffineOperator::Form(a), AffineOperator::Form(b)) => a.id() == b.id(),
            (AffineOperator::Factory(a), AffineOperator::Factory(b)) => {
                a.form().id() == b.form().id() && a.problem() == b.problem()
            }
            (AffineOperator::Matrix(a), AffineOperator::Matrix(b)) => a == b,
            (AffineOperator::Vector(a), AffineOperator::Vector(b)) => a == b,
            (AffineOperator::Scalar(a), AffineOperator::Scalar(b)) => a == b,
            (AffineOperator::Constraints(a), AffineOperator::Constraints(b)) => a == b,
            _ => false,
        }
    }
}

/// One weighted term of a combined symbolic sum: a coefficient slot and
/// the form it scales.
#[derive(Debug, Clone)]
pub struct WeightedTerm {
    slots: CoefficientSlots,
    index: usize,
    form: Rc<Form>,
}

impl WeightedTerm {
    /// The current coefficient value.
    pub fn coefficient(&self) -> f64 {
        self.slots.value(self.index)
    }

    /// The scaled form.
    pub fn form(&self) -> &Rc<Form> {
        &self.form
    }
}

/// A lazily combined symbolic sum Σ θᵢ·formᵢ.
///
/// Building one never triggers assembly; coefficients live in shared
/// slots that the cache rewrites in place on repeated evaluations, so a
/// combined form handed out earlier always reflects the latest theta.
#[derive(Debug, Clone)]
pub struct CombinedForm {
    terms: Vec<WeightedTerm>,
    rank: FormRank,
}

impl CombinedForm {
    /// Build a combined sum over `forms`, one slot per form.
    ///
    /// All forms must share a rank; slot `i` scales `forms[i]`.
    pub fn new(slots: &CoefficientSlots, forms: &[Rc<Form>]) -> Result<Self> {
        debug_assert_eq!(slots.len(), forms.len());
        let rank = forms
            .first()
            .map(|form| form.rank())
            .unwrap_or(FormRank::Bilinear);
        let mut terms = Vec::with_capacity(forms.len());
        for (index, form) in forms.iter().enumerate() {
            if form.rank() != rank {
                return Err(Error::RankMismatch {
                    expected: rank,
                    found: form.rank(),
                });
            }
            terms.push(WeightedTerm {
                slots: slots.clone(),
                index,
                form: Rc::clone(form),
            });
        }
        Ok(Self { terms, rank })
    }

    /// Rank of the combined sum.
    pub fn rank(&self) -> FormRank {
        self.rank
    }

    /// The weighted terms, in operand order.
    pub fn terms(&self) -> &[WeightedTerm] {
        &self.terms
    }

    /// Snapshot of the current coefficient values, in term order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(WeightedTerm::coefficient).collect()
    }

    /// Add another combined sum, concatenating its weighted terms.
    ///
    /// This is the addition step that joins independent affine terms
    /// (e.g. stiffness + mass) into one deferred expression.
    pub fn merge(mut self, other: CombinedForm) -> Result<Self> {
        if other.rank != self.rank {
            return Err(Error::RankMismatch {
                expected: self.rank,
                found: other.rank,
            });
        }
        self.terms.extend(other.terms);
        Ok(self)
    }

    /// Perform the deferred assembly of a bilinear sum.
    pub fn assemble_matrix(&self, backend: &dyn AssemblyBackend) -> Result<DMatrix<f64>> {
        if self.rank != FormRank::Bilinear {
            return Err(Error::RankMismatch {
                expected: FormRank::Bilinear,
                found: self.rank,
            });
        }
        let mut output: Option<DMatrix<f64>> = None;
        for term in &self.terms {
            let assembled = backend.assemble_matrix(&term.form)?;
            let theta = term.coefficient();
            match output.as_mut() {
                None => {
                    let mut first = assembled;
                    first *= theta;
                    output = Some(first);
                }
                Some(acc) => {
                    check_matrix_shape(acc, &assembled)?;
                    acc.zip_apply(&assembled, |out, value| *out += theta * value);
                }
            }
        }
        // Empty sums cannot occur: the evaluator rejects empty operand
        // sets before a CombinedForm is ever built.
        output.ok_or(Error::DimensionMismatch {
            expected: 1,
            actual: 0,
        })
    }

    /// Perform the deferred assembly of a linear sum.
    pub fn assemble_vector(&self, backend: &dyn AssemblyBackend) -> Result<DVector<f64>> {
        if self.rank != FormRank::Linear {
            return Err(Error::RankMismatch {
                expected: FormRank::Linear,
                found: self.rank,
            });
        }
        let mut output: Option<DVector<f64>> = None;
        for term in &self.terms {
            let assembled = backend.assemble_vector(&term.form)?;
            let theta = term.coefficient();
            match output.as_mut() {
                None => {
                    let mut first = assembled;
                    first *= theta;
                    output = Some(first);
                }
                Some(acc) => {
                    if acc.len() != assembled.len() {
                        return Err(Error::DimensionMismatch {
                            expected: acc.len(),
                            actual: assembled.len(),
                        });
                    }
                    acc.axpy(theta, &assembled, 1.0);
                }
            }
        }
        output.ok_or(Error::DimensionMismatch {
            expected: 1,
            actual: 0,
        })
    }
}

fn check_matrix_shape(expected: &DMatrix<f64>, actual: &DMatrix<f64>) -> Result<()> {
    if expected.nrows() != actual.nrows() {
        return Err(Error::DimensionMismatch {
            expected: expected.nrows(),
            actual: actual.nrows(),
        });
    }
    if expected.ncols() != actual.ncols() {
        return Err(Error::DimensionMismatch {
            expected: expected.ncols(),
            actual: actual.ncols(),
        });
    }
    Ok(())
}

/// A combined symbolic sum carrying the ownership reference propagated
/// from the factory operands it was built from.
#[derive(Debug, Clone)]
pub struct CombinedFactory {
    form: CombinedForm,
    problem: ProblemId,
}

impl CombinedFactory {
    /// Wrap a combined form with its owning problem.
    pub fn new(form: CombinedForm, problem: ProblemId) -> Self {
        Self { form, problem }
    }

    /// The combined symbolic sum.
    pub fn form(&self) -> &CombinedForm {
        &self.form
    }

    /// The owning problem propagated from the operands.
    pub fn problem(&self) -> ProblemId {
        self.problem
    }

    /// Perform the deferred assembly of a bilinear sum.
    pub fn assemble_matrix(&self, backend: &dyn AssemblyBackend) -> Result<DMatrix<f64>> {
        self.form.assemble_matrix(backend)
    }

    /// Perform the deferred assembly of a linear sum.
    pub fn assemble_vector(&self, backend: &dyn AssemblyBackend) -> Result<DVector<f64>> {
        self.form.assemble_vector(backend)
    }
}
