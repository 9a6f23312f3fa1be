//! Core data types for rombus: affine operators, symbolic forms,
//! constraint sets, coefficient slots, expansion storage, and the
//! assembly-backend seam.
//!
//! This crate defines what an affine decomposition Σ θᵢ(μ)·Opᵢ is made
//! of; the evaluation engine lives in `rombus-eval` and numeric assembly
//! in backend crates.

pub mod backend;
pub mod coefficients;
pub mod constraint;
pub mod error;
pub mod form;
pub mod operator;
pub mod storage;

pub use backend::AssemblyBackend;
pub use coefficients::CoefficientSlots;
pub use constraint::{
    ConstraintLocation, ConstraintMethod, ConstraintSet, DirichletConstraint, SpaceId,
};
pub use error::{Error, Result};
pub use form::{Form, FormId, FormRank};
pub use operator::{
    AffineOperator, CombinedFactory, CombinedForm, ProblemId, TensorFactory, WeightedTerm,
};
pub use storage::AffineExpansionStorage;
