//! # rombus
//!
//! Reduced-order modeling of parametrized problems: evaluate affine
//! expansions Σ θᵢ(μ)·Opᵢ cheaply and repeatedly as the parameter varies.
//!
//! Pre-assembled operators are summed eagerly; still-symbolic operators
//! are combined into a cached expression whose coefficients are rewritten
//! in place on every later evaluation, deferring the expensive assembly
//! step as long as possible.
//!
//! ## Quick Start
//!
//! ```rust
//! use rombus::prelude::*;
//! use std::rc::Rc;
//!
//! // Two pre-assembled affine terms of a reduced operator.
//! let storage = AffineExpansionStorage::from_operators(vec![
//!     AffineOperator::Matrix(Rc::new(DMatrix::identity(3, 3))),
//!     AffineOperator::Matrix(Rc::new(DMatrix::identity(3, 3) * 2.0)),
//! ]);
//!
//! let backend = DenseBackend::new();
//! let mut evaluator = ExpansionEvaluator::new();
//!
//! // theta = [2, 3] -> 2·I + 3·2·I = 8·I
//! let result = evaluator.evaluate(&backend, &[2.0, 3.0], &storage).unwrap();
//! assert_eq!(result.as_matrix().unwrap()[(0, 0)], 8.0);
//! ```

// Re-export member crates
pub use rombus_backend_dense as backend_dense;
pub use rombus_core as core;
pub use rombus_eval as eval;

// ============================================================================
// Convenient re-exports from rombus_core
// ============================================================================

pub use rombus_core::{
    // Operators
    AffineExpansionStorage,
    AffineOperator,
    // Backend seam
    AssemblyBackend,
    CoefficientSlots,
    CombinedFactory,
    CombinedForm,
    // Constraints
    ConstraintMethod,
    ConstraintSet,
    DirichletConstraint,
    // Errors
    Error as CoreError,
    // Forms
    Form,
    FormId,
    FormRank,
    ProblemId,
    SpaceId,
    TensorFactory,
};

// ============================================================================
// Convenient re-exports from rombus_eval
// ============================================================================

pub use rombus_eval::{
    classify,
    merge_constraints,
    promote_and_sum,
    sum_matrices,
    sum_results,
    sum_scalars,
    sum_vectors,
    // Errors
    Error as EvalError,
    EvaluationResult,
    // Configuration
    ExpansionConfig,
    // The engine
    ExpansionEvaluator,
    OperandKind,
    TermConfig,
    ThetaProvider,
};

// ============================================================================
// Convenient re-exports from rombus_backend_dense
// ============================================================================

pub use rombus_backend_dense::DenseBackend;

// ============================================================================
// Re-export commonly used external types
// ============================================================================

/// Re-export of nalgebra's dynamic matrix type.
pub use nalgebra::DMatrix;

/// Re-export of nalgebra's dynamic vector type.
pub use nalgebra::DVector;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types and traits.
///
/// ```rust
/// use rombus::prelude::*;
/// ```
pub mod prelude {
    // Operators and storage
    pub use crate::{AffineExpansionStorage, AffineOperator, Form, FormRank, TensorFactory};

    // The engine
    pub use crate::{EvaluationResult, ExpansionEvaluator, OperandKind};

    // Backend seam
    pub use crate::{AssemblyBackend, DenseBackend};

    // Constraints
    pub use crate::{ConstraintSet, DirichletConstraint, SpaceId};

    // Problem glue
    pub use crate::{ExpansionConfig, ProblemId, TermConfig, ThetaProvider};

    // Common external types
    pub use crate::{DMatrix, DVector};
}
