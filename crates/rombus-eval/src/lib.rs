//! Affine expansion evaluation engine.
//!
//! Evaluates Σ θᵢ(μ)·Opᵢ for the affine decompositions of parametrized
//! PDE problems: the computational hot path hit at every parameter sample
//! during offline training and at every online query. Pre-assembled
//! operands are summed eagerly; still-symbolic operands are combined into
//! a cached expression whose coefficients are rewritten in place on every
//! later evaluation, so the expensive assembly step is deferred and never
//! repeated per parameter point.

pub mod classify;
pub mod constraints;
pub mod eager;
pub mod error;
pub mod evaluate;
pub mod lazy;
pub mod mixed;
pub mod problem;
pub mod result;
pub mod sum;

pub use classify::{classify, OperandKind};
pub use constraints::merge_constraints;
pub use eager::{sum_matrices, sum_scalars, sum_vectors};
pub use error::{Error, Result};
pub use evaluate::ExpansionEvaluator;
pub use lazy::ExpansionCache;
pub use mixed::promote_and_sum;
pub use problem::{ExpansionConfig, TermConfig, ThetaProvider};
pub use result::EvaluationResult;
pub use sum::sum_results;
