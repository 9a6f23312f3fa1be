//! The assembly seam to an external finite-element backend.
//!
//! rombus never discretizes anything itself: turning a symbolic form into
//! a numeric tensor, and projecting constraint values onto subspaces, is
//! delegated through [`AssemblyBackend`]. Backend crates (or bridges to a
//! real finite-element library) implement this trait.

use nalgebra::{DMatrix, DVector};

use crate::constraint::SpaceId;
use crate::error::Result;
use crate::form::Form;

/// Assembly and projection operations provided by a finite-element
/// backend.
///
/// Assembly is the dominant cost in the pipeline; the evaluation engine
/// calls into it as late as possible (possibly never, when symbolic sums
/// are combined further before a single final assembly).
pub trait AssemblyBackend {
    /// Assemble a bilinear form into a dense matrix.
    fn assemble_matrix(&self, form: &Form) -> Result<DMatrix<f64>>;

    /// Assemble a linear form into a dense vector.
    fn assemble_vector(&self, form: &Form) -> Result<DVector<f64>>;

    /// Project a constant constraint value onto a (sub)space.
    ///
    /// `component` is `Some` when the target is a proper subspace of
    /// `space`.
    fn project(&self, value: f64, space: SpaceId, component: Option<usize>) -> Result<f64>;
}
