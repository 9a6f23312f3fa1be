//! Dense reference assembly backend.
//!
//! Implements [`AssemblyBackend`] over nalgebra dense tensors: each form
//! identity maps to a registered matrix or vector, and "assembly" is a
//! lookup plus a copy. This stands in for a real finite-element library
//! in tests and benches, and shows the bridging pattern for callers that
//! assemble with an external tool and feed the results in.
//!
//! Projection of a constant constraint value is the value itself (the
//! dense backend has no basis to project against).

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use nalgebra::{DMatrix, DVector};

use rombus_core::{AssemblyBackend, Error, Form, FormId, FormRank, Result, SpaceId};

/// Assembly backend over registered dense tensors.
#[derive(Debug, Default)]
pub struct DenseBackend {
    matrices: HashMap<FormId, DMatrix<f64>>,
    vectors: HashMap<FormId, DVector<f64>>,
    assembly_count: Cell<usize>,
}

impl DenseBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the assembled value of a bilinear form.
    pub fn register_matrix(&mut self, form: &Form, matrix: DMatrix<f64>) -> Result<()> {
        if form.rank() != FormRank::Bilinear {
            return Err(Error::RankMismatch {
                expected: FormRank::Bilinear,
                found: form.rank(),
            });
        }
        self.matrices.insert(form.id(), matrix);
        Ok(())
    }

    /// Register the assembled value of a linear form.
    pub fn register_vector(&mut self, form: &Form, vector: DVector<f64>) -> Result<()> {
        if form.rank() != FormRank::Linear {
            return Err(Error::RankMismatch {
                expected: FormRank::Linear,
                found: form.rank(),
            });
        }
        self.vectors.insert(form.id(), vector);
        Ok(())
    }

    /// Create a fresh bilinear form backed by `matrix`.
    pub fn matrix_form(&mut self, matrix: DMatrix<f64>) -> Rc<Form> {
        let form = Rc::new(Form::bilinear());
        self.matrices.insert(form.id(), matrix);
        form
    }

    /// Create a fresh linear form backed by `vector`.
    pub fn vector_form(&mut self, vector: DVector<f64>) -> Rc<Form> {
        let form = Rc::new(Form::linear());
        self.vectors.insert(form.id(), vector);
        form
    }

    /// Number of assembly calls served so far.
    ///
    /// Lets tests verify that cached evaluations defer or skip assembly.
    pub fn assembly_count(&self) -> usize {
        self.assembly_count.get()
    }
}

impl AssemblyBackend for DenseBackend {
    fn assemble_matrix(&self, form: &Form) -> Result<DMatrix<f64>> {
        let matrix = self
            .matrices
            .get(&form.id())
            .ok_or(Error::UnregisteredForm(form.id()))?;
        self.assembly_count.set(self.assembly_count.get() + 1);
        Ok(matrix.clone())
    }

    fn assemble_vector(&self, form: &Form) -> Result<DVector<f64>> {
        let vector = self
            .vectors
            .get(&form.id())
            .ok_or(Error::UnregisteredForm(form.id()))?;
        self.assembly_count.set(self.assembly_count.get() + 1);
        Ok(vector.clone())
    }

    fn project(&self, value: f64, _space: SpaceId, _component: Option<usize>) -> Result<f64> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_assemble_registered_matrix() {
        let mut backend = DenseBackend::new();
        let form = backend.matrix_form(dmatrix![1.0, 0.0; 0.0, 1.0]);

        let assembled = backend.assemble_matrix(&form).unwrap();
        assert_eq!(assembled, dmatrix![1.0, 0.0; 0.0, 1.0]);
        assert_eq!(backend.assembly_count(), 1);
    }

    #[test]
    fn test_assemble_unregistered_form() {
        let backend = DenseBackend::new();
        let form = Form::bilinear();
        let result = backend.assemble_matrix(&form);
        assert!(matches!(result, Err(Error::UnregisteredForm(_))));
    }

    #[test]
    fn test_register_rank_checked() {
        let mut backend = DenseBackend::new();
        let linear = Form::linear();
        let result = backend.register_matrix(&linear, dmatrix![1.0]);
        assert!(matches!(result, Err(Error::RankMismatch { .. })));

        let bilinear = Form::bilinear();
        let result = backend.register_vector(&bilinear, dvector![1.0]);
        assert!(matches!(result, Err(Error::RankMismatch { .. })));
    }

    #[test]
    fn test_project_is_identity() {
        let backend = DenseBackend::new();
        let value = backend.project(3.5, SpaceId::new(0), Some(1)).unwrap();
        assert_eq!(value, 3.5);
    }
}
