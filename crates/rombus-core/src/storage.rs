//! Ordered storage for the terms of an affine expansion.
//!
//! A problem owns one storage per term name (e.g. `"a"`, `"f"`); the
//! evaluation engine only iterates and indexes it. Numeric operand kinds
//! round-trip through JSON files; symbolic kinds are rebuilt by the
//! problem on every run and refuse to persist.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::rc::Rc;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::constraint::ConstraintSet;
use crate::error::{Error, Result};
use crate::operator::AffineOperator;

/// An ordered, indexable container of affine operators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffineExpansionStorage {
    content: Vec<AffineOperator>,
}

impl AffineExpansionStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage from an ordered operator list.
    pub fn from_operators(content: Vec<AffineOperator>) -> Self {
        Self { content }
    }

    /// Append an operator.
    pub fn push(&mut self, operator: AffineOperator) {
        self.content.push(operator);
    }

    /// Get the operator at `index`.
    pub fn get(&self, index: usize) -> Option<&AffineOperator> {
        self.content.get(index)
    }

    /// Replace the operator at `index`.
    pub fn set(&mut self, index: usize, operator: AffineOperator) -> Result<()> {
        let len = self.content.len();
        match self.content.get_mut(index) {
            Some(slot) => {
                *slot = operator;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds { index, len }),
        }
    }

    /// Number of affine terms.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the storage holds no terms.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterate over the operators in term order.
    pub fn iter(&self) -> std::slice::Iter<'_, AffineOperator> {
        self.content.iter()
    }

    /// The operators as a slice.
    pub fn as_slice(&self) -> &[AffineOperator] {
        &self.content
    }

    /// Write the storage to `directory/filename` as JSON.
    ///
    /// Only numeric operand kinds persist; saving a storage holding
    /// symbolic forms or factories fails with
    /// [`Error::UnsupportedPersistence`].
    pub fn save(&self, directory: &Path, filename: &str) -> Result<()> {
        let stored: Vec<StoredOperator> = self
            .content
            .iter()
            .map(StoredOperator::try_from_operator)
            .collect::<Result<_>>()?;
        let file = File::create(directory.join(filename))?;
        serde_json::to_writer(BufWriter::new(file), &stored)?;
        Ok(())
    }

    /// Read a storage previously written by [`save`](Self::save).
    pub fn load(directory: &Path, filename: &str) -> Result<Self> {
        let file = File::open(directory.join(filename))?;
        let stored: Vec<StoredOperator> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self {
            content: stored.into_iter().map(StoredOperator::into_operator).collect(),
        })
    }
}

impl<'a> IntoIterator for &'a AffineExpansionStorage {
    type Item = &'a AffineOperator;
    type IntoIter = std::slice::Iter<'a, AffineOperator>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}

/// Persisted form of a numeric affine operator.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StoredOperator {
    Matrix { tensor: DMatrix<f64> },
    Vector { tensor: DVector<f64> },
    Scalar { value: f64 },
    Constraints { constraints: ConstraintSet },
}

impl StoredOperator {
    fn try_from_operator(operator: &AffineOperator) -> Result<Self> {
        match operator {
            AffineOperator::Matrix(tensor) => Ok(StoredOperator::Matrix {
                tensor: (**tensor).clone(),
            }),
            AffineOperator::Vector(tensor) => Ok(StoredOperator::Vector {
                tensor: (**tensor).clone(),
            }),
            AffineOperator::Scalar(value) => Ok(StoredOperator::Scalar { value: *value }),
            AffineOperator::Constraints(constraints) => Ok(StoredOperator::Constraints {
                constraints: (**constraints).clone(),
            }),
            AffineOperator::Form(_) | AffineOperator::Factory(_) => {
                Err(Error::UnsupportedPersistence(operator.kind_name()))
            }
        }
    }

    fn into_operator(self) -> AffineOperator {
        match self {
            StoredOperator::Matrix { tensor } => AffineOperator::Matrix(Rc::new(tensor)),
            StoredOperator::Vector { tensor } => AffineOperator::Vector(Rc::new(tensor)),
            StoredOperator::Scalar { value } => AffineOperator::Scalar(value),
            StoredOperator::Constraints { constraints } => {
                AffineOperator::Constraints(Rc::new(constraints))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{DirichletConstraint, SpaceId};
    use crate::form::Form;
    use nalgebra::{dmatrix, dvector};

    #[test]
    fn test_get_set_len() {
        let mut storage = AffineExpansionStorage::new();
        storage.push(AffineOperator::Scalar(1.0));
        storage.push(AffineOperator::Scalar(2.0));
        assert_eq!(storage.len(), 2);

        storage.set(1, AffineOperator::Scalar(5.0)).unwrap();
        assert_eq!(storage.get(1), Some(&AffineOperator::Scalar(5.0)));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut storage = AffineExpansionStorage::new();
        let result = storage.set(0, AffineOperator::Scalar(1.0));
        assert!(matches!(result, Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let constraints = vec![DirichletConstraint::new(SpaceId::new(0), 1, 3.5)];
        let storage = AffineExpansionStorage::from_operators(vec![
            AffineOperator::Matrix(Rc::new(dmatrix![1.0, 2.0; 3.0, 4.0])),
            AffineOperator::Vector(Rc::new(dvector![1.0, -1.0])),
            AffineOperator::Scalar(0.25),
            AffineOperator::Constraints(Rc::new(constraints)),
        ]);

        storage.save(dir.path(), "term_a.json").unwrap();
        let loaded = AffineExpansionStorage::load(dir.path(), "term_a.json").unwrap();
        assert_eq!(loaded, storage);
    }

    #[test]
    fn test_save_refuses_symbolic_operands() {
        let dir = tempfile::tempdir().unwrap();
        let storage = AffineExpansionStorage::from_operators(vec![AffineOperator::Form(Rc::new(
            Form::bilinear(),
        ))]);

        let result = storage.save(dir.path(), "term.json");
        assert!(matches!(result, Err(Error::UnsupportedPersistence("form"))));
    }
}
