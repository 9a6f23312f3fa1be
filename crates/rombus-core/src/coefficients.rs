//! Mutable coefficient slots shared between cached combinations.

use std::cell::RefCell;
use std::rc::Rc;

/// A shared array of scalar coefficient slots.
///
/// One slot per operand of a cached combination. A cache hit overwrites
/// every slot in place; combined expressions hold `(slots, index)` pairs
/// into this array instead of embedding mutable cells, so the values seen
/// at assembly time are always the ones from the most recent evaluation.
///
/// Sharing is by `Rc`: the engine is single-threaded by contract and the
/// slots live exactly as long as the cache entry that created them.
#[derive(Debug, Clone, Default)]
pub struct CoefficientSlots {
    values: Rc<RefCell<Vec<f64>>>,
}

impl CoefficientSlots {
    /// Create slots initialized from a theta vector.
    pub fn from_thetas(thetas: &[f64]) -> Self {
        Self {
            values: Rc::new(RefCell::new(thetas.to_vec())),
        }
    }

    /// Overwrite every slot in place with a new theta vector.
    ///
    /// The caller guarantees the lengths match; the evaluator checks theta
    /// length against the operand count before any cache lookup.
    pub fn assign(&self, thetas: &[f64]) {
        let mut values = self.values.borrow_mut();
        debug_assert_eq!(values.len(), thetas.len());
        values.copy_from_slice(thetas);
    }

    /// Read the coefficient at `index`.
    pub fn value(&self, index: usize) -> f64 {
        self.values.borrow()[index]
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// Copy out the current coefficient values.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_thetas() {
        let slots = CoefficientSlots::from_thetas(&[1.0, 2.0, 3.0]);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots.value(1), 2.0);
    }

    #[test]
    fn test_assign_rewrites_in_place() {
        let slots = CoefficientSlots::from_thetas(&[1.0, 2.0]);
        let alias = slots.clone();
        slots.assign(&[5.0, 6.0]);
        // Clones share the same underlying array.
        assert_eq!(alias.snapshot(), vec![5.0, 6.0]);
    }
}
