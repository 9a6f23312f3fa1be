//! Merging of constraint-set operands.
//!
//! Constraints from different affine terms that target the same location
//! (space, component, boundary marker) collapse into one constraint whose
//! value is the coefficient-weighted sum of the originals. Metadata comes
//! from the first constraint seen at each location.

use indexmap::IndexMap;
use std::rc::Rc;

use rombus_core::{
    AssemblyBackend, ConstraintLocation, ConstraintSet, DirichletConstraint,
};

use crate::error::Result;

struct Group {
    value: f64,
    template: DirichletConstraint,
}

/// Merge constraint-set operands under the current theta.
///
/// Output order is first-seen location order. Values targeting a proper
/// subspace are projected through the backend before the merged
/// constraint is rebuilt.
pub fn merge_constraints(
    backend: &dyn AssemblyBackend,
    thetas: &[f64],
    operators: &[Rc<ConstraintSet>],
) -> Result<ConstraintSet> {
    let mut groups: IndexMap<ConstraintLocation, Group> = IndexMap::new();

    for (theta, set) in thetas.iter().zip(operators) {
        for constraint in set.iter() {
            let group = groups.entry(constraint.location()).or_insert_with(|| Group {
                value: 0.0,
                template: constraint.clone(),
            });
            group.value += theta * constraint.value;
        }
    }

    let mut merged = ConstraintSet::with_capacity(groups.len());
    for (location, group) in groups {
        let value = match location.component {
            Some(component) => backend.project(group.value, location.space, Some(component))?,
            None => group.value,
        };
        let mut constraint = group.template;
        constraint.value = value;
        merged.push(constraint);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rombus_core::{ConstraintMethod, Error as CoreError, Form, SpaceId};

    /// Backend stub: projection scales by 0.5 so tests can observe it.
    struct HalvingBackend;

    impl AssemblyBackend for HalvingBackend {
        fn assemble_matrix(&self, form: &Form) -> rombus_core::Result<nalgebra::DMatrix<f64>> {
            Err(CoreError::UnregisteredForm(form.id()))
        }

        fn assemble_vector(&self, form: &Form) -> rombus_core::Result<nalgebra::DVector<f64>> {
            Err(CoreError::UnregisteredForm(form.id()))
        }

        fn project(
            &self,
            value: f64,
            _space: SpaceId,
            _component: Option<usize>,
        ) -> rombus_core::Result<f64> {
            Ok(0.5 * value)
        }
    }

    #[test]
    fn test_shared_location_weighted_sum() {
        // v1 = 1.0, v2 = 2.0, theta = [2.0, 3.0] -> 2*1 + 3*2 = 8
        let space = SpaceId::new(0);
        let a = Rc::new(vec![DirichletConstraint::new(space, 1, 1.0)]);
        let b = Rc::new(vec![DirichletConstraint::new(space, 1, 2.0)]);

        let merged = merge_constraints(&HalvingBackend, &[2.0, 3.0], &[a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((merged[0].value - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_distinct_locations_stay_separate() {
        let space = SpaceId::new(0);
        let a = Rc::new(vec![
            DirichletConstraint::new(space, 1, 1.0),
            DirichletConstraint::new(space, 2, 4.0),
        ]);
        let b = Rc::new(vec![DirichletConstraint::new(space, 1, 2.0)]);

        let merged = merge_constraints(&HalvingBackend, &[1.0, 1.0], &[a, b]).unwrap();
        assert_eq!(merged.len(), 2);
        // First-seen order: boundary 1, then boundary 2.
        assert_eq!(merged[0].boundary, 1);
        assert!((merged[0].value - 3.0).abs() < 1e-12);
        assert_eq!(merged[1].boundary, 2);
        assert!((merged[1].value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_subspace_values_are_projected() {
        let space = SpaceId::new(0);
        let a = Rc::new(vec![DirichletConstraint::new(space, 1, 4.0).on_component(0)]);

        let merged = merge_constraints(&HalvingBackend, &[1.0], &[a]).unwrap();
        assert!((merged[0].value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_metadata_comes_from_first_constraint() {
        let space = SpaceId::new(0);
        let a = Rc::new(vec![
            DirichletConstraint::new(space, 1, 1.0).with_method(ConstraintMethod::Geometric),
        ]);
        let b = Rc::new(vec![
            DirichletConstraint::new(space, 1, 2.0).with_method(ConstraintMethod::Pointwise),
        ]);

        let merged = merge_constraints(&HalvingBackend, &[1.0, 1.0], &[a, b]).unwrap();
        assert_eq!(merged[0].method, ConstraintMethod::Geometric);
    }
}
