//! Dirichlet-type constraint sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a function space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceId(u32);

impl SpaceId {
    /// Create a new SpaceId from a raw value.
    pub fn new(id: u32) -> Self {
        SpaceId(id)
    }

    /// Get the raw space id value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// How a constraint locates its boundary degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintMethod {
    #[default]
    Topological,
    Geometric,
    Pointwise,
}

/// Location key for constraint merging.
///
/// Constraints sharing a location (same space, same component, same
/// boundary marker) are merged into a single constraint with a
/// coefficient-weighted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintLocation {
    pub space: SpaceId,
    pub component: Option<usize>,
    pub boundary: u32,
}

/// A single Dirichlet-type boundary constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirichletConstraint {
    /// Target function space.
    pub space: SpaceId,
    /// Component index when the target is a proper subspace.
    pub component: Option<usize>,
    /// Boundary marker the constraint applies to.
    pub boundary: u32,
    /// Constrained value.
    pub value: f64,
    /// Degree-of-freedom location method.
    pub method: ConstraintMethod,
}

impl DirichletConstraint {
    /// Create a constraint on a full space with the default method.
    pub fn new(space: SpaceId, boundary: u32, value: f64) -> Self {
        Self {
            space,
            component: None,
            boundary,
            value,
            method: ConstraintMethod::default(),
        }
    }

    /// Restrict the constraint to a subspace component.
    pub fn on_component(mut self, component: usize) -> Self {
        self.component = Some(component);
        self
    }

    /// Set the degree-of-freedom location method.
    pub fn with_method(mut self, method: ConstraintMethod) -> Self {
        self.method = method;
        self
    }

    /// The location key this constraint merges under.
    pub fn location(&self) -> ConstraintLocation {
        ConstraintLocation {
            space: self.space,
            component: self.component,
            boundary: self.boundary,
        }
    }
}

/// An ordered set of constraints: one affine term's worth of boundary
/// conditions.
pub type ConstraintSet = Vec<DirichletConstraint>;
