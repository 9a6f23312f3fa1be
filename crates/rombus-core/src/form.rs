//! Symbolic operator forms and their identities.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_FORM_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a symbolic form.
///
/// Allocated once per [`Form`] from a process-wide counter. Two forms are
/// the same operand for caching purposes only if they carry the same id;
/// structurally equal but separately constructed forms are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(u64);

impl FormId {
    fn fresh() -> Self {
        FormId(NEXT_FORM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rank of a form: what it assembles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormRank {
    /// Assembles to a matrix (e.g., a stiffness or mass operator).
    Bilinear,
    /// Assembles to a vector (e.g., a load term).
    Linear,
}

impl fmt::Display for FormRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormRank::Bilinear => write!(f, "bilinear"),
            FormRank::Linear => write!(f, "linear"),
        }
    }
}

/// A not-yet-assembled symbolic operator expression.
///
/// The numeric content lives in the finite-element backend; rombus sees
/// only the identity and the rank. Forms are shared as `Rc<Form>` between
/// the owning problem, the expansion storage, and cached combinations.
#[derive(Debug)]
pub struct Form {
    id: FormId,
    rank: FormRank,
    name: Option<String>,
}

impl Form {
    /// Create a new form of the given rank.
    pub fn new(rank: FormRank) -> Self {
        Self {
            id: FormId::fresh(),
            rank,
            name: None,
        }
    }

    /// Create a new bilinear (matrix-valued) form.
    pub fn bilinear() -> Self {
        Self::new(FormRank::Bilinear)
    }

    /// Create a new linear (vector-valued) form.
    pub fn linear() -> Self {
        Self::new(FormRank::Linear)
    }

    /// Attach a human-readable name (for diagnostics only).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Get the form's identity.
    pub fn id(&self) -> FormId {
        self.id
    }

    /// Get the form's rank.
    pub fn rank(&self) -> FormRank {
        self.rank
    }

    /// Get the form's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({} {})", name, self.rank, self.id),
            None => write!(f, "{} {}", self.rank, self.id),
        }
    }
}
