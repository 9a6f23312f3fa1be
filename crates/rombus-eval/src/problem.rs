//! Problem-side glue: per-term configuration and theta providers.
//!
//! A truth or reduced problem owns one expansion storage per term name
//! ("a", "f", ...) and recomputes a theta vector whenever the parameter
//! changes. The orchestration layer above the evaluator keeps a
//! configuration map describing the terms it expects; asking for an
//! unconfigured term is caller misuse and fails fast.

use std::collections::HashMap;

use rombus_core::AffineExpansionStorage;

use crate::error::{Error, Result};

/// Per-term settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermConfig {
    /// Number of affine terms (Q) in the term's decomposition.
    pub q: usize,
}

impl TermConfig {
    /// Create a config expecting `q` affine terms.
    pub fn new(q: usize) -> Self {
        Self { q }
    }
}

/// Configuration map from term name to [`TermConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExpansionConfig {
    terms: HashMap<String, TermConfig>,
}

impl ExpansionConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a term.
    pub fn insert(&mut self, name: impl Into<String>, config: TermConfig) {
        self.terms.insert(name.into(), config);
    }

    /// Look up a required term's configuration.
    pub fn term(&self, name: &str) -> Result<&TermConfig> {
        self.terms
            .get(name)
            .ok_or_else(|| Error::MissingConfiguration(name.to_string()))
    }

    /// Check a theta vector against a term's configured length.
    pub fn check_theta(&self, name: &str, thetas: &[f64]) -> Result<()> {
        let config = self.term(name)?;
        if thetas.len() != config.q {
            return Err(Error::ShapeMismatch {
                thetas: thetas.len(),
                operators: config.q,
            });
        }
        Ok(())
    }

    /// Check a storage against a term's configured length.
    pub fn check_storage(&self, name: &str, storage: &AffineExpansionStorage) -> Result<()> {
        let config = self.term(name)?;
        if storage.len() != config.q {
            return Err(Error::ShapeMismatch {
                thetas: config.q,
                operators: storage.len(),
            });
        }
        Ok(())
    }

    /// Iterate over configured term names.
    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

/// Parameter-dependent coefficient computation, one vector per term name.
///
/// This is the fixed interface capability wrappers compose over: a
/// wrapper can override `compute_theta` for selected terms and delegate
/// the rest to the problem it decorates.
pub trait ThetaProvider {
    /// Compute the theta vector for `term` at the current parameter.
    fn compute_theta(&self, term: &str) -> Result<Vec<f64>>;
}
