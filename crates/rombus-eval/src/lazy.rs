//! Lazy combination of symbolic operands with identity-keyed caching.
//!
//! The algorithmic core of the engine. Assembly is the dominant cost in
//! the pipeline, so symbolic operands are never assembled here: a first
//! evaluation builds one coefficient slot per operand and a single
//! deferred sum Σ slotᵢ·formᵢ; every later evaluation of the same operand
//! identity only rewrites the slot values in place. The expression tree is
//! built once per operand-set identity for the lifetime of the cache.

use std::collections::HashMap;
use std::rc::Rc;

use rombus_core::{
    CoefficientSlots, CombinedFactory, CombinedForm, Form, FormId, TensorFactory,
};

use crate::error::{Error, Result};

/// Identity-keyed cache of combined symbolic sums.
///
/// One cache per problem instance: it is mutable shared state meant for
/// sequential reuse by one logical owner, not for concurrent mutation.
#[derive(Debug, Default)]
pub struct ExpansionCache {
    forms: HashMap<Vec<FormId>, CachedCombination>,
    factories: HashMap<Vec<FormId>, CachedFactory>,
}

#[derive(Debug)]
struct CachedCombination {
    slots: CoefficientSlots,
    combined: CombinedForm,
}

#[derive(Debug)]
struct CachedFactory {
    slots: CoefficientSlots,
    combined: CombinedFactory,
}

impl ExpansionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine symbolic forms under the current theta.
    ///
    /// Cache hit: overwrite the stored coefficient slots and return the
    /// already-built expression. Cache miss: build slots and expression,
    /// store them under the operand identity, return the expression.
    pub fn combine_forms(&mut self, thetas: &[f64], forms: &[Rc<Form>]) -> Result<CombinedForm> {
        let (_, combined) = self.form_entry(thetas, forms)?;
        Ok(combined)
    }

    /// Combine operator factories under the current theta.
    ///
    /// Beyond the form path, verifies that every factory references the
    /// same owning problem and propagates that ownership onto the result.
    /// The cached factory entry shares its slot array with the form-level
    /// entry for the same operand identity, so either path rewrites the
    /// coefficients both observe.
    pub fn combine_factories(
        &mut self,
        thetas: &[f64],
        factories: &[Rc<TensorFactory>],
    ) -> Result<CombinedFactory> {
        let problem = factories[0].problem();
        for factory in &factories[1..] {
            if factory.problem() != problem {
                return Err(Error::InconsistentOwnership {
                    expected: problem,
                    found: factory.problem(),
                });
            }
        }

        let forms: Vec<Rc<Form>> = factories
            .iter()
            .map(|factory| Rc::clone(factory.form()))
            .collect();
        let key: Vec<FormId> = forms.iter().map(|form| form.id()).collect();

        if let Some(entry) = self.factories.get(&key) {
            entry.slots.assign(thetas);
            return Ok(entry.combined.clone());
        }

        let (slots, form) = self.form_entry(thetas, &forms)?;
        let combined = CombinedFactory::new(form, problem);
        self.factories.insert(
            key,
            CachedFactory {
                slots,
                combined: combined.clone(),
            },
        );
        Ok(combined)
    }

    /// Number of cached form combinations (diagnostics).
    pub fn form_entries(&self) -> usize {
        self.forms.len()
    }

    /// Number of cached factory combinations (diagnostics).
    pub fn factory_entries(&self) -> usize {
        self.factories.len()
    }

    fn form_entry(
        &mut self,
        thetas: &[f64],
        forms: &[Rc<Form>],
    ) -> Result<(CoefficientSlots, CombinedForm)> {
        let key: Vec<FormId> = forms.iter().map(|form| form.id()).collect();

        if let Some(entry) = self.forms.get(&key) {
            entry.slots.assign(thetas);
            return Ok((entry.slots.clone(), entry.combined.clone()));
        }

        let slots = CoefficientSlots::from_thetas(thetas);
        let combined = CombinedForm::new(&slots, forms)?;
        self.forms.insert(
            key,
            CachedCombination {
                slots: slots.clone(),
                combined: combined.clone(),
            },
        );
        Ok((slots, combined))
    }
}
