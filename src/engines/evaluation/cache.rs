use crate::types::{BindingFingerprint, Bindings};
use std::collections::HashMap;

/// Results of one chromosome keyed by the exact bindings they were computed for.
///
/// Entries are never evicted; NaN results are cached like any other value.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCache {
    data: HashMap<BindingFingerprint, f64>,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &BindingFingerprint) -> Option<f64> {
        self.data.get(key).copied()
    }

    pub fn get_bindings(&self, bindings: &Bindings) -> Option<f64> {
        self.get(&BindingFingerprint::of(bindings))
    }

    pub fn set(&mut self, key: BindingFingerprint, value: f64) {
        self.data.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
