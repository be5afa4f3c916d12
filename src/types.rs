use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values assigned to named terminals for one evaluation
pub type Bindings = HashMap<String, f64>;

/// Symbol that marks an ephemeral random constant inside a gene
pub const EPHEMERAL_CONSTANT: char = '?';

/// One (input bindings, expected output) pair used for scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessCase {
    pub bindings: Bindings,
    pub target: f64,
}

impl FitnessCase {
    pub fn new(bindings: Bindings, target: f64) -> Self {
        Self { bindings, target }
    }

    /// Convenience for the common single-variable case
    pub fn single(name: &str, value: f64, target: f64) -> Self {
        let mut bindings = Bindings::new();
        bindings.insert(name.to_string(), value);
        Self { bindings, target }
    }
}

/// Cache key for a set of bindings.
///
/// Pairs are sorted by name and values compared by their exact bit pattern, so
/// `0.0` and `-0.0` are distinct keys and a NaN binding matches only itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingFingerprint(Vec<(String, u64)>);

impl BindingFingerprint {
    pub fn of(bindings: &Bindings) -> Self {
        let mut pairs: Vec<(String, u64)> = bindings
            .iter()
            .map(|(name, value)| (name.clone(), value.to_bits()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        Self(pairs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Summary of one scored chromosome, as printed by the binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromosomeReport {
    pub genes: Vec<String>,
    pub formula: String,
    pub fitness: Option<f64>,
    pub ephemeral_constants: Vec<f64>,
}
