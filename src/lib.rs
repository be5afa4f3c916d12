//! Gene Expression Programming chromosomes.
//!
//! Linear genes decode into expression trees, multigenic chromosomes are linked
//! into a single tree, and fitness scorers evaluate that tree over a fixed set of
//! fitness cases. The evolutionary loop driving selection and variation lives
//! outside this crate.

pub mod chromosome;
pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use chromosome::Chromosome;
pub use engines::evaluation::Evaluator;
pub use engines::fitness::{
    AbsoluteFitness, CentralizedInverseSquaredError, FitnessFunction, InverseSquaredError,
    RelativeFitness,
};
pub use engines::generation::{decode, link, ExpressionTree, GeneDecoder};
pub use error::{GepError, Result};
pub use functions::{FunctionRegistry, Primitive, SymbolTable};
pub use types::{Bindings, FitnessCase};
