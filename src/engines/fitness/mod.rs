pub mod scorers;

pub use scorers::{
    AbsoluteFitness, CentralizedInverseSquaredError, FitnessFunction, InverseSquaredError,
    RelativeFitness,
};
