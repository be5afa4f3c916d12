pub mod evaluation;
pub mod fitness;
pub mod generation;
