pub mod cache;
pub mod evaluator;

pub use cache::EvaluationCache;
pub use evaluator::{ErcCursor, Evaluator};
