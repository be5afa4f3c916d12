pub mod fitness;
pub mod manager;
pub mod structure;
pub mod symbols;
pub mod traits;

pub use fitness::{FitnessConfig, FitnessMethod};
pub use manager::{ConfigManager, GepConfig, IndividualConfig};
pub use structure::StructureConfig;
pub use symbols::{ConstantBinding, FunctionBinding, RangeConfig, SymbolsConfig};
pub use traits::ConfigSection;
pub use ::config::FileFormat;
