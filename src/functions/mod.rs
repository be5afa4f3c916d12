pub mod primitives;
pub mod registry;
pub mod symbols;
pub mod traits;

pub use registry::FunctionRegistry;
pub use symbols::{SymbolTable, SymbolTableBuilder};
pub use traits::{ArithmeticFault, Primitive};
