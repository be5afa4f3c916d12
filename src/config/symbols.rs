use super::traits::{single_symbol, ConfigSection};
use crate::error::GepError;
use crate::functions::{FunctionRegistry, SymbolTableBuilder};
use serde::{Deserialize, Serialize};

/// Gene symbol bound to a built-in primitive, e.g. `+` → `add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBinding {
    pub symbol: String,
    pub primitive: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantBinding {
    pub symbol: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolsConfig {
    pub functions: Vec<FunctionBinding>,
    /// Every character is one terminal symbol
    pub terminals: String,
    #[serde(default)]
    pub constants: Vec<ConstantBinding>,
    #[serde(default)]
    pub ephemeral_range: Option<RangeConfig>,
    #[serde(default)]
    pub linking_function: Option<String>,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        let binding = |symbol: &str, primitive: &str| FunctionBinding {
            symbol: symbol.to_string(),
            primitive: primitive.to_string(),
        };
        Self {
            functions: vec![
                binding("+", "add"),
                binding("-", "subtract"),
                binding("*", "multiply"),
                binding("/", "divide"),
            ],
            terminals: "x".to_string(),
            constants: Vec::new(),
            ephemeral_range: None,
            linking_function: Some("+".to_string()),
        }
    }
}

impl SymbolsConfig {
    /// Resolve primitives through `registry` and load everything into `builder`
    pub fn apply(
        &self,
        registry: &FunctionRegistry,
        mut builder: SymbolTableBuilder,
    ) -> Result<SymbolTableBuilder, GepError> {
        for binding in &self.functions {
            let symbol = single_symbol("functions", &binding.symbol)?;
            let primitive = registry.get_primitive(&binding.primitive).ok_or_else(|| {
                GepError::Configuration(format!(
                    "Unknown primitive '{}' (available: {})",
                    binding.primitive,
                    registry.aliases().join(", ")
                ))
            })?;
            builder = builder.function(symbol, primitive);
        }

        builder = builder.terminals(&self.terminals);
        for constant in &self.constants {
            builder = builder.constant(single_symbol("constants", &constant.symbol)?, constant.value);
        }
        if let Some(range) = self.ephemeral_range {
            builder = builder.ephemeral_range(range.min, range.max);
        }
        if let Some(linking) = &self.linking_function {
            builder = builder.linking_function(single_symbol("linking_function", linking)?);
        }
        Ok(builder)
    }
}

impl ConfigSection for SymbolsConfig {
    fn section_name() -> &'static str {
        "symbols"
    }

    fn validate(&self) -> Result<(), GepError> {
        if self.functions.is_empty() {
            return Err(GepError::Configuration(
                "At least one function must be defined".to_string()
            ));
        }
        if self.terminals.is_empty() {
            return Err(GepError::Configuration(
                "At least one terminal must be defined".to_string()
            ));
        }
        for binding in &self.functions {
            single_symbol("functions", &binding.symbol)?;
        }
        for constant in &self.constants {
            single_symbol("constants", &constant.symbol)?;
        }
        if let Some(linking) = &self.linking_function {
            single_symbol("linking_function", linking)?;
        }
        if let Some(range) = self.ephemeral_range {
            if range.min > range.max {
                return Err(GepError::Configuration(
                    "Ephemeral range minimum must not exceed its maximum".to_string()
                ));
            }
        }
        Ok(())
    }
}
