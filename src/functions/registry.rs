use crate::functions::{
    primitives::{Abs, Add, Cos, Divide, Exp, Ln, Max, Min, Multiply, Negate, Power, Sin, Sqrt, Subtract},
    traits::Primitive,
};
use std::{collections::HashMap, sync::Arc};

/// Built-in primitives addressable by alias, used when functions come from configuration
pub struct FunctionRegistry {
    primitives: HashMap<String, Arc<dyn Primitive>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            primitives: HashMap::new(),
        };
        registry.register_primitives();
        registry
    }

    pub fn get_primitive(&self, alias: &str) -> Option<Arc<dyn Primitive>> {
        self.primitives.get(alias).cloned()
    }

    /// Add or replace a primitive under its own alias
    pub fn register(&mut self, primitive: Arc<dyn Primitive>) {
        self.primitives.insert(primitive.alias().to_string(), primitive);
    }

    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.primitives.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    fn register_primitives(&mut self) {
        let primitives: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(Add),
            Arc::new(Subtract),
            Arc::new(Multiply),
            Arc::new(Divide),
            Arc::new(Power),
            Arc::new(Min),
            Arc::new(Max),
            Arc::new(Sqrt),
            Arc::new(Abs),
            Arc::new(Negate),
            Arc::new(Exp),
            Arc::new(Ln),
            Arc::new(Sin),
            Arc::new(Cos),
        ];
        for primitive in primitives {
            self.register(primitive);
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::primitives::FnPrimitive;

    #[test]
    fn test_registry_primitive_retrieval() {
        let registry = FunctionRegistry::new();
        let divide = registry.get_primitive("divide");
        assert!(divide.is_some());
        assert_eq!(divide.unwrap().arity(), 2);
    }

    #[test]
    fn test_primitive_not_found() {
        let registry = FunctionRegistry::new();
        assert!(registry.get_primitive("NonExistent").is_none());
    }

    #[test]
    fn test_register_custom() {
        let mut registry = FunctionRegistry::new();
        registry.register(Arc::new(FnPrimitive::new("avg3", 3, |a| Ok((a[0] + a[1] + a[2]) / 3.0))));
        assert_eq!(registry.get_primitive("avg3").unwrap().arity(), 3);
        assert!(registry.aliases().contains(&"avg3"));
    }
}
