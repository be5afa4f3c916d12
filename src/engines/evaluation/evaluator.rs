use crate::{
    engines::generation::ast::{ExpressionTree, NodeId},
    error::{GepError, Result},
    functions::{ArithmeticFault, SymbolTable},
    types::{Bindings, EPHEMERAL_CONSTANT},
};

/// Hands out ephemeral constants in the order `?` leaves are reached
pub struct ErcCursor<'a> {
    constants: &'a [f64],
    next: usize,
}

impl<'a> ErcCursor<'a> {
    pub fn new(constants: &'a [f64]) -> Self {
        Self { constants, next: 0 }
    }

    pub fn next_constant(&mut self) -> Result<f64> {
        let value = self
            .constants
            .get(self.next)
            .copied()
            .ok_or(GepError::EphemeralConstantsExhausted {
                available: self.constants.len(),
            })?;
        self.next += 1;
        Ok(value)
    }

    pub fn consumed(&self) -> usize {
        self.next
    }
}

enum Fault {
    Arithmetic(ArithmeticFault),
    Fatal(GepError),
}

impl From<GepError> for Fault {
    fn from(error: GepError) -> Self {
        Fault::Fatal(error)
    }
}

/// Reduces expression trees to numbers
pub struct Evaluator<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Evaluator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Evaluate `tree` under `bindings`, drawing `?` leaves from `ephemeral_constants`.
    ///
    /// Arithmetic faults anywhere in the tree make the result NaN. Unresolvable
    /// terminals and exhausted ephemeral constants are errors.
    pub fn evaluate(
        &self,
        tree: &ExpressionTree,
        bindings: &Bindings,
        ephemeral_constants: &[f64],
    ) -> Result<f64> {
        let mut cursor = ErcCursor::new(ephemeral_constants);
        match self.reduce(tree, tree.root(), bindings, &mut cursor) {
            Ok(value) => Ok(value),
            Err(Fault::Arithmetic(fault)) => {
                log::debug!("{} evaluated to NaN: {}", tree, fault);
                Ok(f64::NAN)
            }
            Err(Fault::Fatal(error)) => Err(error),
        }
    }

    fn reduce(
        &self,
        tree: &ExpressionTree,
        id: NodeId,
        bindings: &Bindings,
        cursor: &mut ErcCursor,
    ) -> std::result::Result<f64, Fault> {
        let node = tree.node(id);

        if self.symbols.is_terminal(node.symbol) {
            return Ok(self.resolve_terminal(node.symbol, bindings, cursor)?);
        }

        let function = self.symbols.function(node.symbol).ok_or_else(|| {
            GepError::InvalidTree(format!("unknown symbol '{}'", node.symbol))
        })?;

        let mut args = Vec::with_capacity(node.children.len());
        for &child in &node.children {
            args.push(self.reduce(tree, child, bindings, cursor)?);
        }
        function.execute(&args).map_err(Fault::Arithmetic)
    }

    fn resolve_terminal(
        &self,
        symbol: char,
        bindings: &Bindings,
        cursor: &mut ErcCursor,
    ) -> Result<f64> {
        if symbol == EPHEMERAL_CONSTANT {
            return cursor.next_constant();
        }
        if let Some(value) = self.symbols.constant(symbol) {
            return Ok(value);
        }
        if let Some(digit) = symbol.to_digit(10) {
            return Ok(digit as f64);
        }
        let name = symbol.to_string();
        bindings
            .get(&name)
            .copied()
            .ok_or(GepError::UnboundVariable(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::decoder::decode;
    use crate::functions::primitives::{Add, Divide, Multiply, Sqrt, Subtract};
    use std::sync::Arc;

    fn table() -> Arc<SymbolTable> {
        SymbolTable::builder()
            .function('+', Arc::new(Add))
            .function('-', Arc::new(Subtract))
            .function('*', Arc::new(Multiply))
            .function('/', Arc::new(Divide))
            .function('Q', Arc::new(Sqrt))
            .terminals("xy2?")
            .constant('p', 3.5)
            .ephemeral_range(-1.0, 1.0)
            .head_length(3)
            .length(7)
            .num_genes(1)
            .build()
            .unwrap()
    }

    fn bindings(x: f64) -> Bindings {
        let mut b = Bindings::new();
        b.insert("x".to_string(), x);
        b
    }

    #[test]
    fn test_evaluate_variables_and_literals() {
        let symbols = table();
        let tree = decode("*x2", &symbols).unwrap();
        let value = Evaluator::new(&symbols).evaluate(&tree, &bindings(4.0), &[]).unwrap();
        assert_eq!(value, 8.0);
    }

    #[test]
    fn test_constant_takes_priority_over_bindings() {
        let symbols = table();
        let tree = decode("+px", &symbols).unwrap();
        let mut b = bindings(1.0);
        b.insert("p".to_string(), 100.0);
        let value = Evaluator::new(&symbols).evaluate(&tree, &b, &[]).unwrap();
        assert_eq!(value, 4.5);
    }

    #[test]
    fn test_ephemeral_constants_consumed_in_order() {
        let symbols = table();
        let tree = decode("-??", &symbols).unwrap();
        let evaluator = Evaluator::new(&symbols);

        let value = evaluator.evaluate(&tree, &Bindings::new(), &[0.75, 0.25, 0.5]).unwrap();
        assert_eq!(value, 0.5);

        // cursor restarts for every call
        let again = evaluator.evaluate(&tree, &Bindings::new(), &[0.75, 0.25, 0.5]).unwrap();
        assert_eq!(again, 0.5);
    }

    #[test]
    fn test_ephemeral_constants_exhausted() {
        let symbols = table();
        let tree = decode("-??", &symbols).unwrap();
        let result = Evaluator::new(&symbols).evaluate(&tree, &Bindings::new(), &[0.1]);
        assert!(matches!(
            result,
            Err(GepError::EphemeralConstantsExhausted { available: 1 })
        ));
    }

    #[test]
    fn test_division_by_zero_yields_nan() {
        let symbols = table();
        let tree = decode("/x-xx", &symbols).unwrap();
        let value = Evaluator::new(&symbols).evaluate(&tree, &bindings(3.0), &[]).unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn test_negative_sqrt_yields_nan() {
        let symbols = table();
        let tree = decode("Q-x2", &symbols).unwrap();
        let value = Evaluator::new(&symbols).evaluate(&tree, &bindings(1.0), &[]).unwrap();
        assert!(value.is_nan());

        let value = Evaluator::new(&symbols).evaluate(&tree, &bindings(6.0), &[]).unwrap();
        assert_eq!(value, 2.0);
    }

    #[test]
    fn test_unbound_variable() {
        let symbols = table();
        let tree = decode("+xy", &symbols).unwrap();
        let result = Evaluator::new(&symbols).evaluate(&tree, &bindings(1.0), &[]);
        assert!(matches!(result, Err(GepError::UnboundVariable(name)) if name == "y"));
    }

    #[test]
    fn test_cursor_counts() {
        let constants = [1.0, 2.0];
        let mut cursor = ErcCursor::new(&constants);
        assert_eq!(cursor.next_constant().unwrap(), 1.0);
        assert_eq!(cursor.consumed(), 1);
    }
}
