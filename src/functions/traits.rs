use thiserror::Error;

/// Recoverable numeric failure raised by a primitive.
///
/// The evaluator turns any of these into a NaN result for the whole evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArithmeticFault {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{function} is undefined for {argument}")]
    Domain {
        function: &'static str,
        argument: f64,
    },

    #[error("{function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Real-valued function usable as a non-terminal gene symbol
pub trait Primitive: Send + Sync {
    fn ui_name(&self) -> &'static str;
    fn alias(&self) -> &'static str;
    fn arity(&self) -> usize;

    /// Apply to exactly `arity()` arguments
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault>;
}

/// Guard shared by primitives before indexing into `args`
pub(crate) fn expect_args(
    function: &'static str,
    args: &[f64],
    expected: usize,
) -> Result<(), ArithmeticFault> {
    if args.len() != expected {
        return Err(ArithmeticFault::ArgumentCount {
            function,
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}
