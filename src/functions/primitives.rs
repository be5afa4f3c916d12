use crate::functions::traits::{expect_args, ArithmeticFault, Primitive};

// --- Arithmetic ---
pub struct Add;
impl Primitive for Add {
    fn ui_name(&self) -> &'static str { "Addition" }
    fn alias(&self) -> &'static str { "add" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        Ok(args[0] + args[1])
    }
}

pub struct Subtract;
impl Primitive for Subtract {
    fn ui_name(&self) -> &'static str { "Subtraction" }
    fn alias(&self) -> &'static str { "subtract" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        Ok(args[0] - args[1])
    }
}

pub struct Multiply;
impl Primitive for Multiply {
    fn ui_name(&self) -> &'static str { "Multiplication" }
    fn alias(&self) -> &'static str { "multiply" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        Ok(args[0] * args[1])
    }
}

pub struct Divide;
impl Primitive for Divide {
    fn ui_name(&self) -> &'static str { "Division" }
    fn alias(&self) -> &'static str { "divide" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        if args[1] == 0.0 {
            return Err(ArithmeticFault::DivisionByZero);
        }
        Ok(args[0] / args[1])
    }
}

/// Real power; negative bases only accept integral exponents
pub struct Power;
impl Primitive for Power {
    fn ui_name(&self) -> &'static str { "Power" }
    fn alias(&self) -> &'static str { "pow" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        let (base, exponent) = (args[0], args[1]);
        if base == 0.0 && exponent < 0.0 {
            return Err(ArithmeticFault::DivisionByZero);
        }
        if base < 0.0 && exponent.fract() != 0.0 {
            return Err(ArithmeticFault::Domain {
                function: self.alias(),
                argument: base,
            });
        }
        Ok(base.powf(exponent))
    }
}

pub struct Min;
impl Primitive for Min {
    fn ui_name(&self) -> &'static str { "Minimum" }
    fn alias(&self) -> &'static str { "min" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        Ok(args[0].min(args[1]))
    }
}

pub struct Max;
impl Primitive for Max {
    fn ui_name(&self) -> &'static str { "Maximum" }
    fn alias(&self) -> &'static str { "max" }
    fn arity(&self) -> usize { 2 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 2)?;
        Ok(args[0].max(args[1]))
    }
}

// --- Unary ---
pub struct Sqrt;
impl Primitive for Sqrt {
    fn ui_name(&self) -> &'static str { "Square Root" }
    fn alias(&self) -> &'static str { "sqrt" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        if args[0] < 0.0 {
            return Err(ArithmeticFault::Domain {
                function: self.alias(),
                argument: args[0],
            });
        }
        Ok(args[0].sqrt())
    }
}

pub struct Abs;
impl Primitive for Abs {
    fn ui_name(&self) -> &'static str { "Absolute Value" }
    fn alias(&self) -> &'static str { "abs" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        Ok(args[0].abs())
    }
}

pub struct Negate;
impl Primitive for Negate {
    fn ui_name(&self) -> &'static str { "Negation" }
    fn alias(&self) -> &'static str { "neg" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        Ok(-args[0])
    }
}

pub struct Exp;
impl Primitive for Exp {
    fn ui_name(&self) -> &'static str { "Exponential" }
    fn alias(&self) -> &'static str { "exp" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        Ok(args[0].exp())
    }
}

pub struct Ln;
impl Primitive for Ln {
    fn ui_name(&self) -> &'static str { "Natural Logarithm" }
    fn alias(&self) -> &'static str { "ln" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        if args[0] <= 0.0 {
            return Err(ArithmeticFault::Domain {
                function: self.alias(),
                argument: args[0],
            });
        }
        Ok(args[0].ln())
    }
}

pub struct Sin;
impl Primitive for Sin {
    fn ui_name(&self) -> &'static str { "Sine" }
    fn alias(&self) -> &'static str { "sin" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        Ok(args[0].sin())
    }
}

pub struct Cos;
impl Primitive for Cos {
    fn ui_name(&self) -> &'static str { "Cosine" }
    fn alias(&self) -> &'static str { "cos" }
    fn arity(&self) -> usize { 1 }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.alias(), args, 1)?;
        Ok(args[0].cos())
    }
}

// --- Caller-supplied ---
type Callable = dyn Fn(&[f64]) -> Result<f64, ArithmeticFault> + Send + Sync;

/// Wraps an arbitrary closure so callers can register their own semantics
pub struct FnPrimitive {
    name: &'static str,
    arity: usize,
    callable: Box<Callable>,
}

impl FnPrimitive {
    pub fn new<F>(name: &'static str, arity: usize, callable: F) -> Self
    where
        F: Fn(&[f64]) -> Result<f64, ArithmeticFault> + Send + Sync + 'static,
    {
        Self {
            name,
            arity,
            callable: Box::new(callable),
        }
    }
}

impl Primitive for FnPrimitive {
    fn ui_name(&self) -> &'static str { self.name }
    fn alias(&self) -> &'static str { self.name }
    fn arity(&self) -> usize { self.arity }
    fn execute(&self, args: &[f64]) -> Result<f64, ArithmeticFault> {
        expect_args(self.name, args, self.arity)?;
        (self.callable)(args)
    }
}
