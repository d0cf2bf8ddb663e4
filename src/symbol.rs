//! Named symbols and the default `x`, `y`, `z` variables
//!
//! # Example
//! ```
//! use symb_calculus::Symbol;
//!
//! let t = Symbol::parse("t").unwrap();
//! let expr = t.clone().pow(2) + t.sin();  // t^2 + sin(t)
//! assert_eq!(expr.to_string(), "t^2 + sin(t)");
//! ```

use crate::{CalcError, Expr};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Names of the symbols every calculator starts with
pub const DEFAULT_SYMBOL_NAMES: [&str; 3] = ["x", "y", "z"];

/// Constant names the parser reserves
pub(crate) const RESERVED_CONSTANTS: [&str; 5] = ["pi", "E", "oo", "zoo", "nan"];

/// A named placeholder variable. Identity is the name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Parse and validate a user-supplied variable name
    ///
    /// Accepts `[A-Za-z_][A-Za-z0-9_]*` after trimming, rejecting names taken by
    /// built-in functions or constants.
    pub fn parse(text: &str) -> Result<Self, CalcError> {
        let name = text.trim();
        let invalid = |reason: &str| CalcError::InvalidSymbolName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(invalid("name is empty"));
        };
        if name.split_whitespace().count() > 1 {
            return Err(invalid("expected a single variable name"));
        }
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(invalid("names must start with a letter or underscore"));
        }
        if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(invalid(&format!("character '{bad}' is not allowed")));
        }
        if RESERVED_CONSTANTS.contains(&name) {
            return Err(invalid("name is reserved for a constant"));
        }
        if crate::functions::is_builtin(name) {
            return Err(invalid("name is reserved for a function"));
        }
        Ok(Symbol(Arc::from(name)))
    }

    /// Build a symbol from a name already validated by the lexer, or an
    /// internal name user text can never produce
    pub(crate) fn new_unchecked(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    /// Get the name of the symbol
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Convert to an Expr
    pub fn to_expr(&self) -> Expr {
        Expr::symbol(self.clone())
    }

    /// Raise to a power
    pub fn pow(self, exp: impl Into<Expr>) -> Expr {
        Expr::pow(self.to_expr(), exp.into())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

// ===== Math function methods shared by Symbol and Expr =====

macro_rules! impl_math_functions {
    ($type:ty, $converter:expr, $($fn_name:ident => $func_str:literal),* $(,)?) => {
        impl $type {
            $(
                pub fn $fn_name(self) -> Expr {
                    Expr::func($func_str, vec![$converter(self)])
                }
            )*
        }
    };
}

macro_rules! math_function_list {
    ($macro_name:ident, $type:ty, $converter:expr) => {
        $macro_name!($type, $converter,
            sin => "sin", cos => "cos", tan => "tan",
            cot => "cot", sec => "sec", csc => "csc",
            asin => "asin", acos => "acos", atan => "atan",
            sinh => "sinh", cosh => "cosh", tanh => "tanh",
            exp => "exp", ln => "log", sqrt => "sqrt", abs => "abs",
        );
    };
}

math_function_list!(impl_math_functions, Symbol, |s: Symbol| s.to_expr());
math_function_list!(impl_math_functions, Expr, |e: Expr| e);

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        s.to_expr()
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        s.to_expr()
    }
}

// ===== Operator overloading =====

macro_rules! impl_binary_ops {
    ($($trait:ident, $method:ident, $ctor:expr);* $(;)?) => {
        $(
            impl<R: Into<Expr>> $trait<R> for Expr {
                type Output = Expr;
                fn $method(self, rhs: R) -> Expr {
                    $ctor(self, rhs.into())
                }
            }

            impl<R: Into<Expr>> $trait<R> for Symbol {
                type Output = Expr;
                fn $method(self, rhs: R) -> Expr {
                    $ctor(self.to_expr(), rhs.into())
                }
            }
        )*
    };
}

impl_binary_ops!(
    Add, add, |a, b| Expr::sum(vec![a, b]);
    Sub, sub, Expr::sub;
    Mul, mul, |a, b| Expr::product(vec![a, b]);
    Div, div, Expr::div;
);

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg(self)
    }
}

impl Neg for Symbol {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::neg(self.to_expr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_names() {
        assert_eq!(Symbol::parse("x").unwrap().name(), "x");
        assert_eq!(Symbol::parse("  theta_1 ").unwrap().name(), "theta_1");
    }

    #[test]
    fn test_parse_invalid_names() {
        assert!(Symbol::parse("").is_err());
        assert!(Symbol::parse("1x").is_err());
        assert!(Symbol::parse("x y").is_err());
        assert!(Symbol::parse("x-1").is_err());
        assert!(Symbol::parse("sin").is_err());
        assert!(Symbol::parse("pi").is_err());
    }

    #[test]
    fn test_operators_build_canonical_forms() {
        let x = Symbol::parse("x").unwrap();
        let expr = x.clone() + x.clone();
        assert_eq!(expr.to_string(), "2*x");

        let expr = x.clone() * x.clone();
        assert_eq!(expr.to_string(), "x^2");

        let expr = x.clone() - x;
        assert_eq!(expr.to_string(), "0");
    }
}
