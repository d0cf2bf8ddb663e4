//! Calculus helper over a symbolic expression engine
//!
//! [`CalculusCalculator`] differentiates, integrates, takes limits, expands
//! series and evaluates numerically. Expressions come from [`parse`] or from
//! the operator overloads on [`Symbol`] and [`Expr`]; every expression is kept
//! in a canonical form, so results print in a stable way.
//!
//! The [`frontend`] module turns the calculator into a page with five tabs,
//! rendered as text, JSON or HTML by the `symb-calculus` binary, or driven from
//! a browser through the `wasm` feature.
//!
//! # Example
//! ```
//! use symb_calculus::{CalculusCalculator, Expr, Substitutions, parse};
//!
//! let calc = CalculusCalculator::new();
//! let f = parse("sin(x)**2 + x**2").unwrap();
//!
//! let df = calc.differentiate(&f, None, 1).unwrap();
//! assert_eq!(df.to_string(), "2*x + 2*cos(x)*sin(x)");
//!
//! let series = calc.taylor(&parse("exp(x)").unwrap(), None, &Expr::zero(), 4).unwrap();
//! assert_eq!(series.to_string(), "1 + x + x^2/2 + x^3/6 + O(x^4)");
//!
//! let subs = Substitutions::new().with(calc.x.clone(), Expr::integer(2));
//! assert_eq!(calc.evaluate(&parse("x**3").unwrap(), &subs).unwrap(), 8.0);
//! ```

mod calculator;
pub mod config;
mod core;
mod diff;
mod error;
pub mod frontend;
mod functions;
mod integrate;
mod limit;
mod parser;
mod series;
mod symbol;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
mod tests;

pub use calculator::{CalculusCalculator, DEFAULT_SERIES_ORDER};
pub use config::CalcConfig;
pub use self::core::{Constant, Expr, ExprKind, Number, Substitutions, format_evalf, format_float};
pub use diff::Diff;
pub use error::{CalcError, Result, Span};
pub use functions::{builtin_names, is_builtin};
pub use limit::Direction;
pub use parser::{parse, parse_symbol};
pub use series::Series;
pub use symbol::{DEFAULT_SYMBOL_NAMES, Symbol};
