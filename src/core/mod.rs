//! Core types for symbolic mathematics
//!
//! This module contains the fundamental types:
//! - `Number` - exact rationals and floats
//! - `Expr` / `ExprKind` / `Constant` - expression tree
//! - Display formatting (to_string, to_latex)
//! - Numeric evaluation and polynomial expansion

mod display;
mod evaluate;
mod expand;
pub(crate) mod expr;
pub(crate) mod number;

pub use display::{format_evalf, format_float};
pub use evaluate::Substitutions;
pub use expr::{Constant, Expr, ExprKind};
pub use number::Number;
