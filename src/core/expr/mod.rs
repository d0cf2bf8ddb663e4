//! Expression tree for the calculus engine.
//!
//! # Architecture
//!
//! ## N-ary Sum/Product
//! `a + b + c` is `Sum([a, b, c])`, never nested binary nodes. Subtraction is
//! `Sum([a, Product([-1, b])])` and division is `Product([a, Pow(b, -1)])`.
//!
//! ## Canonical construction
//! Every node is built through the constructors in `constructors.rs`, which
//! flatten, fold numbers, collect like terms and sort children. Two
//! mathematically identical inputs that differ only in term order therefore
//! produce structurally equal trees, so `==` is a cheap canonical comparison.
//!
//! ## Shared children
//! Nodes hold their payload behind an `Arc`; cloning an expression is a
//! reference-count bump, which the series and integration engines rely on.
//!
//! # Usage
//!
//! ```
//! use symb_calculus::{Expr, Symbol};
//!
//! let x = Symbol::parse("x").unwrap();
//! let expr = x.clone().pow(2) + x.sin();
//! assert_eq!(expr.to_string(), "x^2 + sin(x)");
//! ```

mod constructors;
mod ordering;

use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use crate::core::number::Number;
use crate::symbol::Symbol;

pub(crate) use constructors::{could_extract_minus_sign, split_coeff};
pub(crate) use ordering::expr_cmp;

/// Named mathematical constants and the extended-real points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Pi,
    E,
    Infinity,
    NegInfinity,
    /// Unsigned infinity, the value of `1/0`
    ComplexInfinity,
    NaN,
}

impl Constant {
    pub fn is_infinite(self) -> bool {
        matches!(
            self,
            Constant::Infinity | Constant::NegInfinity | Constant::ComplexInfinity
        )
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Infinity => f64::INFINITY,
            Constant::NegInfinity => f64::NEG_INFINITY,
            Constant::ComplexInfinity | Constant::NaN => f64::NAN,
        }
    }
}

/// A symbolic mathematical expression.
#[derive(Debug, Clone)]
pub struct Expr {
    kind: Arc<ExprKind>,
}

/// The structure of an expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Number(Number),
    Symbol(Symbol),
    Constant(Constant),
    /// Sorted by descending degree, numeric term last
    Sum(Vec<Expr>),
    /// Numeric coefficient first, remaining factors sorted by base
    Product(Vec<Expr>),
    Pow(Expr, Expr),
    /// Built-in or user-named function application
    FunctionCall { name: Arc<str>, args: Vec<Expr> },
    /// Unevaluated derivative of an expression the engine cannot differentiate
    Derivative { inner: Expr, var: Symbol, order: u32 },
}

impl Deref for Expr {
    type Target = ExprKind;
    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

impl PartialEq for Expr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.kind, &other.kind) || self.kind == other.kind
    }
}

impl Eq for Expr {}

impl std::hash::Hash for Expr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl Expr {
    /// Wrap an already canonical node. Only constructors should call this.
    pub(crate) fn new(kind: ExprKind) -> Self {
        Expr {
            kind: Arc::new(kind),
        }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn as_number(&self) -> Option<&Number> {
        match self.kind() {
            ExprKind::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.kind() {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<Constant> {
        match self.kind() {
            ExprKind::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// Exact or float zero
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Number::is_zero)
    }

    /// Exact one
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Number::is_one)
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind(), ExprKind::Number(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.kind(), ExprKind::Constant(Constant::NaN))
    }

    /// `oo`, `-oo` or `zoo`
    pub fn is_infinite(&self) -> bool {
        self.as_constant().is_some_and(Constant::is_infinite)
    }

    pub fn is_function(&self, name: &str) -> bool {
        matches!(self.kind(), ExprKind::FunctionCall { name: n, .. } if &**n == name)
    }

    /// The single argument of a unary function call named `name`
    pub(crate) fn unary_arg(&self, name: &str) -> Option<&Expr> {
        match self.kind() {
            ExprKind::FunctionCall { name: n, args } if &**n == name && args.len() == 1 => {
                Some(&args[0])
            }
            _ => None,
        }
    }

    /// Children in storage order
    pub fn children(&self) -> Vec<&Expr> {
        match self.kind() {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => Vec::new(),
            ExprKind::Sum(items) | ExprKind::Product(items) => items.iter().collect(),
            ExprKind::Pow(base, exp) => vec![base, exp],
            ExprKind::FunctionCall { args, .. } => args.iter().collect(),
            ExprKind::Derivative { inner, .. } => vec![inner],
        }
    }

    // -------------------------------------------------------------------------
    // Analysis
    // -------------------------------------------------------------------------

    /// True if `var` occurs anywhere in the tree
    pub fn contains_symbol(&self, var: &Symbol) -> bool {
        match self.kind() {
            ExprKind::Symbol(s) => s == var,
            ExprKind::Derivative { inner, var: v, .. } => v == var || inner.contains_symbol(var),
            _ => self.children().into_iter().any(|c| c.contains_symbol(var)),
        }
    }

    /// True if `target` occurs as a subtree
    pub fn contains_expr(&self, target: &Expr) -> bool {
        self == target || self.children().into_iter().any(|c| c.contains_expr(target))
    }

    /// All symbols, sorted by name
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self.kind() {
            ExprKind::Symbol(s) => {
                out.insert(s.clone());
            }
            ExprKind::Derivative { inner, var, .. } => {
                out.insert(var.clone());
                inner.collect_symbols(out);
            }
            _ => {
                for child in self.children() {
                    child.collect_symbols(out);
                }
            }
        }
    }

    /// Count the total number of nodes in the expression tree
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::node_count)
            .sum::<usize>()
    }

    /// Get the maximum nesting depth of the expression tree
    pub fn max_depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expr::max_depth)
            .max()
            .unwrap_or(0)
    }

    /// No `oo`, `zoo` or `nan` anywhere in the tree
    pub fn is_finite_value(&self) -> bool {
        match self.kind() {
            ExprKind::Constant(c) => !c.is_infinite() && *c != Constant::NaN,
            ExprKind::Number(Number::Float(f)) => f.is_finite(),
            _ => self.children().into_iter().all(Expr::is_finite_value),
        }
    }

    // -------------------------------------------------------------------------
    // Rewriting
    // -------------------------------------------------------------------------

    /// Rebuild this node from new children through the canonical constructors
    pub(crate) fn rebuild(&self, children: Vec<Expr>) -> Expr {
        match self.kind() {
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Constant(_) => self.clone(),
            ExprKind::Sum(_) => Expr::sum(children),
            ExprKind::Product(_) => Expr::product(children),
            ExprKind::Pow(..) => {
                let mut it = children.into_iter();
                match (it.next(), it.next()) {
                    (Some(base), Some(exp)) => Expr::pow(base, exp),
                    _ => self.clone(),
                }
            }
            ExprKind::FunctionCall { name, .. } => Expr::func(name, children),
            ExprKind::Derivative { var, order, .. } => match children.into_iter().next() {
                Some(inner) => Expr::derivative(inner, var.clone(), *order),
                None => self.clone(),
            },
        }
    }

    /// Apply `f` bottom-up to every node
    pub fn map_bottom_up(&self, f: &mut impl FnMut(Expr) -> Expr) -> Expr {
        let rebuilt = if self.children().is_empty() {
            self.clone()
        } else {
            let children = self
                .children()
                .into_iter()
                .map(|c| c.map_bottom_up(f))
                .collect();
            self.rebuild(children)
        };
        f(rebuilt)
    }

    /// Substitute `value` for every occurrence of `var`
    pub fn substitute(&self, var: &Symbol, value: &Expr) -> Expr {
        if !self.contains_symbol(var) {
            return self.clone();
        }
        match self.kind() {
            ExprKind::Symbol(s) if s == var => value.clone(),
            ExprKind::Derivative { inner, var: v, order } if v == var => {
                // d/dv f evaluated at v = value: differentiate first, then substitute
                let d = crate::diff::derive_n(inner, v, *order);
                if matches!(d.kind(), ExprKind::Derivative { .. }) {
                    d
                } else {
                    d.substitute(var, value)
                }
            }
            _ => {
                let children = self
                    .children()
                    .into_iter()
                    .map(|c| c.substitute(var, value))
                    .collect();
                self.rebuild(children)
            }
        }
    }

    /// Simultaneous substitution of several symbols
    pub fn substitute_all(&self, map: &FxHashMap<Symbol, Expr>) -> Expr {
        if map.is_empty() {
            return self.clone();
        }
        match self.kind() {
            ExprKind::Symbol(s) => map.get(s).cloned().unwrap_or_else(|| self.clone()),
            ExprKind::Number(_) | ExprKind::Constant(_) => self.clone(),
            _ => {
                let children = self
                    .children()
                    .into_iter()
                    .map(|c| c.substitute_all(map))
                    .collect();
                self.rebuild(children)
            }
        }
    }

    /// Replace every occurrence of the subtree `target` with `with`
    pub fn replace(&self, target: &Expr, with: &Expr) -> Expr {
        if self == target {
            return with.clone();
        }
        let children = self.children();
        if children.is_empty() || !self.contains_expr(target) {
            return self.clone();
        }
        let children = children
            .into_iter()
            .map(|c| c.replace(target, with))
            .collect();
        self.rebuild(children)
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::integer(i64::from(n))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::integer(n)
    }
}

impl From<u32> for Expr {
    fn from(n: u32) -> Self {
        Expr::integer(i64::from(n))
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::float(v)
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Expr::number(n)
    }
}

impl From<num_rational::BigRational> for Expr {
    fn from(r: num_rational::BigRational) -> Self {
        Expr::number(Number::Rational(r))
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Expr::constant(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Symbol {
        Symbol::parse("x").unwrap()
    }

    #[test]
    fn test_structural_equality_ignores_input_order() {
        let y = Symbol::parse("y").unwrap();
        let a = Expr::sum(vec![x().to_expr(), y.to_expr(), Expr::integer(1)]);
        let b = Expr::sum(vec![Expr::integer(1), y.to_expr(), x().to_expr()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_free_symbols_sorted() {
        let z = Symbol::parse("z").unwrap();
        let e = z.clone().to_expr() * x().sin();
        let names: Vec<String> = e.free_symbols().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["x", "z"]);
    }

    #[test]
    fn test_substitute_rebuilds_canonically() {
        let e = x().pow(2) + x().to_expr();
        let at_two = e.substitute(&x(), &Expr::integer(2));
        assert_eq!(at_two, Expr::integer(6));
    }

    #[test]
    fn test_node_count_and_depth() {
        let e = x().sin();
        assert_eq!(e.node_count(), 2);
        assert_eq!(e.max_depth(), 2);
    }

    #[test]
    fn test_finite_value() {
        assert!(x().to_expr().is_finite_value());
        assert!(!Expr::infinity().is_finite_value());
        assert!(!(x().to_expr() + Expr::nan()).is_finite_value());
    }
}
