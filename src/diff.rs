//! Differentiation engine - applies calculus rules
//!
//! Rules build their results through the canonical constructors, so
//! `0 + u`, `1 * u` and like terms collapse as the derivative is assembled and
//! no separate simplification pass is needed.

use std::collections::HashSet;

use tracing::trace;

use crate::core::{Expr, ExprKind};
use crate::functions;
use crate::symbol::Symbol;
use crate::{CalcError, Result};

impl Expr {
    /// First derivative with respect to `var`
    pub(crate) fn derive(&self, var: &Symbol, fixed: &HashSet<Symbol>) -> Expr {
        if fixed.contains(var) || !self.contains_symbol(var) {
            return Expr::zero();
        }
        match self.kind() {
            // Base cases
            ExprKind::Number(_) | ExprKind::Constant(_) => Expr::zero(),
            ExprKind::Symbol(s) => {
                if s == var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }

            // Sum rule
            ExprKind::Sum(terms) => Expr::sum(terms.iter().map(|t| t.derive(var, fixed)).collect()),

            // Product rule: (f*g*h)' = f'*g*h + f*g'*h + f*g*h'
            ExprKind::Product(factors) => {
                let mut terms = Vec::with_capacity(factors.len());
                for (i, factor) in factors.iter().enumerate() {
                    if !factor.contains_symbol(var) {
                        continue;
                    }
                    let mut replaced = factors.clone();
                    replaced[i] = factor.derive(var, fixed);
                    terms.push(Expr::product(replaced));
                }
                Expr::sum(terms)
            }

            ExprKind::Pow(base, exp) => {
                let base_depends = base.contains_symbol(var);
                let exp_depends = exp.contains_symbol(var);
                match (base_depends, exp_depends) {
                    // Power rule: (u^n)' = n*u^(n-1)*u'
                    (true, false) => Expr::product(vec![
                        exp.clone(),
                        Expr::pow(base.clone(), Expr::sum(vec![exp.clone(), Expr::minus_one()])),
                        base.derive(var, fixed),
                    ]),
                    // Exponential: (a^v)' = a^v*log(a)*v'
                    (false, true) => Expr::product(vec![
                        self.clone(),
                        functions::func("log", base.clone()),
                        exp.derive(var, fixed),
                    ]),
                    // General: (u^v)' = u^v*(v'*log(u) + v*u'/u)
                    _ => Expr::product(vec![
                        self.clone(),
                        Expr::sum(vec![
                            Expr::product(vec![
                                exp.derive(var, fixed),
                                functions::func("log", base.clone()),
                            ]),
                            Expr::product(vec![
                                exp.clone(),
                                base.derive(var, fixed),
                                Expr::recip(base.clone()),
                            ]),
                        ]),
                    ]),
                }
            }

            ExprKind::FunctionCall { name, args } => {
                if let Some(def) = functions::lookup(name)
                    && def.accepts(args.len())
                {
                    let arg_primes: Vec<Expr> = args.iter().map(|a| a.derive(var, fixed)).collect();
                    return (def.derivative)(args, &arg_primes);
                }
                // Undefined function: keep the derivative unevaluated
                Expr::derivative(self.clone(), var.clone(), 1)
            }

            ExprKind::Derivative { .. } => Expr::derivative(self.clone(), var.clone(), 1),
        }
    }
}

/// `order`-th derivative without resource limits
pub(crate) fn derive_n(expr: &Expr, var: &Symbol, order: u32) -> Expr {
    let fixed = HashSet::new();
    (0..order).fold(expr.clone(), |acc, _| acc.derive(var, &fixed))
}

/// Builder for differentiation with resource limits
#[derive(Clone, Debug, Default)]
pub struct Diff {
    fixed_vars: HashSet<Symbol>,
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
}

impl Diff {
    /// Create a new differentiation builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fixed variable (treated as constant during differentiation)
    pub fn fixed_var(mut self, var: &Symbol) -> Self {
        self.fixed_vars.insert(var.clone());
        self
    }

    /// Reject inputs and intermediate results deeper than `depth`
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Reject inputs and intermediate results with more than `nodes` nodes
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    fn check_limits(&self, expr: &Expr) -> Result<()> {
        if let Some(max_d) = self.max_depth
            && expr.max_depth() > max_d
        {
            return Err(CalcError::MaxDepthExceeded);
        }
        if let Some(max_n) = self.max_nodes
            && expr.node_count() > max_n
        {
            return Err(CalcError::MaxNodesExceeded);
        }
        Ok(())
    }

    /// Differentiate `order` times with respect to `var`
    ///
    /// # Example
    /// ```
    /// use symb_calculus::{Diff, Symbol};
    ///
    /// let x = Symbol::parse("x").unwrap();
    /// let d2 = Diff::new().differentiate(&x.clone().pow(3), &x, 2).unwrap();
    /// assert_eq!(d2.to_string(), "6*x");
    /// ```
    pub fn differentiate(&self, expr: &Expr, var: &Symbol, order: u32) -> Result<Expr> {
        if order == 0 {
            return Err(CalcError::InvalidOrder {
                operation: "derivative",
                order,
            });
        }
        self.check_limits(expr)?;

        let mut current = expr.clone();
        for step in 1..=order {
            current = current.derive(var, &self.fixed_vars);
            self.check_limits(&current)?;
            trace!(step, nodes = current.node_count(), "derivative step");
            if current.is_zero() {
                break;
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn d(input: &str) -> String {
        let x = Symbol::parse("x").unwrap();
        Diff::new()
            .differentiate(&parse(input).unwrap(), &x, 1)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_basic_rules() {
        assert_eq!(d("x**3"), "3*x^2");
        assert_eq!(d("sin(x)"), "cos(x)");
        assert_eq!(d("x*sin(x)"), "x*cos(x) + sin(x)");
        assert_eq!(d("exp(2*x)"), "2*exp(2*x)");
        assert_eq!(d("log(x)"), "1/x");
        assert_eq!(d("5"), "0");
    }

    #[test]
    fn test_chain_rule() {
        assert_eq!(d("sin(x)**2 + x**2"), "2*x + 2*cos(x)*sin(x)");
        assert_eq!(d("sqrt(x)"), "1/(2*sqrt(x))");
    }

    #[test]
    fn test_undefined_function() {
        assert_eq!(d("f(x)"), "Derivative(f(x), x)");
        let x = Symbol::parse("x").unwrap();
        let second = Diff::new()
            .differentiate(&parse("f(x)").unwrap(), &x, 2)
            .unwrap();
        assert_eq!(second.to_string(), "Derivative(f(x), (x, 2))");
    }

    #[test]
    fn test_limits_and_order() {
        let x = Symbol::parse("x").unwrap();
        let expr = parse("x**2").unwrap();
        assert!(matches!(
            Diff::new().differentiate(&expr, &x, 0),
            Err(CalcError::InvalidOrder { .. })
        ));
        assert_eq!(
            Diff::new().max_nodes(1).differentiate(&expr, &x, 1),
            Err(CalcError::MaxNodesExceeded)
        );
    }

    #[test]
    fn test_fixed_var() {
        let x = Symbol::parse("x").unwrap();
        let y = Symbol::parse("y").unwrap();
        let expr = parse("x*y").unwrap();
        let result = Diff::new().fixed_var(&x).differentiate(&expr, &x, 1).unwrap();
        assert!(result.is_zero());
        let result = Diff::new().differentiate(&expr, &y, 1).unwrap();
        assert_eq!(result.to_string(), "x");
    }
}
