//! Numeric evaluation of expressions.

use rustc_hash::FxHashMap;

use crate::core::{Constant, Expr, ExprKind};
use crate::functions;
use crate::symbol::Symbol;
use crate::{CalcError, Result};

/// Symbol-to-value bindings used by numeric evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitutions {
    map: FxHashMap<Symbol, Expr>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, var: Symbol, value: impl Into<Expr>) -> Self {
        self.map.insert(var, value.into());
        self
    }

    pub fn insert(&mut self, var: Symbol, value: impl Into<Expr>) {
        self.map.insert(var, value.into());
    }

    pub fn get(&self, var: &Symbol) -> Option<&Expr> {
        self.map.get(var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn as_map(&self) -> &FxHashMap<Symbol, Expr> {
        &self.map
    }
}

impl<V: Into<Expr>> FromIterator<(Symbol, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (Symbol, V)>>(iter: I) -> Self {
        Substitutions {
            map: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl Expr {
    /// Floating-point value of a closed expression
    ///
    /// `None` when a symbol remains, an unevaluated derivative is present, or a
    /// function is undefined at its argument.
    pub fn to_f64(&self) -> Option<f64> {
        match self.kind() {
            ExprKind::Number(n) => Some(n.to_f64()),
            ExprKind::Constant(c) => Some(c.to_f64()),
            ExprKind::Symbol(_) | ExprKind::Derivative { .. } => None,
            ExprKind::Sum(terms) => terms.iter().map(Expr::to_f64).sum(),
            ExprKind::Product(factors) => factors.iter().map(Expr::to_f64).product(),
            ExprKind::Pow(base, exp) => {
                let b = base.to_f64()?;
                let e = exp.to_f64()?;
                let v = b.powf(e);
                // Real odd roots of negative numbers
                if v.is_nan() && b < 0.0 {
                    return None;
                }
                Some(v)
            }
            ExprKind::FunctionCall { name, args } => {
                let def = functions::lookup(name)?;
                let values: Option<Vec<f64>> = args.iter().map(Expr::to_f64).collect();
                (def.eval)(&values?)
            }
        }
    }

    /// Substitute `subs` and evaluate to a finite real number
    pub fn evalf(&self, subs: &Substitutions) -> Result<f64> {
        let substituted = self.substitute_all(subs.as_map());
        let free = substituted.free_symbols();
        if !free.is_empty() {
            return Err(CalcError::UnboundSymbols {
                names: free.iter().map(|s| s.name().to_string()).collect(),
            });
        }
        match substituted.to_f64() {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(CalcError::NotNumeric {
                expr: substituted.to_string(),
            }),
        }
    }

    /// Numeric sign of a closed expression, `None` if unknown or zero
    pub(crate) fn numeric_sign(&self) -> Option<i32> {
        match self.kind() {
            ExprKind::Constant(Constant::Infinity) => Some(1),
            ExprKind::Constant(Constant::NegInfinity) => Some(-1),
            _ => match self.to_f64() {
                Some(v) if v > 0.0 => Some(1),
                Some(v) if v < 0.0 => Some(-1),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evalf_with_substitution() {
        let x = Symbol::parse("x").unwrap();
        let e = x.clone().sin();
        let subs = Substitutions::new().with(x, 1);
        let v = e.evalf(&subs).unwrap();
        assert!((v - 1.0_f64.sin()).abs() < 1e-15);
    }

    #[test]
    fn test_evalf_unbound() {
        let x = Symbol::parse("x").unwrap();
        let y = Symbol::parse("y").unwrap();
        let e = x.clone() * y;
        let err = e.evalf(&Substitutions::new().with(x, 2)).unwrap_err();
        assert_eq!(
            err,
            CalcError::UnboundSymbols {
                names: vec!["y".to_string()]
            }
        );
    }

    #[test]
    fn test_evalf_not_numeric() {
        let x = Symbol::parse("x").unwrap();
        let e = Expr::div(Expr::one(), x.to_expr());
        let err = e.evalf(&Substitutions::new().with(x, 0)).unwrap_err();
        assert!(matches!(err, CalcError::NotNumeric { .. }));
    }
}
