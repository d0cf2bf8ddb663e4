//! Series expansion.
//!
//! Expressions are rewritten around the expansion point in a positive
//! infinitesimal `h` (`x = a + h`, or `x = 1/h` at infinity) and expanded by
//! [`expander::Expander`] into a truncated [`local::LocalSeries`]. The same
//! machinery answers limits, which only need the leading term.
//!
//! # Example
//! ```
//! use symb_calculus::{parse, CalculusCalculator, Expr};
//!
//! let calc = CalculusCalculator::new();
//! let series = calc.taylor(&parse("exp(x)").unwrap(), None, &Expr::zero(), 4).unwrap();
//! assert_eq!(series.to_string(), "1 + x + x^2/2 + x^3/6 + O(x^4)");
//! ```

pub(crate) mod expander;
pub(crate) mod local;

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::trace;

use crate::config::EngineConfig;
use crate::core::{Constant, Expr, Number};
use crate::symbol::Symbol;
use crate::{CalcError, Result};
use expander::{Expander, Local};
use local::{ExpandError, ExpandResult};

/// Stand-in for the expansion base while formatting terms
const PLACEHOLDER: &str = "ξ";

/// How the variable approaches the point
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Approach {
    Right(Expr),
    Left(Expr),
    PosInfinity,
    NegInfinity,
}

impl Approach {
    /// Finite points are approached from the side given; `None` for `zoo`/`nan`
    pub(crate) fn new(point: &Expr, from_right: bool) -> Option<Self> {
        match point.as_constant() {
            Some(Constant::Infinity) => Some(Approach::PosInfinity),
            Some(Constant::NegInfinity) => Some(Approach::NegInfinity),
            Some(Constant::ComplexInfinity | Constant::NaN) => None,
            _ if from_right => Some(Approach::Right(point.clone())),
            _ => Some(Approach::Left(point.clone())),
        }
    }

    /// Value of the variable in terms of `h`
    pub(crate) fn substitution(&self, h: &Symbol) -> Expr {
        let h = h.to_expr();
        match self {
            Approach::Right(a) => Expr::sum(vec![a.clone(), h]),
            Approach::Left(a) => Expr::sub(a.clone(), h),
            Approach::PosInfinity => Expr::recip(h),
            Approach::NegInfinity => Expr::neg(Expr::recip(h)),
        }
    }

    /// `h` in terms of the variable
    fn infinitesimal_of(&self, var: &Symbol) -> Expr {
        let x = var.to_expr();
        match self {
            Approach::Right(a) => Expr::sub(x, a.clone()),
            Approach::Left(a) => Expr::sub(a.clone(), x),
            Approach::PosInfinity => Expr::recip(x),
            Approach::NegInfinity => Expr::neg(Expr::recip(x)),
        }
    }
}

/// Fresh infinitesimal and log-infinitesimal symbols for a nesting level
pub(crate) fn infinitesimal(depth: usize) -> (Symbol, Symbol) {
    (
        Symbol::new_unchecked(&format!("ε{depth}")),
        Symbol::new_unchecked(&format!("λ{depth}")),
    )
}

pub(crate) enum Attempt<T> {
    Done(T),
    Retry { next_cutoff: i64 },
}

/// Run `attempt` with growing cutoffs until it settles or `max` is passed
pub(crate) fn with_growing_cutoff<T>(
    start: i64,
    max: i64,
    mut attempt: impl FnMut(i64) -> ExpandResult<Attempt<T>>,
) -> std::result::Result<T, String> {
    let mut cutoff = start;
    while cutoff <= max {
        let next = match attempt(cutoff) {
            Ok(Attempt::Done(value)) => return Ok(value),
            Ok(Attempt::Retry { next_cutoff }) => next_cutoff.max(cutoff + 1),
            Err(ExpandError::NeedPrecision) => cutoff + (cutoff / 2).max(2),
            Err(ExpandError::Fail(reason)) => return Err(reason),
        };
        trace!(cutoff, next, "series precision retry");
        cutoff = next;
    }
    Err(format!("precision limit {max} reached"))
}

/// Truncated series of an expression around a point
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    var: Symbol,
    point: Expr,
    /// Ascending exponents of `(var - point)`, or of `1/var` at infinity
    terms: Vec<(BigRational, Expr)>,
    order: u32,
    exact: bool,
}

impl Series {
    pub fn var(&self) -> &Symbol {
        &self.var
    }

    pub fn point(&self) -> &Expr {
        &self.point
    }

    /// `n` in the order term `O((x - a)^n)`
    pub fn order(&self) -> u32 {
        self.order
    }

    /// True when the expansion terminates and no order term is shown
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Coefficient of `(x - a)^k`, or of `x^-k` at infinity
    pub fn coefficient(&self, k: i64) -> Expr {
        let k = BigRational::from_integer(BigInt::from(k));
        self.terms
            .iter()
            .find(|(e, _)| *e == k)
            .map_or_else(Expr::zero, |(_, c)| c.clone())
    }

    fn base(&self) -> Expr {
        let x = self.var.to_expr();
        match self.point.as_constant() {
            Some(Constant::Infinity) => Expr::recip(x),
            Some(Constant::NegInfinity) => Expr::neg(Expr::recip(x)),
            _ => Expr::sub(x, self.point.clone()),
        }
    }

    /// Terms as expressions, lowest order first
    pub fn terms(&self) -> Vec<Expr> {
        let base = self.base();
        self.terms
            .iter()
            .map(|(e, c)| Expr::product(vec![c.clone(), Expr::pow(base.clone(), exponent_expr(e))]))
            .collect()
    }

    /// The series without its order term
    pub fn remove_order(&self) -> Expr {
        Expr::sum(self.terms())
    }

    fn is_infinite_point(&self) -> bool {
        self.point.is_infinite()
    }

    /// Terms built on a placeholder atom so `(x - a)` stays grouped
    fn placeholder_terms(&self) -> Vec<Expr> {
        let xi = Symbol::new_unchecked(PLACEHOLDER).to_expr();
        self.terms
            .iter()
            .map(|(e, c)| {
                let power = if self.is_infinite_point() {
                    let base = self.base().replace(&self.var.to_expr(), &xi);
                    Expr::pow(base, exponent_expr(e))
                } else {
                    Expr::pow(xi.clone(), exponent_expr(e))
                };
                Expr::product(vec![c.clone(), power])
            })
            .collect()
    }

    fn render(&self, latex: bool) -> String {
        let base = if self.point.is_zero() || self.is_infinite_point() {
            self.var.to_expr()
        } else {
            self.base()
        };
        let base_str = if latex { base.to_latex() } else { base.to_string() };
        let base_str = match (base.as_symbol().is_some(), latex) {
            (true, _) => base_str,
            (false, false) => format!("({base_str})"),
            (false, true) => format!(r"\left({base_str}\right)"),
        };
        let fill = |e: &Expr| {
            let text = if latex { e.to_latex() } else { e.to_string() };
            text.replace(PLACEHOLDER, &base_str)
        };

        let mut parts: Vec<String> = self.placeholder_terms().iter().map(&fill).collect();
        if !self.exact {
            parts.push(self.order_term(latex, &fill));
        }
        if parts.is_empty() {
            return "0".to_string();
        }
        let mut out = String::new();
        for (i, part) in parts.iter().enumerate() {
            match (i, part.strip_prefix('-')) {
                (0, _) => out.push_str(part),
                (_, Some(rest)) => {
                    out.push_str(" - ");
                    out.push_str(rest);
                }
                (_, None) => {
                    out.push_str(" + ");
                    out.push_str(part);
                }
            }
        }
        out
    }

    fn order_term(&self, latex: bool, fill: &dyn Fn(&Expr) -> String) -> String {
        let xi = Symbol::new_unchecked(PLACEHOLDER).to_expr();
        let n = Expr::from(self.order);
        let magnitude = if self.is_infinite_point() {
            Expr::pow(Expr::recip(xi), n)
        } else {
            Expr::pow(xi, n)
        };
        let body = fill(&magnitude);
        let var = if latex {
            self.var.to_expr().to_latex()
        } else {
            self.var.to_string()
        };
        match (self.point.is_zero(), latex) {
            (true, false) => format!("O({body})"),
            (true, true) => format!(r"O\left({body}\right)"),
            (false, false) => format!("O({body}, ({var}, {}))", self.point),
            (false, true) => format!(
                r"O\left({body}; {var}\rightarrow {}\right)",
                self.point.to_latex()
            ),
        }
    }

    pub fn to_latex(&self) -> String {
        self.render(true)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

fn exponent_expr(e: &BigRational) -> Expr {
    Expr::number(Number::Rational(e.clone()))
}

/// Series of `expr` in `var` around `point` up to `O((var - point)^order)`
pub(crate) fn taylor(
    expr: &Expr,
    var: &Symbol,
    point: &Expr,
    order: u32,
    config: &EngineConfig,
) -> Result<Series> {
    if order == 0 {
        return Err(CalcError::InvalidOrder {
            operation: "series",
            order,
        });
    }
    if point.contains_symbol(var) {
        return Err(CalcError::PointDependsOnVariable {
            point: point.to_string(),
            var: var.to_string(),
        });
    }
    let unavailable = |reason: String| CalcError::SeriesUnavailable {
        expr: expr.to_string(),
        reason,
    };
    let approach =
        Approach::new(point, true).ok_or_else(|| unavailable(format!("cannot expand at {point}")))?;
    let target = BigRational::from_integer(BigInt::from(order));
    let mut series = Series {
        var: var.clone(),
        point: point.clone(),
        terms: Vec::new(),
        order,
        exact: true,
    };

    if !expr.contains_symbol(var) {
        if !expr.is_zero() {
            series.terms.push((BigRational::zero(), expr.clone()));
        }
        return Ok(series);
    }

    let (h, log_h) = infinitesimal(0);
    let expr_h = expr.substitute(var, &approach.substitution(&h));
    let start = i64::from(order);
    let max = config.series_max_precision.max(2 * start);
    let local = with_growing_cutoff(start, max, |cutoff| {
        match Expander::new(&h, &log_h, cutoff).expand(&expr_h)? {
            Local::Series(s) => match s.prec() {
                Some(p) if *p < target => {
                    let deficit = (&target - p).ceil().to_integer().to_i64().unwrap_or(1);
                    Ok(Attempt::Retry {
                        next_cutoff: cutoff + deficit,
                    })
                }
                _ => Ok(Attempt::Done(Some(s))),
            },
            Local::Flat(_) => Ok(Attempt::Done(None)),
            Local::Blowup(_) => Err(ExpandError::Fail(
                "grows faster than any power of the variable".to_string(),
            )),
        }
    })
    .map_err(unavailable)?;

    let Some(local) = local else {
        // Smaller than every power: all coefficients vanish
        series.exact = false;
        return Ok(series);
    };
    let (terms, prec) = local.into_parts();
    let log_back = Expr::func("log", vec![approach.infinitesimal_of(var)]);
    let total = terms.len();
    series.terms = terms
        .into_iter()
        .filter(|(e, _)| *e < target)
        .map(|(e, c)| (e, c.substitute(&log_h, &log_back)))
        .collect();
    series.exact = prec.is_none() && series.terms.len() == total;
    if series.terms.iter().any(|(e, _)| e.is_negative() || !e.is_integer()) {
        trace!(expr = %expr, "Laurent or Puiseux terms in series");
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn series(input: &str, point: Expr, order: u32) -> Series {
        let x = Symbol::parse("x").unwrap();
        taylor(&parse(input).unwrap(), &x, &point, order, &EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_exp_series() {
        let s = series("exp(x)", Expr::zero(), 4);
        assert_eq!(s.to_string(), "1 + x + x^2/2 + x^3/6 + O(x^4)");
        assert_eq!(s.coefficient(3), Expr::rational(1, 6));
        assert!(!s.is_exact());
    }

    #[test]
    fn test_polynomial_is_exact() {
        let s = series("x**2 + 1", Expr::zero(), 6);
        assert!(s.is_exact());
        assert_eq!(s.to_string(), "1 + x^2");
    }

    #[test]
    fn test_series_around_one() {
        let s = series("log(x)", Expr::one(), 3);
        assert_eq!(s.to_string(), "(x - 1) - (x - 1)^2/2 + O((x - 1)^3, (x, 1))");
    }

    #[test]
    fn test_laurent_series() {
        let s = series("1/sin(x)", Expr::zero(), 4);
        assert_eq!(s.to_string(), "1/x + x/6 + 7*x^3/360 + O(x^4)");
    }

    #[test]
    fn test_series_at_infinity() {
        let s = series("1/(x + 1)", Expr::infinity(), 3);
        assert_eq!(s.to_string(), "1/x - 1/x^2 + O(1/x^3, (x, oo))");
    }

    #[test]
    fn test_series_latex() {
        let s = series("exp(x)", Expr::zero(), 3);
        assert_eq!(s.to_latex(), r"1 + x + \frac{x^{2}}{2} + O\left(x^{3}\right)");
    }

    #[test]
    fn test_series_zero_order() {
        let x = Symbol::parse("x").unwrap();
        let err = taylor(&x.to_expr(), &x, &Expr::zero(), 0, &EngineConfig::default());
        assert!(matches!(err, Err(CalcError::InvalidOrder { .. })));
    }
}
