//! Limits through local series.
//!
//! A limit is read off the leading term of the expansion in the infinitesimal
//! `h`: positive exponents give 0, exponent 0 gives the coefficient and negative
//! exponents give a signed infinity. Coefficients that still contain `log(h)` are
//! resolved by a nested limit in that logarithm.

use std::fmt;
use std::str::FromStr;

use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::core::Expr;
use crate::series::expander::{Expander, Local};
use crate::series::{Approach, Attempt, infinitesimal, with_growing_cutoff};
use crate::symbol::Symbol;
use crate::{CalcError, Result};

/// Nesting of `log(log(...))` resolved before giving up
const MAX_LOG_NESTING: usize = 3;

/// Side from which the variable approaches a finite point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "+-")]
    Both,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Plus, Direction::Minus, Direction::Both];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Plus => "+",
            Direction::Minus => "-",
            Direction::Both => "+-",
        }
    }

    /// Superscript on the limit point: `^+`, `^-` or nothing
    pub fn latex_suffix(self) -> &'static str {
        match self {
            Direction::Plus => "^+",
            Direction::Minus => "^-",
            Direction::Both => "",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "+" => Ok(Direction::Plus),
            "-" => Ok(Direction::Minus),
            "+-" | "-+" => Ok(Direction::Both),
            other => Err(CalcError::invalid_syntax(format!(
                "unknown direction '{other}', expected '+', '-' or '+-'"
            ))),
        }
    }
}

/// Dominant behaviour of an expression as `h -> 0+`
#[derive(Debug, Clone, PartialEq)]
enum Trend {
    Lead { exponent: BigRational, coeff: Expr },
    Flat,
    Blowup(i32),
}

pub(crate) fn limit(
    expr: &Expr,
    var: &Symbol,
    point: &Expr,
    direction: Direction,
    config: &EngineConfig,
) -> Result<Expr> {
    if point.contains_symbol(var) {
        return Err(CalcError::PointDependsOnVariable {
            point: point.to_string(),
            var: var.to_string(),
        });
    }
    if !expr.contains_symbol(var) {
        return Ok(expr.clone());
    }
    if point.is_infinite() {
        let approach = Approach::new(point, true)
            .ok_or_else(|| CalcError::undetermined(format!("cannot approach {point}")))?;
        return side_limit(expr, var, &approach, config);
    }
    if point.is_nan() {
        return Err(CalcError::undetermined("the limit point is nan"));
    }
    if let Some(value) = direct_substitution(expr, var, point) {
        debug!(%value, "limit by substitution");
        return Ok(value);
    }

    let right = || side_limit(expr, var, &Approach::Right(point.clone()), config);
    let left = || side_limit(expr, var, &Approach::Left(point.clone()), config);
    match direction {
        Direction::Plus => right(),
        Direction::Minus => left(),
        Direction::Both => {
            let r = right()?;
            let l = left()?;
            if r == l {
                Ok(r)
            } else {
                Err(CalcError::LimitDoesNotExist {
                    left: l.to_string(),
                    right: r.to_string(),
                })
            }
        }
    }
}

/// Value at the point when the expression is plainly continuous there
fn direct_substitution(expr: &Expr, var: &Symbol, point: &Expr) -> Option<Expr> {
    if contains_function(expr, "sign") {
        return None;
    }
    let value = expr.substitute(var, point);
    if !value.is_finite_value() {
        return None;
    }
    if value.free_symbols().is_empty() && value.to_f64().is_none_or(|v| !v.is_finite()) {
        return None;
    }
    Some(value)
}

fn contains_function(expr: &Expr, name: &str) -> bool {
    expr.is_function(name) || expr.children().into_iter().any(|c| contains_function(c, name))
}

fn side_limit(expr: &Expr, var: &Symbol, approach: &Approach, config: &EngineConfig) -> Result<Expr> {
    match trend(expr, var, approach, 0, config)? {
        Trend::Lead { exponent, coeff } => Ok(if exponent.is_positive() {
            Expr::zero()
        } else if exponent.is_zero() {
            coeff
        } else {
            signed_infinity(&coeff)
        }),
        Trend::Flat => Ok(Expr::zero()),
        Trend::Blowup(1) => Ok(Expr::infinity()),
        Trend::Blowup(-1) => Ok(Expr::neg_infinity()),
        Trend::Blowup(_) => Err(CalcError::undetermined(
            "the expression grows without bound but its sign is unknown",
        )),
    }
}

/// `oo` with the sign of `coeff`; `oo*sign(c)` when the sign is symbolic
fn signed_infinity(coeff: &Expr) -> Expr {
    match coeff.numeric_sign() {
        Some(1) => Expr::infinity(),
        Some(_) => Expr::neg_infinity(),
        None => Expr::product(vec![Expr::func("sign", vec![coeff.clone()]), Expr::infinity()]),
    }
}

fn trend(
    expr: &Expr,
    var: &Symbol,
    approach: &Approach,
    depth: usize,
    config: &EngineConfig,
) -> Result<Trend> {
    if depth > MAX_LOG_NESTING {
        return Err(CalcError::undetermined("logarithms nested too deeply"));
    }
    let (h, log_h) = infinitesimal(depth);
    let expr_h = expr.substitute(var, &approach.substitution(&h));
    let max = config.series_max_precision;
    let found = with_growing_cutoff(config.series_precision, max, |cutoff| {
        Ok(match Expander::new(&h, &log_h, cutoff).expand(&expr_h)? {
            Local::Series(s) => match s.terms().first() {
                Some((e, c)) => Attempt::Done(Trend::Lead {
                    exponent: e.clone(),
                    coeff: c.clone(),
                }),
                None if s.prec().is_none() => Attempt::Done(Trend::Lead {
                    exponent: BigRational::zero(),
                    coeff: Expr::zero(),
                }),
                None => Attempt::Retry {
                    next_cutoff: cutoff + (cutoff / 2).max(2),
                },
            },
            Local::Flat(_) => Attempt::Done(Trend::Flat),
            Local::Blowup(sign) => Attempt::Done(Trend::Blowup(sign)),
        })
    })
    .map_err(CalcError::undetermined)?;

    match found {
        Trend::Lead { exponent, coeff } if coeff.contains_symbol(&log_h) => {
            resolve_log_coefficient(exponent, &coeff, &log_h, depth, config)
        }
        other => Ok(other),
    }
}

/// Leading term `coeff(log h) * h^exponent` with `log h -> -oo`
fn resolve_log_coefficient(
    exponent: BigRational,
    coeff: &Expr,
    log_h: &Symbol,
    depth: usize,
    config: &EngineConfig,
) -> Result<Trend> {
    let inner = trend(coeff, log_h, &Approach::NegInfinity, depth + 1, config)?;
    if exponent.is_zero() {
        return Ok(inner);
    }
    // Any power of h dominates the logarithmic factor; only its sign matters
    match inner {
        Trend::Lead { coeff, .. } => Ok(Trend::Lead { exponent, coeff }),
        Trend::Blowup(sign) if sign != 0 => Ok(Trend::Lead {
            exponent,
            coeff: Expr::integer(i64::from(sign)),
        }),
        Trend::Flat if exponent.is_positive() => Ok(Trend::Flat),
        _ => Err(CalcError::undetermined(
            "cannot compare a power with an exponential in the logarithm",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use num_bigint::BigInt;

    fn lim(input: &str, point: &str, direction: Direction) -> Result<Expr> {
        let x = Symbol::parse("x").unwrap();
        limit(
            &parse(input).unwrap(),
            &x,
            &parse(point).unwrap(),
            direction,
            &EngineConfig::default(),
        )
    }

    fn lim_str(input: &str, point: &str, direction: Direction) -> String {
        lim(input, point, direction).unwrap().to_string()
    }

    #[test]
    fn test_sin_x_over_x_every_direction() {
        for direction in Direction::ALL {
            assert_eq!(lim_str("sin(x)/x", "0", direction), "1");
        }
    }

    #[test]
    fn test_one_sided_poles() {
        assert_eq!(lim_str("1/x", "0", Direction::Plus), "oo");
        assert_eq!(lim_str("1/x", "0", Direction::Minus), "-oo");
        let err = lim("1/x", "0", Direction::Both).unwrap_err();
        assert_eq!(
            err,
            CalcError::LimitDoesNotExist {
                left: "-oo".to_string(),
                right: "oo".to_string()
            }
        );
        assert_eq!(lim_str("1/x**2", "0", Direction::Both), "oo");
    }

    #[test]
    fn test_limits_at_infinity() {
        assert_eq!(lim_str("1/x", "oo", Direction::Plus), "0");
        assert_eq!(lim_str("(1 + 1/x)**x", "oo", Direction::Plus), "E");
        assert_eq!(lim_str("exp(x)/x**3", "oo", Direction::Plus), "oo");
        assert_eq!(lim_str("log(x)/x", "oo", Direction::Plus), "0");
        assert_eq!(lim_str("(2*x + 1)/(x - 3)", "oo", Direction::Plus), "2");
        assert_eq!(lim_str("atan(x)", "-oo", Direction::Plus), "-pi/2");
    }

    #[test]
    fn test_logarithmic_limits() {
        assert_eq!(lim_str("x*log(x)", "0", Direction::Plus), "0");
        assert_eq!(lim_str("x**x", "0", Direction::Plus), "1");
        assert_eq!(lim_str("x*log(x)**2", "0", Direction::Plus), "0");
        assert_eq!(lim_str("log(x)", "0", Direction::Plus), "-oo");
    }

    #[test]
    fn test_cancellation() {
        assert_eq!(lim_str("(1 - cos(x))/x**2", "0", Direction::Both), "1/2");
        assert_eq!(lim_str("(exp(x) - 1 - x)/x**2", "0", Direction::Both), "1/2");
        assert_eq!(lim_str("(x**2 - 1)/(x - 1)", "1", Direction::Both), "2");
    }

    #[test]
    fn test_flat_exponential() {
        assert_eq!(lim_str("exp(-1/x)", "0", Direction::Plus), "0");
        assert_eq!(lim_str("exp(-1/x)", "0", Direction::Minus), "oo");
    }

    #[test]
    fn test_substitution_fast_path() {
        assert_eq!(lim_str("x**2 + 1", "2", Direction::Plus), "5");
        let a = Symbol::parse("a").unwrap();
        let x = Symbol::parse("x").unwrap();
        let value = limit(
            &x.clone().sin(),
            &x,
            &a.to_expr(),
            Direction::Both,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(value.to_string(), "sin(a)");
    }

    #[test]
    fn test_oscillation_is_undetermined() {
        assert!(matches!(
            lim("sin(1/x)", "0", Direction::Plus),
            Err(CalcError::LimitUndetermined { .. })
        ));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("+-".parse::<Direction>().unwrap(), Direction::Both);
        assert_eq!(Direction::Minus.latex_suffix(), "^-");
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_trend_of_monomial() {
        let x = Symbol::parse("x").unwrap();
        let t = trend(
            &x.clone().pow(3),
            &x,
            &Approach::Right(Expr::zero()),
            0,
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(
            t,
            Trend::Lead {
                exponent: BigRational::from_integer(BigInt::from(3)),
                coeff: Expr::one()
            }
        );
    }
}
