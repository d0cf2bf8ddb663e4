//! Expansion of an expression in the positive infinitesimal `h`.
//!
//! Besides ordinary series the expander recognises two shapes that no power of
//! `h` describes: quantities smaller than every power (`exp(-1/h)`) and larger
//! than every power (`exp(1/h)`). Both keep a sign so limits can be read off.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use rustc_hash::FxHashMap;

use super::local::{ExpandError, ExpandResult, LocalSeries, coefficient_sign, fail};
use crate::core::{Expr, ExprKind, Number};
use crate::functions;
use crate::symbol::Symbol;

/// Behaviour of an expression as `h -> 0+`
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Local {
    Series(LocalSeries),
    /// Smaller than every positive power of `h`; the sign is 0 when unknown
    Flat(i32),
    /// Larger than every negative power of `h`
    Blowup(i32),
}

pub(crate) struct Expander<'a> {
    h: &'a Symbol,
    log_h: &'a Symbol,
    cutoff: BigRational,
    cache: FxHashMap<Expr, Local>,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(h: &'a Symbol, log_h: &'a Symbol, cutoff: i64) -> Self {
        Expander {
            h,
            log_h,
            cutoff: BigRational::from_integer(BigInt::from(cutoff)),
            cache: FxHashMap::default(),
        }
    }

    pub(crate) fn expand(&mut self, e: &Expr) -> ExpandResult<Local> {
        if !e.contains_symbol(self.h) {
            return Ok(Local::Series(LocalSeries::constant(e.clone())));
        }
        if let Some(hit) = self.cache.get(e) {
            return Ok(hit.clone());
        }
        let out = self.expand_node(e)?;
        self.cache.insert(e.clone(), out.clone());
        Ok(out)
    }

    fn expand_node(&mut self, e: &Expr) -> ExpandResult<Local> {
        match e.kind() {
            ExprKind::Symbol(_) => Ok(Local::Series(LocalSeries::monomial(
                BigRational::from_integer(BigInt::from(1)),
                Expr::one(),
            ))),
            ExprKind::Sum(terms) => {
                let mut acc = Local::Series(LocalSeries::zero());
                for term in terms {
                    let next = self.expand(term)?;
                    acc = add(acc, next)?;
                }
                Ok(acc)
            }
            ExprKind::Product(factors) => {
                let mut acc = Local::Series(LocalSeries::constant(Expr::one()));
                for factor in factors {
                    let next = self.expand(factor)?;
                    acc = self.mul(acc, next)?;
                }
                Ok(acc)
            }
            ExprKind::Pow(base, exp) => self.pow(base, exp),
            ExprKind::FunctionCall { name, args } => match args.as_slice() {
                [arg] if functions::lookup(name).is_some() => self.function(name, arg),
                _ => fail(format!("cannot expand the undefined function {name}")),
            },
            ExprKind::Derivative { .. } => fail("cannot expand an unevaluated derivative"),
            ExprKind::Number(_) | ExprKind::Constant(_) => {
                Ok(Local::Series(LocalSeries::constant(e.clone())))
            }
        }
    }

    fn mul(&self, a: Local, b: Local) -> ExpandResult<Local> {
        Ok(match (a, b) {
            (Local::Series(x), Local::Series(y)) => Local::Series(x.mul(&y, &self.cutoff)),
            (Local::Series(s), Local::Flat(f)) | (Local::Flat(f), Local::Series(s)) => {
                if s.is_exact_zero() {
                    Local::Series(s)
                } else {
                    Local::Flat(f * self.series_sign(&s)?)
                }
            }
            (Local::Series(s), Local::Blowup(b)) | (Local::Blowup(b), Local::Series(s)) => {
                if s.is_exact_zero() {
                    Local::Series(s)
                } else {
                    Local::Blowup(b * self.series_sign(&s)?)
                }
            }
            (Local::Flat(a), Local::Flat(b)) => Local::Flat(a * b),
            (Local::Blowup(a), Local::Blowup(b)) => Local::Blowup(a * b),
            (Local::Flat(_), Local::Blowup(_)) | (Local::Blowup(_), Local::Flat(_)) => {
                return fail("product of a vanishing and an exploding exponential");
            }
        })
    }

    /// Sign of the leading coefficient, 0 when unknown
    fn series_sign(&self, s: &LocalSeries) -> ExpandResult<i32> {
        let (_, c) = s.leading()?;
        Ok(coefficient_sign(c, self.log_h))
    }

    fn pow(&mut self, base: &Expr, exp: &Expr) -> ExpandResult<Local> {
        if exp.contains_symbol(self.h) {
            // u^v = exp(v*log(u))
            let log_base = if base.contains_symbol(self.h) {
                let b = self.expand(base)?;
                self.log(b)?
            } else {
                Local::Series(LocalSeries::constant(functions::func("log", base.clone())))
            };
            let v = self.expand(exp)?;
            let arg = self.mul(v, log_base)?;
            return self.exp(arg);
        }

        let expanded = self.expand(base)?;
        let rational = match exp.as_number() {
            Some(Number::Rational(p)) => Some(p.clone()),
            _ => None,
        };
        match (expanded, rational) {
            (Local::Series(s), Some(p)) => Ok(Local::Series(s.pow_rational(&p, &self.cutoff)?)),
            (Local::Series(s), None) => Ok(Local::Series(s.pow_symbolic(exp, &self.cutoff)?)),
            (Local::Blowup(s), Some(p)) => {
                let sign = power_sign(s, &p)?;
                Ok(if p.is_positive() {
                    Local::Blowup(sign)
                } else {
                    Local::Flat(sign)
                })
            }
            (Local::Flat(s), Some(p)) => {
                let sign = power_sign(s, &p)?;
                Ok(if p.is_positive() {
                    Local::Flat(sign)
                } else {
                    Local::Blowup(sign)
                })
            }
            _ => fail("symbolic power of an exponential"),
        }
    }

    fn exp(&self, arg: Local) -> ExpandResult<Local> {
        match arg {
            Local::Flat(_) => Ok(Local::Series(LocalSeries::constant(Expr::one()))),
            Local::Blowup(1) => Ok(Local::Blowup(1)),
            Local::Blowup(-1) => Ok(Local::Flat(1)),
            Local::Blowup(_) => fail("exponential of a quantity with unknown sign"),
            Local::Series(s) => {
                if let Some((e, c)) = s.terms().first()
                    && e.is_negative()
                {
                    return match coefficient_sign(c, self.log_h) {
                        1 => Ok(Local::Blowup(1)),
                        -1 => Ok(Local::Flat(1)),
                        _ => fail(format!("sign of {c} is unknown")),
                    };
                }
                if !s.is_bounded() {
                    return Err(ExpandError::NeedPrecision);
                }
                Ok(Local::Series(s.exp(&self.cutoff, self.log_h)?))
            }
        }
    }

    fn log(&self, arg: Local) -> ExpandResult<Local> {
        match arg {
            Local::Series(s) => Ok(Local::Series(s.log(&self.cutoff, self.log_h)?)),
            _ => fail("logarithm of an exponential"),
        }
    }

    fn function(&mut self, name: &str, arg: &Expr) -> ExpandResult<Local> {
        let local = self.expand(arg)?;
        match name {
            "exp" => return self.exp(local),
            "log" => return self.log(local),
            // Poles come from the reciprocal of sin or cos
            "tan" | "cot" | "sec" | "csc" => return self.trig_quotient(name, local),
            _ => {}
        }

        let s = match local {
            Local::Series(s) => s,
            Local::Flat(sign) => return flat_argument(name, sign),
            Local::Blowup(sign) => return blowup_argument(name, sign),
        };
        match name {
            "abs" => {
                let sign = self.series_sign(&s)?;
                match sign {
                    0 => fail("sign of the argument of abs is unknown"),
                    _ => Ok(Local::Series(s.scale(&Expr::integer(i64::from(sign))))),
                }
            }
            "sign" => match self.series_sign(&s)? {
                0 => fail("sign of the argument of sign is unknown"),
                sign => Ok(Local::Series(LocalSeries::constant(Expr::integer(i64::from(sign))))),
            },
            _ => {
                if let Some((e, c)) = s.terms().first()
                    && e.is_negative()
                {
                    let sign = coefficient_sign(c, self.log_h);
                    return match name {
                        "atan" if sign != 0 => {
                            // atan(u) = sign(u)*pi/2 - atan(1/u)
                            let tail = s
                                .inverse(&self.cutoff)?
                                .compose_analytic("atan", &self.cutoff)?;
                            let quarter_turn = Expr::product(vec![
                                Expr::rational(i64::from(sign), 2),
                                Expr::pi(),
                            ]);
                            Ok(Local::Series(
                                LocalSeries::constant(quarter_turn).add(&tail.neg()),
                            ))
                        }
                        _ => blowup_argument(name, sign),
                    };
                }
                if !s.is_bounded() {
                    return Err(ExpandError::NeedPrecision);
                }
                if s.constant_term().contains_symbol(self.log_h) {
                    return fail(format!("{name} of a logarithmically growing argument"));
                }
                Ok(Local::Series(s.compose_analytic(name, &self.cutoff)?))
            }
        }
    }

    /// tan, cot, sec and csc through sin and cos
    fn trig_quotient(&self, name: &str, arg: Local) -> ExpandResult<Local> {
        let Local::Series(s) = arg else {
            return fail(format!("{name} oscillates"));
        };
        if s.terms().first().is_some_and(|(e, _)| e.is_negative()) {
            return fail(format!("{name} oscillates"));
        }
        if !s.is_bounded() {
            return Err(ExpandError::NeedPrecision);
        }
        let sin = s.compose_analytic("sin", &self.cutoff)?;
        let cos = s.compose_analytic("cos", &self.cutoff)?;
        let out = match name {
            "tan" => sin.mul(&cos.inverse(&self.cutoff)?, &self.cutoff),
            "cot" => cos.mul(&sin.inverse(&self.cutoff)?, &self.cutoff),
            "sec" => cos.inverse(&self.cutoff)?,
            _ => sin.inverse(&self.cutoff)?,
        };
        Ok(Local::Series(out))
    }
}

fn add(a: Local, b: Local) -> ExpandResult<Local> {
    Ok(match (a, b) {
        (Local::Series(x), Local::Series(y)) => Local::Series(x.add(&y)),
        (Local::Series(s), Local::Flat(f)) | (Local::Flat(f), Local::Series(s)) => {
            if s.is_exact_zero() {
                Local::Flat(f)
            } else {
                Local::Series(s)
            }
        }
        (Local::Flat(a), Local::Flat(b)) => Local::Flat(if a == b { a } else { 0 }),
        (Local::Blowup(s), Local::Series(_) | Local::Flat(_))
        | (Local::Series(_) | Local::Flat(_), Local::Blowup(s)) => Local::Blowup(s),
        (Local::Blowup(a), Local::Blowup(b)) if a == b && a != 0 => Local::Blowup(a),
        (Local::Blowup(_), Local::Blowup(_)) => {
            return fail("difference of competing exponential growth");
        }
    })
}

/// Sign of `s^p` for a sign `s` and rational `p`
fn power_sign(sign: i32, p: &BigRational) -> ExpandResult<i32> {
    if sign >= 0 {
        return Ok(sign);
    }
    if !p.is_integer() {
        return fail("fractional power of a negative quantity");
    }
    let odd = !(p.to_integer() % BigInt::from(2)).is_zero();
    Ok(if odd { -1 } else { 1 })
}

/// `f(u)` for `u` smaller than every power of `h`
fn flat_argument(name: &str, sign: i32) -> ExpandResult<Local> {
    let at_zero = functions::func(name, Expr::zero());
    if at_zero.is_zero() {
        // Odd functions with unit slope at the origin keep the argument's sign
        Ok(Local::Flat(sign))
    } else if at_zero.is_finite_value() {
        Ok(Local::Series(LocalSeries::constant(at_zero)))
    } else {
        fail(format!("{name} is singular at 0"))
    }
}

/// `f(u)` for `u` larger than every power of `h`, where it has a limit
fn blowup_argument(name: &str, sign: i32) -> ExpandResult<Local> {
    if sign == 0 {
        return fail(format!("sign of the argument of {name} is unknown"));
    }
    let constant = |e: Expr| Ok(Local::Series(LocalSeries::constant(e)));
    match name {
        "cosh" => Ok(Local::Blowup(1)),
        "sinh" => Ok(Local::Blowup(sign)),
        "abs" => Ok(Local::Blowup(1)),
        "tanh" | "sign" => constant(Expr::integer(i64::from(sign))),
        "atan" => constant(Expr::product(vec![
            Expr::rational(i64::from(sign), 2),
            Expr::pi(),
        ])),
        _ => fail(format!("{name} oscillates or is undefined for a growing argument")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn expand(input: &str, cutoff: i64) -> Local {
        let h = Symbol::new_unchecked("x");
        let log_h = Symbol::new_unchecked("λ");
        let e = parse(input).unwrap();
        Expander::new(&h, &log_h, cutoff).expand(&e).unwrap()
    }

    fn leading(local: &Local) -> (String, String) {
        match local {
            Local::Series(s) => {
                let (e, c) = s.terms().first().unwrap();
                (e.to_string(), c.to_string())
            }
            other => panic!("expected a series, got {other:?}"),
        }
    }

    #[test]
    fn test_sin_over_x() {
        assert_eq!(leading(&expand("sin(x)/x", 4)), ("0".into(), "1".into()));
    }

    #[test]
    fn test_cancellation_needs_order() {
        assert_eq!(leading(&expand("(1 - cos(x))/x**2", 4)), ("0".into(), "1/2".into()));
    }

    #[test]
    fn test_flat_and_blowup() {
        assert_eq!(expand("exp(-1/x)", 4), Local::Flat(1));
        assert_eq!(expand("exp(1/x)*x**3", 4), Local::Blowup(1));
        assert_eq!(expand("-exp(1/x)", 4), Local::Blowup(-1));
    }

    #[test]
    fn test_laurent_cot() {
        assert_eq!(leading(&expand("cot(x)", 4)), ("-1".into(), "1".into()));
    }

    #[test]
    fn test_oscillation_fails() {
        let h = Symbol::new_unchecked("x");
        let log_h = Symbol::new_unchecked("λ");
        let e = parse("sin(1/x)").unwrap();
        assert!(matches!(
            Expander::new(&h, &log_h, 4).expand(&e),
            Err(ExpandError::Fail(_))
        ));
    }
}
