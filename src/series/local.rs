//! Truncated Puiseux series in a positive infinitesimal `h`.
//!
//! A [`LocalSeries`] is `c_0 h^(e_0) + c_1 h^(e_1) + ... + O(h^p)` with strictly
//! increasing rational exponents and coefficients free of `h`. Coefficients may
//! mention the symbol standing for `log(h)`, which grows slower than any power.
//! A missing precision means the series is exact up to terms beyond all orders.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::core::number::factorial;
use crate::core::{Expr, Number};
use crate::diff::derive_n;
use crate::functions;
use crate::symbol::Symbol;

/// Why an expansion could not be produced
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExpandError {
    /// Cancellation consumed every known term; retry with a larger cutoff
    NeedPrecision,
    /// The expression has no expansion of this kind
    Fail(String),
}

pub(crate) type ExpandResult<T> = std::result::Result<T, ExpandError>;

pub(crate) fn fail<T>(reason: impl Into<String>) -> ExpandResult<T> {
    Err(ExpandError::Fail(reason.into()))
}

fn min_prec(a: Option<BigRational>, b: Option<BigRational>) -> Option<BigRational> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn rational_expr(r: &BigRational) -> Expr {
    Expr::number(Number::Rational(r.clone()))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocalSeries {
    terms: Vec<(BigRational, Expr)>,
    prec: Option<BigRational>,
}

impl LocalSeries {
    pub(crate) fn zero() -> Self {
        LocalSeries {
            terms: Vec::new(),
            prec: None,
        }
    }

    pub(crate) fn constant(c: Expr) -> Self {
        Self::monomial(BigRational::zero(), c)
    }

    pub(crate) fn monomial(exponent: BigRational, coeff: Expr) -> Self {
        Self::normalize(vec![(exponent, coeff)], None)
    }

    /// Sort, merge equal exponents, drop zeros and terms at or past `prec`
    fn normalize(terms: Vec<(BigRational, Expr)>, prec: Option<BigRational>) -> Self {
        let mut grouped: BTreeMap<BigRational, Vec<Expr>> = BTreeMap::new();
        for (e, c) in terms {
            if prec.as_ref().is_some_and(|p| e >= *p) {
                continue;
            }
            grouped.entry(e).or_default().push(c);
        }
        let terms = grouped
            .into_iter()
            .filter_map(|(e, mut group)| {
                let coeff = if group.len() == 1 {
                    group.pop()?
                } else {
                    Expr::sum(group).expand()
                };
                (!coeff.is_zero()).then_some((e, coeff))
            })
            .collect();
        LocalSeries { terms, prec }
    }

    pub(crate) fn terms(&self) -> &[(BigRational, Expr)] {
        &self.terms
    }

    pub(crate) fn prec(&self) -> Option<&BigRational> {
        self.prec.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Vec<(BigRational, Expr)>, Option<BigRational>) {
        (self.terms, self.prec)
    }

    pub(crate) fn is_exact_zero(&self) -> bool {
        self.terms.is_empty() && self.prec.is_none()
    }

    /// Leading term; `NeedPrecision` when only the error term is known
    pub(crate) fn leading(&self) -> ExpandResult<(&BigRational, &Expr)> {
        match self.terms.first() {
            Some((e, c)) => Ok((e, c)),
            None if self.prec.is_some() => Err(ExpandError::NeedPrecision),
            None => fail("division by zero"),
        }
    }

    /// Exponent of the leading term, or of the error term when nothing is known
    fn valuation(&self) -> Option<BigRational> {
        self.terms
            .first()
            .map(|(e, _)| e.clone())
            .or_else(|| self.prec.clone())
    }

    /// Coefficient of `h^0`, zero when absent
    pub(crate) fn constant_term(&self) -> Expr {
        self.terms
            .iter()
            .find(|(e, _)| e.is_zero())
            .map_or_else(Expr::zero, |(_, c)| c.clone())
    }

    /// The series minus its `h^0` term
    fn without_constant(&self) -> Self {
        LocalSeries {
            terms: self
                .terms
                .iter()
                .filter(|(e, _)| !e.is_zero())
                .cloned()
                .collect(),
            prec: self.prec.clone(),
        }
    }

    /// True when the value at `h = 0` is determined and finite
    pub(crate) fn is_bounded(&self) -> bool {
        self.terms.first().is_none_or(|(e, _)| !e.is_negative())
            && self.prec.as_ref().is_none_or(BigRational::is_positive)
    }

    pub(crate) fn add(&self, other: &Self) -> Self {
        let prec = min_prec(self.prec.clone(), other.prec.clone());
        let terms = self.terms.iter().chain(&other.terms).cloned().collect();
        Self::normalize(terms, prec)
    }

    pub(crate) fn neg(&self) -> Self {
        self.scale(&Expr::minus_one())
    }

    pub(crate) fn scale(&self, c: &Expr) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        let terms = self
            .terms
            .iter()
            .map(|(e, coeff)| (e.clone(), Expr::product(vec![coeff.clone(), c.clone()])))
            .collect();
        Self::normalize(terms, self.prec.clone())
    }

    /// Multiply by `h^k`
    pub(crate) fn shift(&self, k: &BigRational) -> Self {
        LocalSeries {
            terms: self
                .terms
                .iter()
                .map(|(e, c)| (e + k, c.clone()))
                .collect(),
            prec: self.prec.as_ref().map(|p| p + k),
        }
    }

    /// Drop terms at or past `cutoff`; precision only drops if a term was removed
    pub(crate) fn truncate(mut self, cutoff: &BigRational) -> Self {
        if self.terms.last().is_some_and(|(e, _)| e >= cutoff) {
            self.terms.retain(|(e, _)| e < cutoff);
            self.prec = min_prec(self.prec, Some(cutoff.clone()));
        }
        self
    }

    pub(crate) fn mul(&self, other: &Self, cutoff: &BigRational) -> Self {
        let (Some(va), Some(vb)) = (self.valuation(), other.valuation()) else {
            return Self::zero();
        };
        let mut prec = min_prec(
            self.prec.as_ref().map(|p| p + &vb),
            other.prec.as_ref().map(|p| p + &va),
        );
        let mut terms = Vec::with_capacity(self.terms.len() * other.terms.len());
        let mut dropped = false;
        for (ea, ca) in &self.terms {
            for (eb, cb) in &other.terms {
                let e = ea + eb;
                if prec.as_ref().is_some_and(|p| e >= *p) {
                    continue;
                }
                if e >= *cutoff {
                    dropped = true;
                    continue;
                }
                terms.push((e, Expr::product(vec![ca.clone(), cb.clone()])));
            }
        }
        if dropped {
            prec = min_prec(prec, Some(cutoff.clone()));
        }
        Self::normalize(terms, prec)
    }

    /// `self / (c_0 h^(e_0)) - 1`, a series of positive valuation
    fn unit_remainder(&self) -> ExpandResult<Self> {
        let (e0, c0) = self.leading()?;
        let terms = self.terms[1..]
            .iter()
            .map(|(e, c)| (e - e0, Expr::div(c.clone(), c0.clone())))
            .collect();
        Ok(Self::normalize(terms, self.prec.as_ref().map(|p| p - e0)))
    }

    pub(crate) fn inverse(&self, cutoff: &BigRational) -> ExpandResult<Self> {
        let (e0, c0) = self.leading()?;
        let (e0, c0) = (e0.clone(), c0.clone());
        let r = self.unit_remainder()?;
        let alternating = |k: u32| {
            Ok(if k % 2 == 0 {
                Expr::one()
            } else {
                Expr::minus_one()
            })
        };
        let sum = compose_unit(&r, alternating, &(cutoff + &e0), None)?;
        Ok(sum.scale(&Expr::recip(c0)).shift(&-e0).truncate(cutoff))
    }

    /// `self^p` for a rational exponent via the binomial series
    pub(crate) fn pow_rational(&self, p: &BigRational, cutoff: &BigRational) -> ExpandResult<Self> {
        if self.is_exact_zero() {
            return if p.is_positive() {
                Ok(Self::zero())
            } else {
                fail("division by zero")
            };
        }
        let (e0, c0) = self.leading()?;
        if !p.is_integer() && c0.numeric_sign() == Some(-1) {
            return fail("fractional power of a negative quantity");
        }
        let head = Expr::pow(c0.clone(), rational_expr(p));
        let shift = e0 * p;
        let r = self.unit_remainder()?;
        let polynomial_degree = (p.is_integer() && !p.is_negative())
            .then(|| p.to_integer().to_u32())
            .flatten();
        let binomial = |k: u32| Ok(rational_expr(&binomial_rational(p, k)));
        let sum = compose_unit(&r, binomial, &(cutoff - &shift), polynomial_degree)?;
        Ok(sum.scale(&head).shift(&shift).truncate(cutoff))
    }

    /// `self^p` for an exponent free of `h` that is not a rational number
    pub(crate) fn pow_symbolic(&self, p: &Expr, cutoff: &BigRational) -> ExpandResult<Self> {
        let (e0, c0) = self.leading()?;
        if !e0.is_zero() {
            return fail("symbolic power of a vanishing or infinite base");
        }
        let head = Expr::pow(c0.clone(), p.clone());
        let r = self.unit_remainder()?;
        let binomial = |k: u32| {
            let falling: Vec<Expr> = (0..k)
                .map(|i| Expr::sub(p.clone(), Expr::from(i)))
                .collect();
            Ok(Expr::div(
                Expr::product(falling),
                Expr::from(factorial_expr(k)),
            ))
        };
        let sum = compose_unit(&r, binomial, cutoff, None)?;
        Ok(sum.scale(&head).truncate(cutoff))
    }

    /// `exp(self)` for a series bounded at `h = 0`
    ///
    /// A constant term `k*log(h) + b` with rational `k` becomes `h^k * exp(b)`.
    pub(crate) fn exp(&self, cutoff: &BigRational, log_h: &Symbol) -> ExpandResult<Self> {
        let c0 = self.constant_term();
        let (k, b) = split_log_linear(&c0, log_h)?;
        let r = self.without_constant();
        let inverse_factorial = |n: u32| Ok(Expr::recip(Expr::from(factorial_expr(n))));
        let sum = compose_unit(&r, inverse_factorial, &(cutoff - &k), None)?;
        Ok(sum
            .scale(&functions::func("exp", b))
            .shift(&k)
            .truncate(cutoff))
    }

    /// `log(self)`; the leading power contributes `e_0 * log(h)`
    pub(crate) fn log(&self, cutoff: &BigRational, log_h: &Symbol) -> ExpandResult<Self> {
        let (e0, c0) = self.leading()?;
        if c0.numeric_sign() == Some(-1) {
            return fail("logarithm of a negative quantity");
        }
        let head = Expr::sum(vec![
            functions::func("log", c0.clone()),
            Expr::product(vec![rational_expr(e0), log_h.to_expr()]),
        ]);
        let r = self.unit_remainder()?;
        let log_coeff = |k: u32| {
            Ok(match k {
                0 => Expr::zero(),
                k if k % 2 == 1 => Expr::rational(1, i64::from(k)),
                k => Expr::rational(-1, i64::from(k)),
            })
        };
        let sum = compose_unit(&r, log_coeff, cutoff, None)?;
        Ok(sum.add(&Self::constant(head)))
    }

    /// `f(self)` for a function analytic at the constant term
    ///
    /// Taylor coefficients come from repeated symbolic differentiation of
    /// `f(t)` at `t = c_0`.
    pub(crate) fn compose_analytic(&self, name: &str, cutoff: &BigRational) -> ExpandResult<Self> {
        let c0 = self.constant_term();
        let r = self.without_constant();
        let t = Symbol::new_unchecked("τ");
        let mut derivative = functions::func(name, t.to_expr());
        let coeff = |k: u32| {
            if k > 0 {
                derivative = derive_n(&derivative, &t, 1).expand();
            }
            let value = Expr::div(
                derivative.substitute(&t, &c0),
                Expr::from(factorial_expr(k)),
            );
            if value.is_finite_value() {
                Ok(value)
            } else {
                fail(format!("{name} is not analytic at {c0}"))
            }
        };
        compose_unit(&r, coeff, cutoff, None)
    }
}

fn factorial_expr(k: u32) -> BigRational {
    BigRational::from_integer(factorial(k))
}

/// `p choose k` for rational `p`
fn binomial_rational(p: &BigRational, k: u32) -> BigRational {
    let mut acc = BigRational::one();
    for i in 0..k {
        acc *= p - BigRational::from_integer(BigInt::from(i));
    }
    acc / factorial_expr(k)
}

/// `c == k*log_h + b` with rational `k` and `b` free of `log_h`
fn split_log_linear(c: &Expr, log_h: &Symbol) -> ExpandResult<(BigRational, Expr)> {
    if !c.contains_symbol(log_h) {
        return Ok((BigRational::zero(), c.clone()));
    }
    match c.polynomial_coeffs(log_h).as_deref() {
        Some([b, k]) if !b.contains_symbol(log_h) => match k.as_number() {
            Some(Number::Rational(k)) => Ok((k.clone(), b.clone())),
            _ => fail("exponential of a symbolic power of the variable"),
        },
        _ => fail("exponential of a nonlinear logarithmic term"),
    }
}

/// `sum a_k r^k` for `r` of positive valuation, accurate below `cutoff`
///
/// `degree` bounds the series when the coefficients vanish past it.
pub(crate) fn compose_unit(
    r: &LocalSeries,
    mut coeff: impl FnMut(u32) -> ExpandResult<Expr>,
    cutoff: &BigRational,
    degree: Option<u32>,
) -> ExpandResult<LocalSeries> {
    let mut result = LocalSeries::constant(coeff(0)?);
    let Some(v) = r.valuation() else {
        return Ok(result);
    };
    if !v.is_positive() {
        return fail("composition needs a vanishing argument");
    }

    let mut power = r.clone();
    let mut k: u32 = 1;
    loop {
        if degree.is_some_and(|d| k > d) {
            return Ok(result);
        }
        let reach = &v * BigRational::from_integer(BigInt::from(k));
        if reach >= *cutoff {
            result.prec = min_prec(result.prec, Some(reach));
            return Ok(result);
        }
        let a_k = coeff(k)?;
        if !a_k.is_zero() {
            result = result.add(&power.scale(&a_k));
        }
        power = power.mul(r, cutoff);
        k += 1;
    }
}

/// Sign of a coefficient as `log(h) -> -oo`; 0 when unknown
pub(crate) fn coefficient_sign(c: &Expr, log_h: &Symbol) -> i32 {
    if !c.contains_symbol(log_h) {
        return c.numeric_sign().unwrap_or(0);
    }
    match c.polynomial_coeffs(log_h) {
        Some(coeffs) if !coeffs.is_empty() => {
            let degree = coeffs.len() - 1;
            let sign = coeffs[degree]
                .numeric_sign()
                .unwrap_or(0);
            if degree % 2 == 1 { -sign } else { sign }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn h_series() -> LocalSeries {
        LocalSeries::monomial(r(1), Expr::one())
    }

    #[test]
    fn test_mul_tracks_precision() {
        let a = LocalSeries::normalize(vec![(r(0), Expr::one()), (r(1), Expr::one())], Some(r(3)));
        let b = LocalSeries::monomial(r(-1), Expr::one());
        let product = a.mul(&b, &r(10));
        assert_eq!(product.prec(), Some(&r(2)));
        assert_eq!(product.terms().len(), 2);
    }

    #[test]
    fn test_inverse_of_one_plus_h() {
        let one_plus_h = LocalSeries::constant(Expr::one()).add(&h_series());
        let inv = one_plus_h.inverse(&r(4)).unwrap();
        let coeffs: Vec<String> = inv.terms().iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(coeffs, vec!["1", "-1", "1", "-1"]);
        assert_eq!(inv.prec(), Some(&r(4)));
    }

    #[test]
    fn test_exact_polynomial_power() {
        let one_plus_h = LocalSeries::constant(Expr::one()).add(&h_series());
        let squared = one_plus_h.pow_rational(&r(2), &r(10)).unwrap();
        assert!(squared.prec().is_none());
        let coeffs: Vec<String> = squared.terms().iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(coeffs, vec!["1", "2", "1"]);
    }

    #[test]
    fn test_exp_coefficients() {
        let log_h = Symbol::new_unchecked("λ");
        let e = h_series().exp(&r(4), &log_h).unwrap();
        let coeffs: Vec<String> = e.terms().iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(coeffs, vec!["1", "1", "1/2", "1/6"]);
    }

    #[test]
    fn test_log_of_monomial_introduces_log_symbol() {
        let log_h = Symbol::new_unchecked("λ");
        let l = h_series().log(&r(4), &log_h).unwrap();
        assert_eq!(l.terms().len(), 1);
        assert_eq!(l.terms()[0].1, log_h.to_expr());
    }

    #[test]
    fn test_sin_composition() {
        let s = h_series().compose_analytic("sin", &r(6)).unwrap();
        let coeffs: Vec<String> = s.terms().iter().map(|(_, c)| c.to_string()).collect();
        assert_eq!(coeffs, vec!["1", "-1/6", "1/120"]);
    }

    #[test]
    fn test_coefficient_sign_with_log() {
        let log_h = Symbol::new_unchecked("λ");
        assert_eq!(coefficient_sign(&log_h.to_expr(), &log_h), -1);
        let squared = Expr::pow(log_h.to_expr(), Expr::integer(2));
        assert_eq!(coefficient_sign(&squared, &log_h), 1);
    }
}
