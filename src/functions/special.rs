//! Exact special values applied when a built-in call is constructed.
//!
//! sin/cos are folded at multiples of pi/6 and pi/4, inverse functions at the
//! matching arguments, and exp/log cancel each other.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::{even_symmetry, func, mul, neg, odd_symmetry, unary};
use crate::core::{Constant, Expr, ExprKind, Number};

fn ratio(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

/// `q` such that `e == q*pi`
fn pi_coefficient(e: &Expr) -> Option<BigRational> {
    match e.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(r.clone()),
        ExprKind::Constant(Constant::Pi) => Some(BigRational::one()),
        ExprKind::Product(factors) => match factors.as_slice() {
            [coeff, pi] if pi.as_constant() == Some(Constant::Pi) => {
                coeff.as_number()?.as_rational().cloned()
            }
            _ => None,
        },
        _ => None,
    }
}

fn sqrt_of(n: i64) -> Expr {
    Expr::pow(Expr::integer(n), Expr::half())
}

/// sin(q*pi) for the angles with radical values
fn sin_pi(q: &BigRational) -> Option<Expr> {
    let two = ratio(2, 1);
    let one = BigRational::one();
    let half = ratio(1, 2);
    let mut r = q - (q / &two).floor() * &two;
    let mut negative = false;
    if r >= one {
        r -= &one;
        negative = true;
    }
    if r > half {
        r = &one - &r;
    }
    let value = if r.is_zero() {
        Expr::zero()
    } else if r == ratio(1, 6) {
        Expr::half()
    } else if r == ratio(1, 4) {
        mul(Expr::half(), sqrt_of(2))
    } else if r == ratio(1, 3) {
        mul(Expr::half(), sqrt_of(3))
    } else if r == half {
        Expr::one()
    } else {
        return None;
    };
    Some(if negative { neg(value) } else { value })
}

fn cos_pi(q: &BigRational) -> Option<Expr> {
    sin_pi(&(q + ratio(1, 2)))
}

/// numerator/denominator with a zero denominator mapped to `zoo`
fn trig_ratio(numer: Expr, denom: Expr) -> Expr {
    if denom.is_zero() {
        Expr::zoo()
    } else {
        Expr::div(numer, denom)
    }
}

pub(super) fn sin(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(q) = pi_coefficient(u)
        && let Some(v) = sin_pi(&q)
    {
        return Some(v);
    }
    if let Some(inner) = u.unary_arg("asin") {
        return Some(inner.clone());
    }
    odd_symmetry("sin", u)
}

pub(super) fn cos(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(q) = pi_coefficient(u)
        && let Some(v) = cos_pi(&q)
    {
        return Some(v);
    }
    if let Some(inner) = u.unary_arg("acos") {
        return Some(inner.clone());
    }
    even_symmetry("cos", u)
}

pub(super) fn tan(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(q) = pi_coefficient(u)
        && let (Some(s), Some(c)) = (sin_pi(&q), cos_pi(&q))
    {
        return Some(trig_ratio(s, c));
    }
    if let Some(inner) = u.unary_arg("atan") {
        return Some(inner.clone());
    }
    odd_symmetry("tan", u)
}

pub(super) fn cot(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(q) = pi_coefficient(u)
        && let (Some(s), Some(c)) = (sin_pi(&q), cos_pi(&q))
    {
        return Some(trig_ratio(c, s));
    }
    odd_symmetry("cot", u)
}

pub(super) fn sec(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(q) = pi_coefficient(u)
        && let Some(c) = cos_pi(&q)
    {
        return Some(trig_ratio(Expr::one(), c));
    }
    even_symmetry("sec", u)
}

pub(super) fn csc(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(q) = pi_coefficient(u)
        && let Some(s) = sin_pi(&q)
    {
        return Some(trig_ratio(Expr::one(), s));
    }
    odd_symmetry("csc", u)
}

fn pi_times(n: i64, d: i64) -> Expr {
    mul(Expr::rational(n, d), Expr::pi())
}

pub(super) fn asin(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(Number::Rational(r)) = u.as_number() {
        if r.is_zero() {
            return Some(Expr::zero());
        }
        if *r == ratio(1, 2) {
            return Some(pi_times(1, 6));
        }
        if r.is_one() {
            return Some(pi_times(1, 2));
        }
    }
    odd_symmetry("asin", u)
}

pub(super) fn acos(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    if let Some(Number::Rational(r)) = u.as_number() {
        if r.is_negative() {
            // acos(-v) = pi - acos(v)
            let reflected = func("acos", Expr::number(Number::Rational(-r)));
            if !reflected.is_function("acos") {
                return Some(Expr::sub(Expr::pi(), reflected));
            }
            return None;
        }
        if r.is_zero() {
            return Some(pi_times(1, 2));
        }
        if *r == ratio(1, 2) {
            return Some(pi_times(1, 3));
        }
        if r.is_one() {
            return Some(Expr::zero());
        }
    }
    None
}

pub(super) fn atan(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(Expr::zero()),
        ExprKind::Number(Number::Rational(r)) if r.is_one() => Some(pi_times(1, 4)),
        ExprKind::Constant(Constant::Infinity) => Some(pi_times(1, 2)),
        ExprKind::Constant(Constant::NegInfinity) => Some(pi_times(-1, 2)),
        _ => odd_symmetry("atan", u),
    }
}

pub(super) fn sinh(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(Expr::zero()),
        ExprKind::Constant(Constant::Infinity | Constant::NegInfinity) => Some(u.clone()),
        _ => odd_symmetry("sinh", u),
    }
}

pub(super) fn cosh(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(Expr::one()),
        ExprKind::Constant(Constant::Infinity | Constant::NegInfinity) => Some(Expr::infinity()),
        _ => even_symmetry("cosh", u),
    }
}

pub(super) fn tanh(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(Expr::zero()),
        ExprKind::Constant(Constant::Infinity) => Some(Expr::one()),
        ExprKind::Constant(Constant::NegInfinity) => Some(Expr::minus_one()),
        _ => odd_symmetry("tanh", u),
    }
}

pub(super) fn exp(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(Expr::one()),
        ExprKind::Number(Number::Rational(r)) if r.is_one() => Some(Expr::e()),
        ExprKind::Constant(Constant::Infinity) => Some(Expr::infinity()),
        ExprKind::Constant(Constant::NegInfinity) => Some(Expr::zero()),
        ExprKind::Constant(Constant::ComplexInfinity) => Some(Expr::nan()),
        ExprKind::FunctionCall { .. } => u.unary_arg("log").cloned(),
        // exp(k*log(v)) = v^k
        ExprKind::Product(factors) => match factors.as_slice() {
            [k, log] if k.is_number() => log
                .unary_arg("log")
                .map(|v| Expr::pow(v.clone(), k.clone())),
            _ => None,
        },
        _ => None,
    }
}

pub(super) fn log(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(Number::Rational(r)) if r.is_one() => Some(Expr::zero()),
        ExprKind::Number(Number::Rational(r)) if r.is_zero() => Some(Expr::zoo()),
        ExprKind::Constant(Constant::E) => Some(Expr::one()),
        ExprKind::Constant(Constant::Infinity | Constant::ComplexInfinity) => {
            Some(Expr::infinity())
        }
        ExprKind::FunctionCall { .. } => u.unary_arg("exp").cloned(),
        _ => None,
    }
}

pub(super) fn abs(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(n) => Some(Expr::number(n.abs())),
        ExprKind::Constant(Constant::Pi | Constant::E) => Some(u.clone()),
        ExprKind::Constant(Constant::Infinity | Constant::NegInfinity) => Some(Expr::infinity()),
        ExprKind::FunctionCall { name, .. } if &**name == "abs" => Some(u.clone()),
        _ => even_symmetry("abs", u),
    }
}

pub(super) fn sign(args: &[Expr]) -> Option<Expr> {
    let u = unary(args)?;
    match u.kind() {
        ExprKind::Number(n) => Some(Expr::integer(i64::from(n.signum()))),
        ExprKind::Constant(Constant::Pi | Constant::E | Constant::Infinity) => Some(Expr::one()),
        ExprKind::Constant(Constant::NegInfinity) => Some(Expr::minus_one()),
        _ => odd_symmetry("sign", u),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn test_trig_special_values() {
        assert_eq!(Expr::func("sin", vec![Expr::pi()]), Expr::zero());
        let half_pi = mul(Expr::half(), Expr::pi());
        assert_eq!(Expr::func("sin", vec![half_pi.clone()]), Expr::one());
        assert_eq!(Expr::func("cos", vec![half_pi.clone()]), Expr::zero());
        assert_eq!(Expr::func("tan", vec![half_pi]), Expr::zoo());
        let sixth = pi_times(1, 6);
        assert_eq!(Expr::func("sin", vec![sixth]), Expr::half());
        let quarter = pi_times(1, 4);
        assert_eq!(Expr::func("cos", vec![quarter]).to_string(), "sqrt(2)/2");
        assert_eq!(Expr::func("cos", vec![Expr::pi()]), Expr::minus_one());
    }

    #[test]
    fn test_symmetry() {
        let x = Symbol::parse("x").unwrap();
        assert_eq!(Expr::func("sin", vec![-x.to_expr()]).to_string(), "-sin(x)");
        assert_eq!(Expr::func("cos", vec![-x.to_expr()]).to_string(), "cos(x)");
    }

    #[test]
    fn test_exp_log_cancel() {
        let x = Symbol::parse("x").unwrap();
        assert_eq!(x.clone().ln().exp(), x.to_expr());
        assert_eq!(x.clone().exp().ln(), x.to_expr());
        assert_eq!(Expr::func("log", vec![Expr::e()]), Expr::one());
        let squared = Expr::func("exp", vec![mul(Expr::integer(2), x.clone().ln())]);
        assert_eq!(squared, x.pow(2));
    }

    #[test]
    fn test_inverse_values() {
        assert_eq!(Expr::func("atan", vec![Expr::infinity()]).to_string(), "pi/2");
        assert_eq!(Expr::func("acos", vec![Expr::minus_one()]), Expr::pi());
        assert_eq!(Expr::func("asin", vec![Expr::one()]), pi_times(1, 2));
    }
}
