//! Expression constructors.
//!
//! Every constructor returns a canonical node: sums and products are flattened,
//! numbers folded, like terms and like bases collected, and children sorted.

use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use rustc_hash::FxHashMap;

use super::{Constant, Expr, ExprKind, Number, expr_cmp};
use crate::functions;
use crate::symbol::Symbol;

/// Passes `product` may take when collapsed powers produce new factors
const MAX_PRODUCT_PASSES: u8 = 4;

/// Largest prime tried when pulling perfect powers out of a root
const ROOT_TRIAL_LIMIT: u32 = 1000;

impl Expr {
    // -------------------------------------------------------------------------
    // Atoms
    // -------------------------------------------------------------------------

    /// Numeric atom; non-finite floats become the matching constant
    #[must_use]
    pub fn number(n: Number) -> Self {
        match n {
            Number::Float(f) if f.is_nan() => Self::nan(),
            Number::Float(f) if f == f64::INFINITY => Self::infinity(),
            Number::Float(f) if f == f64::NEG_INFINITY => Self::neg_infinity(),
            n => Self::new(ExprKind::Number(n)),
        }
    }

    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self::number(Number::int(n))
    }

    /// Exact fraction; a zero denominator gives `zoo`
    #[must_use]
    pub fn rational(n: i64, d: i64) -> Self {
        if d == 0 {
            return if n == 0 { Self::nan() } else { Self::zoo() };
        }
        Self::number(Number::ratio(n, d))
    }

    #[must_use]
    pub fn float(v: f64) -> Self {
        Self::number(Number::Float(v))
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::integer(0)
    }

    #[must_use]
    pub fn one() -> Self {
        Self::integer(1)
    }

    #[must_use]
    pub fn minus_one() -> Self {
        Self::integer(-1)
    }

    #[must_use]
    pub fn half() -> Self {
        Self::rational(1, 2)
    }

    pub fn symbol(s: Symbol) -> Self {
        Self::new(ExprKind::Symbol(s))
    }

    #[must_use]
    pub fn constant(c: Constant) -> Self {
        Self::new(ExprKind::Constant(c))
    }

    #[must_use]
    pub fn pi() -> Self {
        Self::constant(Constant::Pi)
    }

    #[must_use]
    pub fn e() -> Self {
        Self::constant(Constant::E)
    }

    #[must_use]
    pub fn infinity() -> Self {
        Self::constant(Constant::Infinity)
    }

    #[must_use]
    pub fn neg_infinity() -> Self {
        Self::constant(Constant::NegInfinity)
    }

    #[must_use]
    pub fn zoo() -> Self {
        Self::constant(Constant::ComplexInfinity)
    }

    #[must_use]
    pub fn nan() -> Self {
        Self::constant(Constant::NaN)
    }

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------

    /// N-ary sum: flattens, folds numbers, collects like terms, sorts
    #[must_use]
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut numeric = Number::zero();
        let mut pos_inf = false;
        let mut neg_inf = false;
        let mut complex_inf = false;
        let mut index: FxHashMap<Expr, usize> = FxHashMap::default();
        let mut collected: Vec<(Expr, Number)> = Vec::new();

        let mut pending = terms;
        while let Some(term) = pending.pop() {
            match term.kind() {
                ExprKind::Sum(inner) => pending.extend(inner.iter().cloned()),
                ExprKind::Number(n) => numeric = numeric.add(n),
                ExprKind::Constant(Constant::NaN) => return Self::nan(),
                ExprKind::Constant(Constant::Infinity) => pos_inf = true,
                ExprKind::Constant(Constant::NegInfinity) => neg_inf = true,
                ExprKind::Constant(Constant::ComplexInfinity) => complex_inf = true,
                _ => {
                    let (coeff, rest) = split_coeff(&term);
                    if let Some(&i) = index.get(&rest) {
                        collected[i].1 = collected[i].1.add(&coeff);
                    } else {
                        index.insert(rest.clone(), collected.len());
                        collected.push((rest, coeff));
                    }
                }
            }
        }

        match (pos_inf, neg_inf, complex_inf) {
            (true, true, _) | (true, _, true) | (_, true, true) => return Self::nan(),
            (_, _, true) => return Self::zoo(),
            (true, _, _) => return Self::infinity(),
            (_, true, _) => return Self::neg_infinity(),
            _ => {}
        }

        let mut out: Vec<Expr> = Vec::with_capacity(collected.len() + 1);
        for (rest, coeff) in collected {
            if coeff.is_zero() {
                // x + 0.0*x keeps a float zero around
                if coeff.is_float() {
                    numeric = numeric.add(&coeff);
                }
                continue;
            }
            let term = if coeff.is_one() {
                rest
            } else {
                Self::product(vec![Self::number(coeff), rest])
            };
            match term.kind() {
                ExprKind::Sum(inner) => out.extend(inner.iter().cloned()),
                ExprKind::Number(n) => numeric = numeric.add(n),
                _ => out.push(term),
            }
        }

        out.sort_by(sum_order);
        let keep_numeric = !numeric.is_zero() || (out.is_empty() && numeric.is_float());
        if keep_numeric {
            out.push(Self::number(numeric));
        }

        match out.len() {
            0 => Self::zero(),
            1 => out.pop().unwrap_or_else(Self::zero),
            _ => Self::new(ExprKind::Sum(out)),
        }
    }

    /// N-ary product: flattens, folds the coefficient, combines like bases
    #[must_use]
    pub fn product(factors: Vec<Expr>) -> Self {
        product_pass(factors, 0)
    }

    /// Power with exact folding of numeric and nested cases
    #[must_use]
    pub fn pow(base: Expr, exp: Expr) -> Self {
        if base.is_nan() || exp.is_nan() {
            return Self::nan();
        }
        if exp.as_number().is_some_and(Number::is_zero) {
            return Self::one();
        }
        if exp.is_one() {
            return base;
        }

        match (base.kind(), exp.kind()) {
            (ExprKind::Number(b), ExprKind::Number(e)) => numeric_pow(b, e),
            (ExprKind::Number(b), ExprKind::Constant(c)) if c.is_infinite() => {
                number_to_infinity(b, *c)
            }
            (ExprKind::Number(b), _) if b.is_one() => Self::one(),
            (ExprKind::Constant(Constant::E), _) => Self::func("exp", vec![exp]),
            (ExprKind::Constant(c), ExprKind::Number(e)) if c.is_infinite() => {
                infinity_pow(*c, e)
            }
            (ExprKind::Pow(inner_base, inner_exp), ExprKind::Number(e)) if e.is_integer() => {
                Self::pow(
                    inner_base.clone(),
                    Self::product(vec![inner_exp.clone(), exp.clone()]),
                )
            }
            (ExprKind::Product(factors), ExprKind::Number(e)) => {
                if e.is_integer() {
                    return Self::product(
                        factors
                            .iter()
                            .map(|f| Self::pow(f.clone(), exp.clone()))
                            .collect(),
                    );
                }
                // (c*u)^e = c^e * u^e for a positive exact coefficient
                let (coeff, rest) = split_coeff(&base);
                if coeff.is_positive() && !coeff.is_one() && !coeff.is_float() {
                    return Self::product(vec![
                        Self::pow(Self::number(coeff), exp.clone()),
                        Self::pow(rest, exp),
                    ]);
                }
                Self::new(ExprKind::Pow(base, exp))
            }
            (ExprKind::FunctionCall { name, args }, ExprKind::Number(_))
                if &**name == "exp" && args.len() == 1 =>
            {
                Self::func("exp", vec![Self::product(vec![args[0].clone(), exp.clone()])])
            }
            _ => Self::new(ExprKind::Pow(base, exp)),
        }
    }

    /// Function call; folds exact special values of built-ins
    pub fn func(name: &str, args: Vec<Expr>) -> Self {
        let name = functions::canonical_name(name);
        if name == "sqrt"
            && let [arg] = args.as_slice()
        {
            return Self::pow(arg.clone(), Self::half());
        }
        if args.iter().any(Expr::is_nan) {
            return Self::nan();
        }
        if let Some(def) = functions::lookup(name)
            && def.accepts(args.len())
        {
            if let Some(exact) = (def.exact)(&args) {
                return exact;
            }
            let numeric: Option<Vec<f64>> = args
                .iter()
                .map(|a| a.as_number().map(Number::to_f64))
                .collect();
            let has_float = args
                .iter()
                .any(|a| a.as_number().is_some_and(Number::is_float));
            if has_float
                && let Some(values) = numeric
                && let Some(v) = (def.eval)(&values)
                && v.is_finite()
            {
                return Self::float(v);
            }
        }
        Self::new(ExprKind::FunctionCall {
            name: Arc::from(name),
            args,
        })
    }

    #[must_use]
    pub fn neg(e: Expr) -> Self {
        Self::product(vec![Self::minus_one(), e])
    }

    #[must_use]
    pub fn sub(a: Expr, b: Expr) -> Self {
        Self::sum(vec![a, Self::neg(b)])
    }

    #[must_use]
    pub fn div(a: Expr, b: Expr) -> Self {
        Self::product(vec![a, Self::pow(b, Self::minus_one())])
    }

    /// Reciprocal `1/e`
    #[must_use]
    pub fn recip(e: Expr) -> Self {
        Self::pow(e, Self::minus_one())
    }

    /// Unevaluated derivative node; merges repeated differentiation
    pub fn derivative(inner: Expr, var: Symbol, order: u32) -> Self {
        if order == 0 {
            return inner;
        }
        if !inner.contains_symbol(&var) {
            return Self::zero();
        }
        if let ExprKind::Derivative {
            inner: nested,
            var: v,
            order: n,
        } = inner.kind()
            && *v == var
        {
            return Self::new(ExprKind::Derivative {
                inner: nested.clone(),
                var,
                order: n + order,
            });
        }
        Self::new(ExprKind::Derivative { inner, var, order })
    }
}

// =============================================================================
// Helpers shared with display and the engines
// =============================================================================

/// Split a term into numeric coefficient and the remaining factor
pub(crate) fn split_coeff(term: &Expr) -> (Number, Expr) {
    match term.kind() {
        ExprKind::Number(n) => (n.clone(), Expr::one()),
        ExprKind::Product(factors) => match factors.first().map(Expr::kind) {
            Some(ExprKind::Number(n)) => {
                let rest = &factors[1..];
                let rest = if rest.len() == 1 {
                    rest[0].clone()
                } else {
                    Expr::new(ExprKind::Product(rest.to_vec()))
                };
                (n.clone(), rest)
            }
            _ => (Number::one(), term.clone()),
        },
        _ => (Number::one(), term.clone()),
    }
}

/// True when `-e` reads more naturally than `e`
pub(crate) fn could_extract_minus_sign(e: &Expr) -> bool {
    match e.kind() {
        ExprKind::Number(n) => n.is_negative(),
        ExprKind::Constant(Constant::NegInfinity) => true,
        ExprKind::Product(_) => split_coeff(e).0.is_negative(),
        ExprKind::Sum(terms) => terms
            .first()
            .is_some_and(|t| !t.is_number() && split_coeff(t).0.is_negative()),
        _ => false,
    }
}

fn split_base_exp(factor: &Expr) -> (Expr, Expr) {
    match factor.kind() {
        ExprKind::Pow(base, exp) => (base.clone(), exp.clone()),
        _ => (factor.clone(), Expr::one()),
    }
}

/// Polynomial degree of a term, used to order sums highest degree first
fn term_degree(e: &Expr) -> f64 {
    match e.kind() {
        ExprKind::Symbol(_) => 1.0,
        ExprKind::Pow(base, exp) => match (base.kind(), exp.kind()) {
            (ExprKind::Symbol(_), ExprKind::Number(n)) => n.to_f64(),
            _ => 0.0,
        },
        ExprKind::Product(factors) => factors.iter().map(term_degree).sum(),
        _ => 0.0,
    }
}

/// Sum order depends on the coefficient-free part first, so negating a sum
/// keeps its term order.
fn sum_order(a: &Expr, b: &Expr) -> std::cmp::Ordering {
    let (ca, ra) = split_coeff(a);
    let (cb, rb) = split_coeff(b);
    term_degree(&rb)
        .partial_cmp(&term_degree(&ra))
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| expr_cmp(&ra, &rb))
        .then_with(|| ca.cmp_value(&cb))
}

fn product_pass(factors: Vec<Expr>, pass: u8) -> Expr {
    let mut coeff = Number::one();
    let mut inf_sign: Option<i32> = None;
    let mut complex_inf = false;
    let mut exp_args: Vec<Expr> = Vec::new();
    let mut index: FxHashMap<Expr, usize> = FxHashMap::default();
    let mut groups: Vec<(Expr, Vec<Expr>)> = Vec::new();

    let mut pending = factors;
    pending.reverse();
    while let Some(factor) = pending.pop() {
        match factor.kind() {
            ExprKind::Product(inner) => pending.extend(inner.iter().rev().cloned()),
            ExprKind::Number(n) => coeff = coeff.mul(n),
            ExprKind::Constant(Constant::NaN) => return Expr::nan(),
            ExprKind::Constant(Constant::Infinity) => inf_sign = Some(inf_sign.unwrap_or(1)),
            ExprKind::Constant(Constant::NegInfinity) => {
                inf_sign = Some(-inf_sign.unwrap_or(1));
            }
            ExprKind::Constant(Constant::ComplexInfinity) => complex_inf = true,
            ExprKind::FunctionCall { name, args } if &**name == "exp" && args.len() == 1 => {
                exp_args.push(args[0].clone());
            }
            _ => {
                let (base, exp) = split_base_exp(&factor);
                if let Some(&i) = index.get(&base) {
                    groups[i].1.push(exp);
                } else {
                    index.insert(base.clone(), groups.len());
                    groups.push((base, vec![exp]));
                }
            }
        }
    }

    if complex_inf {
        return if coeff.is_zero() {
            Expr::nan()
        } else {
            Expr::zoo()
        };
    }
    if coeff.is_zero() {
        return if inf_sign.is_some() {
            Expr::nan()
        } else {
            Expr::number(coeff)
        };
    }

    let mut out: Vec<Expr> = Vec::with_capacity(groups.len() + 1);
    let mut repass = false;
    fn absorb(p: Expr, coeff: &mut Number, out: &mut Vec<Expr>, repass: &mut bool) {
        match p.kind() {
            ExprKind::Number(n) => *coeff = coeff.mul(n),
            ExprKind::Product(_) | ExprKind::Constant(_) => {
                *repass = true;
                out.push(p);
            }
            _ => out.push(p),
        }
    }

    for (base, mut exps) in groups {
        let exp = if exps.len() == 1 {
            exps.pop().unwrap_or_else(Expr::one)
        } else {
            Expr::sum(exps)
        };
        absorb(Expr::pow(base, exp), &mut coeff, &mut out, &mut repass);
    }
    if !exp_args.is_empty() {
        let combined = Expr::func("exp", vec![Expr::sum(exp_args)]);
        if !combined.is_function("exp") && !combined.is_number() {
            repass = true;
        }
        absorb(combined, &mut coeff, &mut out, &mut repass);
    }

    if let Some(sign) = inf_sign {
        let sign = sign * coeff.signum();
        let inf = if sign > 0 {
            Expr::infinity()
        } else {
            Expr::neg_infinity()
        };
        if out.is_empty() {
            return inf;
        }
        out.push(inf);
        out.sort_by(expr_cmp);
        return Expr::new(ExprKind::Product(out));
    }

    if repass && pass < MAX_PRODUCT_PASSES {
        out.push(Expr::number(coeff));
        return product_pass(out, pass + 1);
    }
    if coeff.is_zero() {
        return Expr::number(coeff);
    }

    out.sort_by(expr_cmp);
    if out.is_empty() {
        return Expr::number(coeff);
    }
    if coeff.is_one() {
        return if out.len() == 1 {
            out.pop().unwrap_or_else(Expr::one)
        } else {
            Expr::new(ExprKind::Product(out))
        };
    }
    if out.len() == 1
        && let ExprKind::Sum(terms) = out[0].kind()
    {
        // 2*(x + 1) -> 2*x + 2
        return Expr::sum(
            terms
                .iter()
                .map(|t| Expr::product(vec![Expr::number(coeff.clone()), t.clone()]))
                .collect(),
        );
    }
    let mut factors = Vec::with_capacity(out.len() + 1);
    factors.push(Expr::number(coeff));
    factors.extend(out);
    Expr::new(ExprKind::Product(factors))
}

fn numeric_pow(b: &Number, e: &Number) -> Expr {
    let raw = || Expr::new(ExprKind::Pow(Expr::number(b.clone()), Expr::number(e.clone())));

    if b.is_float() || e.is_float() {
        if b.is_zero() && e.is_negative() {
            return Expr::zoo();
        }
        let v = b.to_f64().powf(e.to_f64());
        if v.is_nan() {
            return raw();
        }
        return Expr::float(v);
    }

    if b.is_zero() {
        return if e.is_positive() {
            Expr::zero()
        } else {
            Expr::zoo()
        };
    }
    if b.is_one() {
        return Expr::one();
    }
    if let Some(k) = e.to_i64() {
        return b.pow_int(k).map_or_else(raw, Expr::number);
    }
    if b.is_negative() {
        return raw();
    }

    let (Some(er), Some(br)) = (e.as_rational(), b.as_rational()) else {
        return raw();
    };
    let Some(q) = er.denom().to_u32() else {
        return raw();
    };
    let Some(p) = er.numer().to_i64() else {
        return raw();
    };
    if let Some(root) = b.nth_root_exact(q)
        && let Some(v) = root.pow_int(p)
    {
        return Expr::number(v);
    }

    // b^(k + f) = b^k * b^f with 0 < f < 1
    let k = er.floor();
    let frac = er - &k;
    let mut coeff = k
        .to_integer()
        .to_i64()
        .and_then(|k| b.pow_int(k))
        .unwrap_or_else(Number::one);
    let mut roots = Vec::with_capacity(2);

    if br.is_integer() {
        integer_root_power(br.numer(), &frac, &mut coeff, &mut roots);
    } else {
        // (n/d)^f = n^f * d^(1-f) / d
        integer_root_power(br.numer(), &frac, &mut coeff, &mut roots);
        integer_root_power(br.denom(), &(BigRational::one() - &frac), &mut coeff, &mut roots);
        coeff = coeff.mul(&Number::Rational(BigRational::new(
            BigInt::one(),
            br.denom().clone(),
        )));
    }
    assemble_roots(coeff, roots)
}

/// Product node of a coefficient and irreducible numeric roots, built
/// directly: going through `Expr::product` would regroup the roots by base
/// and call back into `numeric_pow`.
fn assemble_roots(coeff: Number, mut roots: Vec<Expr>) -> Expr {
    if coeff.is_zero() || roots.is_empty() {
        return Expr::number(coeff);
    }
    roots.sort_by(expr_cmp);
    if coeff.is_one() && roots.len() == 1 {
        return roots.pop().unwrap_or_else(Expr::one);
    }
    let mut factors = Vec::with_capacity(roots.len() + 1);
    if !coeff.is_one() {
        factors.push(Expr::number(coeff));
    }
    factors.extend(roots);
    Expr::new(ExprKind::Product(factors))
}

/// `n^f` for a positive integer `n` and `0 < f < 1`, pulling perfect powers out
/// of unit-numerator roots (`8^(1/2) = 2*2^(1/2)`). The extracted integer goes
/// into `coeff`, the remaining root (if any) into `roots`.
fn integer_root_power(n: &BigInt, frac: &BigRational, coeff: &mut Number, roots: &mut Vec<Expr>) {
    let mut push_raw = |base: BigInt| {
        if !base.is_one() {
            roots.push(Expr::new(ExprKind::Pow(
                Expr::number(Number::Rational(BigRational::from_integer(base))),
                Expr::number(Number::Rational(frac.clone())),
            )));
        }
    };
    let q = if frac.numer().is_one() {
        frac.denom().to_u32()
    } else {
        None
    };
    let Some(q) = q else {
        push_raw(n.clone());
        return;
    };

    let mut inside = n.clone();
    let mut outside = BigInt::one();
    let mut prime = 2u32;
    while prime <= ROOT_TRIAL_LIMIT {
        let factor = BigInt::from(prime).pow(q);
        if factor > inside {
            break;
        }
        while (&inside % &factor).is_zero() {
            inside /= &factor;
            outside *= prime;
        }
        prime += if prime == 2 { 1 } else { 2 };
    }
    *coeff = coeff.mul(&Number::Rational(BigRational::from_integer(outside)));
    push_raw(inside);
}

fn number_to_infinity(b: &Number, c: Constant) -> Expr {
    match c {
        Constant::Infinity => {
            let one = Number::one();
            let minus_one = one.neg();
            if b.cmp_value(&one).is_gt() {
                Expr::infinity()
            } else if b.cmp_value(&minus_one).is_gt() && b.cmp_value(&one).is_lt() {
                Expr::zero()
            } else if b.cmp_value(&minus_one).is_lt() {
                Expr::zoo()
            } else {
                Expr::nan()
            }
        }
        Constant::NegInfinity => match b.recip() {
            Some(inv) => number_to_infinity(&inv, Constant::Infinity),
            None => Expr::zoo(),
        },
        _ => Expr::nan(),
    }
}

fn infinity_pow(c: Constant, e: &Number) -> Expr {
    if e.is_negative() {
        return Expr::zero();
    }
    match c {
        Constant::Infinity => Expr::infinity(),
        Constant::NegInfinity => match e.to_i64() {
            Some(k) if k % 2 == 0 => Expr::infinity(),
            Some(_) => Expr::neg_infinity(),
            None => Expr::zoo(),
        },
        _ => Expr::zoo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Symbol::parse("x").unwrap().to_expr()
    }

    #[test]
    fn test_sum_collects_like_terms() {
        let e = Expr::sum(vec![x(), Expr::integer(2), x(), Expr::integer(-2)]);
        assert_eq!(e, Expr::product(vec![Expr::integer(2), x()]));
    }

    #[test]
    fn test_product_combines_powers() {
        let e = Expr::product(vec![x(), Expr::pow(x(), Expr::integer(2))]);
        assert_eq!(e, Expr::pow(x(), Expr::integer(3)));
        let e = Expr::div(x(), x());
        assert!(e.is_one());
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let e = Expr::product(vec![Expr::integer(2), Expr::sum(vec![x(), Expr::one()])]);
        assert_eq!(e.to_string(), "2*x + 2");
    }

    #[test]
    fn test_numeric_powers() {
        assert_eq!(Expr::pow(Expr::integer(4), Expr::half()), Expr::integer(2));
        assert_eq!(Expr::pow(Expr::integer(2), Expr::integer(-2)), Expr::rational(1, 4));
        assert_eq!(Expr::pow(Expr::integer(8), Expr::half()).to_string(), "2*sqrt(2)");
        assert_eq!(Expr::pow(Expr::zero(), Expr::minus_one()), Expr::zoo());
    }

    #[test]
    fn test_irrational_roots_stay_unevaluated() {
        let sqrt2 = Expr::pow(Expr::integer(2), Expr::half());
        assert!(matches!(sqrt2.kind(), ExprKind::Pow(..)));
        assert_eq!(Expr::func("sqrt", vec![Expr::integer(2)]), sqrt2);
        assert_eq!(Expr::product(vec![sqrt2.clone(), sqrt2.clone()]), Expr::integer(2));
        assert_eq!(Expr::div(sqrt2.clone(), Expr::integer(2)).to_string(), "sqrt(2)/2");

        let cube_root = Expr::pow(Expr::integer(2), Expr::rational(1, 3));
        assert!(matches!(cube_root.kind(), ExprKind::Pow(..)));
        assert_eq!(Expr::pow(Expr::integer(2), Expr::rational(5, 2)).to_string(), "4*sqrt(2)");
        assert_eq!(Expr::pow(Expr::rational(1, 2), Expr::half()).to_string(), "sqrt(2)/2");
    }

    #[test]
    fn test_infinity_arithmetic() {
        assert_eq!(Expr::sum(vec![Expr::infinity(), Expr::integer(3)]), Expr::infinity());
        assert!(Expr::sum(vec![Expr::infinity(), Expr::neg_infinity()]).is_nan());
        assert_eq!(Expr::neg(Expr::infinity()), Expr::neg_infinity());
        assert!(Expr::product(vec![Expr::zero(), Expr::infinity()]).is_nan());
    }

    #[test]
    fn test_e_power_becomes_exp() {
        let e = Expr::pow(Expr::e(), x());
        assert!(e.is_function("exp"));
        let squared = Expr::pow(e, Expr::integer(2));
        assert_eq!(squared.to_string(), "exp(2*x)");
    }

    #[test]
    fn test_minus_sign_extraction() {
        assert!(could_extract_minus_sign(&Expr::neg(x())));
        assert!(could_extract_minus_sign(&Expr::sub(Expr::one(), x())));
        assert!(!could_extract_minus_sign(&Expr::sub(x(), Expr::one())));
    }
}
