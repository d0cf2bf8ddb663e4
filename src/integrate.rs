//! Integration by rule matching
//!
//! Antiderivatives are found by trying, in order: linearity, the power rule on
//! linear bases, a table of elementary antiderivatives for `f(a*x + b)`,
//! rational functions whose denominator has degree two or less, integration by
//! parts, derivative-divides substitution and finally expansion. Every rule
//! builds its result through the canonical constructors.
//!
//! Definite integrals evaluate the antiderivative with one-sided limits at the
//! bounds, so improper integrals with infinite bounds converge when the
//! antiderivative does.

use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::core::{Expr, ExprKind, Number};
use crate::diff::derive_n;
use crate::limit::{Direction, limit};
use crate::symbol::Symbol;
use crate::{CalcError, Result};

/// Interior points at which a definite integrand is checked for poles
const INTERIOR_SAMPLES: usize = 64;

/// How integration by parts treats the non-polynomial factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parts {
    /// `∫p*g = p*G - ∫p'*G`: the polynomial shrinks
    IntegrateFactor,
    /// `∫p*g = P*g - ∫P*g'`: the factor's derivative is rational
    DifferentiateFactor,
}

pub(crate) struct Integrator<'a> {
    var: &'a Symbol,
    max_depth: usize,
}

impl<'a> Integrator<'a> {
    pub(crate) fn new(var: &'a Symbol, max_depth: usize) -> Self {
        Integrator { var, max_depth }
    }

    /// Antiderivative without the constant of integration
    pub(crate) fn antiderivative(&self, e: &Expr) -> Result<Expr> {
        self.integrate_at(e, 0)
            .ok_or_else(|| CalcError::NoClosedForm {
                expr: e.to_string(),
                var: self.var.to_string(),
            })
    }

    fn x(&self) -> Expr {
        self.var.to_expr()
    }

    fn integrate_at(&self, e: &Expr, depth: usize) -> Option<Expr> {
        if depth > self.max_depth {
            return None;
        }
        if !e.contains_symbol(self.var) {
            return Some(Expr::product(vec![e.clone(), self.x()]));
        }
        let found = self
            .by_structure(e, depth)
            .or_else(|| self.rational(e, depth))
            .or_else(|| self.by_parts(e, depth))
            .or_else(|| self.substitution(e, depth))
            .or_else(|| self.expanded(e, depth));
        if let Some(result) = &found {
            trace!(depth, integrand = %e, %result, "antiderivative");
        }
        found
    }

    fn by_structure(&self, e: &Expr, depth: usize) -> Option<Expr> {
        match e.kind() {
            ExprKind::Symbol(_) => Some(Expr::div(Expr::pow(self.x(), Expr::integer(2)), Expr::integer(2))),
            ExprKind::Sum(terms) => terms
                .iter()
                .map(|t| self.integrate_at(t, depth))
                .collect::<Option<Vec<_>>>()
                .map(Expr::sum),
            ExprKind::Product(factors) => {
                let (constant, dependent): (Vec<Expr>, Vec<Expr>) = factors
                    .iter()
                    .cloned()
                    .partition(|f| !f.contains_symbol(self.var));
                if constant.is_empty() {
                    return self.exp_trig(&dependent);
                }
                let inner = self.integrate_at(&Expr::product(dependent), depth)?;
                Some(Expr::product(vec![Expr::product(constant), inner]))
            }
            ExprKind::Pow(base, exp) => self.power(e, base, exp, depth),
            ExprKind::FunctionCall { name, args } if args.len() == 1 => {
                let (a, _) = args[0].linear_coeffs(self.var)?;
                Some(Expr::div(table(name, &args[0])?, a))
            }
            _ => None,
        }
    }

    fn power(&self, e: &Expr, base: &Expr, exp: &Expr, depth: usize) -> Option<Expr> {
        if !exp.contains_symbol(self.var) {
            if let Some((a, _)) = base.linear_coeffs(self.var) {
                if exp.as_number().is_some_and(Number::is_minus_one) {
                    return Some(Expr::div(Expr::func("log", vec![base.clone()]), a));
                }
                let raised = Expr::sum(vec![exp.clone(), Expr::one()]);
                return Some(Expr::div(
                    Expr::pow(base.clone(), raised.clone()),
                    Expr::product(vec![a, raised]),
                ));
            }
            let n = exp.as_number()?;
            if *n == Number::ratio(-1, 2) {
                return self.inverse_sqrt_quadratic(base);
            }
            return self.trig_power(base, n.to_i64()?, depth);
        }
        // a^(k*x + b) with a free of x
        if !base.contains_symbol(self.var) {
            let (k, _) = exp.linear_coeffs(self.var)?;
            return Some(Expr::div(
                e.clone(),
                Expr::product(vec![k, Expr::func("log", vec![base.clone()])]),
            ));
        }
        None
    }

    /// Reduction formula for `sin(u)^n` and `cos(u)^n`, `n >= 2`
    fn trig_power(&self, base: &Expr, n: i64, depth: usize) -> Option<Expr> {
        if n < 2 {
            return None;
        }
        let ExprKind::FunctionCall { name, args } = base.kind() else {
            return None;
        };
        if args.len() != 1 || !matches!(&**name, "sin" | "cos") {
            return None;
        }
        let u = &args[0];
        let (a, _) = u.linear_coeffs(self.var)?;
        let lower = self.integrate_at(&Expr::pow(base.clone(), Expr::integer(n - 2)), depth + 1)?;

        let sin = Expr::func("sin", vec![u.clone()]);
        let cos = Expr::func("cos", vec![u.clone()]);
        let divisor = Expr::product(vec![Expr::integer(n), a]);
        let head = if &**name == "sin" {
            Expr::neg(Expr::div(
                Expr::product(vec![Expr::pow(sin, Expr::integer(n - 1)), cos]),
                divisor,
            ))
        } else {
            Expr::div(
                Expr::product(vec![Expr::pow(cos, Expr::integer(n - 1)), sin]),
                divisor,
            )
        };
        Some(Expr::sum(vec![
            head,
            Expr::product(vec![Expr::rational(n - 1, n), lower]),
        ]))
    }

    /// `1/sqrt(a*x^2 + c)` as `asin` or a logarithm
    fn inverse_sqrt_quadratic(&self, base: &Expr) -> Option<Expr> {
        let coeffs = base.polynomial_coeffs(self.var)?;
        let [c, b, a] = coeffs.as_slice() else {
            return None;
        };
        if !b.is_zero() {
            return None;
        }
        let x = self.x();
        let sqrt = |e: Expr| Expr::pow(e, Expr::half());
        match (a.numeric_sign()?, c.numeric_sign()) {
            (-1, Some(1)) => {
                let scale = sqrt(Expr::neg(Expr::div(a.clone(), c.clone())));
                Some(Expr::div(
                    Expr::func("asin", vec![Expr::product(vec![scale, x])]),
                    sqrt(Expr::neg(a.clone())),
                ))
            }
            (1, _) => {
                let root_a = sqrt(a.clone());
                let inner = Expr::sum(vec![
                    Expr::product(vec![root_a.clone(), x]),
                    sqrt(base.clone()),
                ]);
                Some(Expr::div(Expr::func("log", vec![inner]), root_a))
            }
            _ => None,
        }
    }

    /// `exp(a*x + b) * sin(c*x + d)` and the cosine variant
    fn exp_trig(&self, factors: &[Expr]) -> Option<Expr> {
        let [f, g] = factors else {
            return None;
        };
        let (exp, trig) = if f.is_function("exp") { (f, g) } else { (g, f) };
        let (a, _) = exp.unary_arg("exp")?.linear_coeffs(self.var)?;
        let ExprKind::FunctionCall { name, args } = trig.kind() else {
            return None;
        };
        let [v] = args.as_slice() else {
            return None;
        };
        let (c, _) = v.linear_coeffs(self.var)?;
        let sin = Expr::func("sin", vec![v.clone()]);
        let cos = Expr::func("cos", vec![v.clone()]);
        let body = match &**name {
            "sin" => Expr::sub(
                Expr::product(vec![a.clone(), sin]),
                Expr::product(vec![c.clone(), cos]),
            ),
            "cos" => Expr::sum(vec![
                Expr::product(vec![a.clone(), cos]),
                Expr::product(vec![c.clone(), sin]),
            ]),
            _ => return None,
        };
        let norm = Expr::sum(vec![
            Expr::pow(a, Expr::integer(2)),
            Expr::pow(c, Expr::integer(2)),
        ]);
        Some(Expr::div(Expr::product(vec![exp.clone(), body]), norm))
    }

    /// `p(x)/q(x)` with `q` of degree one or two
    fn rational(&self, e: &Expr, depth: usize) -> Option<Expr> {
        let (num, den) = split_fraction(e)?;
        let p = num.polynomial_coeffs(self.var)?;
        let q = den.polynomial_coeffs(self.var)?;
        if !(2..=3).contains(&q.len()) {
            return None;
        }
        let (quotient, remainder) = poly_divide(&p, &q);
        let x = self.x();
        let mut parts = Vec::new();
        if !quotient.is_empty() {
            parts.push(self.integrate_at(&from_coeffs(&quotient, &x), depth + 1)?);
        }
        let den = from_coeffs(&q, &x);
        match (q.as_slice(), remainder.as_slice()) {
            ([_, lead], [r0]) => parts.push(Expr::div(
                Expr::product(vec![r0.clone(), Expr::func("log", vec![den])]),
                lead.clone(),
            )),
            ([c, b, a], [n, m]) => {
                // (m*x + n)/q = m/(2a) * q'/q + (n - m*b/(2a))/q
                let two_a = Expr::product(vec![Expr::integer(2), a.clone()]);
                let log_part = Expr::div(m.clone(), two_a.clone());
                parts.push(Expr::product(vec![
                    log_part.clone(),
                    Expr::func("log", vec![den]),
                ]));
                let rest = Expr::sub(n.clone(), Expr::product(vec![log_part, b.clone()])).expand();
                if !rest.is_zero() {
                    parts.push(Expr::product(vec![rest, quadratic_reciprocal(a, b, c, &x)?]));
                }
            }
            (_, [r0]) => {
                let [c, b, a] = q.as_slice() else {
                    return None;
                };
                parts.push(Expr::product(vec![r0.clone(), quadratic_reciprocal(a, b, c, &x)?]));
            }
            _ => {}
        }
        Some(Expr::sum(parts))
    }

    /// `p(x) * g(x)` with `p` polynomial
    fn by_parts(&self, e: &Expr, depth: usize) -> Option<Expr> {
        let ExprKind::Product(factors) = e.kind() else {
            return None;
        };
        for (i, g) in factors.iter().enumerate() {
            let Some(kind) = parts_kind(g, self.var) else {
                continue;
            };
            let p = Expr::product(
                factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, f)| f.clone())
                    .collect(),
            );
            if p.polynomial_coeffs(self.var).is_none() {
                continue;
            }
            let attempt = || -> Option<Expr> {
                match kind {
                    Parts::IntegrateFactor => {
                        let g_int = self.integrate_at(g, depth + 1)?;
                        let dp = derive_n(&p, self.var, 1);
                        let rest = self.integrate_at(
                            &Expr::product(vec![dp, g_int.clone()]).expand(),
                            depth + 1,
                        )?;
                        Some(Expr::sub(Expr::product(vec![p.clone(), g_int]), rest))
                    }
                    Parts::DifferentiateFactor => {
                        let p_int = self.integrate_at(&p, depth + 1)?;
                        let dg = derive_n(g, self.var, 1);
                        let rest = self.integrate_at(
                            &Expr::product(vec![p_int.clone(), dg]),
                            depth + 1,
                        )?;
                        Some(Expr::sub(Expr::product(vec![p_int, g.clone()]), rest))
                    }
                }
            };
            if let Some(result) = attempt() {
                return Some(result);
            }
        }
        None
    }

    /// Derivative-divides: `f(u(x)) * u'(x)`
    fn substitution(&self, e: &Expr, depth: usize) -> Option<Expr> {
        let mut candidates = Vec::new();
        collect_candidates(e, self.var, &mut candidates);
        let t = Symbol::new_unchecked(&format!("υ{depth}"));
        let inner = Integrator::new(&t, self.max_depth);
        for u in candidates {
            let du = derive_n(&u, self.var, 1);
            if du.is_zero() || has_derivative(&du) {
                continue;
            }
            let q = Expr::div(e.clone(), du).replace(&u, &t.to_expr());
            if q.contains_symbol(self.var) || !q.is_finite_value() {
                continue;
            }
            if let Some(found) = inner.integrate_at(&q, depth + 1) {
                trace!(substitution = %u, "derivative divides");
                return Some(found.substitute(&t, &u));
            }
        }
        None
    }

    fn expanded(&self, e: &Expr, depth: usize) -> Option<Expr> {
        let expanded = e.expand();
        if expanded == *e {
            return None;
        }
        self.integrate_at(&expanded, depth + 1)
    }
}

/// Antiderivative of `f(u)` with respect to `u`
fn table(name: &str, u: &Expr) -> Option<Expr> {
    let f = |name: &str, arg: Expr| Expr::func(name, vec![arg]);
    let u_times = |g: Expr| Expr::product(vec![u.clone(), g]);
    let one_minus_u2 = || {
        Expr::pow(
            Expr::sub(Expr::one(), Expr::pow(u.clone(), Expr::integer(2))),
            Expr::half(),
        )
    };
    Some(match name {
        "sin" => Expr::neg(f("cos", u.clone())),
        "cos" => f("sin", u.clone()),
        "tan" => Expr::neg(f("log", f("cos", u.clone()))),
        "cot" => f("log", f("sin", u.clone())),
        "sec" => f("log", Expr::sum(vec![f("sec", u.clone()), f("tan", u.clone())])),
        "csc" => Expr::neg(f(
            "log",
            Expr::sum(vec![f("csc", u.clone()), f("cot", u.clone())]),
        )),
        "exp" => f("exp", u.clone()),
        "log" => Expr::sub(u_times(f("log", u.clone())), u.clone()),
        "sinh" => f("cosh", u.clone()),
        "cosh" => f("sinh", u.clone()),
        "tanh" => f("log", f("cosh", u.clone())),
        "asin" => Expr::sum(vec![u_times(f("asin", u.clone())), one_minus_u2()]),
        "acos" => Expr::sub(u_times(f("acos", u.clone())), one_minus_u2()),
        "atan" => Expr::sub(
            u_times(f("atan", u.clone())),
            Expr::div(
                f("log", Expr::sum(vec![Expr::pow(u.clone(), Expr::integer(2)), Expr::one()])),
                Expr::integer(2),
            ),
        ),
        "abs" => Expr::div(u_times(f("abs", u.clone())), Expr::integer(2)),
        "sign" => f("abs", u.clone()),
        _ => return None,
    })
}

fn parts_kind(g: &Expr, var: &Symbol) -> Option<Parts> {
    match g.kind() {
        ExprKind::FunctionCall { name, args } if args.len() == 1 => {
            args[0].linear_coeffs(var)?;
            match &**name {
                "sin" | "cos" | "exp" | "sinh" | "cosh" => Some(Parts::IntegrateFactor),
                "log" | "atan" | "asin" | "acos" => Some(Parts::DifferentiateFactor),
                _ => None,
            }
        }
        ExprKind::Pow(base, exp) if !base.contains_symbol(var) => {
            exp.linear_coeffs(var)?;
            Some(Parts::IntegrateFactor)
        }
        _ => None,
    }
}

/// Numerator and denominator from factors with negative integer exponents
fn split_fraction(e: &Expr) -> Option<(Expr, Expr)> {
    let factors = match e.kind() {
        ExprKind::Product(factors) => factors.clone(),
        _ => vec![e.clone()],
    };
    let mut num = Vec::new();
    let mut den = Vec::new();
    for factor in factors {
        if let ExprKind::Pow(base, exp) = factor.kind()
            && let Some(k) = exp.as_number().and_then(Number::to_i64)
            && k < 0
        {
            den.push(Expr::pow(base.clone(), Expr::integer(-k)));
        } else {
            num.push(factor);
        }
    }
    if den.is_empty() {
        return None;
    }
    Some((Expr::product(num), Expr::product(den)))
}

/// Long division of ascending coefficient lists
fn poly_divide(num: &[Expr], den: &[Expr]) -> (Vec<Expr>, Vec<Expr>) {
    let d = den.len() - 1;
    let mut rem = num.to_vec();
    if rem.len() <= d {
        return (Vec::new(), rem);
    }
    let lead = &den[d];
    let mut quotient = vec![Expr::zero(); rem.len() - d];
    for k in (0..quotient.len()).rev() {
        let c = Expr::div(rem[k + d].clone(), lead.clone()).expand();
        for (i, di) in den.iter().enumerate() {
            rem[k + i] = Expr::sub(rem[k + i].clone(), Expr::product(vec![c.clone(), di.clone()])).expand();
        }
        quotient[k] = c;
    }
    rem.truncate(d);
    while rem.last().is_some_and(Expr::is_zero) {
        rem.pop();
    }
    (quotient, rem)
}

fn from_coeffs(coeffs: &[Expr], x: &Expr) -> Expr {
    Expr::sum(
        coeffs
            .iter()
            .enumerate()
            .map(|(k, c)| Expr::product(vec![c.clone(), Expr::pow(x.clone(), Expr::integer(k as i64))]))
            .collect(),
    )
}

/// `∫ 1/(a*x^2 + b*x + c)` for numeric coefficients
fn quadratic_reciprocal(a: &Expr, b: &Expr, c: &Expr, x: &Expr) -> Option<Expr> {
    let disc = Expr::sub(
        Expr::pow(b.clone(), Expr::integer(2)),
        Expr::product(vec![Expr::integer(4), a.clone(), c.clone()]),
    )
    .expand();
    let two_a = Expr::product(vec![Expr::integer(2), a.clone()]);
    let linear = Expr::sum(vec![Expr::product(vec![two_a.clone(), x.clone()]), b.clone()]);
    if disc.is_zero() {
        return Some(Expr::div(Expr::integer(-2), linear));
    }
    match disc.numeric_sign()? {
        -1 => {
            let s = Expr::pow(Expr::neg(disc), Expr::half());
            Some(Expr::product(vec![
                Expr::div(Expr::integer(2), s.clone()),
                Expr::func("atan", vec![Expr::div(linear, s)]),
            ]))
        }
        _ => {
            let s = Expr::pow(disc, Expr::half());
            let root = |sign: Expr| {
                Expr::div(
                    Expr::sum(vec![Expr::neg(b.clone()), Expr::product(vec![sign, s.clone()])]),
                    two_a.clone(),
                )
            };
            let log_of = |r: Expr| Expr::func("log", vec![Expr::sub(x.clone(), r)]);
            Some(Expr::div(
                Expr::sub(log_of(root(Expr::one())), log_of(root(Expr::minus_one()))),
                s,
            ))
        }
    }
}

fn has_derivative(e: &Expr) -> bool {
    matches!(e.kind(), ExprKind::Derivative { .. }) || e.children().into_iter().any(has_derivative)
}

/// Inner pieces of `e` worth trying as a substitution `u`
fn collect_candidates(e: &Expr, var: &Symbol, out: &mut Vec<Expr>) {
    let push = |u: &Expr, out: &mut Vec<Expr>| {
        if u.contains_symbol(var) && u.linear_coeffs(var).is_none() && !out.contains(u) {
            out.push(u.clone());
        }
    };
    match e.kind() {
        ExprKind::FunctionCall { args, .. } => {
            push(e, out);
            for arg in args {
                push(arg, out);
            }
        }
        ExprKind::Pow(base, exp) => {
            push(base, out);
            push(exp, out);
        }
        _ => {}
    }
    for child in e.children() {
        collect_candidates(child, var, out);
    }
}

/// Real roots of linear or quadratic polynomials with numeric coefficients
fn push_real_roots(p: &Expr, var: &Symbol, out: &mut Vec<f64>) {
    let Some(coeffs) = p.polynomial_coeffs(var) else {
        return;
    };
    let values: Option<Vec<f64>> = coeffs.iter().map(Expr::to_f64).collect();
    match values.as_deref() {
        Some([b, a]) => out.push(-b / a),
        Some([c, b, a]) => {
            let disc = b * b - 4.0 * a * c;
            if disc >= 0.0 {
                let s = disc.sqrt();
                out.push((-b + s) / (2.0 * a));
                out.push((-b - s) / (2.0 * a));
            }
        }
        _ => {}
    }
}

/// Points where a denominator or a logarithm argument vanishes
fn singular_points(e: &Expr, var: &Symbol, out: &mut Vec<f64>) {
    match e.kind() {
        ExprKind::Pow(base, exp) if exp.numeric_sign() == Some(-1) => push_real_roots(base, var, out),
        ExprKind::FunctionCall { name, args } if &**name == "log" && args.len() == 1 => {
            push_real_roots(&args[0], var, out);
        }
        _ => {}
    }
    for child in e.children() {
        singular_points(child, var, out);
    }
}

/// Reject integrands that blow up strictly inside `[lo, hi]`
fn check_interior(expr: &Expr, var: &Symbol, a: f64, b: f64) -> Result<()> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut poles = Vec::new();
    singular_points(expr, var, &mut poles);
    if let Some(p) = poles.into_iter().find(|p| *p > lo && *p < hi) {
        debug!(pole = p, "integrand singular inside the interval");
        return Err(CalcError::NotNumeric {
            expr: format!("the integral of {expr} over [{lo}, {hi}]"),
        });
    }
    let only_var = expr.free_symbols().iter().all(|s| s == var);
    if !only_var {
        return Ok(());
    }
    for k in 0..INTERIOR_SAMPLES {
        let t = lo + (hi - lo) * (k as f64 + 0.5) / INTERIOR_SAMPLES as f64;
        // Overflow at a sample is fine; leaving the real domain is not
        let sample = expr.substitute(var, &Expr::float(t)).to_f64();
        if sample.is_none_or(f64::is_nan) {
            return Err(CalcError::NotNumeric {
                expr: format!("the integral of {expr} over [{lo}, {hi}]"),
            });
        }
    }
    Ok(())
}

/// Indefinite integral
pub(crate) fn integrate(expr: &Expr, var: &Symbol, config: &EngineConfig) -> Result<Expr> {
    Integrator::new(var, config.integration_depth).antiderivative(expr)
}

/// `F(upper⁻) - F(lower⁺)` for an antiderivative `F`
pub(crate) fn integrate_definite(
    expr: &Expr,
    var: &Symbol,
    lower: &Expr,
    upper: &Expr,
    config: &EngineConfig,
) -> Result<Expr> {
    for bound in [lower, upper] {
        if bound.contains_symbol(var) {
            return Err(CalcError::PointDependsOnVariable {
                point: bound.to_string(),
                var: var.to_string(),
            });
        }
    }
    let antiderivative = integrate(expr, var, config)?;

    let numeric_bounds = lower.free_symbols().is_empty() && upper.free_symbols().is_empty();
    if let (Some(a), Some(b)) = (lower.to_f64(), upper.to_f64())
        && a.is_finite()
        && b.is_finite()
    {
        check_interior(expr, var, a, b)?;
    }

    let at_upper = limit(&antiderivative, var, upper, Direction::Minus, config)?;
    let at_lower = limit(&antiderivative, var, lower, Direction::Plus, config)?;
    let value = Expr::sub(at_upper, at_lower);
    debug!(%antiderivative, %value, "definite integral");

    // Exact values are finite whatever their size; only floats can overflow
    let overflowed = value
        .as_number()
        .is_some_and(|n| n.is_float() && !n.to_f64().is_finite());
    if numeric_bounds && (!value.is_finite_value() || overflowed) {
        return Err(CalcError::NotNumeric {
            expr: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Substitutions;
    use crate::parse;

    fn x() -> Symbol {
        Symbol::parse("x").unwrap()
    }

    fn antiderivative(input: &str) -> Expr {
        integrate(&parse(input).unwrap(), &x(), &EngineConfig::default()).unwrap()
    }

    /// `F' - f` vanishes at a handful of sample points
    fn assert_antiderivative(input: &str) {
        let f = parse(input).unwrap();
        let big_f = antiderivative(input);
        let check = Expr::sub(derive_n(&big_f, &x(), 1), f);
        for t in [0.3, 0.55, 0.7, 1.3, 2.1] {
            let subs = Substitutions::new().with(x(), Expr::float(t));
            let residual = check.evalf(&subs).unwrap();
            assert!(
                residual.abs() < 1e-9,
                "d/dx {big_f} differs from {input} at {t}: {residual}"
            );
        }
    }

    fn definite(input: &str, a: &str, b: &str) -> Result<Expr> {
        integrate_definite(
            &parse(input).unwrap(),
            &x(),
            &parse(a).unwrap(),
            &parse(b).unwrap(),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn test_power_rule() {
        assert_eq!(antiderivative("x**2").to_string(), "x^3/3");
        assert_eq!(antiderivative("1/x").to_string(), "log(x)");
        assert_eq!(antiderivative("5").to_string(), "5*x");
        assert_antiderivative("sqrt(x)");
        assert_antiderivative("(2*x + 1)**5");
        assert_antiderivative("1/(3*x - 1)**2");
    }

    #[test]
    fn test_elementary_table() {
        assert_eq!(antiderivative("sin(x)").to_string(), "-cos(x)");
        assert_eq!(antiderivative("exp(x)").to_string(), "exp(x)");
        for input in [
            "cos(3*x)", "tan(x)", "log(x)", "atan(x)", "asin(x/3)", "cosh(x)", "exp(2*x + 1)",
            "2**x", "sec(x)",
        ] {
            assert_antiderivative(input);
        }
    }

    #[test]
    fn test_linearity_and_powers_of_trig() {
        assert_antiderivative("sin(x)**2 + x**2");
        assert_antiderivative("3*cos(x)**3");
        assert_antiderivative("x**3 - 4*x + 7");
    }

    #[test]
    fn test_rational_functions() {
        assert_eq!(antiderivative("1/(x**2 + 1)").to_string(), "atan(x)");
        for input in [
            "1/(x**2 - 1)",
            "x/(x**2 + 1)",
            "(x**3 + 2)/(x + 1)",
            "1/(x**2 + 2*x + 5)",
            "(2*x + 3)/(x**2 + x + 1)",
        ] {
            assert_antiderivative(input);
        }
    }

    #[test]
    fn test_by_parts() {
        for input in ["x*exp(x)", "x**2*sin(x)", "x*log(x)", "x*atan(x)", "x*cosh(2*x)"] {
            assert_antiderivative(input);
        }
        assert_antiderivative("exp(x)*sin(x)");
    }

    #[test]
    fn test_substitution() {
        for input in [
            "2*x*cos(x**2)",
            "x*exp(x**2)",
            "sin(x)*cos(x)",
            "log(x)/x",
            "exp(x)/(1 + exp(x))",
            "1/sqrt(1 - x**2)",
            "1/sqrt(x**2 + 4)",
        ] {
            assert_antiderivative(input);
        }
    }

    #[test]
    fn test_no_closed_form() {
        let err = integrate(&parse("exp(x**2)").unwrap(), &x(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CalcError::NoClosedForm { .. }));
        let err = integrate(&parse("f(x)").unwrap(), &x(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CalcError::NoClosedForm { .. }));
    }

    #[test]
    fn test_definite() {
        assert_eq!(definite("x**2", "0", "1").unwrap().to_string(), "1/3");
        assert_eq!(definite("sin(x)", "0", "pi").unwrap().to_string(), "2");
        assert_eq!(definite("exp(-x)", "0", "oo").unwrap().to_string(), "1");
        assert_eq!(definite("1/(x**2 + 1)", "-oo", "oo").unwrap().to_string(), "pi");
        assert_eq!(definite("1/sqrt(x)", "0", "1").unwrap().to_string(), "2");
        // Bounds in either order
        assert_eq!(definite("x", "1", "0").unwrap().to_string(), "-1/2");
    }

    #[test]
    fn test_definite_symbolic_bound() {
        assert_eq!(definite("x", "0", "y").unwrap().to_string(), "y^2/2");
        assert!(matches!(
            definite("x", "0", "x"),
            Err(CalcError::PointDependsOnVariable { .. })
        ));
    }

    #[test]
    fn test_definite_divergence() {
        assert!(matches!(definite("1/x", "0", "1"), Err(CalcError::NotNumeric { .. })));
        assert!(matches!(definite("1/x**2", "-1", "1"), Err(CalcError::NotNumeric { .. })));
    }

    #[test]
    fn test_definite_with_huge_exact_coefficient() {
        let value = definite("10**1000*x", "0", "1").unwrap();
        assert_eq!(value, parse("5*10**999").unwrap());
        assert!(value.is_finite_value());
    }
}
