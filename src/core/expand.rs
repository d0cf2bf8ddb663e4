//! Distribution of products over sums and polynomial coefficient extraction.

use crate::core::{Expr, ExprKind};
use crate::symbol::Symbol;

/// Terms beyond which expansion stops distributing and keeps the product
const MAX_EXPANDED_TERMS: usize = 4096;

/// Largest integer power of a sum that is multiplied out
const MAX_EXPANDED_POWER: i64 = 64;

fn terms_of(e: &Expr) -> Vec<Expr> {
    match e.kind() {
        ExprKind::Sum(terms) => terms.clone(),
        _ => vec![e.clone()],
    }
}

/// Multiply two expanded expressions term by term
fn distribute(a: &Expr, b: &Expr) -> Option<Expr> {
    let left = terms_of(a);
    let right = terms_of(b);
    if left.len() * right.len() > MAX_EXPANDED_TERMS {
        return None;
    }
    let mut out = Vec::with_capacity(left.len() * right.len());
    for l in &left {
        for r in &right {
            out.push(Expr::product(vec![l.clone(), r.clone()]));
        }
    }
    Some(Expr::sum(out))
}

impl Expr {
    /// Multiply out products of sums and positive integer powers of sums
    #[must_use]
    pub fn expand(&self) -> Expr {
        match self.kind() {
            ExprKind::Sum(terms) => Expr::sum(terms.iter().map(Expr::expand).collect()),
            ExprKind::Product(factors) => {
                let expanded: Vec<Expr> = factors.iter().map(Expr::expand).collect();
                let mut acc = Expr::one();
                for (i, factor) in expanded.iter().enumerate() {
                    match distribute(&acc, factor) {
                        Some(next) => acc = next,
                        None => {
                            let mut rest = vec![acc];
                            rest.extend(expanded[i..].iter().cloned());
                            return Expr::product(rest);
                        }
                    }
                }
                acc
            }
            ExprKind::Pow(base, exp) => {
                let base = base.expand();
                let exp = exp.expand();
                match exp.as_number().and_then(|n| n.to_i64()) {
                    Some(n) if (2..=MAX_EXPANDED_POWER).contains(&n)
                        && matches!(base.kind(), ExprKind::Sum(_)) =>
                    {
                        let mut acc = base.clone();
                        for _ in 1..n {
                            match distribute(&acc, &base) {
                                Some(next) => acc = next,
                                None => return Expr::pow(base, exp),
                            }
                        }
                        acc
                    }
                    _ => Expr::pow(base, exp),
                }
            }
            ExprKind::FunctionCall { name, args } => {
                Expr::func(name, args.iter().map(Expr::expand).collect())
            }
            _ => self.clone(),
        }
    }

    /// Coefficients `[c0, c1, ...]` when the expression is a polynomial in `var`
    /// with coefficients free of `var`
    pub fn polynomial_coeffs(&self, var: &Symbol) -> Option<Vec<Expr>> {
        let expanded = self.expand();
        let mut buckets: Vec<Vec<Expr>> = Vec::new();
        for term in terms_of(&expanded) {
            let (degree, coeff) = monomial_degree(&term, var)?;
            if buckets.len() <= degree {
                buckets.resize(degree + 1, Vec::new());
            }
            buckets[degree].push(coeff);
        }
        let mut coeffs: Vec<Expr> = buckets.into_iter().map(Expr::sum).collect();
        while coeffs.last().is_some_and(Expr::is_zero) {
            coeffs.pop();
        }
        Some(coeffs)
    }

    /// `(a, b)` with `self == a*var + b`, `a` non-zero and free of `var`
    pub(crate) fn linear_coeffs(&self, var: &Symbol) -> Option<(Expr, Expr)> {
        let coeffs = self.polynomial_coeffs(var)?;
        match coeffs.len() {
            2 => Some((coeffs[1].clone(), coeffs[0].clone())),
            _ => None,
        }
    }
}

/// Degree in `var` and coefficient of a single expanded term
fn monomial_degree(term: &Expr, var: &Symbol) -> Option<(usize, Expr)> {
    if !term.contains_symbol(var) {
        return Some((0, term.clone()));
    }
    let power_of = |factor: &Expr| -> Option<usize> {
        match factor.kind() {
            ExprKind::Symbol(s) if s == var => Some(1),
            ExprKind::Pow(base, exp) if base.as_symbol() == Some(var) => exp
                .as_number()
                .and_then(|n| n.to_i64())
                .and_then(|n| usize::try_from(n).ok()),
            _ => None,
        }
    };
    match term.kind() {
        ExprKind::Product(factors) => {
            let mut degree = None;
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                if factor.contains_symbol(var) {
                    if degree.is_some() {
                        return None;
                    }
                    degree = Some(power_of(factor)?);
                } else {
                    rest.push(factor.clone());
                }
            }
            Some((degree?, Expr::product(rest)))
        }
        _ => Some((power_of(term)?, Expr::one())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_square() {
        let x = Symbol::parse("x").unwrap();
        let e = Expr::pow(x.to_expr() + 1, Expr::integer(2));
        assert_eq!(e.expand().to_string(), "x^2 + 2*x + 1");
    }

    #[test]
    fn test_expand_product_of_sums() {
        let x = Symbol::parse("x").unwrap();
        let e = (x.to_expr() + 1) * (x.to_expr() - 1);
        assert_eq!(e.expand().to_string(), "x^2 - 1");
    }

    #[test]
    fn test_polynomial_coeffs() {
        let x = Symbol::parse("x").unwrap();
        let y = Symbol::parse("y").unwrap();
        let e = x.clone().pow(2) * 3 + y.to_expr() * x.to_expr() + 5;
        let coeffs = e.polynomial_coeffs(&x).unwrap();
        assert_eq!(coeffs.len(), 3);
        assert_eq!(coeffs[0], Expr::integer(5));
        assert_eq!(coeffs[1], y.to_expr());
        assert_eq!(coeffs[2], Expr::integer(3));
        assert!(x.clone().sin().polynomial_coeffs(&x).is_none());
    }

    #[test]
    fn test_linear_coeffs() {
        let x = Symbol::parse("x").unwrap();
        let (a, b) = (x.to_expr() * 2 + 3).linear_coeffs(&x).unwrap();
        assert_eq!(a, Expr::integer(2));
        assert_eq!(b, Expr::integer(3));
    }
}
