//! Cross-module tests driven through the public API

mod calculator_tests;
mod integration_tests;
mod limit_tests;
mod series_tests;

use crate::{Expr, Substitutions, Symbol, parse};

/// Parse or fail the test with the offending input
pub(crate) fn p(input: &str) -> Expr {
    parse(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

/// True when `a` and `b` agree at a handful of points of `var`
pub(crate) fn numerically_equal(a: &Expr, b: &Expr, var: &Symbol, points: &[f64]) -> bool {
    points.iter().all(|&v| {
        let subs = Substitutions::new().with(var.clone(), Expr::float(v));
        match (a.evalf(&subs), b.evalf(&subs)) {
            (Ok(l), Ok(r)) => (l - r).abs() <= 1e-9 * (1.0 + l.abs().max(r.abs())),
            _ => false,
        }
    })
}
