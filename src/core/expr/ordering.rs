//! Canonical ordering for expressions.
//!
//! Provides the total order used to sort product factors and to break ties
//! between sum terms of equal degree.

use std::cmp::Ordering as CmpOrdering;

use super::{Expr, ExprKind};

/// Compare expressions for canonical ordering.
/// Order: Numbers < Constants < Symbols (by power) < Products < Functions < Derivatives < Sums
pub fn expr_cmp(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Number, Pow};

    if let (Number(x), Number(y)) = (a.kind(), b.kind()) {
        return x
            .cmp_value(y)
            .then_with(|| x.is_float().cmp(&y.is_float()));
    }
    if matches!(a.kind(), Number(_)) {
        return CmpOrdering::Less;
    }
    if matches!(b.kind(), Number(_)) {
        return CmpOrdering::Greater;
    }

    // x^2 sorts next to x: compare bases first, then exponents
    let (base_a, exp_a) = match a.kind() {
        Pow(base, exp) => (base, Some(exp)),
        _ => (a, None),
    };
    let (base_b, exp_b) = match b.kind() {
        Pow(base, exp) => (base, Some(exp)),
        _ => (b, None),
    };
    if exp_a.is_none() && exp_b.is_none() {
        return expr_cmp_type_strict(a, b);
    }

    // Recursion is safe: at least one side is a power, so its base is smaller
    expr_cmp(base_a, base_b).then_with(|| match (exp_a, exp_b) {
        (Some(ea), Some(eb)) => expr_cmp(ea, eb),
        (Some(ea), None) => cmp_with_one(ea),
        (None, Some(eb)) => cmp_with_one(eb).reverse(),
        (None, None) => CmpOrdering::Equal,
    })
}

/// An implied exponent of one sorts before symbolic exponents
fn cmp_with_one(exp: &Expr) -> CmpOrdering {
    match exp.kind() {
        ExprKind::Number(n) => n.cmp_value(&crate::core::Number::one()),
        _ => CmpOrdering::Greater,
    }
}

fn type_rank(e: &Expr) -> u8 {
    match e.kind() {
        ExprKind::Number(_) => 0,
        ExprKind::Constant(_) => 1,
        ExprKind::Symbol(_) => 2,
        ExprKind::Pow(..) => 3,
        ExprKind::Product(_) => 4,
        ExprKind::FunctionCall { .. } => 5,
        ExprKind::Derivative { .. } => 6,
        ExprKind::Sum(_) => 7,
    }
}

fn cmp_slices(a: &[Expr], b: &[Expr]) -> CmpOrdering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(x, y)| expr_cmp(x, y))
            .find(|o| o.is_ne())
            .unwrap_or(CmpOrdering::Equal)
    })
}

fn expr_cmp_type_strict(a: &Expr, b: &Expr) -> CmpOrdering {
    use ExprKind::{Constant, Derivative, FunctionCall, Product, Sum, Symbol};

    let rank = type_rank(a).cmp(&type_rank(b));
    if rank.is_ne() {
        return rank;
    }
    match (a.kind(), b.kind()) {
        (Constant(x), Constant(y)) => x.cmp(y),
        (Symbol(x), Symbol(y)) => x.cmp(y),
        (Product(x), Product(y)) | (Sum(x), Sum(y)) => cmp_slices(x, y),
        (FunctionCall { name: n1, args: a1 }, FunctionCall { name: n2, args: a2 }) => {
            n1.cmp(n2).then_with(|| cmp_slices(a1, a2))
        }
        (
            Derivative {
                inner: i1,
                var: v1,
                order: o1,
            },
            Derivative {
                inner: i2,
                var: v2,
                order: o2,
            },
        ) => v1
            .cmp(v2)
            .then_with(|| o1.cmp(o2))
            .then_with(|| expr_cmp(i1, i2)),
        _ => CmpOrdering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn test_powers_sort_next_to_base() {
        let x = Symbol::parse("x").unwrap();
        let y = Symbol::parse("y").unwrap();
        let x2 = x.clone().pow(2);
        assert_eq!(expr_cmp(&x.to_expr(), &x2), CmpOrdering::Less);
        assert_eq!(expr_cmp(&x2, &y.to_expr()), CmpOrdering::Less);
    }

    #[test]
    fn test_numbers_first() {
        let x = Symbol::parse("x").unwrap().to_expr();
        assert_eq!(expr_cmp(&Expr::integer(5), &x), CmpOrdering::Less);
        assert_eq!(
            expr_cmp(&Expr::integer(1), &Expr::integer(2)),
            CmpOrdering::Less
        );
    }
}
