//! Mathematical function definitions for the function registry
//!
//! Contains evaluation and symbolic differentiation rules for all supported functions.
//!
//! # Derivative References
//!
//! Derivative formulas follow standard calculus and DLMF:
//! - Trigonometric: DLMF §4.21
//! - Inverse trigonometric: DLMF §4.24
//! - Hyperbolic: DLMF §4.34

use super::registry::FunctionDefinition;
use super::{func, mul, neg, special};
use crate::Expr;

fn real(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn pow(base: Expr, exp: i64) -> Expr {
    Expr::pow(base, Expr::integer(exp))
}

/// 1 - u^2
fn one_minus_square(u: &Expr) -> Expr {
    Expr::sub(Expr::one(), pow(u.clone(), 2))
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| real(args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx sin(u) = cos(u) * u'
                mul(func("cos", args[0].clone()), arg_primes[0].clone())
            },
            exact: special::sin,
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| real(args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx cos(u) = -sin(u) * u'
                mul(neg(func("sin", args[0].clone())), arg_primes[0].clone())
            },
            exact: special::cos,
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| real(args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx tan(u) = (tan(u)^2 + 1) * u'
                let tan_sq = pow(func("tan", args[0].clone()), 2);
                mul(Expr::sum(vec![tan_sq, Expr::one()]), arg_primes[0].clone())
            },
            exact: special::tan,
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| real(1.0 / args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx cot(u) = -(cot(u)^2 + 1) * u'
                let cot_sq = pow(func("cot", args[0].clone()), 2);
                mul(
                    neg(Expr::sum(vec![cot_sq, Expr::one()])),
                    arg_primes[0].clone(),
                )
            },
            exact: special::cot,
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| real(1.0 / args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx sec(u) = sec(u)tan(u) * u'
                let u = &args[0];
                Expr::product(vec![
                    func("sec", u.clone()),
                    func("tan", u.clone()),
                    arg_primes[0].clone(),
                ])
            },
            exact: special::sec,
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| real(1.0 / args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx csc(u) = -csc(u)cot(u) * u'
                let u = &args[0];
                Expr::product(vec![
                    Expr::minus_one(),
                    func("csc", u.clone()),
                    func("cot", u.clone()),
                    arg_primes[0].clone(),
                ])
            },
            exact: special::csc,
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| real(args[0].asin()),
            derivative: |args, arg_primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                let root = Expr::pow(one_minus_square(&args[0]), Expr::rational(-1, 2));
                mul(root, arg_primes[0].clone())
            },
            exact: special::asin,
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| real(args[0].acos()),
            derivative: |args, arg_primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                let root = Expr::pow(one_minus_square(&args[0]), Expr::rational(-1, 2));
                mul(neg(root), arg_primes[0].clone())
            },
            exact: special::acos,
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| real(args[0].atan()),
            derivative: |args, arg_primes| {
                // d/dx atan(u) = u' / (u^2 + 1)
                let denom = Expr::sum(vec![pow(args[0].clone(), 2), Expr::one()]);
                Expr::div(arg_primes[0].clone(), denom)
            },
            exact: special::atan,
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| real(args[0].sinh()),
            derivative: |args, arg_primes| mul(func("cosh", args[0].clone()), arg_primes[0].clone()),
            exact: special::sinh,
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| real(args[0].cosh()),
            derivative: |args, arg_primes| mul(func("sinh", args[0].clone()), arg_primes[0].clone()),
            exact: special::cosh,
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| real(args[0].tanh()),
            derivative: |args, arg_primes| {
                // d/dx tanh(u) = (1 - tanh(u)^2) * u'
                mul(
                    one_minus_square(&func("tanh", args[0].clone())),
                    arg_primes[0].clone(),
                )
            },
            exact: special::tanh,
        },
        // Exponential and logarithm
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| real(args[0].exp()),
            derivative: |args, arg_primes| mul(func("exp", args[0].clone()), arg_primes[0].clone()),
            exact: special::exp,
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=1,
            eval: |args| (args[0] > 0.0).then(|| args[0].ln()),
            derivative: |args, arg_primes| Expr::div(arg_primes[0].clone(), args[0].clone()),
            exact: special::log,
        },
        // Piecewise
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: |args, arg_primes| {
                // d/dx |u| = sign(u) * u'
                mul(func("sign", args[0].clone()), arg_primes[0].clone())
            },
            exact: special::abs,
        },
        FunctionDefinition {
            name: "sign",
            arity: 1..=1,
            eval: |args| {
                Some(if args[0] > 0.0 {
                    1.0
                } else if args[0] < 0.0 {
                    -1.0
                } else {
                    0.0
                })
            },
            derivative: |_, _| Expr::zero(),
            exact: special::sign,
        },
    ]
}
