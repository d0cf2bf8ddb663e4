//! Calculus operation benchmarks
//!
//! One group per facade operation, over a few expressions of growing size.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use symb_calculus::{CalculusCalculator, Direction, Expr, Substitutions, parse};

/// Sum of `n` mixed terms: polynomials, trig products, exponentials
fn generate_mixed(n: usize) -> String {
    let mut s = String::with_capacity(n * 24);
    for i in 1..=n {
        if i > 1 {
            s.push_str(" + ");
        }
        let _ = match i % 4 {
            0 => write!(s, "{i}*x**{}", i % 7 + 1),
            1 => write!(s, "sin({i}*x)*cos(x)"),
            2 => write!(s, "exp(x/{i})"),
            _ => write!(s, "x*log(x + {i})"),
        };
    }
    s
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [10, 50, 200] {
        let source = generate_mixed(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, s| {
            b.iter(|| parse(black_box(s)));
        });
    }
    group.finish();
}

fn bench_differentiate(c: &mut Criterion) {
    let calc = CalculusCalculator::new();
    let mut group = c.benchmark_group("differentiate");
    for n in [10, 50, 200] {
        let Ok(expr) = parse(&generate_mixed(n)) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &expr, |b, e| {
            b.iter(|| calc.differentiate(black_box(e), None, 1));
        });
    }
    group.finish();
}

fn bench_integrate(c: &mut Criterion) {
    let calc = CalculusCalculator::new();
    let mut group = c.benchmark_group("integrate");
    for source in ["x**5 - 3*x + 2", "x**2*exp(x)", "1/(x**2 + 2*x + 5)", "sin(x)**4"] {
        let Ok(expr) = parse(source) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(source), &expr, |b, e| {
            b.iter(|| calc.integrate(black_box(e), None, None, None));
        });
    }
    group.finish();
}

fn bench_limit(c: &mut Criterion) {
    let calc = CalculusCalculator::new();
    let mut group = c.benchmark_group("limit");
    for (source, point) in [
        ("sin(x)/x", Expr::zero()),
        ("(x - sin(x))/x**3", Expr::zero()),
        ("(1 + 1/x)**x", Expr::infinity()),
    ] {
        let Ok(expr) = parse(source) else {
            continue;
        };
        group.bench_function(source, |b| {
            b.iter(|| calc.limit(black_box(&expr), &calc.x, &point, Direction::Plus));
        });
    }
    group.finish();
}

fn bench_taylor(c: &mut Criterion) {
    let calc = CalculusCalculator::new();
    let mut group = c.benchmark_group("taylor");
    let Ok(expr) = parse("exp(sin(x))") else {
        return;
    };
    for order in [4, 8, 12] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &n| {
            b.iter(|| calc.taylor(black_box(&expr), None, &Expr::zero(), n));
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let calc = CalculusCalculator::new();
    let Ok(expr) = parse(&generate_mixed(200)) else {
        return;
    };
    let subs = Substitutions::new().with(calc.x.clone(), Expr::float(1.5));
    c.bench_function("evaluate/200", |b| {
        b.iter(|| calc.evaluate(black_box(&expr), &subs));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_differentiate,
    bench_integrate,
    bench_limit,
    bench_taylor,
    bench_evaluate
);
criterion_main!(benches);
