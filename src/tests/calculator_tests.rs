use super::{numerically_equal, p};
use crate::{CalcError, CalculusCalculator, Direction, Expr, Substitutions, Symbol};

const POINTS: [f64; 4] = [0.3, 0.7, 1.3, 2.1];

#[test]
fn test_derivative_of_polynomial() {
    let calc = CalculusCalculator::new();
    let d = calc.differentiate(&p("x**3 + 2*x**2 - x + 5"), None, 1).unwrap();
    assert_eq!(d.to_string(), "3*x^2 + 4*x - 1");
}

#[test]
fn test_higher_order_derivatives() {
    let calc = CalculusCalculator::new();
    let f = p("x**3");
    assert_eq!(calc.differentiate(&f, None, 2).unwrap().to_string(), "6*x");
    assert_eq!(calc.differentiate(&f, None, 3).unwrap().to_string(), "6");
    assert!(calc.differentiate(&f, None, 4).unwrap().is_zero());
}

#[test]
fn test_chain_and_product_rules() {
    let calc = CalculusCalculator::new();
    let x = calc.x.clone();
    let cases = [
        ("sin(x**2)", "2*x*cos(x**2)"),
        ("x*exp(x)", "exp(x) + x*exp(x)"),
        ("log(cos(x))", "-tan(x)"),
        ("sqrt(x)", "1/(2*sqrt(x))"),
        ("atan(x)", "1/(1 + x**2)"),
        ("x**x", "x**x*(1 + log(x))"),
    ];
    for (f, expected) in cases {
        let d = calc.differentiate(&p(f), None, 1).unwrap();
        assert!(
            numerically_equal(&d, &p(expected), &x, &POINTS),
            "d/dx {f} gave {d}"
        );
    }
}

#[test]
fn test_partial_derivative_keeps_other_symbols() {
    let calc = CalculusCalculator::new();
    let y = calc.y.clone();
    let d = calc.differentiate(&p("x**2*y**3"), Some(&y), 1).unwrap();
    assert_eq!(d, p("3*x**2*y**2"));
}

#[test]
fn test_zero_order_is_rejected() {
    let calc = CalculusCalculator::new();
    assert!(matches!(
        calc.differentiate(&p("x"), None, 0),
        Err(CalcError::InvalidOrder { order: 0, .. })
    ));
}

#[test]
fn test_indefinite_and_definite_integrals() {
    let calc = CalculusCalculator::new();
    let f = p("x**2");
    assert_eq!(calc.integrate(&f, None, None, None).unwrap().to_string(), "x^3/3");
    let area = calc
        .integrate(&f, None, Some(&Expr::zero()), Some(&Expr::one()))
        .unwrap();
    assert_eq!(area, Expr::rational(1, 3));
}

#[test]
fn test_symbolic_bounds() {
    let calc = CalculusCalculator::new();
    let a = Symbol::parse("a").unwrap();
    let area = calc
        .integrate(&p("2*x"), None, Some(&Expr::zero()), Some(&a.to_expr()))
        .unwrap();
    assert_eq!(area, p("a**2"));
}

#[test]
fn test_limit_through_facade() {
    let calc = CalculusCalculator::new();
    let x = calc.x.clone();
    let l = calc
        .limit(&p("(1 - cos(x))/x**2"), &x, &Expr::zero(), Direction::Both)
        .unwrap();
    assert_eq!(l, Expr::half());
}

#[test]
fn test_taylor_default_variable() {
    let calc = CalculusCalculator::new();
    let s = calc.taylor(&p("cos(x)"), None, &Expr::zero(), 6).unwrap();
    assert_eq!(s.coefficient(0), Expr::one());
    assert_eq!(s.coefficient(2), Expr::rational(-1, 2));
    assert_eq!(s.coefficient(4), Expr::rational(1, 24));
    assert!(s.coefficient(1).is_zero());
    assert_eq!(s.order(), 6);
}

#[test]
fn test_evaluate_with_several_bindings() {
    let calc = CalculusCalculator::new();
    let subs = Substitutions::new()
        .with(calc.x.clone(), Expr::integer(2))
        .with(calc.y.clone(), Expr::integer(3));
    let v = calc.evaluate(&p("x**2 + y"), &subs).unwrap();
    assert_eq!(v, 7.0);
}

#[test]
fn test_evaluate_reports_unbound_symbols() {
    let calc = CalculusCalculator::new();
    let subs = Substitutions::new().with(calc.x.clone(), Expr::one());
    match calc.evaluate(&p("x + y"), &subs) {
        Err(CalcError::UnboundSymbols { names }) => assert_eq!(names, vec!["y".to_string()]),
        other => panic!("expected UnboundSymbols, got {other:?}"),
    }
}

#[test]
fn test_evaluate_rejects_poles() {
    let calc = CalculusCalculator::new();
    let subs = Substitutions::new().with(calc.x.clone(), Expr::zero());
    assert!(matches!(
        calc.evaluate(&p("1/x"), &subs),
        Err(CalcError::NotNumeric { .. })
    ));
}

#[test]
fn test_irrational_numeric_roots() {
    let calc = CalculusCalculator::new();
    let none = Substitutions::new();
    let sqrt2 = calc.evaluate(&p("sqrt(2)"), &none).unwrap();
    assert!((sqrt2 - std::f64::consts::SQRT_2).abs() < 1e-15);
    let cbrt2 = calc.evaluate(&p("2**(1/3)"), &none).unwrap();
    assert!((cbrt2 - 2f64.cbrt()).abs() < 1e-15);

    assert_eq!(p("sin(pi/4)"), p("sqrt(2)/2"));
    assert_eq!(p("tan(pi/4)"), Expr::one());
    assert_eq!(p("sqrt(2)*sqrt(2)"), Expr::integer(2));
    assert_eq!(p("sqrt(8)").to_string(), "2*sqrt(2)");
}

#[test]
fn test_evaluate_root_at_integer_point() {
    let calc = CalculusCalculator::new();
    let subs = Substitutions::new().with(calc.x.clone(), Expr::integer(2));
    let v = calc.evaluate(&p("sqrt(x)"), &subs).unwrap();
    assert!((v - std::f64::consts::SQRT_2).abs() < 1e-15);
}

#[test]
fn test_definite_integral_with_huge_exact_value() {
    let calc = CalculusCalculator::new();
    let r = calc
        .integrate(&p("10**1000*x"), None, Some(&Expr::zero()), Some(&Expr::one()))
        .unwrap();
    assert_eq!(r, p("5*10**999"));
}
