use super::{numerically_equal, p};
use crate::{CalcError, CalculusCalculator, Expr};

/// F' must agree with f away from the integrand's singularities
fn check_antiderivative(f: &str, points: &[f64]) {
    let calc = CalculusCalculator::new();
    let f = p(f);
    let antiderivative = calc
        .integrate(&f, None, None, None)
        .unwrap_or_else(|e| panic!("no antiderivative for {f}: {e}"));
    let back = calc.differentiate(&antiderivative, None, 1).unwrap();
    assert!(
        numerically_equal(&back, &f, &calc.x, points),
        "d/dx {antiderivative} = {back} does not match {f}"
    );
}

#[test]
fn test_textbook_antiderivatives() {
    let cases = [
        "3*x**2 + 2*x + 1",
        "1/x**3",
        "exp(2*x + 1)",
        "cos(3*x)",
        "1/(4 + x**2)",
        "x/(x**2 + 1)",
        "sin(x)**2",
        "cos(x)**3",
        "tan(x)",
        "2**x",
    ];
    for f in cases {
        check_antiderivative(f, &[0.2, 0.4, 0.6]);
    }
}

#[test]
fn test_domain_restricted_antiderivatives() {
    check_antiderivative("1/sqrt(1 - x**2)", &[-0.5, 0.1, 0.7]);
    check_antiderivative("1/(x**2 - 1)", &[1.5, 2.5, 3.5]);
}

#[test]
fn test_antiderivatives_with_irrational_coefficients() {
    // atan(x/sqrt(2))/sqrt(2)
    check_antiderivative("1/(x**2 + 2)", &[-1.0, 0.5, 2.0]);
    check_antiderivative("sqrt(2)*x", &[0.5, 1.5]);
    check_antiderivative("1/sqrt(2 - x**2)", &[-0.5, 0.1, 1.2]);
}

#[test]
fn test_by_parts_family() {
    for f in ["x*sin(x)", "x**2*exp(x)", "log(x)", "x*log(x)", "atan(x)", "exp(x)*cos(x)"] {
        check_antiderivative(f, &[0.5, 1.5, 2.5]);
    }
}

#[test]
fn test_substitution_family() {
    for f in ["2*x*cos(x**2)", "sin(x)*cos(x)", "exp(x)/(1 + exp(x))", "log(x)/x"] {
        check_antiderivative(f, &[0.5, 1.5, 2.5]);
    }
}

#[test]
fn test_rational_with_polynomial_part() {
    check_antiderivative("(x**3 + 1)/(x + 2)", &[0.5, 1.5, 2.5]);
}

#[test]
fn test_integral_of_other_variable_is_linear() {
    let calc = CalculusCalculator::new();
    let r = calc.integrate(&p("y"), None, None, None).unwrap();
    assert_eq!(r, p("x*y"));
}

#[test]
fn test_definite_with_trig_bounds() {
    let calc = CalculusCalculator::new();
    let r = calc
        .integrate(&p("sin(x)"), None, Some(&Expr::zero()), Some(&Expr::pi()))
        .unwrap();
    assert_eq!(r, Expr::integer(2));
}

#[test]
fn test_improper_integrals() {
    let calc = CalculusCalculator::new();
    let r = calc
        .integrate(&p("exp(-x)"), None, Some(&Expr::zero()), Some(&Expr::infinity()))
        .unwrap();
    assert_eq!(r, Expr::one());

    let r = calc
        .integrate(&p("1/(1 + x**2)"), None, Some(&Expr::neg_infinity()), Some(&Expr::infinity()))
        .unwrap();
    assert_eq!(r, Expr::pi());
}

#[test]
fn test_divergent_integral_is_not_numeric() {
    let calc = CalculusCalculator::new();
    let r = calc.integrate(&p("1/x"), None, Some(&Expr::one()), Some(&Expr::infinity()));
    assert!(matches!(r, Err(CalcError::NotNumeric { .. })));
}

#[test]
fn test_reversed_bounds_flip_sign() {
    let calc = CalculusCalculator::new();
    let r = calc
        .integrate(&p("x"), None, Some(&Expr::one()), Some(&Expr::zero()))
        .unwrap();
    assert_eq!(r, Expr::rational(-1, 2));
}

#[test]
fn test_no_closed_form() {
    let calc = CalculusCalculator::new();
    for f in ["sin(x)/x", "exp(-x**2)"] {
        match calc.integrate(&p(f), None, None, None) {
            Err(CalcError::NoClosedForm { var, .. }) => assert_eq!(var, "x"),
            other => panic!("{f}: expected NoClosedForm, got {other:?}"),
        }
    }
}
