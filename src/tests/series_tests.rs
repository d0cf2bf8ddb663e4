use super::{numerically_equal, p};
use crate::{CalcError, CalculusCalculator, Expr, Substitutions};

#[test]
fn test_sine_series() {
    let calc = CalculusCalculator::new();
    let s = calc.taylor(&p("sin(x)"), None, &Expr::zero(), 6).unwrap();
    assert_eq!(s.to_string(), "x - x^3/6 + x^5/120 + O(x^6)");
    assert!(s.coefficient(0).is_zero());
    assert!(s.coefficient(2).is_zero());
}

#[test]
fn test_series_coefficients_match_derivatives() {
    // c_k = f^(k)(a) / k!
    let calc = CalculusCalculator::new();
    let f = p("1/(1 - x)");
    let s = calc.taylor(&f, None, &Expr::zero(), 5).unwrap();
    for k in 0..5 {
        assert_eq!(s.coefficient(k), Expr::one(), "coefficient {k}");
    }
}

#[test]
fn test_series_around_nonzero_point() {
    let calc = CalculusCalculator::new();
    let s = calc.taylor(&p("exp(x)"), None, &Expr::integer(2), 3).unwrap();
    assert_eq!(s.point(), &Expr::integer(2));
    let e2 = p("exp(2)");
    assert_eq!(s.coefficient(0), e2);
    assert_eq!(s.coefficient(1), e2);
    assert_eq!(s.coefficient(2), Expr::div(e2, Expr::integer(2)));
}

#[test]
fn test_truncated_series_approximates_function() {
    let calc = CalculusCalculator::new();
    let f = p("cos(x)*exp(x)");
    let s = calc.taylor(&f, None, &Expr::zero(), 8).unwrap();
    let approx = s.remove_order();
    let subs = Substitutions::new().with(calc.x.clone(), Expr::float(0.05));
    let exact = f.evalf(&subs).unwrap();
    let value = approx.evalf(&subs).unwrap();
    assert!((exact - value).abs() < 1e-10);
}

#[test]
fn test_exact_polynomial_series() {
    let calc = CalculusCalculator::new();
    let s = calc.taylor(&p("(x + 1)**3"), None, &Expr::zero(), 6).unwrap();
    assert!(s.is_exact());
    assert!(numerically_equal(
        &s.remove_order(),
        &p("x**3 + 3*x**2 + 3*x + 1"),
        &calc.x,
        &[0.5, 1.5]
    ));
}

#[test]
fn test_series_in_another_variable() {
    let calc = CalculusCalculator::new();
    let y = calc.y.clone();
    let s = calc.taylor(&p("exp(x*y)"), Some(&y), &Expr::zero(), 3).unwrap();
    assert_eq!(s.var(), &y);
    assert_eq!(s.coefficient(1), p("x"));
    assert_eq!(s.coefficient(2), p("x**2/2"));
}

#[test]
fn test_log_stays_in_coefficients() {
    let calc = CalculusCalculator::new();
    let s = calc.taylor(&p("log(x)"), None, &Expr::zero(), 4).unwrap();
    assert_eq!(s.coefficient(0), p("log(x)"));
}

#[test]
fn test_essential_singularity_has_no_series() {
    let calc = CalculusCalculator::new();
    assert!(matches!(
        calc.taylor(&p("exp(1/x)"), None, &Expr::zero(), 4),
        Err(CalcError::SeriesUnavailable { .. })
    ));
}
