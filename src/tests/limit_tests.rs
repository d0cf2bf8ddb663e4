use super::p;
use crate::{CalcError, CalculusCalculator, Direction, Expr};

fn limit(expr: &str, point: Expr, direction: Direction) -> crate::Result<Expr> {
    let calc = CalculusCalculator::new();
    calc.limit(&p(expr), &calc.x, &point, direction)
}

#[test]
fn test_classic_limits_at_zero() {
    let cases = [
        ("sin(x)/x", Expr::one()),
        ("(exp(x) - 1)/x", Expr::one()),
        ("(1 - cos(x))/x**2", Expr::half()),
        ("tan(x)/x", Expr::one()),
        ("(x - sin(x))/x**3", Expr::rational(1, 6)),
        ("log(1 + x)/x", Expr::one()),
        ("(1 + x)**(1/x)", Expr::e()),
    ];
    for (f, expected) in cases {
        assert_eq!(limit(f, Expr::zero(), Direction::Both).unwrap(), expected, "{f}");
    }
}

#[test]
fn test_limits_at_finite_points() {
    assert_eq!(
        limit("(x**2 - 1)/(x - 1)", Expr::one(), Direction::Both).unwrap(),
        Expr::integer(2)
    );
    assert_eq!(
        limit("(x**2 - 4)/(x - 2)", Expr::integer(2), Direction::Plus).unwrap(),
        Expr::integer(4)
    );
    assert_eq!(
        limit("sin(x - 1)/(x - 1)", Expr::one(), Direction::Minus).unwrap(),
        Expr::one()
    );
}

#[test]
fn test_one_sided_poles() {
    assert_eq!(limit("1/x", Expr::zero(), Direction::Plus).unwrap(), Expr::infinity());
    assert_eq!(
        limit("1/x", Expr::zero(), Direction::Minus).unwrap(),
        Expr::neg_infinity()
    );
    assert_eq!(
        limit("-1/x**2", Expr::zero(), Direction::Both).unwrap(),
        Expr::neg_infinity()
    );
}

#[test]
fn test_two_sided_mismatch() {
    match limit("abs(x)/x", Expr::zero(), Direction::Both) {
        Err(CalcError::LimitDoesNotExist { left, right }) => {
            assert_eq!(left, "-1");
            assert_eq!(right, "1");
        }
        other => panic!("expected LimitDoesNotExist, got {other:?}"),
    }
}

#[test]
fn test_limits_at_infinity() {
    assert_eq!(
        limit("(3*x**2 + x)/(x**2 - 5)", Expr::infinity(), Direction::Minus).unwrap(),
        Expr::integer(3)
    );
    assert_eq!(
        limit("x*sin(1/x)", Expr::infinity(), Direction::Minus).unwrap(),
        Expr::one()
    );
    assert_eq!(
        limit("x**2*exp(-x)", Expr::infinity(), Direction::Minus).unwrap(),
        Expr::zero()
    );
    assert_eq!(
        limit("exp(x)", Expr::neg_infinity(), Direction::Plus).unwrap(),
        Expr::zero()
    );
}

#[test]
fn test_continuous_points_substitute() {
    assert_eq!(
        limit("x**2 + 1", Expr::integer(3), Direction::Both).unwrap(),
        Expr::integer(10)
    );
    assert_eq!(
        limit("cos(x)", Expr::pi(), Direction::Both).unwrap(),
        Expr::minus_one()
    );
}

#[test]
fn test_point_must_not_contain_variable() {
    assert!(matches!(
        limit("x", p("x + 1"), Direction::Plus),
        Err(CalcError::PointDependsOnVariable { .. })
    ));
}
