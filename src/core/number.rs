//! Numeric atoms: exact rationals and floats.
//!
//! Integers typed by the user stay exact (`BigRational`); decimals become floats.
//! Mixing the two yields a float, the same contagion rule numeric evaluation uses.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Largest integer exponent folded exactly; larger powers stay symbolic
pub(crate) const MAX_EXACT_EXPONENT: u32 = 4096;

#[derive(Debug, Clone)]
pub enum Number {
    Rational(BigRational),
    Float(f64),
}

impl Number {
    pub fn int(n: i64) -> Self {
        Number::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    /// Exact fraction `n/d`; `d` must be non-zero
    pub fn ratio(n: i64, d: i64) -> Self {
        Number::Rational(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    pub fn zero() -> Self {
        Number::Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        Number::Rational(BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
        }
    }

    /// Exact one only; `1.0` keeps its float identity
    pub fn is_one(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_one())
    }

    pub fn is_minus_one(&self) -> bool {
        matches!(self, Number::Rational(r) if *r == -BigRational::one())
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_negative(),
            Number::Float(f) => *f < 0.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Number::Rational(r) => r.is_positive(),
            Number::Float(f) => *f > 0.0,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Rational(r) if r.is_integer())
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    pub fn as_rational(&self) -> Option<&BigRational> {
        match self {
            Number::Rational(r) => Some(r),
            Number::Float(_) => None,
        }
    }

    /// Rational view, converting floats exactly from their binary value
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Number::Rational(r) => Some(r.clone()),
            Number::Float(f) => BigRational::from_float(*f),
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Number::Rational(r) if r.is_integer() => r.numer().to_i64(),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Rational(r) => rational_to_f64(r),
            Number::Float(f) => *f,
        }
    }

    pub fn signum(&self) -> i32 {
        if self.is_negative() {
            -1
        } else if self.is_zero() {
            0
        } else {
            1
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a + b),
            _ => Number::Float(self.to_f64() + other.to_f64()),
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => Number::Rational(a * b),
            _ => Number::Float(self.to_f64() * other.to_f64()),
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::Float(-f),
        }
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Float(f) => Number::Float(f.abs()),
        }
    }

    /// Multiplicative inverse, `None` for zero
    pub fn recip(&self) -> Option<Number> {
        if self.is_zero() {
            return None;
        }
        Some(match self {
            Number::Rational(r) => Number::Rational(r.recip()),
            Number::Float(f) => Number::Float(1.0 / f),
        })
    }

    /// Exact integer power; `None` for `0^negative` or oversized exponents
    pub fn pow_int(&self, exp: i64) -> Option<Number> {
        if exp < 0 && self.is_zero() {
            return None;
        }
        match self {
            Number::Rational(r) => {
                let magnitude = u32::try_from(exp.unsigned_abs()).ok()?;
                if magnitude > MAX_EXACT_EXPONENT {
                    return None;
                }
                let powered = BigRational::new(r.numer().pow(magnitude), r.denom().pow(magnitude));
                Some(Number::Rational(if exp < 0 {
                    powered.recip()
                } else {
                    powered
                }))
            }
            Number::Float(f) => Some(Number::Float(f.powi(i32::try_from(exp).ok()?))),
        }
    }

    /// Exact `q`-th root of a non-negative rational, if it is a perfect power
    pub fn nth_root_exact(&self, q: u32) -> Option<Number> {
        let r = self.as_rational()?;
        if r.is_negative() || q == 0 {
            return None;
        }
        let num_root = r.numer().nth_root(q);
        let den_root = r.denom().nth_root(q);
        if num_root.pow(q) == *r.numer() && den_root.pow(q) == *r.denom() {
            Some(Number::Rational(BigRational::new(num_root, den_root)))
        } else {
            None
        }
    }

    /// Ordering by value; exact against float compares through `f64`
    pub fn cmp_value(&self, other: &Number) -> Ordering {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a.cmp(b),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

pub(crate) fn rational_to_f64(r: &BigRational) -> f64 {
    match (r.numer().to_f64(), r.denom().to_f64()) {
        (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
        _ => {
            // Huge numerators/denominators: scale down before dividing
            let shift = r.numer().bits().max(r.denom().bits()).saturating_sub(1000);
            let n = (r.numer() >> shift).to_f64().unwrap_or(f64::NAN);
            let d = (r.denom() >> shift).to_f64().unwrap_or(f64::NAN);
            n / d
        }
    }
}

pub(crate) fn factorial(k: u32) -> BigInt {
    (1..=k).fold(BigInt::one(), |acc, i| acc * BigInt::from(i))
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Rational(a), Number::Rational(b)) => a == b,
            // -0.0 and 0.0 are the same atom
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Number::Rational(r) => {
                0u8.hash(state);
                r.hash(state);
            }
            Number::Float(f) => {
                1u8.hash(state);
                let normalized = if *f == 0.0 { 0.0 } else { *f };
                normalized.to_bits().hash(state);
            }
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::int(n)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::Rational(r)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_arithmetic() {
        let third = Number::ratio(1, 3);
        let sum = third.add(&third).add(&third);
        assert!(sum.is_one());
        assert_eq!(Number::ratio(2, 4), Number::ratio(1, 2));
    }

    #[test]
    fn test_float_contagion() {
        let mixed = Number::ratio(1, 2).add(&Number::Float(0.25));
        assert_eq!(mixed, Number::Float(0.75));
        assert_ne!(Number::Float(0.5), Number::ratio(1, 2));
    }

    #[test]
    fn test_pow_int() {
        assert_eq!(Number::ratio(2, 3).pow_int(2), Some(Number::ratio(4, 9)));
        assert_eq!(Number::int(2).pow_int(-3), Some(Number::ratio(1, 8)));
        assert_eq!(Number::zero().pow_int(-1), None);
    }

    #[test]
    fn test_nth_root_exact() {
        assert_eq!(Number::ratio(4, 9).nth_root_exact(2), Some(Number::ratio(2, 3)));
        assert_eq!(Number::int(2).nth_root_exact(2), None);
        assert_eq!(Number::int(-8).nth_root_exact(3), None);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), BigInt::from(1));
        assert_eq!(factorial(5), BigInt::from(120));
    }
}
