use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A concrete real number. Integers are kept exact as long as the operation
/// and its result allow it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

const INTEGRAL_TOLERANCE: f64 = 1e-9;
// every integer with a smaller magnitude is exactly representable as f64
const EXACT_INTEGER_BOUND: f64 = 9_007_199_254_740_992.0;

impl Number {
    pub fn real(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() {
            Ok(Self::Real(value))
        } else {
            Err(DomainError::NonReal)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Real(r) => *r,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_f64() == 0.0
    }

    pub fn is_one(&self) -> bool {
        self.as_f64() == 1.0
    }

    pub fn is_negative(&self) -> bool {
        self.as_f64() < 0.0
    }

    /// The integer a real is indistinguishable from, if any.
    pub fn integral_value(&self) -> Option<i64> {
        let Number::Real(value) = self else {
            return None;
        };
        let rounded = value.round();
        if rounded.abs() >= EXACT_INTEGER_BOUND {
            return None;
        }
        let tolerance = INTEGRAL_TOLERANCE * value.abs().max(rounded.abs());
        if (value - rounded).abs() <= tolerance {
            Some(rounded as i64)
        } else {
            None
        }
    }

    pub fn add(self, other: Self) -> Result<Self, DomainError> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_add(b) {
                Some(sum) => Ok(Number::Integer(sum)),
                None => Number::real(a as f64 + b as f64),
            },
            (a, b) => Number::real(a.as_f64() + b.as_f64()),
        }
    }

    pub fn sub(self, other: Self) -> Result<Self, DomainError> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_sub(b) {
                Some(difference) => Ok(Number::Integer(difference)),
                None => Number::real(a as f64 - b as f64),
            },
            (a, b) => Number::real(a.as_f64() - b.as_f64()),
        }
    }

    pub fn mul(self, other: Self) -> Result<Self, DomainError> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_mul(b) {
                Some(product) => Ok(Number::Integer(product)),
                None => Number::real(a as f64 * b as f64),
            },
            (a, b) => Number::real(a.as_f64() * b.as_f64()),
        }
    }

    pub fn div(self, other: Self) -> Result<Self, DomainError> {
        if other.is_zero() {
            return Err(DomainError::DivisionByZero);
        }
        Number::real(self.as_f64() / other.as_f64())
    }

    pub fn pow(self, exponent: Self) -> Result<Self, DomainError> {
        if self.is_zero() && exponent.is_zero() {
            return Err(DomainError::ZeroToTheZero);
        }
        if let (Number::Integer(base), Number::Integer(exponent)) = (self, exponent) {
            if let Some(power) = u32::try_from(exponent)
                .ok()
                .and_then(|e| base.checked_pow(e))
            {
                return Ok(Number::Integer(power));
            }
        }
        Number::real(self.as_f64().powf(exponent.as_f64()))
    }

    pub fn root(self, index: Self) -> Result<Self, DomainError> {
        if index.is_zero() {
            return Err(DomainError::ZeroethRoot);
        }
        Number::real(self.as_f64().powf(1.0 / index.as_f64()))
    }

    pub(crate) fn total_cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.cmp(b),
            (Number::Integer(a), Number::Real(b)) => cmp_integer_real(*a, *b),
            (Number::Real(a), Number::Integer(b)) => cmp_integer_real(*b, *a).reverse(),
            (Number::Real(a), Number::Real(b)) => a.total_cmp(b),
        }
    }
}

/// The `i64` a real is exactly equal to, if any.
fn exact_integer(value: f64) -> Option<i64> {
    // -2^63 and 2^63 are exact as f64, the latter is out of range
    let in_range = (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&value);
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

fn cmp_integer_real(integer: i64, real: f64) -> Ordering {
    match (integer as f64).partial_cmp(&real) {
        // rounding may have hidden a difference
        Some(Ordering::Equal) => match exact_integer(real) {
            Some(real) => integer.cmp(&real),
            None => Ordering::Less,
        },
        Some(ordering) => ordering,
        None => (integer as f64).total_cmp(&real),
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (Number::Integer(i), Number::Real(r)) | (Number::Real(r), Number::Integer(i)) => {
                exact_integer(*r) == Some(*i)
            }
            (Number::Real(a), Number::Real(b)) => a == b,
        }
    }
}

impl Eq for Number {}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Integer(i)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Real(r) if r.fract() == 0.0 => write!(f, "{r:.0}"),
            Number::Real(r) => write!(f, "{r}"),
        }
    }
}
