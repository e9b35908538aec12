use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest decimal exponent (either direction) accepted from callers. Anything wider
/// would force rescaling through huge powers of ten.
pub const MAX_EXPONENT: i64 = 64;

/// `i64::MAX` has 19 decimal digits.
const I64_DIGITS: i64 = 19;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid money amount '{0}'")]
    Parse(String),
    #[error("money exponent {0} is outside the supported range")]
    ExponentOutOfRange(i64),
}

/// A currency amount expressed in the gateway's smallest unit (e.g. Rial).
///
/// Fractions are kept as given; providers that only accept whole units read
/// the amount through [`Money::to_minor_units`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Money(BigDecimal);

impl Money {
    /// Integral part of the amount (truncated toward zero), or `None` when it does not fit in an `i64`.
    pub fn to_minor_units(&self) -> Option<i64> {
        if self.0.is_zero() {
            return Some(0);
        }
        let (_, scale) = self.0.as_bigint_and_exponent();
        let digits = i64::try_from(self.0.digits()).ok()?;
        if digits.saturating_sub(scale) > I64_DIGITS {
            return None;
        }
        if scale >= digits {
            return Some(0);
        }
        self.0.with_scale(0).to_i64()
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl TryFrom<BigDecimal> for Money {
    type Error = MoneyError;

    fn try_from(value: BigDecimal) -> Result<Self, Self::Error> {
        let (_, scale) = value.as_bigint_and_exponent();
        if scale.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
            return Err(MoneyError::ExponentOutOfRange(-scale));
        }
        Ok(Self(value))
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = BigDecimal::from_str(s.trim()).map_err(|_| MoneyError::Parse(s.to_string()))?;
        Self::try_from(raw)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BigDecimal::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
