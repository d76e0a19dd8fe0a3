//! A non-negative amount of money.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use serde::{Serialize, Serializer};

use crate::Error;

/// The number of decimal places amounts are kept to.
const DECIMAL_PLACES: u32 = 2;

/// An amount of money, never negative.
///
/// Arithmetic is done in decimal so that summing many amounts does not drift
/// like floating point would. Adding amounts panics on overflow instead of
/// wrapping around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero dollars.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Create an amount, rounded to cents.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount] if `value` is below zero.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::NegativeAmount(value));
        }

        Ok(Self(value.round_dp_with_strategy(
            DECIMAL_PLACES,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// Create an amount from a float, e.g. a JSON number.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] for NaN or infinite values, and
    /// [Error::NegativeAmount] if `value` is below zero.
    pub fn from_f64(value: f64) -> Result<Self, Error> {
        let decimal =
            Decimal::from_f64(value).ok_or_else(|| Error::InvalidAmount(value.to_string()))?;

        Self::new(decimal)
    }

    /// The underlying decimal value.
    pub fn value(self) -> Decimal {
        self.0
    }

    /// The amount as a float for chart libraries and number formatting.
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// The mean of `count` amounts summing to `total`, or `None` if there are no amounts.
    pub fn average(total: Amount, count: usize) -> Option<Amount> {
        if count == 0 {
            return None;
        }

        let mean = total.0 / Decimal::from(count);

        Some(Self(mean.round_dp_with_strategy(
            DECIMAL_PLACES,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();

        let value = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

        Self::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_f64()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let decimal = match value {
            ValueRef::Integer(integer) => Decimal::from(integer),
            ValueRef::Real(real) => Decimal::from_f64(real).ok_or(FromSqlError::InvalidType)?,
            _ => return Err(FromSqlError::InvalidType),
        };

        Amount::new(decimal).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
