use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Monetary amount of a transaction, in a single unit regardless of currency.
/// Backed by a `Decimal` so sums and comparisons are exact: a value that
/// cannot be held exactly is rejected at parse time, never rounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Overflow error while computing Amount")]
    Overflow,

    #[error("Underflow error while computing Amount")]
    Underflow,

    #[error("Division of Amount by zero")]
    DivisionByZero,
}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Amount with no fractional part, e.g. `Amount::from_whole(10_000)`.
    pub fn from_whole(units: i64) -> Self {
        Amount(Decimal::from(units))
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.0.checked_add(other.0) {
            Some(total) => Ok(Amount(total)),
            None if other.is_negative() => Err(AmountError::Underflow),
            None => Err(AmountError::Overflow),
        }
    }

    pub fn sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.0.checked_sub(other.0) {
            Some(total) => Ok(Amount(total)),
            None if other.is_negative() => Err(AmountError::Overflow),
            None => Err(AmountError::Underflow),
        }
    }

    /// Splits the amount into `count` equal parts.
    pub fn divide(&self, count: u64) -> Result<Amount, AmountError> {
        if count == 0 {
            return Err(AmountError::DivisionByZero);
        }
        self.0
            .checked_div(Decimal::from(count))
            .map(Amount)
            .ok_or(AmountError::Overflow)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts plain (`-12.50`, `.5`) and exponent (`1.5E4`) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Parse(s.into()));
        }

        let parsed = if s.contains(['e', 'E']) {
            Decimal::from_scientific(s)
        } else {
            Decimal::from_str_exact(s)
        };

        match parsed {
            Ok(value) => Ok(Amount(value)),
            Err(
                rust_decimal::Error::ExceedsMaximumPossibleValue
                | rust_decimal::Error::LessThanMinimumPossibleValue,
            ) => Err(AmountError::Overflow),
            Err(_) => Err(AmountError::Parse(s.into())),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
