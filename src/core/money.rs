use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currencies::Currency;
use super::error::PriceError;
use super::rounding::RoundingMode;

/// A monetary amount tagged with its currency.
///
/// The amount is always held at the currency's minor-unit scale
/// (`EUR 12.00`, `JPY 500`). Addition and subtraction are exact;
/// multiplication and division take an explicit [`RoundingMode`]
/// and never lose precision silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

/// Wire form of [`Money`], checked against the currency scale on the way in.
#[derive(Deserialize)]
struct RawMoney {
    amount: Decimal,
    currency: Currency,
}

impl TryFrom<RawMoney> for Money {
    type Error = PriceError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::of(raw.amount, raw.currency, RoundingMode::Unnecessary)
    }
}

impl Money {
    /// Create an amount from an integer count of minor units (e.g. cents).
    pub fn of_minor(minor: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(minor, currency.minor_digits()),
            currency,
        }
    }

    /// Create an amount from a major-unit decimal, rounding to the currency scale.
    pub fn of(amount: Decimal, currency: Currency, rounding: RoundingMode) -> Result<Self, PriceError> {
        Ok(Self {
            amount: rounding.round(amount, currency.minor_digits())?,
            currency,
        })
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::of_minor(0, currency)
    }

    /// The major-unit amount, at the currency scale.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// The amount expressed in minor units (`EUR 12.34` → `1234`).
    pub fn minor_amount(&self) -> Decimal {
        let mut scaled = self.amount;
        scaled.rescale(self.currency.minor_digits());
        Decimal::from_i128_with_scale(scaled.mantissa(), 0)
    }

    /// The amount in minor units as an integer.
    pub fn to_minor(&self) -> Result<i64, PriceError> {
        i64::try_from(self.minor_amount().mantissa())
            .map_err(|_| PriceError::Overflow(format!("{self} does not fit in i64 minor units")))
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Exact sum. Fails on currency mismatch.
    pub fn plus(&self, other: &Money) -> Result<Money, PriceError> {
        self.check_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| PriceError::Overflow(format!("{self} + {other}")))?;
        self.with_amount(amount)
    }

    /// Exact difference. Fails on currency mismatch.
    pub fn minus(&self, other: &Money) -> Result<Money, PriceError> {
        self.check_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| PriceError::Overflow(format!("{self} - {other}")))?;
        self.with_amount(amount)
    }

    /// Multiply by `factor`, rounding the product to the currency scale.
    pub fn multiplied_by(&self, factor: Decimal, rounding: RoundingMode) -> Result<Money, PriceError> {
        let product = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| PriceError::Overflow(format!("{self} * {factor}")))?;
        Money::of(product, self.currency, rounding)
    }

    /// Divide by `divisor`, rounding the quotient to the currency scale.
    pub fn divided_by(&self, divisor: Decimal, rounding: RoundingMode) -> Result<Money, PriceError> {
        if divisor.is_zero() {
            return Err(PriceError::DivisionByZero);
        }
        let quotient = self
            .amount
            .checked_div(divisor)
            .ok_or_else(|| PriceError::Overflow(format!("{self} / {divisor}")))?;
        Money::of(quotient, self.currency, rounding)
    }

    pub fn abs(&self) -> Money {
        Money {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    pub fn negated(&self) -> Money {
        Money {
            amount: -self.amount,
            currency: self.currency,
        }
    }

    /// Split into `parts` shares that differ by at most one minor unit and
    /// sum exactly to `self`. Surplus minor units go to the first shares.
    pub fn split(&self, parts: u32) -> Result<Vec<Money>, PriceError> {
        if parts == 0 {
            return Err(PriceError::InvalidNumber(
                "cannot split an amount into zero parts".into(),
            ));
        }

        let minor = self.minor_amount().mantissa();
        let count = i128::from(parts);
        let base = minor / count;
        let remainder = minor % count;
        let step = remainder.signum();
        let extra = remainder.unsigned_abs();

        (0..parts)
            .map(|i| {
                let share = if u128::from(i) < extra { base + step } else { base };
                let share = i64::try_from(share)
                    .map_err(|_| PriceError::Overflow(format!("share of {self} out of range")))?;
                Ok(Money::of_minor(share, self.currency))
            })
            .collect()
    }

    /// The smallest share [`split`](Self::split) would produce, without
    /// materializing the shares.
    pub fn smallest_share(&self, parts: u64) -> Result<Money, PriceError> {
        if parts == 0 {
            return Err(PriceError::InvalidNumber(
                "cannot split an amount into zero parts".into(),
            ));
        }

        let minor = self.minor_amount().mantissa();
        let count = i128::from(parts);
        let share = minor / count + (minor % count).signum().min(0);
        let share = i64::try_from(share)
            .map_err(|_| PriceError::Overflow(format!("share of {self} out of range")))?;
        Ok(Money::of_minor(share, self.currency))
    }

    /// Compare two amounts of the same currency.
    pub fn compare_to(&self, other: &Money) -> Result<Ordering, PriceError> {
        self.check_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// The smaller of two amounts of the same currency.
    pub fn min(self, other: Money) -> Result<Money, PriceError> {
        Ok(match self.compare_to(&other)? {
            Ordering::Greater => other,
            _ => self,
        })
    }

    fn check_currency(&self, other: &Money) -> Result<(), PriceError> {
        if self.currency != other.currency {
            return Err(PriceError::mismatch(self.currency.code(), other.currency.code()));
        }
        Ok(())
    }

    fn with_amount(&self, amount: Decimal) -> Result<Money, PriceError> {
        Money::of(amount, self.currency, RoundingMode::Unnecessary)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency.code(), self.amount)
    }
}
