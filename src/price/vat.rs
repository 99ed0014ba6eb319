use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::price::Price;
use crate::core::{DecimalInput, Money, PriceError, RoundingMode, parse_decimal};

/// A VAT rate, held as an exact decimal percentage (21, 10.75, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vat {
    percentage: Decimal,
}

impl Vat {
    pub fn new(percentage: Decimal) -> Self {
        Self { percentage }
    }

    /// 0 % VAT, used when a price has no VAT configured.
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO)
    }

    /// Percentage as a float, for display and serialization only.
    pub fn percentage(&self) -> f64 {
        self.percentage.to_f64().unwrap_or_default()
    }

    /// Exact percentage.
    pub fn rate(&self) -> Decimal {
        self.percentage
    }

    /// The ratio applied to the exclusive amount: `percentage / 100`,
    /// carried at two more decimal places than the percentage itself.
    pub fn multiplier(&self) -> Result<Decimal, PriceError> {
        let ratio = self
            .percentage
            .checked_div(dec!(100))
            .ok_or_else(|| PriceError::Overflow(format!("{} / 100", self.percentage)))?;
        RoundingMode::Up.round(ratio, (self.percentage.scale() + 2).min(28))
    }

    /// VAT owed on `exclusive`, rounded once with `rounding`.
    pub fn apply(&self, exclusive: &Money, rounding: RoundingMode) -> Result<Money, PriceError> {
        exclusive.multiplied_by(self.multiplier()?, rounding)
    }
}

/// Values accepted by [`Price::set_vat`]. `None` and empty strings clear the VAT.
pub trait VatInput {
    fn to_percentage(self) -> Result<Option<Decimal>, PriceError>;
}

impl VatInput for &str {
    fn to_percentage(self) -> Result<Option<Decimal>, PriceError> {
        let trimmed = self.trim_matches(|c: char| c.is_whitespace() || c == '%' || c == '\0');
        if trimmed.is_empty() {
            return Ok(None);
        }
        parse_decimal(trimmed).map(Some)
    }
}

impl VatInput for String {
    fn to_percentage(self) -> Result<Option<Decimal>, PriceError> {
        self.as_str().to_percentage()
    }
}

impl VatInput for Vat {
    fn to_percentage(self) -> Result<Option<Decimal>, PriceError> {
        Ok(Some(self.percentage))
    }
}

impl<T: VatInput> VatInput for Option<T> {
    fn to_percentage(self) -> Result<Option<Decimal>, PriceError> {
        match self {
            Some(value) => value.to_percentage(),
            None => Ok(None),
        }
    }
}

macro_rules! numeric_vat_input {
    ($($t:ty),*) => {
        $(
            impl VatInput for $t {
                fn to_percentage(self) -> Result<Option<Decimal>, PriceError> {
                    self.to_decimal().map(Some)
                }
            }
        )*
    };
}

numeric_vat_input!(Decimal, f64, i32, i64, u32, u64);

/// The VAT of a [`Price`], able to report the computed VAT amount.
///
/// Returned by [`Price::vat`]. When the price has no VAT configured the
/// view carries a synthesized 0 % rate; the price itself is not changed.
#[derive(Debug, Clone, Copy)]
pub struct PriceVat<'a> {
    price: &'a Price,
    vat: Vat,
    defined: bool,
}

impl<'a> PriceVat<'a> {
    pub(crate) fn new(price: &'a Price) -> Self {
        match price.vat_definition() {
            Some(vat) => Self {
                price,
                vat: *vat,
                defined: true,
            },
            None => Self {
                price,
                vat: Vat::zero(),
                defined: false,
            },
        }
    }

    /// Whether the price has a VAT rate of its own.
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn definition(&self) -> &Vat {
        &self.vat
    }

    pub fn percentage(&self) -> f64 {
        self.vat.percentage()
    }

    pub fn rate(&self) -> Decimal {
        self.vat.rate()
    }

    /// The VAT amount as computed by the price's calculator.
    pub fn money(&self, per_unit: bool) -> Result<Money, PriceError> {
        self.price.build().vat(self.price, per_unit)
    }
}
