//! Lenient numeric input for quantities and percentages.
//!
//! Accepts integers, exact decimals, floats and strings using either
//! `.` or `,` as the decimal separator (`"2,485"` reads as 2.485).

use std::str::FromStr;

use rust_decimal::Decimal;

use super::error::PriceError;

/// Values that can be read as an exact decimal number.
pub trait DecimalInput {
    fn to_decimal(self) -> Result<Decimal, PriceError>;
}

/// Parse a decimal string with `.` or `,` separator, surrounding whitespace ignored.
pub fn parse_decimal(value: &str) -> Result<Decimal, PriceError> {
    let normalized = value.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|_| PriceError::InvalidNumber(format!("'{value}' is not a number")))
}

impl DecimalInput for Decimal {
    fn to_decimal(self) -> Result<Decimal, PriceError> {
        Ok(self)
    }
}

impl DecimalInput for f64 {
    fn to_decimal(self) -> Result<Decimal, PriceError> {
        Decimal::try_from(self)
            .map_err(|_| PriceError::InvalidNumber(format!("{self} cannot be represented exactly")))
    }
}

impl DecimalInput for &str {
    fn to_decimal(self) -> Result<Decimal, PriceError> {
        parse_decimal(self)
    }
}

impl DecimalInput for String {
    fn to_decimal(self) -> Result<Decimal, PriceError> {
        parse_decimal(&self)
    }
}

impl DecimalInput for &String {
    fn to_decimal(self) -> Result<Decimal, PriceError> {
        parse_decimal(self)
    }
}

macro_rules! integer_input {
    ($($t:ty),*) => {
        $(
            impl DecimalInput for $t {
                fn to_decimal(self) -> Result<Decimal, PriceError> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

integer_input!(i32, i64, u32, u64);
