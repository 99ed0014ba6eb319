//! Money, currencies, rounding and error types.
//!
//! These are the exact-arithmetic building blocks the price engine is
//! written against. Amounts never go through floating point.

mod currencies;
mod error;
mod money;
pub mod number;
mod rounding;

pub use currencies::{Currency, is_known_currency_code};
pub use error::*;
pub use money::*;
pub use number::{DecimalInput, parse_decimal};
pub use rounding::*;
