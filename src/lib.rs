//! # tarif
//!
//! Exact price computation: a unit price with a quantity, a VAT rate and
//! an ordered stack of taxes, discounts and custom modifiers.
//!
//! All monetary values use [`rust_decimal::Decimal`] at the currency's
//! minor-unit scale, never floating point. Totals are derived lazily in
//! four stages (exclusive before VAT, VAT, exclusive after VAT, inclusive)
//! and cached until the price is mutated. Every modifier that changes the
//! running amount leaves an entry in a ledger that can be queried back.
//!
//! ## Quick Start
//!
//! ```rust
//! use tarif::{Modifier, Price};
//!
//! let mut price = Price::of_minor(500, "EUR")?;
//! price.set_units(2)?.set_vat(10)?;
//! price.add_modifier("custom", Modifier::new().add(100))?;
//!
//! assert_eq!(price.exclusive(false, false)?.to_string(), "EUR 12.00");
//! assert_eq!(price.vat().money(false)?.to_string(), "EUR 1.20");
//! assert_eq!(price.inclusive(false)?.to_string(), "EUR 13.20");
//! # Ok::<(), tarif::PriceError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Money, currencies, rounding, the price engine |
//! | `json` | JSON summary import/export |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod price;

#[cfg(feature = "json")]
pub mod json;

// Re-export the common types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
#[cfg(feature = "core")]
pub use crate::price::*;
