use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

use super::vat::Vat;
use crate::core::{Money, PriceError, RoundingPolicy};

/// Opaque key/value metadata carried from a modifier into the ledger.
pub type Attributes = BTreeMap<String, String>;

/// What a modifier sees when it is applied.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext<'a> {
    /// Quantity of the price.
    pub units: Decimal,
    /// Whether a per-unit figure is being computed (otherwise the aggregate).
    pub per_unit: bool,
    /// The exclusive amount the modifier is measured against.
    pub exclusive: Option<&'a Money>,
    /// The price's VAT, for post-VAT modifiers.
    pub vat: Option<&'a Vat>,
    /// Rounding configured on the price.
    pub rounding: RoundingPolicy,
}

/// Anything that can amend a price during calculation.
///
/// [`Modifier`](super::Modifier) is the stock implementation; custom
/// types implement this trait directly and are added through
/// [`ModifierSpec::amendable`](super::ModifierSpec::amendable).
pub trait PriceAmendable: fmt::Debug {
    /// Classification tag ("tax", "discount", ...).
    fn modifier_type(&self) -> &str;

    /// Replace the classification tag. Called when the modifier is added to a price.
    fn set_type(&mut self, modifier_type: &str);

    /// Identifier used to find the modifier's entries in the ledger.
    fn key(&self) -> Option<&str> {
        None
    }

    /// Metadata copied into the ledger. `None` when there is nothing to record.
    fn attributes(&self) -> Option<&Attributes> {
        None
    }

    /// Whether the modifier runs after VAT has been computed.
    fn applies_after_vat(&self) -> bool {
        false
    }

    /// Apply the modifier to the running amount `build`.
    ///
    /// Returns the new running amount, or `None` when the modifier makes no
    /// change at all (which is recorded differently from a zero change).
    fn apply(&self, build: &Money, ctx: &ApplyContext<'_>) -> Result<Option<Money>, PriceError>;
}
