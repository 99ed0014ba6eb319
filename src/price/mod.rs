//! The price engine: [`Price`], its modifiers, VAT and the calculator.

mod amendable;
mod calculator;
mod ledger;
mod modifier;
mod modifier_spec;
#[allow(clippy::module_inception)]
mod price;
mod split;
mod vat;

pub use amendable::{ApplyContext, Attributes, PriceAmendable};
pub use calculator::Stage;
pub use ledger::Modification;
pub use modifier::{Modifier, ModifierConfig, Operand, Operation};
pub use modifier_spec::{Argument, FromArguments, IntoModifierSpec, ModifierFactory, ModifierSpec};
pub use price::{Price, PriceValue};
pub use split::per_unit_share;
pub use vat::{PriceVat, Vat, VatInput};
