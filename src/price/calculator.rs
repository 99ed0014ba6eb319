//! The four-stage price pipeline.
//!
//! 1. exclusive before VAT: base, then every pre-VAT modifier in order
//! 2. VAT on the stage 1 amount
//! 3. exclusive after VAT: post-VAT modifiers folded from zero
//! 4. inclusive: stage 1 + stage 2 + stage 3
//!
//! Each stage is computed at most once per `per_unit` flag. The whole
//! calculator is dropped by the owning [`Price`] on any mutation.

use std::cell::OnceCell;

use tracing::trace;

use super::amendable::ApplyContext;
use super::ledger::Modification;
use super::price::Price;
use crate::core::{Money, PriceError};

/// Amount computed by a stage plus the ledger entries it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub amount: Money,
    pub modifications: Vec<Modification>,
}

/// Memoized results, one slot per `per_unit` value (`[aggregate, per_unit]`).
#[derive(Debug, Clone, Default)]
pub(crate) struct Calculator {
    before_vat: [OnceCell<Stage>; 2],
    vat: [OnceCell<Money>; 2],
    after_vat: [OnceCell<Stage>; 2],
    inclusive: [OnceCell<Stage>; 2],
}

fn slot(per_unit: bool) -> usize {
    usize::from(per_unit)
}

/// Return the cached value or compute and store it. A failed computation
/// leaves the slot empty.
fn memo<T>(
    cell: &OnceCell<T>,
    compute: impl FnOnce() -> Result<T, PriceError>,
) -> Result<&T, PriceError> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

impl Calculator {
    /// Stage 1: base amount with every pre-VAT modifier applied in order.
    pub(crate) fn exclusive_before_vat(&self, price: &Price, per_unit: bool) -> Result<&Stage, PriceError> {
        memo(&self.before_vat[slot(per_unit)], || {
            let mut amount = price.base(per_unit)?;
            let mut modifications = Vec::new();

            for modifier in price.amendments().filter(|m| !m.applies_after_vat()) {
                let ctx = ApplyContext {
                    units: price.units(),
                    per_unit,
                    exclusive: Some(&amount),
                    vat: None,
                    rounding: price.rounding_policy(),
                };
                if let Some(modified) = modifier.apply(&amount, &ctx)? {
                    modifications.push(Modification::record(modified.minus(&amount)?, false, modifier));
                    amount = modified;
                }
            }

            trace!(stage = "exclusive_before_vat", per_unit, amount = %amount, "stage computed");
            Ok(Stage { amount, modifications })
        })
    }

    /// Stage 2: VAT on the stage 1 amount, zero when no VAT is configured.
    pub(crate) fn vat(&self, price: &Price, per_unit: bool) -> Result<Money, PriceError> {
        memo(&self.vat[slot(per_unit)], || {
            let amount = match price.vat_definition() {
                Some(vat) => {
                    let exclusive = self.exclusive_before_vat(price, per_unit)?;
                    vat.apply(&exclusive.amount, price.rounding_policy().vat)?
                }
                None => Money::zero(price.currency()),
            };

            trace!(stage = "vat", per_unit, amount = %amount, "stage computed");
            Ok(amount)
        })
        .copied()
    }

    /// Stage 3: post-VAT modifiers, folded from zero against the stage 1 baseline.
    pub(crate) fn exclusive_after_vat(&self, price: &Price, per_unit: bool) -> Result<&Stage, PriceError> {
        memo(&self.after_vat[slot(per_unit)], || {
            let baseline = self.exclusive_before_vat(price, per_unit)?.amount;
            let mut amount = Money::zero(price.currency());
            let mut modifications = Vec::new();

            for modifier in price.amendments().filter(|m| m.applies_after_vat()) {
                let ctx = ApplyContext {
                    units: price.units(),
                    per_unit,
                    exclusive: Some(&baseline),
                    vat: price.vat_definition(),
                    rounding: price.rounding_policy(),
                };
                if let Some(modified) = modifier.apply(&amount, &ctx)? {
                    modifications.push(Modification::record(modified.minus(&amount)?, true, modifier));
                    amount = modified;
                }
            }

            trace!(stage = "exclusive_after_vat", per_unit, amount = %amount, "stage computed");
            Ok(Stage { amount, modifications })
        })
    }

    /// Stage 4: stage 1 + VAT + stage 3, with both ledgers concatenated.
    pub(crate) fn inclusive(&self, price: &Price, per_unit: bool) -> Result<&Stage, PriceError> {
        memo(&self.inclusive[slot(per_unit)], || {
            let before = self.exclusive_before_vat(price, per_unit)?;
            let vat = self.vat(price, per_unit)?;
            let after = self.exclusive_after_vat(price, per_unit)?;

            let amount = before.amount.plus(&vat)?.plus(&after.amount)?;
            let modifications = before
                .modifications
                .iter()
                .chain(after.modifications.iter())
                .cloned()
                .collect();

            trace!(stage = "inclusive", per_unit, amount = %amount, "stage computed");
            Ok(Stage { amount, modifications })
        })
    }
}
