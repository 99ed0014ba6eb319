//! JSON summary of a price.
//!
//! Only base, currency, units and VAT round-trip. Modifiers are not part
//! of the summary; the totals are informational and ignored on import.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::PriceError;
use crate::price::{Price, Vat};

/// Serializable snapshot of a [`Price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Unit base in minor units.
    pub base: i64,
    /// ISO 4217 code.
    pub currency: String,
    pub units: Decimal,
    /// VAT percentage, `null` when the price has no VAT.
    pub vat: Option<f64>,
    pub total: SummaryTotals,
}

/// Aggregate totals in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub exclusive: i64,
    pub inclusive: i64,
}

impl Price {
    /// Snapshot of base, units, VAT and the aggregate totals.
    pub fn summary(&self) -> Result<PriceSummary, PriceError> {
        Ok(PriceSummary {
            base: self.base(true)?.to_minor()?,
            currency: self.currency().code().to_string(),
            units: self.units(),
            vat: self.vat_definition().map(Vat::percentage),
            total: SummaryTotals {
                exclusive: self.exclusive(false, false)?.to_minor()?,
                inclusive: self.inclusive(false)?.to_minor()?,
            },
        })
    }

    /// Rebuild a price from a summary. The totals are not checked.
    pub fn from_summary(summary: &PriceSummary) -> Result<Price, PriceError> {
        Price::of_minor(summary.base, &summary.currency)?
            .with_units(summary.units)?
            .with_vat(summary.vat)
    }

    pub fn to_json(&self) -> Result<String, PriceError> {
        serde_json::to_string(&self.summary()?).map_err(|e| PriceError::Json(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Price, PriceError> {
        let summary: PriceSummary =
            serde_json::from_str(json).map_err(|e: serde_json::Error| PriceError::Json(e.to_string()))?;
        Price::from_summary(&summary)
    }
}
