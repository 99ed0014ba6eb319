use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use rust_decimal::Decimal;
use tracing::debug;

use super::amendable::PriceAmendable;
use super::calculator::Calculator;
use super::ledger::{self, Modification};
use super::modifier::Modifier;
use super::modifier_spec::IntoModifierSpec;
use super::split::per_unit_share;
use super::vat::{PriceVat, Vat, VatInput};
use crate::core::{
    Currency, DecimalInput, Money, PriceError, RoundingMode, RoundingMoment, RoundingPolicy,
};

/// A unit price with quantity, VAT and an ordered list of modifiers.
///
/// All totals are derived from `(base, units, vat, modifiers, rounding)`.
/// They are computed lazily and cached until the next mutation.
///
/// ```
/// use tarif::Price;
///
/// let mut price = Price::of_minor(1850, "EUR")?;
/// price.set_units("1,476")?.set_vat(6)?;
/// price.add_tax(50)?.add_discount(-100)?;
///
/// assert_eq!(price.inclusive(false)?.to_string(), "EUR 28.16");
/// # Ok::<(), tarif::PriceError>(())
/// ```
///
/// A `Price` caches through interior mutability and is neither `Send` nor
/// `Sync`; share it across threads only behind external synchronization.
#[derive(Debug, Clone)]
pub struct Price {
    base: Money,
    units: Decimal,
    vat: Option<Vat>,
    modifiers: Vec<Rc<dyn PriceAmendable>>,
    rounding: RoundingPolicy,
    calculator: OnceCell<Calculator>,
}

/// A value a price can be compared with or combined with.
#[derive(Debug, Clone, Copy)]
pub enum PriceValue<'a> {
    Price(&'a Price),
    Money(Money),
    /// Minor units in the currency of the price it is used with.
    Minor(i64),
}

impl<'a> From<&'a Price> for PriceValue<'a> {
    fn from(price: &'a Price) -> Self {
        PriceValue::Price(price)
    }
}

impl From<Money> for PriceValue<'_> {
    fn from(money: Money) -> Self {
        PriceValue::Money(money)
    }
}

impl From<i64> for PriceValue<'_> {
    fn from(minor: i64) -> Self {
        PriceValue::Minor(minor)
    }
}

impl From<i32> for PriceValue<'_> {
    fn from(minor: i32) -> Self {
        PriceValue::Minor(i64::from(minor))
    }
}

impl Price {
    /// One unit of `base`, no VAT, no modifiers.
    pub fn new(base: Money) -> Self {
        Self {
            base,
            units: Decimal::ONE,
            vat: None,
            modifiers: Vec::new(),
            rounding: RoundingPolicy::default(),
            calculator: OnceCell::new(),
        }
    }

    /// Price from a minor-unit amount and an ISO 4217 code.
    pub fn of_minor(minor: i64, currency: &str) -> Result<Self, PriceError> {
        Ok(Self::new(Money::of_minor(minor, Currency::of(currency)?)))
    }

    /// Price from a major-unit amount, rounded to the currency scale.
    pub fn of(amount: Decimal, currency: &str, rounding: RoundingMode) -> Result<Self, PriceError> {
        Ok(Self::new(Money::of(amount, Currency::of(currency)?, rounding)?))
    }

    pub fn with_units(mut self, units: impl DecimalInput) -> Result<Self, PriceError> {
        self.set_units(units)?;
        Ok(self)
    }

    pub fn with_vat(mut self, vat: impl VatInput) -> Result<Self, PriceError> {
        self.set_vat(vat)?;
        Ok(self)
    }

    pub fn currency(&self) -> Currency {
        self.base.currency()
    }

    // --- Units ---

    /// Set the quantity. Zero and negative quantities are accepted.
    pub fn set_units(&mut self, units: impl DecimalInput) -> Result<&mut Self, PriceError> {
        self.units = units.to_decimal()?;
        self.invalidate();
        Ok(self)
    }

    pub fn units(&self) -> Decimal {
        self.units
    }

    // --- VAT ---

    /// Set the VAT percentage; `None` or an empty string removes it.
    pub fn set_vat(&mut self, vat: impl VatInput) -> Result<&mut Self, PriceError> {
        self.vat = vat.to_percentage()?.map(Vat::new);
        self.invalidate();
        Ok(self)
    }

    pub fn clear_vat(&mut self) -> &mut Self {
        self.vat = None;
        self.invalidate();
        self
    }

    /// The VAT of this price. Without a configured rate a 0 % view is returned.
    pub fn vat(&self) -> PriceVat<'_> {
        PriceVat::new(self)
    }

    /// The configured VAT rate, if any.
    pub fn vat_definition(&self) -> Option<&Vat> {
        self.vat.as_ref()
    }

    // --- Rounding ---

    pub fn rounding(&self, moment: RoundingMoment) -> RoundingMode {
        self.rounding.get(moment)
    }

    pub fn rounding_policy(&self) -> RoundingPolicy {
        self.rounding
    }

    pub fn set_rounding(&mut self, moment: RoundingMoment, mode: RoundingMode) -> &mut Self {
        self.rounding.set(moment, mode);
        self.invalidate();
        self
    }

    // --- Modifiers ---

    /// Add a modifier of `modifier_type`. The modifier runs after every
    /// modifier added before it.
    pub fn add_modifier(
        &mut self,
        modifier_type: &str,
        modifier: impl IntoModifierSpec,
    ) -> Result<&mut Self, PriceError> {
        let resolved = modifier.into_modifier_spec()?.resolve(modifier_type)?;
        debug!(
            modifier_type,
            key = resolved.key(),
            post_vat = resolved.applies_after_vat(),
            position = self.modifiers.len(),
            "modifier added"
        );
        self.modifiers.push(resolved);
        self.invalidate();
        Ok(self)
    }

    pub fn add_tax(&mut self, modifier: impl IntoModifierSpec) -> Result<&mut Self, PriceError> {
        self.add_modifier(Modifier::TYPE_TAX, modifier)
    }

    pub fn add_discount(&mut self, modifier: impl IntoModifierSpec) -> Result<&mut Self, PriceError> {
        self.add_modifier(Modifier::TYPE_DISCOUNT, modifier)
    }

    pub(crate) fn amendments(&self) -> impl Iterator<Item = &dyn PriceAmendable> + '_ {
        self.modifiers.iter().map(|modifier| modifier.as_ref())
    }

    // --- Cache ---

    /// Drop every cached total.
    pub fn invalidate(&mut self) {
        if self.calculator.take().is_some() {
            debug!(currency = %self.currency(), "price calculator invalidated");
        }
    }

    pub(crate) fn build(&self) -> &Calculator {
        self.calculator.get_or_init(|| {
            debug!(
                currency = %self.currency(),
                units = %self.units,
                modifiers = self.modifiers.len(),
                "price calculator built"
            );
            Calculator::default()
        })
    }

    // --- Amounts ---

    /// The base amount for one unit, or for the whole quantity.
    pub fn base(&self, per_unit: bool) -> Result<Money, PriceError> {
        if per_unit {
            Ok(self.base)
        } else {
            self.apply_units(&self.base)
        }
    }

    /// `amount × units` with the exclusive rounding mode.
    pub fn apply_units(&self, amount: &Money) -> Result<Money, PriceError> {
        amount.multiplied_by(self.units, self.rounding.exclusive)
    }

    /// Exclusive amount after pre-VAT modifiers, optionally with the
    /// post-VAT modifiers added.
    pub fn exclusive(&self, per_unit: bool, include_after_vat: bool) -> Result<Money, PriceError> {
        let calculator = self.build();
        let before = calculator.exclusive_before_vat(self, per_unit)?.amount;
        if !include_after_vat {
            return Ok(before);
        }
        before.plus(&calculator.exclusive_after_vat(self, per_unit)?.amount)
    }

    /// Total including VAT and all modifiers.
    pub fn inclusive(&self, per_unit: bool) -> Result<Money, PriceError> {
        Ok(self.build().inclusive(self, per_unit)?.amount)
    }

    /// Per-unit share of an aggregate `amount` for this price's quantity,
    /// never overstating the average.
    pub fn per_unit(&self, amount: &Money) -> Result<Money, PriceError> {
        per_unit_share(amount, self.units)
    }

    // --- Ledger ---

    /// Ledger of the inclusive computation, pre-VAT entries first,
    /// optionally restricted to one modifier type.
    pub fn modifications(
        &self,
        per_unit: bool,
        modifier_type: Option<&str>,
    ) -> Result<Vec<Modification>, PriceError> {
        Ok(self
            .build()
            .inclusive(self, per_unit)?
            .modifications
            .iter()
            .filter(|entry| entry.is_type(modifier_type))
            .cloned()
            .collect())
    }

    /// Sum of all ledger amounts of `modifier_type` (all types when `None`).
    pub fn modifiers(&self, per_unit: bool, modifier_type: Option<&str>) -> Result<Money, PriceError> {
        let stage = self.build().inclusive(self, per_unit)?;
        ledger::total(&stage.modifications, self.currency(), modifier_type)
    }

    pub fn discounts(&self, per_unit: bool) -> Result<Money, PriceError> {
        self.modifiers(per_unit, Some(Modifier::TYPE_DISCOUNT))
    }

    pub fn taxes(&self, per_unit: bool) -> Result<Money, PriceError> {
        self.modifiers(per_unit, Some(Modifier::TYPE_TAX))
    }

    // --- Comparison ---

    /// Compare the inclusive total with `other` (a price's inclusive total,
    /// an amount, or minor units).
    pub fn compare_to<'a>(&self, other: impl Into<PriceValue<'a>>) -> Result<Ordering, PriceError> {
        let other = match other.into() {
            PriceValue::Price(price) => price.inclusive(false)?,
            value => self.value_to_money(value)?,
        };
        self.inclusive(false)?.compare_to(&other)
    }

    /// Compare the unit base with `other` (a price's unit base, an amount, or minor units).
    pub fn compare_base_to<'a>(&self, other: impl Into<PriceValue<'a>>) -> Result<Ordering, PriceError> {
        let other = self.value_to_money(other.into())?;
        self.base.compare_to(&other)
    }

    /// Whether the inclusive totals are equal.
    pub fn equals<'a>(&self, other: impl Into<PriceValue<'a>>) -> Result<bool, PriceError> {
        Ok(self.compare_to(other)? == Ordering::Equal)
    }

    fn value_to_money(&self, value: PriceValue<'_>) -> Result<Money, PriceError> {
        Ok(match value {
            PriceValue::Price(price) => price.base,
            PriceValue::Money(money) => money,
            PriceValue::Minor(minor) => Money::of_minor(minor, self.currency()),
        })
    }

    // --- Arithmetic on the base ---

    /// New price whose base is `base + other`.
    pub fn plus<'a>(&self, other: impl Into<PriceValue<'a>>) -> Result<Price, PriceError> {
        let other = self.value_to_money(other.into())?;
        self.with_base(self.base.plus(&other)?)
    }

    /// New price whose base is `base - other`.
    pub fn minus<'a>(&self, other: impl Into<PriceValue<'a>>) -> Result<Price, PriceError> {
        let other = self.value_to_money(other.into())?;
        self.with_base(self.base.minus(&other)?)
    }

    /// New price whose base is `base × factor`.
    pub fn multiplied_by(&self, factor: impl DecimalInput) -> Result<Price, PriceError> {
        self.with_base(self.base.multiplied_by(factor.to_decimal()?, self.rounding.exclusive)?)
    }

    /// New price whose base is `base ÷ divisor`.
    pub fn divided_by(&self, divisor: impl DecimalInput) -> Result<Price, PriceError> {
        self.with_base(self.base.divided_by(divisor.to_decimal()?, self.rounding.exclusive)?)
    }

    /// New price whose base is `|base|`.
    pub fn abs(&self) -> Result<Price, PriceError> {
        self.with_base(self.base.abs())
    }

    fn with_base(&self, base: Money) -> Result<Price, PriceError> {
        let mut price = self.clone();
        price.base = base;
        price.invalidate();
        Ok(price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inclusive(false) {
            Ok(inclusive) => write!(f, "{inclusive}"),
            Err(err) => write!(f, "{} ({err})", self.base),
        }
    }
}
