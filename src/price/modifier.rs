use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

use super::amendable::{ApplyContext, Attributes, PriceAmendable};
use crate::core::{Money, PriceError};

/// Argument of an add/subtract step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Integer count of minor units, read in the currency of the running amount.
    Minor(i64),
    /// A typed amount; must match the running amount's currency.
    Money(Money),
}

impl Operand {
    /// Parse a minor-unit literal such as `"-100"`.
    pub fn parse(value: &str) -> Result<Self, PriceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PriceError::InvalidModifier(
                "price modifier cannot be null or empty".into(),
            ));
        }
        i64::from_str(trimmed).map(Operand::Minor).map_err(|_| {
            PriceError::InvalidModifier(format!("unsupported price modifier '{value}'"))
        })
    }

    fn to_money(self, build: &Money) -> Money {
        match self {
            Operand::Minor(minor) => Money::of_minor(minor, build.currency()),
            Operand::Money(money) => money,
        }
    }
}

impl From<i64> for Operand {
    fn from(minor: i64) -> Self {
        Operand::Minor(minor)
    }
}

impl From<i32> for Operand {
    fn from(minor: i32) -> Self {
        Operand::Minor(i64::from(minor))
    }
}

impl From<Money> for Operand {
    fn from(money: Money) -> Self {
        Operand::Money(money)
    }
}

/// One arithmetic step of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add(Operand),
    Subtract(Operand),
    Multiply(Decimal),
    Divide(Decimal),
    Abs,
}

/// Initial settings for [`Modifier::of`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierConfig {
    pub modifier_type: Option<String>,
    pub key: Option<String>,
    pub post_vat: bool,
    pub per_unit: bool,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            modifier_type: None,
            key: None,
            post_vat: false,
            per_unit: true,
        }
    }
}

/// A stack of arithmetic steps plus the metadata reported in the ledger.
///
/// ```
/// use tarif::{Modifier, Price};
///
/// let mut price = Price::of_minor(500, "EUR")?;
/// price.set_units(2)?;
/// price.add_modifier("custom", Modifier::new().add(100))?;
///
/// assert_eq!(price.exclusive(false, false)?.to_string(), "EUR 12.00");
/// # Ok::<(), tarif::PriceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    modifier_type: Option<String>,
    key: Option<String>,
    attributes: Attributes,
    post_vat: bool,
    per_unit: bool,
    stack: Vec<Operation>,
}

impl Default for Modifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Modifier {
    pub const TYPE_TAX: &'static str = "tax";
    pub const TYPE_DISCOUNT: &'static str = "discount";
    pub const TYPE_UNDEFINED: &'static str = "undefined";

    /// Empty modifier: pre-VAT, per-unit, no steps.
    pub fn new() -> Self {
        Self {
            modifier_type: None,
            key: None,
            attributes: Attributes::new(),
            post_vat: false,
            per_unit: true,
            stack: Vec::new(),
        }
    }

    pub fn of(config: ModifierConfig) -> Self {
        Self {
            modifier_type: config.modifier_type,
            key: config.key,
            post_vat: config.post_vat,
            per_unit: config.per_unit,
            ..Self::new()
        }
    }

    pub fn with_type(mut self, modifier_type: impl Into<String>) -> Self {
        self.modifier_type = Some(modifier_type.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Replace all attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Apply after VAT has been computed (default: before).
    pub fn with_post_vat(mut self, post_vat: bool) -> Self {
        self.post_vat = post_vat;
        self
    }

    /// Whether add/subtract arguments are per unit (default) or for the whole quantity.
    pub fn with_per_unit(mut self, per_unit: bool) -> Self {
        self.per_unit = per_unit;
        self
    }

    pub fn add(mut self, amount: impl Into<Operand>) -> Self {
        self.stack.push(Operation::Add(amount.into()));
        self
    }

    pub fn subtract(mut self, amount: impl Into<Operand>) -> Self {
        self.stack.push(Operation::Subtract(amount.into()));
        self
    }

    pub fn multiply(mut self, factor: impl Into<Decimal>) -> Self {
        self.stack.push(Operation::Multiply(factor.into()));
        self
    }

    pub fn divide(mut self, divisor: impl Into<Decimal>) -> Self {
        self.stack.push(Operation::Divide(divisor.into()));
        self
    }

    pub fn abs(mut self) -> Self {
        self.stack.push(Operation::Abs);
        self
    }

    pub fn applies_per_unit(&self) -> bool {
        self.per_unit
    }

    pub fn operations(&self) -> &[Operation] {
        &self.stack
    }

    /// Resolve an add/subtract argument, scaling it by the quantity when a
    /// per-unit modifier is evaluated for the whole quantity.
    fn operand(&self, operand: Operand, build: &Money, ctx: &ApplyContext<'_>) -> Result<Money, PriceError> {
        let amount = operand.to_money(build);
        if self.per_unit && !ctx.per_unit && ctx.units > Decimal::ONE {
            return amount.multiplied_by(ctx.units, ctx.rounding.exclusive);
        }
        Ok(amount)
    }
}

impl PriceAmendable for Modifier {
    fn modifier_type(&self) -> &str {
        self.modifier_type.as_deref().unwrap_or(Self::TYPE_UNDEFINED)
    }

    fn set_type(&mut self, modifier_type: &str) {
        self.modifier_type = Some(modifier_type.to_string());
    }

    fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    fn attributes(&self) -> Option<&Attributes> {
        (!self.attributes.is_empty()).then_some(&self.attributes)
    }

    fn applies_after_vat(&self) -> bool {
        self.post_vat
    }

    fn apply(&self, build: &Money, ctx: &ApplyContext<'_>) -> Result<Option<Money>, PriceError> {
        if self.stack.is_empty() {
            return Ok(None);
        }

        let mut amount = *build;
        for operation in &self.stack {
            amount = match *operation {
                Operation::Add(operand) => amount.plus(&self.operand(operand, &amount, ctx)?)?,
                Operation::Subtract(operand) => amount.minus(&self.operand(operand, &amount, ctx)?)?,
                Operation::Multiply(factor) => amount.multiplied_by(factor, ctx.rounding.exclusive)?,
                Operation::Divide(divisor) => amount.divided_by(divisor, ctx.rounding.exclusive)?,
                Operation::Abs => amount.abs(),
            };
        }

        trace!(
            modifier_type = self.modifier_type(),
            key = ?self.key,
            from = %build,
            to = %amount,
            "modifier stack applied"
        );
        Ok(Some(amount))
    }
}
