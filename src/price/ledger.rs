use std::fmt;

use serde::{Deserialize, Serialize};

use super::amendable::{Attributes, PriceAmendable};
use crate::core::{Currency, Money, PriceError};

/// One line of the modification ledger: the change a modifier caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    amount: Money,
    post: bool,
    #[serde(rename = "type")]
    modifier_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<Attributes>,
}

impl Modification {
    pub(crate) fn record(amount: Money, post: bool, modifier: &dyn PriceAmendable) -> Self {
        Self {
            amount,
            post,
            modifier_type: modifier.modifier_type().to_string(),
            key: modifier.key().map(str::to_string),
            attributes: modifier.attributes().filter(|a| !a.is_empty()).cloned(),
        }
    }

    /// Change caused by the modifier (positive = surcharge, negative = reduction).
    pub fn amount(&self) -> &Money {
        &self.amount
    }

    /// Whether the modifier ran after VAT.
    pub fn post(&self) -> bool {
        self.post
    }

    pub fn modifier_type(&self) -> &str {
        &self.modifier_type
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    /// Whether this entry matches a type filter (`None` matches everything).
    pub fn is_type(&self, modifier_type: Option<&str>) -> bool {
        modifier_type.is_none_or(|t| t == self.modifier_type)
    }
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.modifier_type)?;
        if let Some(key) = &self.key {
            write!(f, "[{key}]")?;
        }
        write!(f, " {}", self.amount)?;
        if self.post {
            f.write_str(" (after VAT)")?;
        }
        Ok(())
    }
}

/// Sum the amounts of the entries matching `modifier_type`.
pub(crate) fn total<'a>(
    entries: impl IntoIterator<Item = &'a Modification>,
    currency: Currency,
    modifier_type: Option<&str>,
) -> Result<Money, PriceError> {
    entries
        .into_iter()
        .filter(|entry| entry.is_type(modifier_type))
        .try_fold(Money::zero(currency), |sum, entry| sum.plus(&entry.amount))
}
