use thiserror::Error;

/// Errors raised while configuring or evaluating a price.
///
/// Every error is raised synchronously at the point where it happens.
/// Nothing inside the crate retries or recovers from one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PriceError {
    /// Two amounts in different currencies were compared or combined.
    #[error("currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch {
        /// Currency of the left-hand operand.
        expected: String,
        /// Currency of the right-hand operand.
        found: String,
    },

    /// The currency code is not in the ISO 4217 table.
    #[error("unknown currency code '{0}'")]
    UnknownCurrency(String),

    /// A quantity, percentage or literal could not be read as a number.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// A modifier could not be built from the given input.
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),

    /// Division by zero in money arithmetic.
    #[error("division by zero")]
    DivisionByZero,

    /// `RoundingMode::Unnecessary` was requested but the value needs rounding.
    #[error("rounding necessary: {0}")]
    RoundingNecessary(String),

    /// The result does not fit the decimal representation.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// A custom modifier failed while being applied.
    #[error("modifier failed: {0}")]
    Modifier(String),

    /// A price summary could not be read from or written to JSON.
    #[error("invalid price JSON: {0}")]
    Json(String),
}

impl PriceError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::CurrencyMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
