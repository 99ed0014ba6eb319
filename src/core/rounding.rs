//! Rounding modes and the per-price rounding policy.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::PriceError;

/// How a value is brought back to a fixed number of decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero (commercial rounding).
    #[default]
    HalfUp,
    /// Nearest neighbour, ties towards zero.
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour.
    HalfEven,
    /// Rounding is not allowed; an inexact value is an error.
    Unnecessary,
}

impl RoundingMode {
    /// Round `value` to `dp` decimal places.
    pub fn round(self, value: Decimal, dp: u32) -> Result<Decimal, PriceError> {
        let strategy = match self {
            Self::Up => RoundingStrategy::AwayFromZero,
            Self::Down => RoundingStrategy::ToZero,
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Floor => RoundingStrategy::ToNegativeInfinity,
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfDown => RoundingStrategy::MidpointTowardZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
            Self::Unnecessary => {
                let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::ToZero);
                if rounded != value {
                    return Err(PriceError::RoundingNecessary(format!(
                        "{value} cannot be represented with {dp} decimal places"
                    )));
                }
                return rescale(rounded, dp);
            }
        };
        rescale(value.round_dp_with_strategy(dp, strategy), dp)
    }
}

/// Pad a value to exactly `dp` decimal places so "12" renders as "12.00".
/// Fails when the mantissa has no room left for the padding.
fn rescale(mut value: Decimal, dp: u32) -> Result<Decimal, PriceError> {
    if value.scale() < dp {
        value.rescale(dp);
        if value.scale() < dp {
            return Err(PriceError::Overflow(format!(
                "{value} cannot be held at {dp} decimal places"
            )));
        }
    }
    Ok(value)
}

/// The two points of a calculation where rounding is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundingMoment {
    /// Unit scaling and modifier arithmetic.
    Exclusive,
    /// The VAT amount.
    Vat,
}

/// Rounding modes used by a price, one per [`RoundingMoment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Used for unit scaling and modifier arithmetic.
    pub exclusive: RoundingMode,
    /// Used for the final VAT amount.
    pub vat: RoundingMode,
}

impl RoundingPolicy {
    /// Mode configured for `moment`.
    pub fn get(&self, moment: RoundingMoment) -> RoundingMode {
        match moment {
            RoundingMoment::Exclusive => self.exclusive,
            RoundingMoment::Vat => self.vat,
        }
    }

    /// Replace the mode for `moment`.
    pub fn set(&mut self, moment: RoundingMoment, mode: RoundingMode) {
        match moment {
            RoundingMoment::Exclusive => self.exclusive = mode,
            RoundingMoment::Vat => self.vat = mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn padding_that_does_not_fit_is_an_error() {
        assert!(matches!(
            RoundingMode::HalfUp.round(Decimal::MAX, 2),
            Err(PriceError::Overflow(_))
        ));
        assert!(matches!(
            RoundingMode::Unnecessary.round(Decimal::MAX, 2),
            Err(PriceError::Overflow(_))
        ));
        assert_eq!(RoundingMode::HalfUp.round(dec!(12), 2).unwrap().to_string(), "12.00");
    }

    #[test]
    fn half_up_rounds_ties_away_from_zero() {
        assert_eq!(RoundingMode::HalfUp.round(dec!(1.005), 2).unwrap(), dec!(1.01));
        assert_eq!(RoundingMode::HalfUp.round(dec!(-1.005), 2).unwrap(), dec!(-1.01));
    }

    #[test]
    fn floor_and_down_differ_on_negatives() {
        assert_eq!(RoundingMode::Floor.round(dec!(-1.001), 2).unwrap(), dec!(-1.01));
        assert_eq!(RoundingMode::Down.round(dec!(-1.001), 2).unwrap(), dec!(-1.00));
    }

    #[test]
    fn half_even_uses_even_neighbour() {
        assert_eq!(RoundingMode::HalfEven.round(dec!(0.125), 2).unwrap(), dec!(0.12));
        assert_eq!(RoundingMode::HalfEven.round(dec!(0.135), 2).unwrap(), dec!(0.14));
    }

    #[test]
    fn unnecessary_rejects_inexact_values() {
        assert!(RoundingMode::Unnecessary.round(dec!(1.50), 2).is_ok());
        assert!(matches!(
            RoundingMode::Unnecessary.round(dec!(1.505), 2),
            Err(PriceError::RoundingNecessary(_))
        ));
    }

    #[test]
    fn result_is_padded_to_scale() {
        let rounded = RoundingMode::HalfUp.round(dec!(12), 2).unwrap();
        assert_eq!(rounded.to_string(), "12.00");
    }

    #[test]
    fn policy_defaults_to_half_up() {
        let mut policy = RoundingPolicy::default();
        assert_eq!(policy.get(RoundingMoment::Exclusive), RoundingMode::HalfUp);
        assert_eq!(policy.get(RoundingMoment::Vat), RoundingMode::HalfUp);

        policy.set(RoundingMoment::Vat, RoundingMode::Floor);
        assert_eq!(policy.vat, RoundingMode::Floor);
        assert_eq!(policy.exclusive, RoundingMode::HalfUp);
    }
}
