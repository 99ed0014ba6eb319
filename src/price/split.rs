//! Per-unit share of an aggregate amount for fractional quantities.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::{Money, PriceError, RoundingMode};

/// The per-unit share of `amount` spread over `units`.
///
/// The fractional part of the quantity takes `amount × fraction`, rounded
/// down; what is left is split into `floor(units)` minor-unit shares and
/// the smallest share is returned. The result multiplied by
/// `floor(units)` never exceeds `amount`.
///
/// With exactly one unit, or less than one whole unit, `amount` is returned as is.
pub fn per_unit_share(amount: &Money, units: Decimal) -> Result<Money, PriceError> {
    if units == Decimal::ONE {
        return Ok(*amount);
    }

    let whole = units.floor();
    if whole < Decimal::ONE {
        return Ok(*amount);
    }

    let fractional = amount.multiplied_by(units - whole, RoundingMode::Floor)?;
    let allocatable = amount.minus(&fractional)?;

    let parts = whole
        .to_u64()
        .ok_or_else(|| PriceError::Overflow(format!("{units} units cannot be split")))?;

    allocatable.smallest_share(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Currency;
    use rust_decimal_macros::dec;

    fn eur(minor: i64) -> Money {
        Money::of_minor(minor, Currency::of("EUR").unwrap())
    }

    #[test]
    fn single_unit_is_untouched() {
        assert_eq!(per_unit_share(&eur(1851), dec!(1)).unwrap(), eur(1851));
    }

    #[test]
    fn whole_units_take_smallest_share() {
        assert_eq!(per_unit_share(&eur(1000), dec!(3)).unwrap(), eur(333));
        assert_eq!(per_unit_share(&eur(1200), dec!(2)).unwrap(), eur(600));
    }

    #[test]
    fn fractional_part_is_floored_before_splitting() {
        // 10.00 × 0.5 = 5.00 for the fraction, 5.00 over two units
        assert_eq!(per_unit_share(&eur(1000), dec!(2.5)).unwrap(), eur(250));
        // 27.31 × 0.476 = 12.99956 → 12.99, leaving 14.32 for one unit
        assert_eq!(per_unit_share(&eur(2731), dec!(1.476)).unwrap(), eur(1432));
    }

    #[test]
    fn never_overstates() {
        let amount = eur(1001);
        let units = dec!(3.3);
        let share = per_unit_share(&amount, units).unwrap();
        let back = share.multiplied_by(units.floor(), RoundingMode::HalfUp).unwrap();
        assert!(back.compare_to(&amount).unwrap().is_le());
    }

    #[test]
    fn quantities_beyond_u32_are_split() {
        // 5 000 000 000.5 units: 0.5 takes half, the rest is 1 EUR per unit
        let units = dec!(5000000000.5);
        assert_eq!(per_unit_share(&eur(1_000_000_000_000), units).unwrap(), eur(100));
    }

    #[test]
    fn below_one_unit_returns_amount() {
        assert_eq!(per_unit_share(&eur(500), dec!(0.5)).unwrap(), eur(500));
    }
}
