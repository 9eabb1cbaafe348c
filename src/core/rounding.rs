use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Increment used for installment amounts throughout the billing system.
pub const DEFAULT_INCREMENT: Decimal = dec!(500);

/// Round `amount` to the nearest multiple of `increment`.
///
/// Remainders of exactly half an increment round up. Negative amounts are
/// clamped to zero first; amounts are never legitimately negative here.
/// A non-positive increment leaves the clamped amount unchanged. When the
/// next multiple up is not representable the amount rounds down instead,
/// so the result is always a finite multiple of `increment`.
///
/// # Examples
///
/// ```
/// use billing_rules::core::rounding::round_to_increment;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_to_increment(dec!(16250), dec!(500)), dec!(16500));
/// assert_eq!(round_to_increment(dec!(16249), dec!(500)), dec!(16000));
/// assert_eq!(round_to_increment(dec!(-10), dec!(500)), dec!(0));
/// ```
pub fn round_to_increment(amount: Decimal, increment: Decimal) -> Decimal {
    let amount = amount.max(Decimal::ZERO);
    if increment <= Decimal::ZERO {
        return amount;
    }

    let remainder = amount % increment;
    let down = amount - remainder;

    if remainder >= increment - remainder {
        down.checked_add(increment).unwrap_or(down)
    } else {
        down
    }
}

/// A rounding rule for monetary amounts.
///
/// Wraps a fixed increment so callers can carry the policy around as a
/// value instead of repeating the constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    increment: Decimal,
}

impl RoundingPolicy {
    pub fn new(increment: Decimal) -> Self {
        Self { increment }
    }

    pub fn increment(&self) -> Decimal {
        self.increment
    }

    pub fn round(&self, amount: Decimal) -> Decimal {
        round_to_increment(amount, self.increment)
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_breaks_up() {
        let policy = RoundingPolicy::default();
        assert_eq!(policy.round(dec!(16250)), dec!(16500));
        assert_eq!(policy.round(dec!(16249)), dec!(16000));
        assert_eq!(policy.round(dec!(16000)), dec!(16000));
        assert_eq!(policy.round(dec!(16249.99)), dec!(16000));
    }

    #[test]
    fn test_small_amounts() {
        let policy = RoundingPolicy::default();
        assert_eq!(policy.round(dec!(249)), Decimal::ZERO);
        assert_eq!(policy.round(dec!(250)), dec!(500));
        assert_eq!(policy.round(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(round_to_increment(dec!(-1), dec!(500)), Decimal::ZERO);
        assert_eq!(round_to_increment(dec!(-900), dec!(500)), Decimal::ZERO);
    }

    #[test]
    fn test_idempotent() {
        let policy = RoundingPolicy::default();
        for amount in [dec!(0), dec!(1), dec!(249.5), dec!(16250), dec!(24499), dec!(99999)] {
            let once = policy.round(amount);
            assert_eq!(policy.round(once), once);
        }
    }

    #[test]
    fn test_custom_increment() {
        let policy = RoundingPolicy::new(dec!(100));
        assert_eq!(policy.increment(), dec!(100));
        assert_eq!(policy.round(dec!(1049)), dec!(1000));
        assert_eq!(policy.round(dec!(1050)), dec!(1100));
    }

    #[test]
    fn test_largest_amount_rounds_down_instead_of_overflowing() {
        // MAX ends in ...335, which would round up past the representable range.
        let rounded = round_to_increment(Decimal::MAX, dec!(500));
        assert_eq!(rounded, Decimal::MAX - dec!(335));
        assert_eq!(rounded % dec!(500), Decimal::ZERO);
        assert_eq!(round_to_increment(rounded, dec!(500)), rounded);
    }

    #[test]
    fn test_huge_increment_tie_check_does_not_overflow() {
        let increment = Decimal::MAX - Decimal::ONE;
        assert_eq!(round_to_increment(dec!(10), increment), Decimal::ZERO);
        assert_eq!(round_to_increment(Decimal::MAX, increment), increment);
    }

    #[test]
    fn test_non_positive_increment_passes_through() {
        assert_eq!(round_to_increment(dec!(123.45), Decimal::ZERO), dec!(123.45));
        assert_eq!(round_to_increment(dec!(-5), dec!(-100)), Decimal::ZERO);
    }
}
