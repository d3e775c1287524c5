//! Monetary amounts.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::model::ValueObject;

/// Amount in whole currency units (roubles).
///
/// Signed: variant price modifiers are deltas and may be negative. Serialized
/// as a bare JSON number.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    pub const fn amount(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Price of `quantity` units at this unit price.
    pub fn times(self, quantity: u64) -> Money {
        Money(self.0.saturating_mul(i64::try_from(quantity).unwrap_or(i64::MAX)))
    }

    /// Apply a percentage discount, rounding half up to a whole unit.
    ///
    /// Computed exactly in integers: `round(amount * (100 - percent) / 100)`.
    /// `percent` above 100 is clamped to 100.
    pub fn percent_off(self, percent: u8) -> Money {
        let keep = 100 - i64::from(percent.min(100));
        let scaled = self.0.saturating_mul(keep);
        // floor(x + 0.5) with x = scaled / 100
        Money(scaled.saturating_add(50).div_euclid(100))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money(value)
    }
}

/// Renders with space-grouped digits and the rouble sign: `18 100 ₽`.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{grouped} ₽")
        } else {
            write!(f, "{grouped} ₽")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_off_rounds_half_up() {
        assert_eq!(Money::new(320).percent_off(15), Money::new(272));
        assert_eq!(Money::new(580).percent_off(10), Money::new(522));
        // 290 * 0.85 = 246.5
        assert_eq!(Money::new(290).percent_off(15), Money::new(247));
        // 5 * 0.5 = 2.5
        assert_eq!(Money::new(5).percent_off(50), Money::new(3));
    }

    #[test]
    fn percent_off_edges() {
        assert_eq!(Money::new(480).percent_off(0), Money::new(480));
        assert_eq!(Money::new(480).percent_off(100), Money::ZERO);
        assert_eq!(Money::new(480).percent_off(250), Money::ZERO);
    }

    #[test]
    fn times_and_sum() {
        let total: Money = [Money::new(480).times(2), Money::new(85).times(10)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(1810));
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::new(18100).to_string(), "18 100 ₽");
        assert_eq!(Money::new(85).to_string(), "85 ₽");
        assert_eq!(Money::new(1234567).to_string(), "1 234 567 ₽");
        assert_eq!(Money::new(-240).to_string(), "-240 ₽");
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Money::new(352)).unwrap(), "352");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: integer discount matches round-half-up of the exact quotient.
            #[test]
            fn percent_off_matches_exact_rounding(amount in 0i64..10_000_000, percent in 0u8..=100) {
                let exact = amount as f64 * f64::from(100 - percent) / 100.0;
                let expected = (exact + 0.5).floor() as i64;
                prop_assert_eq!(Money::new(amount).percent_off(percent).amount(), expected);
            }

            /// Property: a discount never increases a non-negative price.
            #[test]
            fn percent_off_never_increases(amount in 0i64..10_000_000, percent in 0u8..=100) {
                prop_assert!(Money::new(amount).percent_off(percent) <= Money::new(amount));
            }
        }
    }
}
