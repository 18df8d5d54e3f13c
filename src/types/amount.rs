//! Fixed-point accumulator for cash and volume totals

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Ten-thousandths per whole unit (centavos and kilograms both fit)
const SCALE: f64 = 10_000.0;

/// A measure value held as an integer count of ten-thousandths.
///
/// Addition is exact and order-independent, so row, column and grand totals
/// built from the same amounts always agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Round `value` to the nearest ten-thousandth. Non-finite input becomes zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self((value * SCALE).round() as i64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_values_add_exactly() {
        let sum: Amount = [0.1, 0.7, 0.2, 0.3].into_iter().map(Amount::from).sum();
        assert_eq!(sum.to_f64(), 1.3);
        assert_eq!(sum, Amount::from(1.3));
    }

    #[test]
    fn test_order_independent() {
        let values = [0.1, 0.2, 0.7, 0.3, 64_339.55, 0.05];
        let forward: Amount = values.iter().copied().map(Amount::from).sum();
        let backward: Amount = values.iter().rev().copied().map(Amount::from).sum();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_rounds_to_ten_thousandths() {
        assert_eq!(Amount::from(12.34567).to_f64(), 12.3457);
        assert_eq!(Amount::from(-0.5).to_f64(), -0.5);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(Amount::from(f64::NAN), Amount::ZERO);
        assert_eq!(Amount::from(f64::INFINITY), Amount::ZERO);
    }
}
