//! Common types used across the ledger

use std::ops::{Add, AddAssign, Neg, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Production sheet identifier
pub type SheetId = i64;

/// Stock ledger row identifier (one row per color)
pub type StockEntryId = i64;

/// Movement journal record identifier
pub type MovementId = i64;

/// A number of rolls together with their weight in kg.
///
/// Used for stock on hand, for what a sheet consumes and for the signed
/// difference between two of those. The two components always travel
/// together because they describe the same physical rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollQuantity {
    pub rolls: i64,
    pub weight: Decimal,
}

impl RollQuantity {
    pub const ZERO: RollQuantity = RollQuantity {
        rolls: 0,
        weight: Decimal::ZERO,
    };

    pub fn new(rolls: i64, weight: Decimal) -> Self {
        Self { rolls, weight }
    }

    /// True when neither rolls nor weight change
    pub fn is_zero(&self) -> bool {
        self.rolls == 0 && self.weight.is_zero()
    }

    /// True when either component is below zero
    pub fn has_negative_part(&self) -> bool {
        self.rolls < 0 || self.weight < Decimal::ZERO
    }
}

impl Add for RollQuantity {
    type Output = RollQuantity;

    fn add(self, rhs: RollQuantity) -> RollQuantity {
        RollQuantity {
            rolls: self.rolls + rhs.rolls,
            weight: self.weight + rhs.weight,
        }
    }
}

impl AddAssign for RollQuantity {
    fn add_assign(&mut self, rhs: RollQuantity) {
        self.rolls += rhs.rolls;
        self.weight += rhs.weight;
    }
}

impl Sub for RollQuantity {
    type Output = RollQuantity;

    fn sub(self, rhs: RollQuantity) -> RollQuantity {
        RollQuantity {
            rolls: self.rolls - rhs.rolls,
            weight: self.weight - rhs.weight,
        }
    }
}

impl Neg for RollQuantity {
    type Output = RollQuantity;

    fn neg(self) -> RollQuantity {
        RollQuantity {
            rolls: -self.rolls,
            weight: -self.weight,
        }
    }
}

impl std::iter::Sum for RollQuantity {
    fn sum<I: Iterator<Item = RollQuantity>>(iter: I) -> Self {
        iter.fold(RollQuantity::ZERO, |acc, q| acc + q)
    }
}

impl std::fmt::Display for RollQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} rolls / {} kg", self.rolls, self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_keeps_components_together() {
        let a = RollQuantity::new(10, Decimal::new(205, 1));
        let b = RollQuantity::new(4, Decimal::new(80, 1));

        assert_eq!(a - b, RollQuantity::new(6, Decimal::new(125, 1)));
        assert_eq!(b - a, -(a - b));
        assert_eq!([a, b].into_iter().sum::<RollQuantity>(), a + b);
    }

    #[test]
    fn negative_part_detection() {
        assert!(!RollQuantity::ZERO.has_negative_part());
        assert!(RollQuantity::new(-1, Decimal::ONE).has_negative_part());
        assert!(RollQuantity::new(1, Decimal::new(-1, 2)).has_negative_part());
        assert!(!RollQuantity::new(0, Decimal::new(-0, 2)).has_negative_part());
    }
}
