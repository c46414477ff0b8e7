//! Movement journal models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::types::{MovementId, RollQuantity};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock enters the ledger (manual entry, sheet returns)
    Entry,
    /// Stock leaves the ledger (sheet consumption, manual removal)
    Withdrawal,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Withdrawal => "withdrawal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(MovementKind::Entry),
            "withdrawal" => Some(MovementKind::Withdrawal),
            _ => None,
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementKind::Entry => write!(f, "Entry"),
            MovementKind::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

/// A journaled stock movement. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub product_ref: Option<String>,
    pub color: String,
    pub quantity: i64,
    pub weight: Decimal,
    /// Free-text cause, e.g. `sheet 12` or `manual entry`
    pub reference: String,
}

/// A movement about to be appended to the journal.
///
/// Only constructible through [`NewMovement::new`], which rejects negative
/// magnitudes and movements that move nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    kind: MovementKind,
    color: String,
    quantity: i64,
    weight: Decimal,
    product_ref: Option<String>,
    reference: String,
}

impl NewMovement {
    pub fn new(
        kind: MovementKind,
        color: impl Into<String>,
        quantity: i64,
        weight: Decimal,
        product_ref: Option<String>,
        reference: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        let color = color.into();

        let magnitude = RollQuantity::new(quantity, weight);

        if magnitude.has_negative_part() {
            return Err(LedgerError::InvalidMovement {
                reason: format!(
                    "negative magnitude for {color}: {quantity} rolls / {weight} kg"
                ),
            });
        }
        if magnitude.is_zero() {
            return Err(LedgerError::InvalidMovement {
                reason: format!("zero movement for {color}"),
            });
        }

        Ok(Self {
            kind,
            color,
            quantity,
            weight,
            product_ref,
            reference: reference.into(),
        })
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn product_ref(&self) -> Option<&str> {
        self.product_ref.as_deref()
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Effect of this movement on the ledger: positive for entries
    pub fn ledger_effect(&self) -> RollQuantity {
        signed(self.kind, self.quantity, self.weight)
    }
}

fn signed(kind: MovementKind, quantity: i64, weight: Decimal) -> RollQuantity {
    let magnitude = RollQuantity::new(quantity, weight);
    match kind {
        MovementKind::Entry => magnitude,
        MovementKind::Withdrawal => -magnitude,
    }
}

/// Ordering of the journal listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementOrder {
    #[default]
    Newest,
    Oldest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_its_column_value() {
        for kind in [MovementKind::Entry, MovementKind::Withdrawal] {
            assert_eq!(MovementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::parse("saida"), None);
    }

    #[test]
    fn rejects_zero_movement() {
        let err = NewMovement::new(MovementKind::Entry, "red", 0, Decimal::ZERO, None, "x")
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMovement { .. }));
    }

    #[test]
    fn rejects_negative_magnitudes() {
        assert!(NewMovement::new(MovementKind::Entry, "red", -1, Decimal::ONE, None, "x").is_err());
        assert!(
            NewMovement::new(MovementKind::Withdrawal, "red", 1, Decimal::NEGATIVE_ONE, None, "x")
                .is_err()
        );
    }

    #[test]
    fn withdrawal_effect_is_negative() {
        let m = NewMovement::new(
            MovementKind::Withdrawal,
            "red",
            4,
            Decimal::new(80, 1),
            Some("Shirt".into()),
            "sheet 1",
        )
        .unwrap();
        assert_eq!(m.ledger_effect(), RollQuantity::new(-4, Decimal::new(-80, 1)));
        assert_eq!(m.product_ref(), Some("Shirt"));
    }

    #[test]
    fn order_defaults_to_newest_first() {
        assert_eq!(MovementOrder::default(), MovementOrder::Newest);
    }
}
