//! Domain errors raised by the reconciliation planner and the input validators

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Business-rule and invariant violations on the stock ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Not enough rolls of a color to cover a withdrawal
    #[error("Insufficient stock for color {color}: requested {requested} rolls, available {available}")]
    InsufficientStock {
        color: String,
        requested: i64,
        available: i64,
    },

    /// Enough rolls, but the recorded weight would drop below zero
    #[error("Insufficient stock weight for color {color}: requested {requested} kg, available {available} kg")]
    InsufficientWeight {
        color: String,
        requested: Decimal,
        available: Decimal,
    },

    /// The resulting level would not fit the ledger columns
    #[error("Stock for color {color} would exceed the storable maximum")]
    StockLimitExceeded { color: String },

    /// A movement with a negative or all-zero magnitude. Valid calls never
    /// produce one.
    #[error("Invalid movement: {reason}")]
    InvalidMovement { reason: String },
}

/// Malformed input rejected before any store is touched
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
