//! Stock ledger models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{RollQuantity, StockEntryId};

/// Aggregate stock for one color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLedgerEntry {
    /// `None` for a color that has never been stocked
    pub id: Option<StockEntryId>,
    pub color: String,
    pub roll_count: i64,
    pub total_weight: Decimal,
    /// Last time stock entered for this color
    pub last_entry_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl StockLedgerEntry {
    /// Zero-valued entry for a color with no ledger row
    pub fn empty(color: impl Into<String>) -> Self {
        Self {
            id: None,
            color: color.into(),
            roll_count: 0,
            total_weight: Decimal::ZERO,
            last_entry_at: None,
            created_at: None,
        }
    }

    pub fn level(&self) -> RollQuantity {
        RollQuantity::new(self.roll_count, self.total_weight)
    }

    pub fn is_empty(&self) -> bool {
        self.level().is_zero()
    }
}

/// Input for a manual stock entry
#[derive(Debug, Clone, Deserialize)]
pub struct AddStockInput {
    pub color: String,
    pub rolls: i64,
    pub weight: Decimal,
}

/// Validated manual stock entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEntry {
    pub color: String,
    pub quantity: RollQuantity,
}
