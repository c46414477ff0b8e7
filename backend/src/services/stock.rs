//! Manual stock service: entries, removals and the journal listing

use futures::TryStreamExt;
use shared::{
    validate_required_text, AddStockInput, MovementKind, MovementOrder, MovementRecord,
    NewMovement, StockEntryId, StockLedgerEntry, ValidationError, MAX_COLOR_LEN,
};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::services::{movement_journal, stock_ledger};

/// Service for manual stock operations
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
    /// Product reference written on manual movements
    manual_product_label: String,
}

impl StockService {
    pub fn new(db: PgPool, manual_product_label: impl Into<String>) -> Self {
        Self {
            db,
            manual_product_label: manual_product_label.into(),
        }
    }

    /// Add rolls of a color to stock, creating its ledger row on first entry
    pub async fn add_stock(&self, input: AddStockInput) -> AppResult<StockLedgerEntry> {
        let entry = input.validate()?;
        let movement = NewMovement::new(
            MovementKind::Entry,
            entry.color.clone(),
            entry.quantity.rolls,
            entry.quantity.weight,
            Some(self.manual_product_label.clone()),
            "manual entry",
        )?;

        let mut tx = self.db.begin().await?;
        let updated = stock_ledger::adjust(&mut tx, &entry.color, entry.quantity).await?;
        movement_journal::record(&mut tx, &movement).await?;
        tx.commit().await?;

        tracing::info!(
            color = %entry.color,
            added = %entry.quantity,
            level = %updated.level(),
            "Stock entry recorded"
        );

        Ok(updated)
    }

    /// Withdraw the whole stock of a ledger entry. An entry that is already
    /// empty is left alone and nothing is journaled.
    pub async fn remove_stock(&self, id: StockEntryId) -> AppResult<StockLedgerEntry> {
        let mut tx = self.db.begin().await?;

        let current = stock_ledger::lock_by_id(&mut tx, id).await?;
        if current.is_empty() {
            tx.commit().await?;
            tracing::debug!(stock_entry_id = id, color = %current.color, "Stock entry already empty");
            return Ok(current);
        }

        let level = current.level();
        let movement = NewMovement::new(
            MovementKind::Withdrawal,
            current.color.clone(),
            level.rolls,
            level.weight,
            Some(self.manual_product_label.clone()),
            format!("manual removal {id}"),
        )?;

        let updated = stock_ledger::adjust(&mut tx, &current.color, -level).await?;
        movement_journal::record(&mut tx, &movement).await?;
        tx.commit().await?;

        tracing::info!(
            stock_entry_id = id,
            color = %current.color,
            removed = %level,
            "Stock entry removed"
        );

        Ok(updated)
    }

    /// Current stock of one color; zero when never stocked
    pub async fn get_stock(&self, color: &str) -> AppResult<StockLedgerEntry> {
        let color = validate_required_text(color, MAX_COLOR_LEN)
            .map_err(|reason| ValidationError::new("color", reason))?;

        let mut conn = self.db.acquire().await?;
        stock_ledger::get_stock(&mut conn, &color).await
    }

    pub async fn list_stock(&self) -> AppResult<Vec<StockLedgerEntry>> {
        stock_ledger::list(&self.db).await
    }

    /// Journal records in the requested time order
    pub async fn list_movements(
        &self,
        order: MovementOrder,
        color: Option<String>,
    ) -> AppResult<Vec<MovementRecord>> {
        let color = color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        movement_journal::stream_ordered(&self.db, order, color)
            .try_collect()
            .await
    }
}
