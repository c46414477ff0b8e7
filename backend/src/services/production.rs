//! Production sheet service: the reconciliation engine
//!
//! Every write keeps the stock ledger equal to what the persisted sheets
//! consume. A sheet change, its ledger adjustments and its journal records
//! commit together or not at all.

use shared::{
    CreateSheetInput, EditSheetInput, ProductionSheet, ReconciliationPlan, SheetId,
};
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::{movement_journal, sheet_store, stock_ledger};

/// Service for creating, editing and deleting production sheets
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
}

impl ProductionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a sheet and withdraw everything it consumes
    pub async fn create_sheet(&self, input: CreateSheetInput) -> AppResult<ProductionSheet> {
        let (header, items) = input.validate()?;
        let plan = ReconciliationPlan::for_new_sheet(&items);

        let mut tx = self.db.begin().await?;

        reserve(&mut tx, &plan).await?;
        let sheet_id = sheet_store::insert(&mut tx, &header, &items).await?;
        let recorded = apply(&mut tx, &plan, &header.product, &format!("sheet {sheet_id}")).await?;
        let sheet = sheet_store::load(&mut tx, sheet_id).await?;

        tx.commit().await?;

        tracing::info!(
            sheet_id,
            product = %sheet.header.product,
            colors = ?plan.colors(),
            movements = recorded,
            "Production sheet created"
        );

        Ok(sheet)
    }

    /// Replace a sheet's item set, adjusting stock by the per-color difference
    /// between the stored and the submitted items
    pub async fn edit_sheet(
        &self,
        sheet_id: SheetId,
        input: EditSheetInput,
    ) -> AppResult<ProductionSheet> {
        let revision = input.validate()?;

        let mut tx = self.db.begin().await?;

        let current = sheet_store::lock(&mut tx, sheet_id).await?;
        let plan = ReconciliationPlan::between(&current.items, &revision.items);

        reserve(&mut tx, &plan).await?;

        let product = revision
            .header
            .as_ref()
            .map(|h| h.product.as_str())
            .unwrap_or(current.header.product.as_str());
        let recorded = apply(&mut tx, &plan, product, &format!("edit sheet {sheet_id}")).await?;

        if let Some(header) = &revision.header {
            sheet_store::update_header(&mut tx, sheet_id, header).await?;
        }
        sheet_store::replace_items(&mut tx, sheet_id, &revision.items).await?;
        let sheet = sheet_store::load(&mut tx, sheet_id).await?;

        tx.commit().await?;

        if plan.is_empty() {
            tracing::debug!(sheet_id, "Sheet edited without stock changes");
        } else {
            tracing::info!(
                sheet_id,
                colors = ?plan.colors(),
                net_change = %plan.net_ledger_change(),
                movements = recorded,
                "Production sheet edited"
            );
        }

        Ok(sheet)
    }

    /// Delete a sheet and return everything it consumed to stock
    pub async fn delete_sheet(&self, sheet_id: SheetId) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let current = sheet_store::lock(&mut tx, sheet_id).await?;
        let plan = ReconciliationPlan::for_removed_sheet(&current.items);

        reserve(&mut tx, &plan).await?;
        let recorded = apply(
            &mut tx,
            &plan,
            &current.header.product,
            &format!("delete sheet {sheet_id}"),
        )
        .await?;
        sheet_store::delete(&mut tx, sheet_id).await?;

        tx.commit().await?;

        tracing::info!(
            sheet_id,
            colors = ?plan.colors(),
            movements = recorded,
            "Production sheet deleted"
        );

        Ok(())
    }

    pub async fn get_sheet(&self, sheet_id: SheetId) -> AppResult<ProductionSheet> {
        let mut conn = self.db.acquire().await?;
        sheet_store::load(&mut conn, sheet_id).await
    }

    pub async fn list_sheets(&self) -> AppResult<Vec<ProductionSheet>> {
        sheet_store::list(&self.db).await
    }
}

/// Lock the ledger rows a plan touches and check every delta against them.
/// Nothing is written when any color is short.
async fn reserve(conn: &mut PgConnection, plan: &ReconciliationPlan) -> AppResult<()> {
    if plan.is_empty() {
        return Ok(());
    }

    let locked = stock_ledger::lock_colors(conn, &plan.colors()).await?;
    plan.check_against(|color| {
        locked
            .get(color)
            .map(|entry| entry.level())
            .unwrap_or_default()
    })
    .map_err(|err| {
        tracing::warn!(error = %err, "Sheet change rejected");
        AppError::from(err)
    })
}

/// Apply a reserved plan to the ledger and journal it. Returns the number of
/// movement records written.
async fn apply(
    conn: &mut PgConnection,
    plan: &ReconciliationPlan,
    product: &str,
    reference: &str,
) -> AppResult<usize> {
    for delta in plan.deltas() {
        stock_ledger::adjust(conn, &delta.color, delta.ledger_change()).await?;
    }

    let movements = plan.movements(Some(product), reference)?;
    for movement in &movements {
        movement_journal::record(conn, movement).await?;
    }

    Ok(movements.len())
}
