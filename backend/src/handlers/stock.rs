//! HTTP handlers for stock and movement endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{AddStockInput, MovementOrder, MovementRecord, StockEntryId, StockLedgerEntry};

use crate::error::AppResult;
use crate::services::StockService;
use crate::AppState;

fn stock_service(state: AppState) -> StockService {
    StockService::new(state.db, state.config.inventory.manual_product_label.as_str())
}

/// Record a manual stock entry
pub async fn add_stock(
    State(state): State<AppState>,
    Json(input): Json<AddStockInput>,
) -> AppResult<(StatusCode, Json<StockLedgerEntry>)> {
    let entry = stock_service(state).add_stock(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Empty a stock entry
pub async fn remove_stock(
    State(state): State<AppState>,
    Path(id): Path<StockEntryId>,
) -> AppResult<Json<StockLedgerEntry>> {
    let entry = stock_service(state).remove_stock(id).await?;
    Ok(Json(entry))
}

/// Current stock of a color
pub async fn get_stock(
    State(state): State<AppState>,
    Path(color): Path<String>,
) -> AppResult<Json<StockLedgerEntry>> {
    let entry = stock_service(state).get_stock(&color).await?;
    Ok(Json(entry))
}

/// List all stock entries
pub async fn list_stock(State(state): State<AppState>) -> AppResult<Json<Vec<StockLedgerEntry>>> {
    let entries = stock_service(state).list_stock().await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    #[serde(default)]
    pub order: MovementOrder,
    pub color: Option<String>,
}

/// List journaled movements
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<Vec<MovementRecord>>> {
    let movements = stock_service(state)
        .list_movements(query.order, query.color)
        .await?;
    Ok(Json(movements))
}
