//! HTTP handlers for production sheet endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CreateSheetInput, EditSheetInput, ProductionSheet, SheetId};

use crate::error::AppResult;
use crate::services::ProductionService;
use crate::AppState;

/// Create a production sheet
pub async fn create_sheet(
    State(state): State<AppState>,
    Json(input): Json<CreateSheetInput>,
) -> AppResult<(StatusCode, Json<ProductionSheet>)> {
    let service = ProductionService::new(state.db);
    let sheet = service.create_sheet(input).await?;
    Ok((StatusCode::CREATED, Json(sheet)))
}

/// List production sheets
pub async fn list_sheets(State(state): State<AppState>) -> AppResult<Json<Vec<ProductionSheet>>> {
    let service = ProductionService::new(state.db);
    let sheets = service.list_sheets().await?;
    Ok(Json(sheets))
}

/// Get a production sheet with its items
pub async fn get_sheet(
    State(state): State<AppState>,
    Path(sheet_id): Path<SheetId>,
) -> AppResult<Json<ProductionSheet>> {
    let service = ProductionService::new(state.db);
    let sheet = service.get_sheet(sheet_id).await?;
    Ok(Json(sheet))
}

/// Replace a production sheet's items
pub async fn edit_sheet(
    State(state): State<AppState>,
    Path(sheet_id): Path<SheetId>,
    Json(input): Json<EditSheetInput>,
) -> AppResult<Json<ProductionSheet>> {
    let service = ProductionService::new(state.db);
    let sheet = service.edit_sheet(sheet_id, input).await?;
    Ok(Json(sheet))
}

/// Delete a production sheet
pub async fn delete_sheet(
    State(state): State<AppState>,
    Path(sheet_id): Path<SheetId>,
) -> AppResult<StatusCode> {
    let service = ProductionService::new(state.db);
    service.delete_sheet(sheet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
