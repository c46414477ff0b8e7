//! Route definitions for the Fabric Roll Ledger API

use axum::{
    routing::{delete, get},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/sheets", sheet_routes())
        .nest("/stock", stock_routes())
        .route("/movements", get(handlers::list_movements))
}

/// Production sheet routes
fn sheet_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sheets).post(handlers::create_sheet))
        .route(
            "/:sheet_id",
            get(handlers::get_sheet)
                .put(handlers::edit_sheet)
                .delete(handlers::delete_sheet),
        )
}

/// Stock ledger routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock).post(handlers::add_stock))
        .route("/colors/:color", get(handlers::get_stock))
        .route("/:id", delete(handlers::remove_stock))
}
