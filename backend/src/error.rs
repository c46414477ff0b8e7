//! Error handling for the Fabric Roll Ledger server
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use shared::{LedgerError, ValidationError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Business rule errors
    #[error("Insufficient stock for {color}: requested {requested}, available {available}")]
    InsufficientStock {
        color: String,
        requested: i64,
        available: i64,
    },

    #[error("Insufficient stock weight for {color}: requested {requested} kg, available {available} kg")]
    InsufficientWeight {
        color: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Stock for {color} would exceed the storable maximum")]
    StockLimitExceeded { color: String },

    // Validation errors
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    // Engine invariant violations
    #[error("Invalid movement: {0}")]
    InvalidMovement(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn sheet_not_found(id: shared::SheetId) -> Self {
        AppError::NotFound {
            entity: "Production sheet",
            id,
        }
    }

    pub fn stock_entry_not_found(id: shared::StockEntryId) -> Self {
        AppError::NotFound {
            entity: "Stock entry",
            id,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientStock {
                color,
                requested,
                available,
            } => AppError::InsufficientStock {
                color,
                requested,
                available,
            },
            LedgerError::InsufficientWeight {
                color,
                requested,
                available,
            } => AppError::InsufficientWeight {
                color,
                requested,
                available,
            },
            LedgerError::StockLimitExceeded { color } => AppError::StockLimitExceeded { color },
            LedgerError::InvalidMovement { reason } => AppError::InvalidMovement(reason),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.reason,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::InsufficientStock {
                color,
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Insufficient stock for color {}. Requested: {}, available: {}",
                        color, requested, available
                    ),
                    message_pt: format!(
                        "Estoque insuficiente para a cor {}. Solicitado: {}, disponível: {}",
                        color, requested, available
                    ),
                    field: None,
                    details: Some(json!({
                        "color": color,
                        "requested": requested,
                        "available": available,
                    })),
                },
            ),
            AppError::InsufficientWeight {
                color,
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Insufficient stock weight for color {}. Requested: {} kg, available: {} kg",
                        color, requested, available
                    ),
                    message_pt: format!(
                        "Peso em estoque insuficiente para a cor {}. Solicitado: {} kg, disponível: {} kg",
                        color, requested, available
                    ),
                    field: None,
                    details: Some(json!({
                        "color": color,
                        "requested_weight": requested.to_string(),
                        "available_weight": available.to_string(),
                    })),
                },
            ),
            AppError::StockLimitExceeded { color } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "STOCK_LIMIT_EXCEEDED".to_string(),
                    message_en: format!(
                        "Stock for color {} would exceed the storable maximum",
                        color
                    ),
                    message_pt: format!(
                        "O estoque da cor {} ultrapassaria o máximo permitido",
                        color
                    ),
                    field: None,
                    details: Some(json!({ "color": color })),
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: format!("Dados inválidos em {}: {}", field, message),
                    field: Some(field.clone()),
                    details: None,
                },
            ),
            AppError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} {} not found", entity, id),
                    message_pt: format!("Registro {} não encontrado ({})", id, entity),
                    field: None,
                    details: Some(json!({ "entity_id": id })),
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_pt: "Ocorreu um erro no banco de dados".to_string(),
                    field: None,
                    details: None,
                },
            ),
            AppError::InvalidMovement(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_pt: "Ocorreu um erro interno no servidor".to_string(),
                    field: None,
                    details: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_maps_to_unprocessable_entity() {
        let err: AppError = LedgerError::InsufficientStock {
            color: "red".to_string(),
            requested: 6,
            available: 5,
        }
        .into();

        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail.code, "INSUFFICIENT_STOCK");
        assert_eq!(
            detail.details,
            Some(json!({ "color": "red", "requested": 6, "available": 5 }))
        );
    }

    #[test]
    fn validation_error_keeps_the_field() {
        let err: AppError = ValidationError::new("items[0].rolls_consumed", "Roll count must be positive").into();
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.field.as_deref(), Some("items[0].rolls_consumed"));
    }

    #[test]
    fn stock_limit_maps_to_unprocessable_entity() {
        let err: AppError = LedgerError::StockLimitExceeded {
            color: "red".to_string(),
        }
        .into();
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(detail.code, "STOCK_LIMIT_EXCEEDED");
        assert_eq!(detail.details, Some(json!({ "color": "red" })));
    }

    #[test]
    fn oversized_weight_is_a_bad_request() {
        let reason = shared::validate_weight("10000000000".parse().unwrap()).unwrap_err();
        let err: AppError = ValidationError::new("weight", reason).into();
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.code, "VALIDATION_ERROR");
        assert_eq!(detail.field.as_deref(), Some("weight"));
    }

    #[test]
    fn missing_sheet_is_not_found() {
        let (status, detail) = AppError::sheet_not_found(9).status_and_detail();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(detail.details, Some(json!({ "entity_id": 9 })));
    }

    #[test]
    fn invalid_movement_is_not_user_facing() {
        let err: AppError = LedgerError::InvalidMovement {
            reason: "zero movement for red".to_string(),
        }
        .into();
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!detail.message_en.contains("red"));
    }
}
