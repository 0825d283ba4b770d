//! Error handling for the Chemical Inventory server
//!
//! Provides consistent error responses in English and French

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{LocationError, StockError, UnitError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Store location {0} is outside the caller's entities")]
    ForeignStoreLocation(i64),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_fr: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Domain errors
    #[error("Stock computation failed: {0}")]
    Stock(#[from] StockError),

    #[error("Unit table error: {0}")]
    Unit(#[from] UnitError),

    #[error("Store location tree error: {0}")]
    Location(#[from] LocationError),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
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
    pub message_fr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message_en: "You do not have permission to perform this action".to_string(),
                    message_fr: "Vous n'avez pas la permission d'effectuer cette action"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::ForeignStoreLocation(id) => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "FOREIGN_STORE_LOCATION".to_string(),
                    message_en: format!("Store location {} belongs to another entity", id),
                    message_fr: format!("Le lieu de stockage {} appartient à une autre entité", id),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_fr,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_fr: message_fr.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_fr: format!("{} introuvable", resource),
                    field: None,
                },
            ),
            AppError::Stock(StockError::UnknownLocation(id)) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("Store location {} not found", id),
                    message_fr: format!("Lieu de stockage {} introuvable", id),
                    field: None,
                },
            ),
            AppError::Stock(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "STOCK_COMPUTATION_ERROR".to_string(),
                    message_en: "The stock could not be computed".to_string(),
                    message_fr: "Le stock n'a pas pu être calculé".to_string(),
                    field: None,
                },
            ),
            AppError::Unit(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "UNIT_TABLE_ERROR".to_string(),
                    message_en: "The unit table is inconsistent".to_string(),
                    message_fr: "La table des unités est incohérente".to_string(),
                    field: None,
                },
            ),
            AppError::Location(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "STORE_LOCATION_TREE_ERROR".to_string(),
                    message_en: "The store location tree is inconsistent".to_string(),
                    message_fr: "L'arborescence des lieux de stockage est incohérente"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_fr: "Une erreur de base de données est survenue".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_fr: "Une erreur interne est survenue".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
