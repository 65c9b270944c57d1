// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

/// 一意制約違反の判定
pub fn is_unique_violation(db_err: &DbErr) -> bool {
    matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn simple_error(message: String, error_type: &str) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: message.clone(),
        message,
        details: None,
        validation_errors: None,
        errors: None,
        error_type: error_type.to_string(),
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DbErr(db_err) => {
                // 一意制約違反は競合として返す
                if let Some(SqlErr::UniqueConstraintViolation(detail)) = db_err.sql_err() {
                    tracing::warn!(error = %detail, "Unique constraint violation");
                    let mut response = simple_error(
                        "The resource conflicts with an existing record".to_string(),
                        "conflict",
                    );
                    response.details = Some(json!({ "constraint": "unique" }));
                    return (StatusCode::CONFLICT, Json(response)).into_response();
                }

                tracing::error!(error = ?db_err, "Database error");

                let status = match db_err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found".to_string(),
                        Some(json!({ "entity": entity })),
                    ),
                    DbErr::Exec(_) => (
                        "A database operation failed".to_string(),
                        Some(json!({ "operation": "exec" })),
                    ),
                    DbErr::Query(_) => (
                        "A database query failed".to_string(),
                        Some(json!({ "operation": "query" })),
                    ),
                    _ => ("A database error occurred".to_string(), None),
                };

                let mut response = simple_error(message, "database_error");
                response.details = details;
                (status, response)
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, simple_error(message, "not_found"))
            }
            AppError::ValidationError(message) => (
                StatusCode::BAD_REQUEST,
                simple_error(message, "validation_error"),
            ),
            AppError::ValidationErrors(errors) => {
                let mut field_errors = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_insert_with(Vec::new)
                            .push(message.to_string());
                    }
                }
                let errors_array: Vec<serde_json::Value> =
                    errors.iter().map(|e| json!({"message": e})).collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        success: false,
                        error: "Validation failed".to_string(),
                        message: "Validation failed".to_string(),
                        details: None,
                        validation_errors: Some(field_errors),
                        errors: Some(errors_array),
                        error_type: "validation_errors".to_string(),
                    },
                )
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, simple_error(message, "bad_request"))
            }
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                simple_error(message, "unauthorized"),
            ),
            AppError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, simple_error(message, "forbidden"))
            }
            AppError::Conflict(message) => {
                (StatusCode::CONFLICT, simple_error(message, "conflict"))
            }
            AppError::InternalServerError(message) => {
                tracing::error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    simple_error(
                        "An internal server error occurred".to_string(),
                        "internal_server_error",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    pub error_type: String,
}
