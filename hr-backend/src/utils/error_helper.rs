// src/utils/error_helper.rs

//! サービス層で使うエラー生成。生成と同時に warn/error ログを残す

use crate::error::{is_unique_violation, AppError};
use sea_orm::DbErr;
use tracing::{error, warn};
use uuid::Uuid;
use validator::ValidationErrors;

/// validator の結果を `field: message` の一覧にする（フィールド名順）
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    let mut messages: Vec<String> = Vec::new();
    for (field, errors) in validation_errors.field_errors() {
        for error in errors {
            let message = error
                .message
                .as_deref()
                .unwrap_or(error.code.as_ref())
                .to_string();
            messages.push(format!("{}: {}", field, message));
        }
    }
    messages.sort();

    warn!(context, fields = ?messages, "Validation failed");
    AppError::ValidationErrors(messages)
}

pub fn validation_error(field: &str, message: &str) -> AppError {
    AppError::ValidationError(format!("{}: {}", field, message))
}

/// 詳細はログにだけ出し、クライアントには `public_message` を返す
pub fn internal_server_error(
    error: impl std::fmt::Display,
    context: &str,
    public_message: &str,
) -> AppError {
    error!(context, error = %error, "Internal server error");
    AppError::InternalServerError(public_message.to_string())
}

pub fn forbidden_error(message: &str, context: &str, user_id: Uuid) -> AppError {
    warn!(context, user_id = %user_id, message, "Forbidden");
    AppError::Forbidden(message.to_string())
}

pub fn not_found_error(resource: &str, identifier: &str, context: &str) -> AppError {
    warn!(context, resource, identifier, "Resource not found");
    AppError::NotFound(format!("{} {} not found", resource, identifier))
}

pub fn conflict_error(message: &str, context: &str) -> AppError {
    warn!(context, message, "Conflict");
    AppError::Conflict(message.to_string())
}

/// 一意制約違反だけを `on_violation` に読み替える
pub fn map_unique_violation(db_err: DbErr, on_violation: impl FnOnce() -> AppError) -> AppError {
    if is_unique_violation(&db_err) {
        on_violation()
    } else {
        AppError::DbErr(db_err)
    }
}
