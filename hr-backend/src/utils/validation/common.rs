// src/utils/validation/common.rs

//! 共通バリデーション定数とカスタムバリデーション関数
//!
//! DTO間で共有する制約をここにまとめる。

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

// =============================================================================
// バリデーション定数
// =============================================================================

/// ユーザー名の制約
pub mod username {
    pub const MIN_LENGTH: u64 = 3;
    pub const MAX_LENGTH: u64 = 30;
}

/// 氏名の制約
pub mod person_name {
    pub const MAX_LENGTH: u64 = 100;
}

/// パスワードの制約
pub mod password {
    pub const MIN_LENGTH: u64 = 8;
}

/// 部署の制約
pub mod department {
    pub const NAME_MIN_LENGTH: u64 = 1;
    pub const NAME_MAX_LENGTH: u64 = 100;
    pub const DESCRIPTION_MAX_LENGTH: u64 = 1000;
}

/// 従業員の制約
pub mod employee {
    pub const DESIGNATION_MAX_LENGTH: u64 = 100;
}

/// 評価の制約
pub mod evaluation {
    pub const PERIOD_MAX_LENGTH: u64 = 50;
    pub const REMARKS_MAX_LENGTH: u64 = 2000;
}

/// フィードバックの制約
pub mod feedback {
    pub const CONTENT_MIN_LENGTH: u64 = 1;
    pub const CONTENT_MAX_LENGTH: u64 = 5000;
    pub const RATING_MIN: i32 = 1;
    pub const RATING_MAX: i32 = 5;
    pub const CLIENT_NAME_MAX_LENGTH: u64 = 200;
}

/// 通知の制約
pub mod notification {
    pub const TITLE_MIN_LENGTH: u64 = 1;
    pub const TITLE_MAX_LENGTH: u64 = 200;
    pub const MESSAGE_MAX_LENGTH: u64 = 5000;
}

/// 必須フィールドの制約
pub mod required {
    pub const MIN_LENGTH: u64 = 1;
}

// =============================================================================
// カスタムバリデーション関数
// =============================================================================

/// ユーザー名は英数字・アンダースコア・ハイフンのみ
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid username regex"));

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        let mut error = ValidationError::new("invalid_username_format");
        error.message =
            Some("Username may only contain letters, digits, underscores and hyphens".into());
        return Err(error);
    }
    Ok(())
}

/// 文字列が空白のみでないかをチェック
pub fn validate_not_empty_or_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("empty_or_whitespace");
        error.message = Some("Field cannot be empty or contain only whitespace".into());
        return Err(error);
    }
    Ok(())
}

/// 一行テキスト（制御文字を含まない）
pub fn validate_single_line(value: &str) -> Result<(), ValidationError> {
    validate_not_empty_or_whitespace(value)?;

    if value.contains('\0') || value.contains('\r') || value.contains('\n') {
        let mut error = ValidationError::new("invalid_characters");
        error.message =
            Some("Value cannot contain null, carriage return, or newline characters".into());
        return Err(error);
    }
    Ok(())
}
