// src/api/dto/auth_dto.rs

use crate::domain::user_model::SafeUser;
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- リクエストDTO ---

/// ログインリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = common::required::MIN_LENGTH, message = "Email or username is required"))]
    pub identifier: String, // email or username

    #[validate(length(min = common::required::MIN_LENGTH, message = "Password is required"))]
    pub password: String,
}

// --- レスポンスDTO ---

/// 認証レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: SafeUser,
    pub access_token: String,
    pub token_type: String,
    /// 有効期限（秒）
    pub expires_in: i64,
}

impl AuthResponse {
    pub fn bearer(user: SafeUser, access_token: String, expires_in: i64) -> Self {
        Self {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// 現在のユーザー情報
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: SafeUser,
    pub effective_role: crate::domain::role_model::RoleName,
}
