// src/service/auth_service.rs

use crate::api::dto::auth_dto::{AuthResponse, CurrentUserResponse, SigninRequest};
use crate::domain::user_model::UserClaims;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use crate::utils::error_helper::{convert_validation_errors, internal_server_error, not_found_error};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        Self {
            user_repo,
            password_manager,
            jwt_manager,
        }
    }

    /// ログイン
    pub async fn signin(&self, signin_data: SigninRequest) -> AppResult<AuthResponse> {
        signin_data
            .validate()
            .map_err(|e| convert_validation_errors(e, "auth_service::signin"))?;

        // ユーザー検索（メールアドレスまたはユーザー名）
        let user = self
            .user_repo
            .find_by_email_or_username(&signin_data.identifier)
            .await?
            .ok_or_else(|| {
                warn!(
                    identifier = %signin_data.identifier,
                    "Login attempt with invalid credentials"
                );
                AppError::Unauthorized("Invalid credentials".to_string())
            })?;

        // アカウント状態チェック
        if !user.can_authenticate() {
            warn!(
                user_id = %user.id,
                is_active = %user.is_active,
                "Login attempt for inactive account"
            );
            return Err(AppError::Unauthorized("Account is inactive".to_string()));
        }

        // パスワード検証
        let is_valid = self
            .password_manager
            .verify_password(&signin_data.password, &user.password_hash)
            .map_err(|e| internal_server_error(e, "auth_service::signin", "Authentication failed"))?;

        if !is_valid {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let access_token = self
            .jwt_manager
            .generate_access_token(UserClaims::from(&user))
            .map_err(|e| {
                internal_server_error(e, "auth_service::signin", "Failed to issue access token")
            })?;

        info!(user_id = %user.id, username = %user.username, "User signed in");

        Ok(AuthResponse::bearer(
            user.to_safe_user(),
            access_token,
            self.jwt_manager.access_token_expires_in(),
        ))
    }

    /// 現在のユーザー情報
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<CurrentUserResponse> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &user_id.to_string(), "auth_service::me"))?;

        let effective_role = UserClaims::from(&user).effective_role();

        Ok(CurrentUserResponse {
            user: user.to_safe_user(),
            effective_role,
        })
    }
}
