// src/service/user_service.rs

use crate::api::dto::user_dto::{CreateUserRequest, UserFilter};
use crate::config::InitialAdminConfig;
use crate::domain::role_model::RoleName;
use crate::domain::user_model::{self, SafeUser};
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::{CreateUser, UserRepository};
use crate::shared::types::{PageMeta, PageQuery};
use crate::utils::error_helper::{
    conflict_error, convert_validation_errors, internal_server_error, map_unique_violation,
};
use crate::utils::password::{PasswordError, PasswordManager};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct UserService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>, password_manager: Arc<PasswordManager>) -> Self {
        Self {
            user_repo,
            password_manager,
        }
    }

    /// 管理者によるユーザー作成
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<SafeUser> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "user_service::create_user"))?;

        if self
            .user_repo
            .find_by_email_or_username(&request.username)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "username is already taken",
                "user_service::create_user",
            ));
        }

        if self
            .user_repo
            .find_by_email_or_username(&request.email)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "email address is already registered",
                "user_service::create_user",
            ));
        }

        let password_hash = self
            .password_manager
            .hash_password(&request.password)
            .map_err(|e| match e {
                PasswordError::WeakPassword(message) => AppError::ValidationError(message),
                other => internal_server_error(
                    other,
                    "user_service::create_user",
                    "Password hashing failed",
                ),
            })?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: request.username,
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                role: request.role,
                is_superuser: request.is_superuser,
            })
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict("username or email is already registered".to_string())
                })
            })?;

        info!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "User created"
        );

        Ok(user.to_safe_user())
    }

    pub async fn list_users(
        &self,
        filter: &UserFilter,
        pagination: &PageQuery,
    ) -> AppResult<(Vec<SafeUser>, PageMeta)> {
        let (page, per_page) = pagination.page_and_size();
        let (users, total_count) = self
            .user_repo
            .find_with_filter(filter, page, per_page)
            .await?;

        let users = users.iter().map(user_model::Model::to_safe_user).collect();
        Ok((users, PageMeta::new(page, per_page, total_count)))
    }

    /// 初期管理者がいなければ作成する（ハッシュは設定値をそのまま使う）
    pub async fn ensure_initial_admin(
        &self,
        admin: &InitialAdminConfig,
    ) -> AppResult<Option<SafeUser>> {
        if self
            .user_repo
            .find_by_username(&admin.username)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let user = self
            .user_repo
            .create(CreateUser {
                username: admin.username.clone(),
                email: admin.email.clone(),
                password_hash: admin.password_hash.clone(),
                first_name: String::new(),
                last_name: String::new(),
                role: RoleName::Admin,
                is_superuser: true,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Initial admin created");
        Ok(Some(user.to_safe_user()))
    }
}
