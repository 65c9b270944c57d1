// src/api/dto/user_dto.rs

use crate::domain::role_model::RoleName;
use crate::utils::validation::common;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// ユーザー作成リクエスト（管理者用）
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = common::username::MIN_LENGTH,
            max = common::username::MAX_LENGTH,
            message = "Username must be between 3 and 30 characters"
        ),
        custom(function = common::validate_username)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(
        min = common::password::MIN_LENGTH,
        message = "Password must be at least 8 characters"
    ))]
    pub password: String,

    #[validate(length(
        max = common::person_name::MAX_LENGTH,
        message = "First name must not exceed 100 characters"
    ))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(
        max = common::person_name::MAX_LENGTH,
        message = "Last name must not exceed 100 characters"
    ))]
    #[serde(default)]
    pub last_name: String,

    #[serde(default = "default_role")]
    pub role: RoleName,

    #[serde(default)]
    pub is_superuser: bool,
}

fn default_role() -> RoleName {
    RoleName::Employee
}

/// ユーザー一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    pub role: Option<RoleName>,
    pub is_active: Option<bool>,
}
