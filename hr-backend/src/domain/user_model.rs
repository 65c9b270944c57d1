// src/domain/user_model.rs

use super::role_model::RoleName;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    pub role: String,

    pub is_superuser: bool,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::employee_model::Entity")]
    Employee,
}

impl Related<super::employee_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            role: Set(RoleName::Employee.as_str().to_string()),
            is_superuser: Set(false),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    /// 保存されているロール（不明な値は Employee として扱う）
    pub fn role_name(&self) -> RoleName {
        RoleName::from_str(&self.role).unwrap_or(RoleName::Employee)
    }

    /// 管理者判定（ロールまたはスーパーユーザー）
    pub fn is_admin(&self) -> bool {
        self.role_name().is_admin() || self.is_superuser
    }

    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }

    /// 表示名: "first last"、両方空ならユーザー名
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, &self.username)
    }

    /// パスワードハッシュを除いたセーフなユーザー情報を取得
    pub fn to_safe_user(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            display_name: self.display_name(),
            role: self.role_name(),
            is_superuser: self.is_superuser,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

pub fn display_name(first_name: &str, last_name: &str, username: &str) -> String {
    let full_name = format!("{} {}", first_name.trim(), last_name.trim());
    let full_name = full_name.trim();

    if full_name.is_empty() {
        username.to_string()
    } else {
        full_name.to_string()
    }
}

/// パスワードハッシュを含まないセーフなユーザー表現
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub role: RoleName,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for SafeUser {
    fn from(user: Model) -> Self {
        user.to_safe_user()
    }
}

/// JWT のクレーム用のユーザー情報
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub role_name: String,
}

impl UserClaims {
    pub fn role(&self) -> RoleName {
        RoleName::from_str(&self.role_name).unwrap_or(RoleName::Employee)
    }

    /// 実効ロール（スーパーユーザーは Admin として扱う）
    pub fn effective_role(&self) -> RoleName {
        if self.is_superuser {
            RoleName::Admin
        } else {
            self.role()
        }
    }

    pub fn is_admin(&self) -> bool {
        self.effective_role().is_admin()
    }

    pub fn is_manager(&self) -> bool {
        self.effective_role().is_manager()
    }

    pub fn is_employee(&self) -> bool {
        self.effective_role().is_employee()
    }

    /// 管理者またはマネージャー
    pub fn is_admin_or_manager(&self) -> bool {
        self.is_admin() || self.is_manager()
    }
}

impl From<&Model> for UserClaims {
    fn from(user: &Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            role_name: user.role.clone(),
        }
    }
}
