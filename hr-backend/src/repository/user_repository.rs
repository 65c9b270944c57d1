// src/repository/user_repository.rs

use crate::api::dto::user_dto::UserFilter;
use crate::domain::role_model::RoleName;
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use sea_orm::entity::*;
use sea_orm::{Condition, DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

/// ユーザー作成用の入力
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: RoleName,
    pub is_superuser: bool,
}

#[derive(Debug)]
pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // --- 基本CRUD操作 ---

    /// ユーザーをIDで検索
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// ユーザーをユーザー名で検索
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Username.eq(username))
            .one(&self.db)
            .await
    }

    /// メールアドレスまたはユーザー名でユーザーを検索
    pub async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(
                Condition::any()
                    .add(user_model::Column::Email.eq(identifier))
                    .add(user_model::Column::Username.eq(identifier)),
            )
            .one(&self.db)
            .await
    }

    /// 複数IDでまとめて取得
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<user_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        UserEntity::find()
            .filter(user_model::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
    }

    /// フィルタ・ページネーション付きでユーザーを取得
    pub async fn find_with_filter(
        &self,
        filter: &UserFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<user_model::Model>, u64), DbErr> {
        let mut conditions = Condition::all();

        if let Some(role) = filter.role {
            conditions = conditions.add(user_model::Column::Role.eq(role.as_str()));
        }

        if let Some(is_active) = filter.is_active {
            conditions = conditions.add(user_model::Column::IsActive.eq(is_active));
        }

        let query = UserEntity::find()
            .filter(conditions)
            .order_by(user_model::Column::CreatedAt, Order::Desc);

        let total_count = query.clone().count(&self.db).await?;

        let page_size = std::cmp::min(page_size, 100); // 最大100件
        let offset = (page.max(1) - 1) * page_size;

        let users = query.limit(page_size).offset(offset).all(&self.db).await?;

        Ok((users, total_count))
    }

    /// ユーザーを作成
    pub async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        let new_user = UserActiveModel {
            username: Set(create_user.username),
            email: Set(create_user.email),
            password_hash: Set(create_user.password_hash),
            first_name: Set(create_user.first_name),
            last_name: Set(create_user.last_name),
            role: Set(create_user.role.as_str().to_string()),
            is_superuser: Set(create_user.is_superuser),
            ..Default::default()
        };

        new_user.insert(&self.db).await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        UserEntity::find().count(&self.db).await
    }
}
