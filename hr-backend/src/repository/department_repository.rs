// src/repository/department_repository.rs

use crate::domain::department_model::{
    self, ActiveModel as DepartmentActiveModel, Entity as DepartmentEntity,
};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct DepartmentRepository {
    db: DbConn,
}

impl DepartmentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<department_model::Model>, DbErr> {
        DepartmentEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<department_model::Model>, DbErr> {
        DepartmentEntity::find()
            .filter(department_model::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<department_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        DepartmentEntity::find()
            .filter(department_model::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
    }

    /// 部署一覧（名前順）
    pub async fn find_all(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<department_model::Model>, DbErr> {
        let mut query = DepartmentEntity::find();

        if !include_inactive {
            query = query.filter(department_model::Column::IsActive.eq(true));
        }

        query
            .order_by(department_model::Column::Name, Order::Asc)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<department_model::Model, DbErr> {
        let department = DepartmentActiveModel {
            name: Set(name),
            description: Set(description),
            ..Default::default()
        };

        department.insert(&self.db).await
    }

    pub async fn update(
        &self,
        department: DepartmentActiveModel,
    ) -> Result<department_model::Model, DbErr> {
        department.update(&self.db).await
    }

    /// 論理削除（is_active = false）
    pub async fn deactivate(
        &self,
        department: department_model::Model,
    ) -> Result<department_model::Model, DbErr> {
        let mut active_model: DepartmentActiveModel = department.into();
        active_model.is_active = Set(false);
        active_model.update(&self.db).await
    }
}
