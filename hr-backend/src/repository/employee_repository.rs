// src/repository/employee_repository.rs

use crate::api::dto::organization_dto::EmployeeFilter;
use crate::domain::employee_model::{
    self, ActiveModel as EmployeeActiveModel, Entity as EmployeeEntity,
};
use sea_orm::entity::*;
use sea_orm::{
    Condition, DbConn, DbErr, DeleteResult, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

pub struct EmployeeRepository {
    db: DbConn,
}

impl EmployeeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<employee_model::Model>, DbErr> {
        EmployeeEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<employee_model::Model>, DbErr> {
        EmployeeEntity::find()
            .filter(employee_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// 従業員ID -> 上長ID の対応表（上長チェーン探索用）
    pub async fn manager_links(&self) -> Result<HashMap<Uuid, Option<Uuid>>, DbErr> {
        let rows: Vec<(Uuid, Option<Uuid>)> = EmployeeEntity::find()
            .select_only()
            .column(employee_model::Column::Id)
            .column(employee_model::Column::ManagerId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn find_with_filter(
        &self,
        filter: &EmployeeFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<employee_model::Model>, u64), DbErr> {
        let mut conditions = Condition::all();

        if let Some(department_id) = filter.department_id {
            conditions = conditions.add(employee_model::Column::DepartmentId.eq(department_id));
        }

        if let Some(status) = filter.status {
            conditions = conditions.add(employee_model::Column::Status.eq(status.as_str()));
        }

        if let Some(manager_id) = filter.manager_id {
            conditions = conditions.add(employee_model::Column::ManagerId.eq(manager_id));
        }

        let query = EmployeeEntity::find()
            .filter(conditions)
            .order_by(employee_model::Column::JoiningDate, Order::Asc)
            .order_by(employee_model::Column::CreatedAt, Order::Asc);

        let total_count = query.clone().count(&self.db).await?;

        let page_size = std::cmp::min(page_size, 100);
        let offset = (page.max(1) - 1) * page_size;

        let employees = query.limit(page_size).offset(offset).all(&self.db).await?;

        Ok((employees, total_count))
    }

    pub async fn create(
        &self,
        employee: EmployeeActiveModel,
    ) -> Result<employee_model::Model, DbErr> {
        employee.insert(&self.db).await
    }

    pub async fn update(
        &self,
        employee: EmployeeActiveModel,
    ) -> Result<employee_model::Model, DbErr> {
        employee.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        EmployeeEntity::delete_by_id(id).exec(&self.db).await
    }
}
