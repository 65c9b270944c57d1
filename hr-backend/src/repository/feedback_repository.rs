// src/repository/feedback_repository.rs

use crate::api::dto::feedback_dto::FeedbackFilter;
use crate::domain::feedback_model::{
    self, ActiveModel as FeedbackActiveModel, Entity as FeedbackEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{
    Condition, DbConn, DbErr, DeleteResult, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

pub struct FeedbackRepository {
    db: DbConn,
}

impl FeedbackRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<feedback_model::Model>, DbErr> {
        FeedbackEntity::find_by_id(id).one(&self.db).await
    }

    /// 絞り込み一覧。`subject` を指定するとその従業員に関するものだけに限定する
    pub async fn find_with_filter(
        &self,
        filter: &FeedbackFilter,
        subject: Option<Uuid>,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<feedback_model::Model>, u64), DbErr> {
        let mut conditions = Condition::all();

        if let Some(subject) = subject {
            conditions = conditions.add(feedback_model::Column::EmployeeId.eq(subject));
        }

        if let Some(employee_id) = filter.employee_id {
            conditions = conditions.add(feedback_model::Column::EmployeeId.eq(employee_id));
        }

        if let Some(feedback_type) = filter.feedback_type {
            conditions =
                conditions.add(feedback_model::Column::FeedbackType.eq(feedback_type.as_str()));
        }

        if let Some(given_by) = filter.given_by {
            conditions = conditions.add(feedback_model::Column::GivenBy.eq(given_by));
        }

        let query = FeedbackEntity::find()
            .filter(conditions)
            .order_by(feedback_model::Column::CreatedAt, Order::Desc);

        let total_count = query.clone().count(&self.db).await?;

        let page_size = std::cmp::min(page_size, 100);
        let offset = (page.max(1) - 1) * page_size;

        let feedbacks = query.limit(page_size).offset(offset).all(&self.db).await?;

        Ok((feedbacks, total_count))
    }

    /// 期間内に受け取ったフィードバック件数（従業員ごと）
    pub async fn count_by_employee_between(
        &self,
        employee_ids: &[Uuid],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<HashMap<Uuid, u64>, DbErr> {
        if employee_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<Uuid> = FeedbackEntity::find()
            .select_only()
            .column(feedback_model::Column::EmployeeId)
            .filter(feedback_model::Column::EmployeeId.is_in(employee_ids.to_vec()))
            .filter(feedback_model::Column::CreatedAt.gte(from))
            .filter(feedback_model::Column::CreatedAt.lt(to))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut counts = HashMap::new();
        for employee_id in rows {
            *counts.entry(employee_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub async fn create(
        &self,
        feedback: FeedbackActiveModel,
    ) -> Result<feedback_model::Model, DbErr> {
        feedback.insert(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        FeedbackEntity::delete_by_id(id).exec(&self.db).await
    }
}
