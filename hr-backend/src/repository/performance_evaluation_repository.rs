// src/repository/performance_evaluation_repository.rs

use crate::api::dto::evaluation_dto::EvaluationFilter;
use crate::domain::performance_evaluation_model::{
    self, ActiveModel as EvaluationActiveModel, Entity as EvaluationEntity,
};
use chrono::NaiveDate;
use sea_orm::entity::*;
use sea_orm::{
    Condition, ConnectionTrait, DbErr, DeleteResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

/// 評価レコードのリポジトリ。トランザクション内でも使えるよう接続を引数で受け取る
pub struct PerformanceEvaluationRepository;

impl PerformanceEvaluationRepository {
    pub async fn find_by_id<C>(
        db: &C,
        id: Uuid,
    ) -> Result<Option<performance_evaluation_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        EvaluationEntity::find_by_id(id).one(db).await
    }

    /// 自然キー (employee, review_date, period) で検索
    pub async fn find_by_natural_key<C>(
        db: &C,
        employee_id: Uuid,
        review_date: NaiveDate,
        evaluation_period: &str,
    ) -> Result<Option<performance_evaluation_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        EvaluationEntity::find()
            .filter(performance_evaluation_model::Column::EmployeeId.eq(employee_id))
            .filter(performance_evaluation_model::Column::ReviewDate.eq(review_date))
            .filter(performance_evaluation_model::Column::EvaluationPeriod.eq(evaluation_period))
            .one(db)
            .await
    }

    fn filter_condition(filter: &EvaluationFilter) -> Condition {
        let mut conditions = Condition::all();

        if let Some(employee_id) = filter.employee_id {
            conditions =
                conditions.add(performance_evaluation_model::Column::EmployeeId.eq(employee_id));
        }

        if let Some(department_id) = filter.department_id {
            conditions = conditions
                .add(performance_evaluation_model::Column::DepartmentId.eq(department_id));
        }

        if let Some(manager_id) = filter.manager_id {
            conditions =
                conditions.add(performance_evaluation_model::Column::ManagerId.eq(manager_id));
        }

        if let Some(from) = filter.review_date_from {
            conditions = conditions.add(performance_evaluation_model::Column::ReviewDate.gte(from));
        }

        if let Some(to) = filter.review_date_to {
            conditions = conditions.add(performance_evaluation_model::Column::ReviewDate.lte(to));
        }

        conditions
    }

    /// 新しい順（review_date, created_at の降順）で取得
    pub async fn find_with_filter<C>(
        db: &C,
        filter: &EvaluationFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<performance_evaluation_model::Model>, u64), DbErr>
    where
        C: ConnectionTrait,
    {
        let query = EvaluationEntity::find()
            .filter(Self::filter_condition(filter))
            .order_by_desc(performance_evaluation_model::Column::ReviewDate)
            .order_by_desc(performance_evaluation_model::Column::CreatedAt);

        let total_count = query.clone().count(db).await?;

        let page_size = std::cmp::min(page_size, 100);
        let offset = (page.max(1) - 1) * page_size;

        let evaluations = query.limit(page_size).offset(offset).all(db).await?;

        Ok((evaluations, total_count))
    }

    /// 条件に一致する全件（ランキング・集計用）
    pub async fn find_all_matching<C>(
        db: &C,
        filter: &EvaluationFilter,
    ) -> Result<Vec<performance_evaluation_model::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        EvaluationEntity::find()
            .filter(Self::filter_condition(filter))
            .order_by_asc(performance_evaluation_model::Column::EmployeeId)
            .order_by_asc(performance_evaluation_model::Column::ReviewDate)
            .order_by_asc(performance_evaluation_model::Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn insert<C>(
        db: &C,
        evaluation: EvaluationActiveModel,
    ) -> Result<performance_evaluation_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        evaluation.insert(db).await
    }

    pub async fn update<C>(
        db: &C,
        evaluation: EvaluationActiveModel,
    ) -> Result<performance_evaluation_model::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        evaluation.update(db).await
    }

    pub async fn delete<C>(db: &C, id: Uuid) -> Result<DeleteResult, DbErr>
    where
        C: ConnectionTrait,
    {
        EvaluationEntity::delete_by_id(id).exec(db).await
    }
}
