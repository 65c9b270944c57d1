// src/service/evaluation_service.rs

use crate::api::dto::evaluation_dto::{
    CreateEvaluationRequest, EvaluationFilter, EvaluationResponse, UpdateEvaluationRequest,
};
use crate::db::DbPool;
use crate::domain::performance_evaluation_model;
use crate::domain::user_model::UserClaims;
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::employee_repository::EmployeeRepository;
use crate::repository::performance_evaluation_repository::PerformanceEvaluationRepository;
use crate::repository::user_repository::UserRepository;
use crate::shared::types::{PageMeta, PageQuery};
use crate::utils::error_helper::{
    convert_validation_errors, forbidden_error, map_unique_violation, not_found_error,
    validation_error,
};
use crate::with_transaction;
use sea_orm::{DbErr, Set};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const DUPLICATE_EVALUATION: &str =
    "an evaluation for this employee, review date and period already exists";

pub struct EvaluationService {
    db: DbPool,
    user_repo: Arc<UserRepository>,
    employee_repo: Arc<EmployeeRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl EvaluationService {
    pub fn new(db: DbPool) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            employee_repo: Arc::new(EmployeeRepository::new(db.clone())),
            department_repo: Arc::new(DepartmentRepository::new(db.clone())),
            db,
        }
    }

    /// 評価を登録する。合計点は保存時に再計算される
    pub async fn record(
        &self,
        actor: &UserClaims,
        request: CreateEvaluationRequest,
    ) -> AppResult<EvaluationResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "evaluation_service::record"))?;
        ensure_metrics_in_range(request.metrics.out_of_range())?;

        self.user_repo
            .find_by_id(request.employee_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "User",
                    &request.employee_id.to_string(),
                    "evaluation_service::record",
                )
            })?;

        // 上長は未指定なら登録者
        let manager_id = request.manager_id.unwrap_or(actor.user_id);
        if request.manager_id.is_some() {
            self.user_repo.find_by_id(manager_id).await?.ok_or_else(|| {
                not_found_error(
                    "User",
                    &manager_id.to_string(),
                    "evaluation_service::record",
                )
            })?;
        }

        let department_id = match request.department_id {
            Some(department_id) => {
                self.department_repo
                    .find_by_id(department_id)
                    .await?
                    .ok_or_else(|| {
                        not_found_error(
                            "Department",
                            &department_id.to_string(),
                            "evaluation_service::record",
                        )
                    })?;
                Some(department_id)
            }
            None => self
                .employee_repo
                .find_by_user_id(request.employee_id)
                .await?
                .and_then(|employee| employee.department_id),
        };

        let evaluation_period = request.evaluation_period.trim().to_string();

        let mut active_model = performance_evaluation_model::ActiveModel {
            employee_id: Set(request.employee_id),
            department_id: Set(department_id),
            manager_id: Set(Some(manager_id)),
            review_date: Set(request.review_date),
            evaluation_period: Set(evaluation_period.clone()),
            remarks: Set(request.remarks),
            ..Default::default()
        };
        active_model.set_metrics(&request.metrics.to_metrics());

        let employee_id = request.employee_id;
        let review_date = request.review_date;

        let evaluation = with_transaction!(self.db, |txn| async move {
            let existing = PerformanceEvaluationRepository::find_by_natural_key(
                txn,
                employee_id,
                review_date,
                &evaluation_period,
            )
            .await?;
            if existing.is_some() {
                return Err(validation_error("evaluation", DUPLICATE_EVALUATION));
            }

            PerformanceEvaluationRepository::insert(txn, active_model)
                .await
                .map_err(map_save_error)
        })?;

        info!(
            evaluation_id = %evaluation.id,
            employee_id = %evaluation.employee_id,
            user_id = %actor.user_id,
            total_score = evaluation.total_score,
            "Performance evaluation recorded"
        );

        Ok(evaluation.into())
    }

    /// 指定された項目だけを更新し、合計点を再計算する
    pub async fn update(
        &self,
        actor: &UserClaims,
        id: Uuid,
        request: UpdateEvaluationRequest,
    ) -> AppResult<EvaluationResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "evaluation_service::update"))?;
        ensure_metrics_in_range(request.metrics.out_of_range())?;

        let evaluation = with_transaction!(self.db, |txn| async move {
            let current = PerformanceEvaluationRepository::find_by_id(txn, id)
                .await?
                .ok_or_else(|| {
                    not_found_error("Evaluation", &id.to_string(), "evaluation_service::update")
                })?;

            let review_date = request.review_date.unwrap_or(current.review_date);
            let evaluation_period = request
                .evaluation_period
                .as_deref()
                .map(str::trim)
                .unwrap_or(current.evaluation_period.as_str())
                .to_string();

            if review_date != current.review_date || evaluation_period != current.evaluation_period
            {
                let clash = PerformanceEvaluationRepository::find_by_natural_key(
                    txn,
                    current.employee_id,
                    review_date,
                    &evaluation_period,
                )
                .await?;
                if clash.is_some_and(|other| other.id != id) {
                    return Err(validation_error("evaluation", DUPLICATE_EVALUATION));
                }
            }

            let mut active_model: performance_evaluation_model::ActiveModel = current.into();
            active_model.review_date = Set(review_date);
            active_model.evaluation_period = Set(evaluation_period);
            active_model.apply_scores(&request.metrics);
            if let Some(remarks) = request.remarks {
                active_model.remarks = Set(remarks);
            }

            PerformanceEvaluationRepository::update(txn, active_model)
                .await
                .map_err(map_save_error)
        })?;

        info!(
            evaluation_id = %evaluation.id,
            user_id = %actor.user_id,
            total_score = evaluation.total_score,
            "Performance evaluation updated"
        );

        Ok(evaluation.into())
    }

    /// 従業員ロールは自分の評価のみ参照できる
    pub async fn get(&self, actor: &UserClaims, id: Uuid) -> AppResult<EvaluationResponse> {
        let evaluation = PerformanceEvaluationRepository::find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| not_found_error("Evaluation", &id.to_string(), "evaluation_service::get"))?;

        if !actor.is_admin_or_manager() && evaluation.employee_id != actor.user_id {
            return Err(forbidden_error(
                "You can only view your own evaluations",
                "evaluation_service::get",
                actor.user_id,
            ));
        }

        Ok(evaluation.into())
    }

    pub async fn list(
        &self,
        actor: &UserClaims,
        filter: EvaluationFilter,
        pagination: &PageQuery,
    ) -> AppResult<(Vec<EvaluationResponse>, PageMeta)> {
        let mut filter = filter;
        if !actor.is_admin_or_manager() {
            filter.employee_id = Some(actor.user_id);
        }

        let (page, per_page) = pagination.page_and_size();
        let (evaluations, total_count) = PerformanceEvaluationRepository::find_with_filter(
            &self.db,
            &filter,
            page,
            per_page,
        )
        .await?;

        let responses = evaluations.into_iter().map(Into::into).collect();
        Ok((
            responses,
            PageMeta::new(page, per_page, total_count),
        ))
    }

    pub async fn delete(&self, actor: &UserClaims, id: Uuid) -> AppResult<()> {
        let result = PerformanceEvaluationRepository::delete(&self.db, id).await?;
        if result.rows_affected == 0 {
            return Err(not_found_error(
                "Evaluation",
                &id.to_string(),
                "evaluation_service::delete",
            ));
        }

        info!(evaluation_id = %id, user_id = %actor.user_id, "Performance evaluation deleted");
        Ok(())
    }
}

fn ensure_metrics_in_range(errors: Vec<String>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationErrors(errors))
    }
}

/// before_save の検証エラーと自然キーの一意制約違反を読み替える
fn map_save_error(err: DbErr) -> AppError {
    match err {
        DbErr::Custom(message) => AppError::ValidationError(message),
        other => map_unique_violation(other, || {
            AppError::ValidationError(format!("evaluation: {}", DUPLICATE_EVALUATION))
        }),
    }
}
