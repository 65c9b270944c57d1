// src/api/dto/evaluation_dto.rs

use super::common::double_option;
use crate::domain::performance_evaluation_model;
use crate::domain::performance_metrics::{MetricScores, PerformanceMetrics};
use crate::service::ranking_service::{RankedEmployee, RankingResult};
use crate::utils::validation::common;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// 評価登録リクエスト。未指定の指標は 0 として扱う
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEvaluationRequest {
    pub employee_id: Uuid,

    pub manager_id: Option<Uuid>,

    pub department_id: Option<Uuid>,

    pub review_date: NaiveDate,

    #[validate(length(
        max = common::evaluation::PERIOD_MAX_LENGTH,
        message = "Evaluation period must not exceed 50 characters"
    ))]
    #[serde(default)]
    pub evaluation_period: String,

    #[serde(flatten)]
    pub metrics: MetricScores,

    #[validate(length(
        max = common::evaluation::REMARKS_MAX_LENGTH,
        message = "Remarks must not exceed 2000 characters"
    ))]
    pub remarks: Option<String>,
}

/// 評価更新リクエスト（部分更新）
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEvaluationRequest {
    pub review_date: Option<NaiveDate>,

    #[validate(length(
        max = common::evaluation::PERIOD_MAX_LENGTH,
        message = "Evaluation period must not exceed 50 characters"
    ))]
    pub evaluation_period: Option<String>,

    #[serde(flatten)]
    pub metrics: MetricScores,

    /// null で備考を削除
    #[serde(default, deserialize_with = "double_option")]
    pub remarks: Option<Option<String>>,
}

/// 評価一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationFilter {
    pub employee_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub review_date_from: Option<NaiveDate>,
    pub review_date_to: Option<NaiveDate>,
}

/// ランキング取得のクエリ
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RankingQuery {
    #[validate(range(min = 1, max = 100, message = "top_n must be between 1 and 100"))]
    pub top_n: Option<usize>,

    #[validate(range(min = 1, max = 100, message = "bottom_n must be between 1 and 100"))]
    pub bottom_n: Option<usize>,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub review_date: NaiveDate,
    pub evaluation_period: String,
    #[serde(flatten)]
    pub metrics: PerformanceMetrics,
    pub total_score: i32,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<performance_evaluation_model::Model> for EvaluationResponse {
    fn from(evaluation: performance_evaluation_model::Model) -> Self {
        Self {
            metrics: evaluation.metrics(),
            id: evaluation.id,
            employee_id: evaluation.employee_id,
            department_id: evaluation.department_id,
            manager_id: evaluation.manager_id,
            review_date: evaluation.review_date,
            evaluation_period: evaluation.evaluation_period,
            total_score: evaluation.total_score,
            remarks: evaluation.remarks,
            created_at: evaluation.created_at,
            updated_at: evaluation.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEmployeeResponse {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub department: String,
    pub total_score: i32,
    pub review_date: NaiveDate,
}

impl From<RankedEmployee> for RankedEmployeeResponse {
    fn from(entry: RankedEmployee) -> Self {
        Self {
            employee_id: entry.employee_id,
            employee_name: entry.employee_name,
            department: entry.department_name.unwrap_or_else(|| "N/A".to_string()),
            total_score: entry.total_score,
            review_date: entry.review_date,
        }
    }
}

/// `GET /evaluations/summary` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummaryResponse {
    pub top_performers: Vec<RankedEmployeeResponse>,
    pub weak_performers: Vec<RankedEmployeeResponse>,
}

impl From<RankingResult> for PerformanceSummaryResponse {
    fn from(result: RankingResult) -> Self {
        Self {
            top_performers: result.top.into_iter().map(Into::into).collect(),
            weak_performers: result.bottom.into_iter().map(Into::into).collect(),
        }
    }
}
