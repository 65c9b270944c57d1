// src/service/report_generator_service.rs

//! 評価とフィードバックから期間集計を作り、レポートキャッシュへ保存する

use crate::api::dto::evaluation_dto::EvaluationFilter;
use crate::db::DbPool;
use crate::domain::cached_report_model::{self, ReportKey, ReportType};
use crate::domain::performance_evaluation_model;
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::feedback_repository::FeedbackRepository;
use crate::repository::performance_evaluation_repository::PerformanceEvaluationRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::report_cache_service::ReportCacheService;
use crate::utils::error_helper::validation_error;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

type Evaluation = performance_evaluation_model::Model;

/// 集計期間 [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// 週系レポートは ISO 週、月次はカレンダー月
    pub fn for_key(key: &ReportKey) -> Result<Self, String> {
        key.validate()?;

        if key.report_type.is_week_based() {
            let week = key.week_number.unwrap_or_default();
            let start = u32::try_from(week)
                .ok()
                .and_then(|week| NaiveDate::from_isoywd_opt(key.year, week, Weekday::Mon))
                .ok_or_else(|| {
                    format!("week_number: week {} does not exist in {}", week, key.year)
                })?;
            return Ok(Self {
                start,
                end: start + Duration::days(7),
            });
        }

        let month = key.month.unwrap_or_default();
        let start = u32::try_from(month)
            .ok()
            .and_then(|month| NaiveDate::from_ymd_opt(key.year, month, 1))
            .ok_or_else(|| format!("month: invalid month {}", month))?;
        let end = if start.month() == 12 {
            NaiveDate::from_ymd_opt(key.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(key.year, start.month() + 1, 1)
        }
        .ok_or_else(|| format!("year: {} is out of range", key.year))?;

        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::MIN).and_utc()
    }

    /// 評価検索の条件（review_date の上限は包含）
    fn evaluation_filter(&self, key: &ReportKey) -> EvaluationFilter {
        let mut filter = EvaluationFilter {
            review_date_from: Some(self.start),
            review_date_to: Some(self.end - Duration::days(1)),
            ..Default::default()
        };
        match key.report_type {
            ReportType::Manager => filter.manager_id = key.manager_id,
            ReportType::Department => filter.department_id = key.department_id,
            ReportType::Weekly | ReportType::Monthly => {}
        }
        filter
    }
}

/// 従業員ごとの集計値
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeAggregate {
    pub employee_id: Uuid,
    pub department_id: Option<Uuid>,
    pub evaluation_count: usize,
    pub average_score: f64,
    pub latest_score: i32,
}

/// 評価を従業員単位にまとめる。平均の降順（同点は初出順）
pub fn aggregate_evaluations(evaluations: &[Evaluation]) -> Vec<EmployeeAggregate> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut grouped: HashMap<Uuid, Vec<&Evaluation>> = HashMap::new();

    for evaluation in evaluations {
        grouped
            .entry(evaluation.employee_id)
            .or_insert_with(|| {
                order.push(evaluation.employee_id);
                Vec::new()
            })
            .push(evaluation);
    }

    let mut aggregates: Vec<EmployeeAggregate> = order
        .into_iter()
        .filter_map(|employee_id| {
            let group = grouped.get(&employee_id)?;
            let latest = group.iter().max_by_key(|e| e.recency_key())?;
            let sum: i64 = group.iter().map(|e| i64::from(e.total_score)).sum();
            let average = sum as f64 / group.len() as f64;

            Some(EmployeeAggregate {
                employee_id,
                department_id: latest.department_id,
                evaluation_count: group.len(),
                average_score: round2(average),
                latest_score: latest.total_score,
            })
        })
        .collect();

    aggregates.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
    aggregates
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct ReportGeneratorService {
    db: DbPool,
    user_repo: Arc<UserRepository>,
    department_repo: Arc<DepartmentRepository>,
    feedback_repo: Arc<FeedbackRepository>,
    report_cache: Arc<ReportCacheService>,
}

impl ReportGeneratorService {
    pub fn new(db: DbPool, report_cache: Arc<ReportCacheService>) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            department_repo: Arc::new(DepartmentRepository::new(db.clone())),
            feedback_repo: Arc::new(FeedbackRepository::new(db.clone())),
            report_cache,
            db,
        }
    }

    /// 期間の集計を作り、同じキーのキャッシュを上書きする
    pub async fn generate(
        &self,
        key: ReportKey,
        generated_by: Option<Uuid>,
    ) -> AppResult<cached_report_model::Model> {
        match key.report_type {
            ReportType::Manager if key.manager_id.is_none() => {
                return Err(validation_error(
                    "manager_id",
                    "required for manager reports",
                ));
            }
            ReportType::Department if key.department_id.is_none() => {
                return Err(validation_error(
                    "department_id",
                    "required for department reports",
                ));
            }
            _ => {}
        }

        let period = ReportPeriod::for_key(&key).map_err(AppError::ValidationError)?;
        self.report_cache
            .ensure_key_references(&key, "report_generator_service::generate")
            .await?;
        let payload = self.build_payload(&key, &period).await?;

        let records = payload["records"].as_array().map_or(0, Vec::len);
        let report = self.report_cache.upsert(key, payload, generated_by).await?;

        info!(
            report_id = %report.id,
            cache_key = %report.cache_key,
            records,
            period_start = %period.start,
            period_end = %period.end,
            "Report generated"
        );

        Ok(report)
    }

    async fn build_payload(&self, key: &ReportKey, period: &ReportPeriod) -> AppResult<Value> {
        let evaluations = PerformanceEvaluationRepository::find_all_matching(
            &self.db,
            &period.evaluation_filter(key),
        )
        .await?;

        let aggregates = aggregate_evaluations(&evaluations);

        let employee_ids: Vec<Uuid> = aggregates.iter().map(|a| a.employee_id).collect();
        let department_ids: Vec<Uuid> =
            aggregates.iter().filter_map(|a| a.department_id).collect();

        let names: HashMap<Uuid, String> = self
            .user_repo
            .find_by_ids(&employee_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.display_name()))
            .collect();

        let departments: HashMap<Uuid, String> = self
            .department_repo
            .find_by_ids(&department_ids)
            .await?
            .into_iter()
            .map(|department| (department.id, department.name))
            .collect();

        let feedback_counts = self
            .feedback_repo
            .count_by_employee_between(&employee_ids, period.start_time(), period.end_time())
            .await?;

        let records: Vec<Value> = aggregates
            .iter()
            .map(|aggregate| {
                json!({
                    "employee_id": aggregate.employee_id,
                    "employee_name": names
                        .get(&aggregate.employee_id)
                        .cloned()
                        .unwrap_or_else(|| aggregate.employee_id.to_string()),
                    "department": aggregate
                        .department_id
                        .and_then(|id| departments.get(&id).cloned())
                        .unwrap_or_else(|| "N/A".to_string()),
                    "evaluation_count": aggregate.evaluation_count,
                    "average_score": aggregate.average_score,
                    "latest_score": aggregate.latest_score,
                    "feedback_count": feedback_counts
                        .get(&aggregate.employee_id)
                        .copied()
                        .unwrap_or(0),
                })
            })
            .collect();

        Ok(json!({ "records": records }))
    }
}
