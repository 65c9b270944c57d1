// src/service/ranking_service.rs

//! 最新評価に基づく上位・下位ランキング

use crate::api::dto::evaluation_dto::EvaluationFilter;
use crate::db::DbPool;
use crate::domain::performance_evaluation_model;
use crate::error::AppResult;
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::performance_evaluation_repository::PerformanceEvaluationRepository;
use crate::repository::user_repository::UserRepository;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

type Evaluation = performance_evaluation_model::Model;

/// 従業員ごとに (review_date, created_at) が最大の評価を1件選ぶ。
/// 結果は従業員の初出順。
pub fn latest_per_employee(evaluations: &[Evaluation]) -> Vec<&Evaluation> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut latest: HashMap<Uuid, &Evaluation> = HashMap::new();

    for evaluation in evaluations {
        let is_newer = match latest.get(&evaluation.employee_id) {
            Some(current) => evaluation.recency_key() > current.recency_key(),
            None => {
                order.push(evaluation.employee_id);
                true
            }
        };

        if is_newer {
            latest.insert(evaluation.employee_id, evaluation);
        }
    }

    order
        .into_iter()
        .filter_map(|employee_id| latest.get(&employee_id).copied())
        .collect()
}

/// ランキングの切り出し結果
#[derive(Debug)]
pub struct Ranking<'a> {
    pub top: Vec<&'a Evaluation>,
    pub bottom: Vec<&'a Evaluation>,
}

/// 最新評価を total_score の降順（同点は入力順）に並べ、上位と下位を切り出す。
///
/// 下位は並び替え後の末尾 `bottom_n` 件で、上位と重なることがある。
/// 母数が `top_n` 以下なら下位は全件。どちらも降順のまま返す。
pub fn rank(evaluations: &[Evaluation], top_n: usize, bottom_n: usize) -> Ranking<'_> {
    let mut sorted = latest_per_employee(evaluations);
    sorted.sort_by(|a, b| b.total_score.cmp(&a.total_score));

    let top = sorted.iter().take(top_n).copied().collect();

    let bottom = if sorted.len() > top_n {
        let start = sorted.len().saturating_sub(bottom_n);
        sorted[start..].to_vec()
    } else {
        sorted.clone()
    };

    Ranking { top, bottom }
}

/// 表示用のランキング項目
#[derive(Debug, Clone)]
pub struct RankedEmployee {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub department_name: Option<String>,
    pub total_score: i32,
    pub review_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct RankingResult {
    pub top: Vec<RankedEmployee>,
    pub bottom: Vec<RankedEmployee>,
}

pub struct RankingService {
    db: DbPool,
    user_repo: Arc<UserRepository>,
    department_repo: Arc<DepartmentRepository>,
}

impl RankingService {
    pub fn new(db: DbPool) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            department_repo: Arc::new(DepartmentRepository::new(db.clone())),
            db,
        }
    }

    /// 全評価から上位・下位を算出し、氏名と部署名を付与する
    pub async fn summary(&self, top_n: usize, bottom_n: usize) -> AppResult<RankingResult> {
        let evaluations =
            PerformanceEvaluationRepository::find_all_matching(&self.db, &EvaluationFilter::default())
                .await?;

        let ranking = rank(&evaluations, top_n, bottom_n);

        let mut user_ids: Vec<Uuid> = Vec::new();
        let mut department_ids: Vec<Uuid> = Vec::new();
        for evaluation in ranking.top.iter().chain(ranking.bottom.iter()) {
            user_ids.push(evaluation.employee_id);
            if let Some(department_id) = evaluation.department_id {
                department_ids.push(department_id);
            }
        }
        user_ids.sort();
        user_ids.dedup();
        department_ids.sort();
        department_ids.dedup();

        let names: HashMap<Uuid, String> = self
            .user_repo
            .find_by_ids(&user_ids)
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

        let to_entry = |evaluation: &&Evaluation| RankedEmployee {
            employee_id: evaluation.employee_id,
            employee_name: names
                .get(&evaluation.employee_id)
                .cloned()
                .unwrap_or_else(|| evaluation.employee_id.to_string()),
            department_name: evaluation
                .department_id
                .and_then(|id| departments.get(&id).cloned()),
            total_score: evaluation.total_score,
            review_date: evaluation.review_date,
        };

        let result = RankingResult {
            top: ranking.top.iter().map(to_entry).collect(),
            bottom: ranking.bottom.iter().map(to_entry).collect(),
        };

        info!(
            evaluations = evaluations.len(),
            top = result.top.len(),
            bottom = result.bottom.len(),
            "Performance ranking computed"
        );

        Ok(result)
    }
}
