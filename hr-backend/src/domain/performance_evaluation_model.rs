// src/domain/performance_evaluation_model.rs

use super::performance_metrics::{
    is_valid_metric, out_of_range_message, MetricScores, PerformanceMetrics, METRIC_COUNT,
    METRIC_NAMES,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "performance_evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub employee_id: Uuid,

    pub department_id: Option<Uuid>,

    pub manager_id: Option<Uuid>,

    pub review_date: NaiveDate,

    pub evaluation_period: String,

    pub communication_skills: i32,
    pub multitasking: i32,
    pub team_skills: i32,
    pub technical_skills: i32,
    pub job_knowledge: i32,
    pub productivity: i32,
    pub creativity: i32,
    pub work_quality: i32,
    pub professionalism: i32,
    pub work_consistency: i32,
    pub attitude: i32,
    pub cooperation: i32,
    pub dependability: i32,
    pub attendance: i32,
    pub punctuality: i32,

    pub total_score: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::EmployeeId",
        to = "super::user_model::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,

    #[sea_orm(
        belongs_to = "super::department_model::Entity",
        from = "Column::DepartmentId",
        to = "super::department_model::Column::Id",
        on_delete = "SetNull"
    )]
    Department,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::department_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            evaluation_period: Set(String::new()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    /// 保存のたびに15指標を検証し、合計を同じ書き込みで再計算する
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let values = self.metric_values();

        if let Some((name, value)) = METRIC_NAMES
            .iter()
            .zip(values)
            .find(|(_, value)| !is_valid_metric(*value))
        {
            return Err(DbErr::Custom(out_of_range_message(name, value)));
        }

        self.total_score = Set(values.iter().sum());

        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

/// 未設定の指標は 0 として扱う
fn active_metric(value: &ActiveValue<i32>) -> i32 {
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => *v,
        ActiveValue::NotSet => 0,
    }
}

impl ActiveModel {
    pub fn metric_values(&self) -> [i32; METRIC_COUNT] {
        [
            active_metric(&self.communication_skills),
            active_metric(&self.multitasking),
            active_metric(&self.team_skills),
            active_metric(&self.technical_skills),
            active_metric(&self.job_knowledge),
            active_metric(&self.productivity),
            active_metric(&self.creativity),
            active_metric(&self.work_quality),
            active_metric(&self.professionalism),
            active_metric(&self.work_consistency),
            active_metric(&self.attitude),
            active_metric(&self.cooperation),
            active_metric(&self.dependability),
            active_metric(&self.attendance),
            active_metric(&self.punctuality),
        ]
    }

    /// 15指標をまとめて設定する
    pub fn set_metrics(&mut self, metrics: &PerformanceMetrics) {
        self.communication_skills = Set(metrics.communication_skills);
        self.multitasking = Set(metrics.multitasking);
        self.team_skills = Set(metrics.team_skills);
        self.technical_skills = Set(metrics.technical_skills);
        self.job_knowledge = Set(metrics.job_knowledge);
        self.productivity = Set(metrics.productivity);
        self.creativity = Set(metrics.creativity);
        self.work_quality = Set(metrics.work_quality);
        self.professionalism = Set(metrics.professionalism);
        self.work_consistency = Set(metrics.work_consistency);
        self.attitude = Set(metrics.attitude);
        self.cooperation = Set(metrics.cooperation);
        self.dependability = Set(metrics.dependability);
        self.attendance = Set(metrics.attendance);
        self.punctuality = Set(metrics.punctuality);
    }

    /// 指定された指標だけを上書きする
    pub fn apply_scores(&mut self, scores: &MetricScores) {
        let current = PerformanceMetrics::from_values(self.metric_values());
        self.set_metrics(&current.merged(scores));
    }
}

impl Model {
    pub fn metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            communication_skills: self.communication_skills,
            multitasking: self.multitasking,
            team_skills: self.team_skills,
            technical_skills: self.technical_skills,
            job_knowledge: self.job_knowledge,
            productivity: self.productivity,
            creativity: self.creativity,
            work_quality: self.work_quality,
            professionalism: self.professionalism,
            work_consistency: self.work_consistency,
            attitude: self.attitude,
            cooperation: self.cooperation,
            dependability: self.dependability,
            attendance: self.attendance,
            punctuality: self.punctuality,
        }
    }

    /// 「最新」判定に使う並び順キー
    pub fn recency_key(&self) -> (NaiveDate, DateTime<Utc>) {
        (self.review_date, self.created_at)
    }
}
