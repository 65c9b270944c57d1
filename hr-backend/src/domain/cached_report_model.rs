// src/domain/cached_report_model.rs

use super::report_summary::ReportSummary;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// レポート種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Weekly,
    Monthly,
    Manager,
    Department,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Manager => "manager",
            Self::Department => "department",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "manager" => Some(Self::Manager),
            "department" => Some(Self::Department),
            _ => None,
        }
    }

    /// 週番号で期間を指定する種別か
    pub fn is_week_based(&self) -> bool {
        !matches!(self, Self::Monthly)
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// レポートの複合キー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportKey {
    pub report_type: ReportType,
    pub year: i32,
    pub week_number: Option<i32>,
    pub month: Option<i32>,
    pub manager_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

impl ReportKey {
    pub fn weekly(year: i32, week_number: i32) -> Self {
        Self {
            report_type: ReportType::Weekly,
            year,
            week_number: Some(week_number),
            month: None,
            manager_id: None,
            department_id: None,
        }
    }

    pub fn monthly(year: i32, month: i32) -> Self {
        Self {
            report_type: ReportType::Monthly,
            year,
            week_number: None,
            month: Some(month),
            manager_id: None,
            department_id: None,
        }
    }

    /// 種別ごとの期間指定を検証する
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=9999).contains(&self.year) {
            return Err(format!("year: must be between 1 and 9999 (got {})", self.year));
        }

        if self.report_type.is_week_based() {
            match self.week_number {
                Some(week) if (1..=53).contains(&week) => {}
                Some(week) => {
                    return Err(format!("week_number: must be between 1 and 53 (got {})", week))
                }
                None => {
                    return Err(format!(
                        "week_number: required for {} reports",
                        self.report_type
                    ))
                }
            }
        } else {
            match self.month {
                Some(month) if (1..=12).contains(&month) => {}
                Some(month) => {
                    return Err(format!("month: must be between 1 and 12 (got {})", month))
                }
                None => return Err("month: required for monthly reports".to_string()),
            }
        }

        Ok(())
    }

    /// 一意制約に使う決定的なキー文字列（未指定は "-"）
    pub fn cache_key(&self) -> String {
        fn part<T: ToString>(value: Option<T>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        format!(
            "{}:{}:{}:{}:{}:{}",
            self.report_type,
            self.year,
            part(self.week_number),
            part(self.month),
            part(self.manager_id),
            part(self.department_id)
        )
    }

    pub fn period_label(&self) -> String {
        period_label(self.report_type, self.year, self.week_number, self.month)
    }
}

/// 表示用の期間ラベル
pub fn period_label(
    report_type: ReportType,
    year: i32,
    week_number: Option<i32>,
    month: Option<i32>,
) -> String {
    if report_type.is_week_based() {
        if let Some(week) = week_number {
            return format!("Week {}, {}", week, year);
        }
    } else if let Some(name) = month
        .and_then(|m| usize::try_from(m - 1).ok())
        .and_then(|index| MONTH_NAMES.get(index))
    {
        return format!("{} {}", name, year);
    }

    year.to_string()
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cached_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub report_type: String,

    pub year: i32,

    pub week_number: Option<i32>,

    pub month: Option<i32>,

    pub manager_id: Option<Uuid>,

    pub department_id: Option<Uuid>,

    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub cache_key: String,

    pub payload: Json,

    pub generated_by: Option<Uuid>,

    pub generated_at: DateTime<Utc>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department_model::Entity",
        from = "Column::DepartmentId",
        to = "super::department_model::Column::Id",
        on_delete = "SetNull"
    )]
    Department,
}

impl Related<super::department_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

fn active_value<T>(value: &ActiveValue<T>) -> Option<T>
where
    T: Into<sea_orm::Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

impl ActiveModel {
    /// アクティブモデルの値から複合キーを組み立てる
    pub fn report_key(&self) -> Result<ReportKey, String> {
        let report_type = active_value(&self.report_type)
            .ok_or_else(|| "report_type: required".to_string())?;
        let report_type = ReportType::from_str(&report_type)
            .ok_or_else(|| format!("report_type: unknown value '{}'", report_type))?;
        let year = active_value(&self.year).ok_or_else(|| "year: required".to_string())?;

        Ok(ReportKey {
            report_type,
            year,
            week_number: active_value(&self.week_number).flatten(),
            month: active_value(&self.month).flatten(),
            manager_id: active_value(&self.manager_id).flatten(),
            department_id: active_value(&self.department_id).flatten(),
        })
    }

    pub fn set_key(&mut self, key: &ReportKey) {
        self.report_type = Set(key.report_type.as_str().to_string());
        self.year = Set(key.year);
        self.week_number = Set(key.week_number);
        self.month = Set(key.month);
        self.manager_id = Set(key.manager_id);
        self.department_id = Set(key.department_id);
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            generated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    /// 書き込み前に期間を検証し、キー文字列と生成日時を更新する
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let key = self.report_key().map_err(DbErr::Custom)?;
        key.validate().map_err(DbErr::Custom)?;

        self.cache_key = Set(key.cache_key());
        self.generated_at = Set(Utc::now());
        Ok(self)
    }
}

impl Model {
    pub fn report_type(&self) -> Option<ReportType> {
        ReportType::from_str(&self.report_type)
    }

    pub fn key(&self) -> Option<ReportKey> {
        Some(ReportKey {
            report_type: self.report_type()?,
            year: self.year,
            week_number: self.week_number,
            month: self.month,
            manager_id: self.manager_id,
            department_id: self.department_id,
        })
    }

    pub fn period_label(&self) -> String {
        match self.report_type() {
            Some(report_type) => {
                period_label(report_type, self.year, self.week_number, self.month)
            }
            None => self.year.to_string(),
        }
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_payload(&self.payload)
    }
}
