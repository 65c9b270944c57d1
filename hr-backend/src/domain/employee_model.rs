// src/domain/employee_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 在籍ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Resigned,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Resigned => "resigned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "on_leave" => Some(Self::OnLeave),
            "resigned" => Some(Self::Resigned),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub user_id: Uuid,

    pub department_id: Option<Uuid>,

    pub manager_id: Option<Uuid>,

    pub designation: String,

    pub status: String,

    pub joining_date: NaiveDate,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::UserId",
        to = "super::user_model::Column::Id",
        on_delete = "Cascade"
    )]
    User,

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
        Relation::User.def()
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
            designation: Set(String::new()),
            status: Set(EmployeeStatus::Active.as_str().to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    pub fn status(&self) -> EmployeeStatus {
        EmployeeStatus::from_str(&self.status).unwrap_or(EmployeeStatus::Active)
    }
}

/// 上長チェーンを辿り、`candidate_manager` を `employee` の上長にすると循環するかを判定する。
///
/// `manager_of` は従業員IDから現在の上長IDを引く関数。探索は `max_steps`
/// （従業員数）で打ち切り、それを超えるチェーンも循環とみなす。
pub fn creates_manager_cycle<F>(
    employee: Uuid,
    candidate_manager: Uuid,
    max_steps: usize,
    mut manager_of: F,
) -> bool
where
    F: FnMut(Uuid) -> Option<Uuid>,
{
    let mut current = Some(candidate_manager);
    let mut steps = 0;

    while let Some(id) = current {
        if id == employee {
            return true;
        }
        if steps > max_steps {
            return true;
        }
        steps += 1;
        current = manager_of(id);
    }

    false
}
