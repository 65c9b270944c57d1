// src/domain/feedback_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// フィードバック種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    General,
    Manager,
    Client,
}

impl FeedbackType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Manager => "manager",
            Self::Client => "client",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "general" => Some(Self::General),
            "manager" => Some(Self::Manager),
            "client" => Some(Self::Client),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub employee_id: Uuid,

    pub given_by: Option<Uuid>,

    pub feedback_type: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub rating: Option<i32>,

    pub client_name: Option<String>,

    pub created_at: DateTime<Utc>,
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
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            feedback_type: Set(FeedbackType::General.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    pub fn feedback_type(&self) -> FeedbackType {
        FeedbackType::from_str(&self.feedback_type).unwrap_or(FeedbackType::General)
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.given_by == Some(user_id)
    }
}
