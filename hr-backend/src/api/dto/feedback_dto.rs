// src/api/dto/feedback_dto.rs

use crate::domain::feedback_model::{self, FeedbackType};
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    /// フィードバック対象の従業員（ユーザーID）
    pub employee_id: Uuid,

    #[serde(default = "default_feedback_type")]
    pub feedback_type: FeedbackType,

    #[validate(
        length(
            min = common::feedback::CONTENT_MIN_LENGTH,
            max = common::feedback::CONTENT_MAX_LENGTH,
            message = "Content must be between 1 and 5000 characters"
        ),
        custom(function = common::validate_not_empty_or_whitespace)
    )]
    pub content: String,

    #[validate(range(
        min = common::feedback::RATING_MIN,
        max = common::feedback::RATING_MAX,
        message = "Rating must be between 1 and 5"
    ))]
    pub rating: Option<i32>,

    #[validate(
        length(
            max = common::feedback::CLIENT_NAME_MAX_LENGTH,
            message = "Client name must not exceed 200 characters"
        ),
        custom(function = common::validate_single_line)
    )]
    pub client_name: Option<String>,
}

fn default_feedback_type() -> FeedbackType {
    FeedbackType::General
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackFilter {
    pub employee_id: Option<Uuid>,
    pub feedback_type: Option<FeedbackType>,
    pub given_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub given_by: Option<Uuid>,
    pub feedback_type: FeedbackType,
    pub content: String,
    pub rating: Option<i32>,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<feedback_model::Model> for FeedbackResponse {
    fn from(feedback: feedback_model::Model) -> Self {
        Self {
            feedback_type: feedback.feedback_type(),
            id: feedback.id,
            employee_id: feedback.employee_id,
            given_by: feedback.given_by,
            content: feedback.content,
            rating: feedback.rating,
            client_name: feedback.client_name,
            created_at: feedback.created_at,
        }
    }
}
