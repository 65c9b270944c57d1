// src/api/dto/notification_dto.rs

use crate::domain::notification_model::{self, ReadPolicy, ReadState};
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    pub recipient_id: Uuid,

    #[validate(
        length(
            min = common::notification::TITLE_MIN_LENGTH,
            max = common::notification::TITLE_MAX_LENGTH,
            message = "Title must be between 1 and 200 characters"
        ),
        custom(function = common::validate_single_line)
    )]
    pub title: String,

    #[validate(length(
        max = common::notification::MESSAGE_MAX_LENGTH,
        message = "Message must not exceed 5000 characters"
    ))]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationListQuery {
    pub unread_only: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadNotificationQuery {
    pub policy: Option<ReadPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<notification_model::Model> for NotificationResponse {
    fn from(notification: notification_model::Model) -> Self {
        Self {
            id: notification.id,
            recipient_id: notification.recipient_id,
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// 既読操作の結果。削除された場合 notification は null
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadNotificationResponse {
    pub id: Uuid,
    pub state: ReadState,
    pub notification: Option<NotificationResponse>,
}
