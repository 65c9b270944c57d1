// src/service/notification_service.rs

use crate::api::dto::notification_dto::{
    CreateNotificationRequest, NotificationResponse, ReadNotificationResponse, UnreadCountResponse,
};
use crate::domain::notification_model::{self, ReadOutcome, ReadPolicy};
use crate::domain::user_model::UserClaims;
use crate::error::AppResult;
use crate::repository::notification_repository::NotificationRepository;
use crate::repository::user_repository::UserRepository;
use crate::shared::types::{PageMeta, PageQuery};
use crate::utils::error_helper::{convert_validation_errors, not_found_error};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
    user_repo: Arc<UserRepository>,
}

impl NotificationService {
    pub fn new(
        notification_repo: Arc<NotificationRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
        }
    }

    pub async fn create(
        &self,
        actor: &UserClaims,
        request: CreateNotificationRequest,
    ) -> AppResult<NotificationResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "notification_service::create"))?;

        self.user_repo
            .find_by_id(request.recipient_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "User",
                    &request.recipient_id.to_string(),
                    "notification_service::create",
                )
            })?;

        let notification = self
            .notification_repo
            .create(
                request.recipient_id,
                request.title.trim().to_string(),
                request.message,
            )
            .await?;

        info!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            user_id = %actor.user_id,
            "Notification created"
        );

        Ok(notification.into())
    }

    pub async fn list_own(
        &self,
        user_id: Uuid,
        unread_only: bool,
        pagination: &PageQuery,
    ) -> AppResult<(Vec<NotificationResponse>, PageMeta)> {
        let (page, per_page) = pagination.page_and_size();
        let (notifications, total_count) = self
            .notification_repo
            .find_by_recipient(user_id, unread_only, page, per_page)
            .await?;

        Ok((
            notifications.into_iter().map(Into::into).collect(),
            PageMeta::new(page, per_page, total_count),
        ))
    }

    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<UnreadCountResponse> {
        let unread_count = self.notification_repo.count_unread(user_id).await?;
        Ok(UnreadCountResponse { unread_count })
    }

    /// 状態遷移に従って既読にする。Delete ポリシーでは行を削除する
    pub async fn read(
        &self,
        user_id: Uuid,
        id: Uuid,
        policy: ReadPolicy,
    ) -> AppResult<ReadNotificationResponse> {
        let notification = self.find_own(user_id, id).await?;

        let (state, outcome) = notification.state().read(policy);

        let notification = match outcome {
            ReadOutcome::MarkRead => Some(
                self.notification_repo
                    .mark_read(notification, Utc::now())
                    .await?,
            ),
            ReadOutcome::AlreadyRead => Some(notification),
            ReadOutcome::Remove => {
                self.notification_repo.delete(id).await?;
                None
            }
        };

        info!(
            notification_id = %id,
            user_id = %user_id,
            state = ?state,
            "Notification read"
        );

        Ok(ReadNotificationResponse {
            id,
            state,
            notification: notification.map(Into::into),
        })
    }

    pub async fn delete_own(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        self.find_own(user_id, id).await?;
        self.notification_repo.delete(id).await?;

        info!(notification_id = %id, user_id = %user_id, "Notification deleted");
        Ok(())
    }

    /// 他人の通知は存在しないものとして扱う
    async fn find_own(&self, user_id: Uuid, id: Uuid) -> AppResult<notification_model::Model> {
        self.notification_repo
            .find_for_recipient(user_id, id)
            .await?
            .ok_or_else(|| not_found_error("Notification", &id.to_string(), "notification_service"))
    }
}
