// src/repository/notification_repository.rs

use crate::domain::notification_model::{
    self, ActiveModel as NotificationActiveModel, Entity as NotificationEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{
    DbConn, DbErr, DeleteResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

pub struct NotificationRepository {
    db: DbConn,
}

impl NotificationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// 受信者本人の通知のみ取得
    pub async fn find_for_recipient(
        &self,
        recipient_id: Uuid,
        id: Uuid,
    ) -> Result<Option<notification_model::Model>, DbErr> {
        NotificationEntity::find_by_id(id)
            .filter(notification_model::Column::RecipientId.eq(recipient_id))
            .one(&self.db)
            .await
    }

    pub async fn find_by_recipient(
        &self,
        recipient_id: Uuid,
        unread_only: bool,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<notification_model::Model>, u64), DbErr> {
        let mut query = NotificationEntity::find()
            .filter(notification_model::Column::RecipientId.eq(recipient_id));

        if unread_only {
            query = query.filter(notification_model::Column::IsRead.eq(false));
        }

        let query = query.order_by(notification_model::Column::CreatedAt, Order::Desc);

        let total_count = query.clone().count(&self.db).await?;

        let page_size = std::cmp::min(page_size, 100);
        let offset = (page.max(1) - 1) * page_size;

        let notifications = query.limit(page_size).offset(offset).all(&self.db).await?;

        Ok((notifications, total_count))
    }

    pub async fn count_unread(&self, recipient_id: Uuid) -> Result<u64, DbErr> {
        NotificationEntity::find()
            .filter(notification_model::Column::RecipientId.eq(recipient_id))
            .filter(notification_model::Column::IsRead.eq(false))
            .count(&self.db)
            .await
    }

    pub async fn create(
        &self,
        recipient_id: Uuid,
        title: String,
        message: String,
    ) -> Result<notification_model::Model, DbErr> {
        let notification = NotificationActiveModel {
            recipient_id: Set(recipient_id),
            title: Set(title),
            message: Set(message),
            ..Default::default()
        };

        notification.insert(&self.db).await
    }

    pub async fn mark_read(
        &self,
        notification: notification_model::Model,
        read_at: DateTime<Utc>,
    ) -> Result<notification_model::Model, DbErr> {
        let mut active_model: NotificationActiveModel = notification.into();
        active_model.is_read = Set(true);
        active_model.read_at = Set(Some(read_at));
        active_model.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        NotificationEntity::delete_by_id(id).exec(&self.db).await
    }
}
