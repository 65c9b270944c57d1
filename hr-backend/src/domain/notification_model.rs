// src/domain/notification_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub recipient_id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub is_read: bool,

    pub read_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_model::Entity",
        from = "Column::RecipientId",
        to = "super::user_model::Column::Id",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl Related<super::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            is_read: Set(false),
            created_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    /// 保存済みの行の状態。削除済みの行は存在しないので Unread か Read のみ
    pub fn state(&self) -> NotificationState {
        if self.is_read {
            NotificationState::Read
        } else {
            NotificationState::Unread
        }
    }
}

/// 既読後の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// 既読として残す
    #[default]
    Retain,
    /// 既読にしたら削除する
    Delete,
}

/// 保存されている通知の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationState {
    Unread,
    Read,
}

/// 既読操作後の状態。Deleted の行は以降 404 になる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadState {
    Retained,
    Deleted,
}

/// 既読操作の結果として永続化層が行うべきこと
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// 既読フラグと既読日時を保存する
    MarkRead,
    /// 既に既読なので何もしない
    AlreadyRead,
    /// 行を削除する
    Remove,
}

impl NotificationState {
    /// 既読操作を適用する
    pub fn read(self, policy: ReadPolicy) -> (ReadState, ReadOutcome) {
        match (self, policy) {
            (Self::Unread, ReadPolicy::Retain) => (ReadState::Retained, ReadOutcome::MarkRead),
            (Self::Read, ReadPolicy::Retain) => (ReadState::Retained, ReadOutcome::AlreadyRead),
            (_, ReadPolicy::Delete) => (ReadState::Deleted, ReadOutcome::Remove),
        }
    }
}
