// src/api/dto/common.rs

use serde::{Deserialize, Deserializer, Serialize};

/// PATCH 用: フィールド省略（None）と明示的な null（Some(None)）を区別する
///
/// `#[serde(default, deserialize_with = "double_option")]` と組み合わせて使う。
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 操作結果の汎用レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub message: String,
}

impl OperationResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
