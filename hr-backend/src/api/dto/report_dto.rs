// src/api/dto/report_dto.rs

use super::common::double_option;
use crate::domain::cached_report_model::{self, ReportKey, ReportType};
use crate::domain::report_summary::ReportSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// キャッシュ済みレポートの作成
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub report_type: ReportType,
    #[validate(range(min = 1, max = 9999, message = "year must be between 1 and 9999"))]
    pub year: i32,
    pub week_number: Option<i32>,
    pub month: Option<i32>,
    pub manager_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

impl CreateReportRequest {
    pub fn key(&self) -> ReportKey {
        ReportKey {
            report_type: self.report_type,
            year: self.year,
            week_number: self.week_number,
            month: self.month,
            manager_id: self.manager_id,
            department_id: self.department_id,
        }
    }
}

/// `{"records": []}`
pub fn empty_payload() -> Value {
    serde_json::json!({ "records": [] })
}

/// キャッシュ済みレポートの更新。キー項目は null で解除できる
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReportRequest {
    pub payload: Option<Value>,
    pub report_type: Option<ReportType>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub week_number: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub month: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub manager_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub department_id: Option<Option<Uuid>>,
}

impl UpdateReportRequest {
    /// 既存キーに変更を重ねた新しいキー
    pub fn apply_to(&self, key: &ReportKey) -> ReportKey {
        ReportKey {
            report_type: self.report_type.unwrap_or(key.report_type),
            year: self.year.unwrap_or(key.year),
            week_number: self.week_number.unwrap_or(key.week_number),
            month: self.month.unwrap_or(key.month),
            manager_id: self.manager_id.unwrap_or(key.manager_id),
            department_id: self.department_id.unwrap_or(key.department_id),
        }
    }

    pub fn changes_key(&self) -> bool {
        self.report_type.is_some()
            || self.year.is_some()
            || self.week_number.is_some()
            || self.month.is_some()
            || self.manager_id.is_some()
            || self.department_id.is_some()
    }
}

/// 完全一致のキーでレポートを引くクエリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLookupQuery {
    pub report_type: ReportType,
    pub year: i32,
    pub week_number: Option<i32>,
    pub month: Option<i32>,
    pub manager_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

impl ReportLookupQuery {
    pub fn key(&self) -> ReportKey {
        ReportKey {
            report_type: self.report_type,
            year: self.year,
            week_number: self.week_number,
            month: self.month,
            manager_id: self.manager_id,
            department_id: self.department_id,
        }
    }
}

/// レポート一覧の絞り込み条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    pub report_type: Option<ReportType>,
    pub year: Option<i32>,
    /// 省略時は有効なレポートのみ
    pub is_active: Option<bool>,
}

/// 集計してキャッシュに保存するリクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateReportRequest {
    pub report_type: ReportType,
    #[validate(range(min = 1, max = 9999, message = "year must be between 1 and 9999"))]
    pub year: i32,
    pub week_number: Option<i32>,
    pub month: Option<i32>,
    pub manager_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

impl GenerateReportRequest {
    pub fn key(&self) -> ReportKey {
        ReportKey {
            report_type: self.report_type,
            year: self.year,
            week_number: self.week_number,
            month: self.month,
            manager_id: self.manager_id,
            department_id: self.department_id,
        }
    }
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub id: Uuid,
    pub report_type: String,
    pub year: i32,
    pub week_number: Option<i32>,
    pub month: Option<i32>,
    pub manager_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub period_label: String,
    pub payload: Value,
    pub summary: ReportSummary,
    pub generated_by: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<cached_report_model::Model> for ReportResponse {
    fn from(report: cached_report_model::Model) -> Self {
        Self {
            period_label: report.period_label(),
            summary: report.summary(),
            id: report.id,
            report_type: report.report_type,
            year: report.year,
            week_number: report.week_number,
            month: report.month,
            manager_id: report.manager_id,
            department_id: report.department_id,
            payload: report.payload,
            generated_by: report.generated_by,
            generated_at: report.generated_at,
            is_active: report.is_active,
            created_at: report.created_at,
        }
    }
}
