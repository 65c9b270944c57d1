use crate::domain::cached_report_model::ReportType;
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// URLパスからUUIDパラメータ名を推測する
fn extract_uuid_param_name(path: &str) -> Option<&'static str> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && segment.len() == 36 && segment.contains('-') {
            return match segments[i - 1] {
                "users" => Some("user_id"),
                "departments" => Some("department_id"),
                "employees" => Some("employee_id"),
                "evaluations" => Some("evaluation_id"),
                "reports" => Some("report_id"),
                "feedback" => Some("feedback_id"),
                "notifications" => Some("notification_id"),
                _ => Some("id"),
            };
        }
    }

    None
}

/// 統一UUID Extractor
/// パスパラメータからUUIDを抽出し、検証を行う
#[derive(Debug, Clone, Copy)]
pub struct ValidatedUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidatedUuid
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(uuid_str) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                let param_name = extract_uuid_param_name(parts.uri.path()).unwrap_or("id");
                AppError::BadRequest(format!("Missing path parameter '{}': {}", param_name, e))
            })?;

        let uuid = Uuid::parse_str(&uuid_str).map_err(|_| {
            let param_name = extract_uuid_param_name(parts.uri.path()).unwrap_or("id");
            AppError::BadRequest(format!(
                "Invalid UUID format for '{}': '{}'",
                param_name, uuid_str
            ))
        })?;

        Ok(ValidatedUuid(uuid))
    }
}

/// パスパラメータ検証トレイト
pub trait PathParam: Sized {
    fn parse_from_str(s: &str) -> Result<Self, AppError>;
}

impl PathParam for Uuid {
    fn parse_from_str(s: &str) -> Result<Self, AppError> {
        Uuid::parse_str(s)
            .map_err(|_| AppError::BadRequest(format!("Invalid UUID format: '{}'", s)))
    }
}

impl PathParam for ReportType {
    fn parse_from_str(s: &str) -> Result<Self, AppError> {
        ReportType::from_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown report type: '{}'", s)))
    }
}

/// 汎用パスパラメータExtractor
#[derive(Debug)]
pub struct ValidatedPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedPath<T>
where
    S: Send + Sync,
    T: PathParam + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Missing path parameter".to_string()))?;

        let parsed = T::parse_from_str(&value)?;
        Ok(ValidatedPath(parsed))
    }
}
