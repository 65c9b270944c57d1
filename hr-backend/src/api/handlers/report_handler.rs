// src/api/handlers/report_handler.rs
use crate::api::dto::report_dto::{
    CreateReportRequest, GenerateReportRequest, ReportFilter, ReportLookupQuery, ReportResponse,
    UpdateReportRequest,
};
use crate::api::AppState;
use crate::domain::cached_report_model::ReportType;
use crate::error::AppResult;
use crate::extractors::{ValidatedPath, ValidatedQuery, ValidatedUuid};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::authorization::Operation;
use crate::require_operation;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use tracing::info;
use validator::Validate;

// --- 参照 ---

pub async fn list_reports_handler(
    State(app_state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<ReportFilter>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let reports = app_state.report_cache_service.list(&filter).await?;
    Ok(ApiResponse::success(
        reports.into_iter().map(Into::into).collect(),
    ))
}

pub async fn get_report_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = app_state.report_cache_service.get(id).await?;
    Ok(ApiResponse::success(report.into()))
}

/// 種別ごとの最新レポート。まだ無ければ data は null
pub async fn latest_report_handler(
    State(app_state): State<AppState>,
    ValidatedPath(report_type): ValidatedPath<ReportType>,
) -> AppResult<ApiResponse<Option<ReportResponse>>> {
    let report = app_state
        .report_cache_service
        .get_latest(report_type)
        .await?;

    Ok(ApiResponse::success(report.map(Into::into)))
}

pub async fn lookup_report_handler(
    State(app_state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ReportLookupQuery>,
) -> AppResult<ApiResponse<Option<ReportResponse>>> {
    let report = app_state.report_cache_service.find(&query.key()).await?;
    Ok(ApiResponse::success(report.map(Into::into)))
}

// --- 更新 ---

pub async fn create_report_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateReportRequest>,
) -> AppResult<(StatusCode, ApiResponse<ReportResponse>)> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "report_handler::create_report"))?;

    let key = payload.key();
    let report = app_state
        .report_cache_service
        .create(key, payload.payload, Some(user.user_id()))
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(report.into())))
}

pub async fn update_report_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = app_state.report_cache_service.update(id, payload).await?;
    Ok(ApiResponse::success(report.into()))
}

pub async fn archive_report_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = app_state.report_cache_service.archive(id).await?;
    Ok(ApiResponse::success(report.into()))
}

pub async fn restore_report_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = app_state.report_cache_service.restore(id).await?;
    Ok(ApiResponse::success(report.into()))
}

/// 評価を集計してキャッシュに保存する
pub async fn generate_report_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<GenerateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "report_handler::generate_report"))?;

    let key = payload.key();
    info!(
        user_id = %user.user_id(),
        report_type = %key.report_type.as_str(),
        year = key.year,
        "Report generation requested"
    );

    let report = app_state
        .report_generator_service
        .generate(key, Some(user.user_id()))
        .await?;

    Ok(ApiResponse::success(report.into()))
}

// --- Router Setup ---

pub fn report_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/reports",
            get(list_reports_handler)
                .route_layer(require_operation!(Operation::ReadReports))
                .merge(
                    post(create_report_handler)
                        .route_layer(require_operation!(Operation::WriteReports)),
                ),
        )
        .route(
            "/reports/lookup",
            get(lookup_report_handler).route_layer(require_operation!(Operation::ReadReports)),
        )
        .route(
            "/reports/latest/{report_type}",
            get(latest_report_handler).route_layer(require_operation!(Operation::ReadReports)),
        )
        .route(
            "/reports/generate",
            post(generate_report_handler)
                .route_layer(require_operation!(Operation::WriteReports)),
        )
        .route(
            "/reports/{id}",
            get(get_report_handler)
                .route_layer(require_operation!(Operation::ReadReports))
                .merge(
                    patch(update_report_handler)
                        .route_layer(require_operation!(Operation::WriteReports)),
                ),
        )
        .route(
            "/reports/{id}/archive",
            post(archive_report_handler)
                .route_layer(require_operation!(Operation::WriteReports)),
        )
        .route(
            "/reports/{id}/restore",
            post(restore_report_handler)
                .route_layer(require_operation!(Operation::WriteReports)),
        )
        .with_state(app_state)
}
