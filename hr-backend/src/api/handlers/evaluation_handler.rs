// src/api/handlers/evaluation_handler.rs
use crate::api::dto::evaluation_dto::{
    CreateEvaluationRequest, EvaluationFilter, EvaluationResponse, PerformanceSummaryResponse,
    RankingQuery, UpdateEvaluationRequest,
};
use crate::api::dto::OperationResult;
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::{ValidatedQuery, ValidatedUuid};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::authorization::Operation;
use crate::require_operation;
use crate::shared::types::PageQuery;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Router,
};
use tracing::info;
use validator::Validate;

pub async fn record_evaluation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateEvaluationRequest>,
) -> AppResult<(StatusCode, ApiResponse<EvaluationResponse>)> {
    let evaluation = app_state
        .evaluation_service
        .record(&user.claims, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(evaluation)))
}

pub async fn list_evaluations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedQuery(filter): ValidatedQuery<EvaluationFilter>,
    ValidatedQuery(pagination): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<EvaluationResponse>>> {
    let (evaluations, meta) = app_state
        .evaluation_service
        .list(&user.claims, filter, &pagination)
        .await?;

    Ok(ApiResponse::paginated(evaluations, meta))
}

pub async fn get_evaluation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<EvaluationResponse>> {
    let evaluation = app_state.evaluation_service.get(&user.claims, id).await?;
    Ok(ApiResponse::success(evaluation))
}

pub async fn update_evaluation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateEvaluationRequest>,
) -> AppResult<ApiResponse<EvaluationResponse>> {
    let evaluation = app_state
        .evaluation_service
        .update(&user.claims, id, payload)
        .await?;

    Ok(ApiResponse::success(evaluation))
}

pub async fn delete_evaluation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<OperationResult>> {
    app_state
        .evaluation_service
        .delete(&user.claims, id)
        .await?;

    Ok(ApiResponse::success(OperationResult::new(
        "Evaluation deleted",
    )))
}

/// 上位・下位の従業員。件数の省略時は設定値
pub async fn performance_summary_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedQuery(query): ValidatedQuery<RankingQuery>,
) -> AppResult<ApiResponse<PerformanceSummaryResponse>> {
    query
        .validate()
        .map_err(|e| convert_validation_errors(e, "evaluation_handler::performance_summary"))?;

    let top_n = query.top_n.unwrap_or(app_state.config.ranking.top_n);
    let bottom_n = query.bottom_n.unwrap_or(app_state.config.ranking.bottom_n);

    let ranking = app_state.ranking_service.summary(top_n, bottom_n).await?;

    info!(
        user_id = %user.user_id(),
        top_n,
        bottom_n,
        top_count = ranking.top.len(),
        bottom_count = ranking.bottom.len(),
        "Performance summary generated"
    );

    Ok(ApiResponse::success(ranking.into()))
}

// --- Router Setup ---

pub fn evaluation_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/evaluations",
            get(list_evaluations_handler)
                .route_layer(require_operation!(Operation::ReadEvaluations))
                .merge(
                    post(record_evaluation_handler)
                        .route_layer(require_operation!(Operation::RecordEvaluation)),
                ),
        )
        .route(
            "/evaluations/summary",
            get(performance_summary_handler)
                .route_layer(require_operation!(Operation::ViewRanking)),
        )
        .route(
            "/evaluations/{id}",
            get(get_evaluation_handler)
                .route_layer(require_operation!(Operation::ReadEvaluations))
                .merge(
                    patch(update_evaluation_handler)
                        .route_layer(require_operation!(Operation::RecordEvaluation)),
                )
                .merge(
                    delete(delete_evaluation_handler)
                        .route_layer(require_operation!(Operation::DeleteEvaluation)),
                ),
        )
        .with_state(app_state)
}
