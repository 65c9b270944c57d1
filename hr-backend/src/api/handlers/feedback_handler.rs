// src/api/handlers/feedback_handler.rs
use crate::api::dto::feedback_dto::{CreateFeedbackRequest, FeedbackFilter, FeedbackResponse};
use crate::api::dto::OperationResult;
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::{ValidatedQuery, ValidatedUuid};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::authorization::Operation;
use crate::require_operation;
use crate::shared::types::PageQuery;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};

pub async fn create_feedback_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateFeedbackRequest>,
) -> AppResult<(StatusCode, ApiResponse<FeedbackResponse>)> {
    let feedback = app_state
        .feedback_service
        .create(&user.claims, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(feedback)))
}

pub async fn list_feedback_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedQuery(filter): ValidatedQuery<FeedbackFilter>,
    ValidatedQuery(pagination): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<FeedbackResponse>>> {
    let (feedbacks, meta) = app_state
        .feedback_service
        .list(&user.claims, &filter, &pagination)
        .await?;

    Ok(ApiResponse::paginated(feedbacks, meta))
}

pub async fn get_feedback_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<FeedbackResponse>> {
    let feedback = app_state.feedback_service.get(&user.claims, id).await?;
    Ok(ApiResponse::success(feedback))
}

pub async fn delete_feedback_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<OperationResult>> {
    app_state.feedback_service.delete(&user.claims, id).await?;
    Ok(ApiResponse::success(OperationResult::new("Feedback deleted")))
}

// --- Router Setup ---

pub fn feedback_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/feedback",
            get(list_feedback_handler)
                .route_layer(require_operation!(Operation::ReadFeedback))
                .merge(
                    post(create_feedback_handler)
                        .route_layer(require_operation!(Operation::GiveFeedback)),
                ),
        )
        .route(
            "/feedback/{id}",
            get(get_feedback_handler)
                .merge(delete(delete_feedback_handler))
                .route_layer(require_operation!(Operation::ReadFeedback)),
        )
        .with_state(app_state)
}
