// src/api/handlers/notification_handler.rs
use crate::api::dto::notification_dto::{
    CreateNotificationRequest, NotificationListQuery, NotificationResponse, ReadNotificationQuery,
    ReadNotificationResponse, UnreadCountResponse,
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
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{delete, get, post},
    Router,
};

/// 管理者・マネージャーから従業員への通知
pub async fn create_notification_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateNotificationRequest>,
) -> AppResult<(StatusCode, ApiResponse<NotificationResponse>)> {
    let notification = app_state
        .notification_service
        .create(&user.claims, payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(notification)))
}

pub async fn list_notifications_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedQuery(query): ValidatedQuery<NotificationListQuery>,
    ValidatedQuery(pagination): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<NotificationResponse>>> {
    let (notifications, meta) = app_state
        .notification_service
        .list_own(
            user.user_id(),
            query.unread_only.unwrap_or(false),
            &pagination,
        )
        .await?;

    Ok(ApiResponse::paginated(notifications, meta))
}

pub async fn unread_count_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = app_state
        .notification_service
        .unread_count(user.user_id())
        .await?;

    Ok(ApiResponse::success(count))
}

/// `?policy=retain|delete`。省略時は retain
pub async fn read_notification_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
    ValidatedQuery(query): ValidatedQuery<ReadNotificationQuery>,
) -> AppResult<ApiResponse<ReadNotificationResponse>> {
    let result = app_state
        .notification_service
        .read(user.user_id(), id, query.policy.unwrap_or_default())
        .await?;

    Ok(ApiResponse::success(result))
}

pub async fn delete_notification_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<OperationResult>> {
    app_state
        .notification_service
        .delete_own(user.user_id(), id)
        .await?;

    Ok(ApiResponse::success(OperationResult::new(
        "Notification deleted",
    )))
}

// --- Router Setup ---

pub fn notification_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications_handler)
                .route_layer(require_operation!(Operation::ManageOwnNotifications))
                .merge(
                    post(create_notification_handler)
                        .route_layer(require_operation!(Operation::Notify)),
                ),
        )
        .route(
            "/notifications/unread-count",
            get(unread_count_handler)
                .route_layer(require_operation!(Operation::ManageOwnNotifications)),
        )
        .route(
            "/notifications/{id}/read",
            post(read_notification_handler)
                .route_layer(require_operation!(Operation::ManageOwnNotifications)),
        )
        .route(
            "/notifications/{id}",
            delete(delete_notification_handler)
                .route_layer(require_operation!(Operation::ManageOwnNotifications)),
        )
        .with_state(app_state)
}
