// src/api/handlers/user_handler.rs
use crate::api::dto::user_dto::{CreateUserRequest, UserFilter};
use crate::api::AppState;
use crate::domain::user_model::SafeUser;
use crate::error::AppResult;
use crate::extractors::ValidatedQuery;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::authorization::Operation;
use crate::require_operation;
use crate::shared::types::PageQuery;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tracing::info;

/// ユーザー作成（管理者）
pub async fn create_user_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, ApiResponse<SafeUser>)> {
    let user = app_state.user_service.create_user(payload).await?;

    info!(
        user_id = %admin.user_id(),
        created_user_id = %user.id,
        role = %user.role,
        "User created by admin"
    );

    Ok((StatusCode::CREATED, ApiResponse::success(user)))
}

/// ユーザー一覧（管理者）
pub async fn list_users_handler(
    State(app_state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<UserFilter>,
    ValidatedQuery(pagination): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<SafeUser>>> {
    let (users, meta) = app_state
        .user_service
        .list_users(&filter, &pagination)
        .await?;

    Ok(ApiResponse::paginated(users, meta))
}

// --- Router Setup ---

pub fn user_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/users",
            post(create_user_handler)
                .merge(get(list_users_handler))
                .route_layer(require_operation!(Operation::ManageUsers)),
        )
        .with_state(app_state)
}
