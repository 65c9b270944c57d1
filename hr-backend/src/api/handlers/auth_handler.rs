// src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::{AuthResponse, CurrentUserResponse, SigninRequest};
use crate::api::{AppState, CookieConfig};
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::authorization::Operation;
use crate::require_operation;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

/// ログイン。アクセストークンは Cookie にも設定する
pub async fn signin_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SigninRequest>,
) -> AppResult<(CookieJar, ApiResponse<AuthResponse>)> {
    info!(identifier = %payload.identifier, "User signin attempt");

    let auth_response = app_state.auth_service.signin(payload).await?;
    let jar = jar.add(access_token_cookie(
        &auth_response.access_token,
        &app_state.cookie_config,
    ));

    Ok((jar, ApiResponse::success(auth_response)))
}

/// 現在のユーザー情報
pub async fn me_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<CurrentUserResponse>> {
    let current_user = app_state
        .auth_service
        .current_user(user.user_id())
        .await?;

    Ok(ApiResponse::success(current_user))
}

fn access_token_cookie(token: &str, config: &CookieConfig) -> Cookie<'static> {
    Cookie::build((config.access_token_name.clone(), token.to_string()))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(config.http_only)
        .same_site(SameSite::Strict)
        .build()
}

// --- Router Setup ---

/// 認証不要のルート
pub fn public_auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/signin", post(signin_handler))
        .with_state(app_state)
}

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/auth/me",
            get(me_handler).route_layer(require_operation!(Operation::ViewCurrentUser)),
        )
        .with_state(app_state)
}
