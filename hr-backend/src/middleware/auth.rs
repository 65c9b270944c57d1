// src/middleware/auth.rs

use crate::config::AppConfig;
use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use crate::logging::RequestContext;
use crate::utils::jwt::JwtManager;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};

pub const ACCESS_TOKEN_COOKIE_NAME: &str = "access_token";

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    pub access_token_cookie_name: String,
}

impl AuthMiddlewareConfig {
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            access_token_cookie_name: ACCESS_TOKEN_COOKIE_NAME.to_string(),
        }
    }
}

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: UserClaims,
}

impl AuthenticatedUser {
    pub fn new(claims: UserClaims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.claims.user_id
    }
}

/// JWT認証ミドルウェア
pub async fn jwt_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_token(&headers, &cookie_jar, &config.access_token_cookie_name)
        .ok_or_else(|| {
            warn!(path = %path, "Missing authentication token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

    let access_claims = config
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_claims = access_claims.user;

    if !user_claims.is_active {
        warn!(
            user_id = %user_claims.user_id,
            path = %path,
            "Access attempt with inactive account"
        );
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    debug!(
        user_id = %user_claims.user_id,
        role = %user_claims.effective_role(),
        path = %path,
        "Authenticated request"
    );

    let context = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .map(|mut context| {
            context.user_id = Some(user_claims.user_id);
            context
        });

    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user_claims));

    let mut response = next.run(request).await;

    // ロギングミドルウェアがユーザーIDを記録できるようにする
    if let Some(context) = context {
        response.extensions_mut().insert(context);
    }

    Ok(response)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// CORS 設定。不正なオリジンは読み飛ばす
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

// --- ヘルパー関数 ---

/// リクエストからトークンを抽出（Authorization ヘッダー優先）
fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let cookie_token = cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string());

    auth_header.or(cookie_token)
}
