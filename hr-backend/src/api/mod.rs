// src/api/mod.rs
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{cors_layer, jwt_auth_middleware, AuthMiddlewareConfig};
use crate::repository::{
    department_repository::DepartmentRepository, employee_repository::EmployeeRepository,
    feedback_repository::FeedbackRepository, notification_repository::NotificationRepository,
    user_repository::UserRepository,
};
use crate::service::{
    auth_service::AuthService, evaluation_service::EvaluationService,
    feedback_service::FeedbackService, notification_service::NotificationService,
    organization_service::OrganizationService, ranking_service::RankingService,
    report_cache_service::ReportCacheService, report_generator_service::ReportGeneratorService,
    user_service::UserService,
};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use axum::{middleware::from_fn, middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub organization_service: Arc<OrganizationService>,
    pub evaluation_service: Arc<EvaluationService>,
    pub ranking_service: Arc<RankingService>,
    pub report_cache_service: Arc<ReportCacheService>,
    pub report_generator_service: Arc<ReportGeneratorService>,
    pub feedback_service: Arc<FeedbackService>,
    pub notification_service: Arc<NotificationService>,
    pub jwt_manager: Arc<JwtManager>,
    pub cookie_config: CookieConfig,
    pub db: DbPool,
    pub config: Arc<AppConfig>,
}

/// Cookie設定
#[derive(Clone, Debug)]
pub struct CookieConfig {
    pub access_token_name: String,
    pub secure: bool,
    pub http_only: bool,
    pub path: String,
}

impl CookieConfig {
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        Self {
            access_token_name: crate::middleware::auth::ACCESS_TOKEN_COOKIE_NAME.to_string(),
            secure: app_config.security.cookie_secure,
            http_only: true,
            path: "/".to_string(),
        }
    }
}

impl AppState {
    /// 接続と設定からリポジトリとサービスを組み立てる
    pub fn new(db: DbPool, app_config: &AppConfig) -> Result<Self, String> {
        let jwt_manager = Arc::new(
            JwtManager::new(app_config.jwt.clone())
                .map_err(|e| format!("Failed to initialize JWT manager: {}", e))?,
        );
        let password_manager = Arc::new(
            PasswordManager::from_env()
                .map_err(|e| format!("Failed to initialize password manager: {}", e))?,
        );

        let user_repo = Arc::new(UserRepository::new(db.clone()));
        let department_repo = Arc::new(DepartmentRepository::new(db.clone()));
        let employee_repo = Arc::new(EmployeeRepository::new(db.clone()));
        let feedback_repo = Arc::new(FeedbackRepository::new(db.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(db.clone()));

        let report_cache_service = Arc::new(ReportCacheService::new(db.clone()));

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                user_repo.clone(),
                password_manager.clone(),
                jwt_manager.clone(),
            )),
            user_service: Arc::new(UserService::new(user_repo.clone(), password_manager)),
            organization_service: Arc::new(OrganizationService::new(
                department_repo,
                employee_repo,
                user_repo.clone(),
            )),
            evaluation_service: Arc::new(EvaluationService::new(db.clone())),
            ranking_service: Arc::new(RankingService::new(db.clone())),
            report_generator_service: Arc::new(ReportGeneratorService::new(
                db.clone(),
                report_cache_service.clone(),
            )),
            report_cache_service,
            feedback_service: Arc::new(FeedbackService::new(feedback_repo, user_repo.clone())),
            notification_service: Arc::new(NotificationService::new(notification_repo, user_repo)),
            jwt_manager,
            cookie_config: CookieConfig::from_app_config(app_config),
            db,
            config: Arc::new(app_config.clone()),
        })
    }
}

/// 全ルートを組み立てる。公開ルート以外は JWT 認証を通す
pub fn build_router(app_state: AppState) -> Router {
    use handlers::{
        auth_handler, evaluation_handler, feedback_handler, notification_handler,
        organization_handler, report_handler, system_handler, user_handler,
    };

    let auth_config = AuthMiddlewareConfig::new(app_state.jwt_manager.clone());
    let cors = cors_layer(&app_state.config);

    let public = Router::new()
        .merge(auth_handler::public_auth_router(app_state.clone()))
        .merge(system_handler::system_router(app_state.clone()));

    let protected = Router::new()
        .merge(auth_handler::auth_router(app_state.clone()))
        .merge(user_handler::user_router(app_state.clone()))
        .merge(organization_handler::organization_router(app_state.clone()))
        .merge(evaluation_handler::evaluation_router(app_state.clone()))
        .merge(report_handler::report_router(app_state.clone()))
        .merge(feedback_handler::feedback_router(app_state.clone()))
        .merge(notification_handler::notification_router(app_state))
        .layer(from_fn_with_state(auth_config, jwt_auth_middleware));

    // 外側から: CORS → トレース → コンテキスト付与 → ロギング
    Router::new()
        .merge(public)
        .merge(protected)
        .layer(from_fn(logging_middleware))
        .layer(from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
