// src/api/handlers/system_handler.rs
use crate::api::AppState;
use crate::error::AppResult;
use crate::types::ApiResponse;
use axum::{extract::State, routing::get, Router};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub environment: String,
    pub version: String,
}

/// ヘルスチェック。DB に到達できなくても 200 で状態を返す
pub async fn health_check_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<HealthResponse>> {
    let database = match app_state.db.execute_unprepared("SELECT 1").await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "unavailable"
        }
    };

    Ok(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
        environment: app_state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .with_state(app_state)
}
