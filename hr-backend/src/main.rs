// src/main.rs
use hr_backend::api::{build_router, AppState};
use hr_backend::config::Config;
use hr_backend::db::{create_db_pool, run_migrations};
use hr_backend::logging::init_tracing;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting HR Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        ranking_top_n = app_config.ranking.top_n,
        ranking_bottom_n = app_config.ranking.bottom_n,
        "Configuration loaded"
    );

    // データベース接続とマイグレーション
    let db_pool = create_db_pool(&app_config).await?;
    run_migrations(&db_pool).await?;
    tracing::info!("Database pool created and migrations applied.");

    let app_state = AppState::new(db_pool, &app_config)?;

    if let Some(admin) = &app_config.initial_admin {
        match app_state.user_service.ensure_initial_admin(admin).await {
            Ok(Some(user)) => tracing::info!(user_id = %user.id, "Initial admin provisioned"),
            Ok(None) => tracing::debug!("Initial admin already exists"),
            Err(e) => tracing::warn!(error = %e, "Failed to provision initial admin"),
        }
    }

    let app_router = build_router(app_state);

    // サーバーの起動
    let addr = app_config.server_addr();
    tracing::info!("Router configured. Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
