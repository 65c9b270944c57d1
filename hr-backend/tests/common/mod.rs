pub mod auth_helper;
pub mod db;
pub mod test_data;

use std::sync::Once;

// テスト環境の初期化を一度だけ実行
static INIT: Once = Once::new();

/// テスト環境を初期化
pub fn init_test_env() {
    INIT.call_once(|| {
        if std::path::Path::new(".env.test").exists() {
            dotenvy::from_filename(".env.test").ok();
        } else if std::path::Path::new("../.env.test").exists() {
            // hr-backendディレクトリから実行される場合
            dotenvy::from_filename("../.env.test").ok();
        }

        // テストではハッシュ計算を軽くする
        std::env::set_var("ARGON2_MEMORY_COST", "4096");
        std::env::set_var("ARGON2_TIME_COST", "1");
        std::env::set_var("ARGON2_PARALLELISM", "1");

        // テスト用のログ設定
        let _ = tracing_subscriber::fmt()
            .with_env_filter("hr_backend=debug,tower_http=debug")
            .with_test_writer()
            .try_init();
    });
}
