use crate::utils::jwt::JwtConfig;
use std::env;

#[derive(Clone, Debug)]
pub struct SecurityConfig {
    pub cookie_secure: bool,
}

/// ランキング（上位/下位）のデフォルト件数
#[derive(Clone, Debug)]
pub struct RankingConfig {
    pub top_n: usize,
    pub bottom_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            bottom_n: 5,
        }
    }
}

/// 起動時に投入する初期管理者
#[derive(Clone)]
pub struct InitialAdminConfig {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for InitialAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitialAdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub jwt: JwtConfig,
    pub ranking: RankingConfig,
    pub initial_admin: Option<InitialAdminConfig>,
    pub security: SecurityConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        let jwt = JwtConfig::from_env().map_err(|e| e.to_string())?;

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| "Invalid PORT value")?,
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            ),
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            jwt,
            ranking: RankingConfig {
                top_n: parse_count("RANKING_TOP_N", 5)?,
                bottom_n: parse_count("RANKING_BOTTOM_N", 5)?,
            },
            initial_admin: initial_admin_from_env(),
            security: SecurityConfig {
                cookie_secure: is_production,
            },
        })
    }

    pub fn is_test(&self) -> bool {
        self.environment == "test"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["http://localhost:3001".to_string()],
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string()),
            jwt: JwtConfig {
                secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
                access_token_expiry_minutes: 15,
                issuer: "hr-backend".to_string(),
                audience: "hr-backend-users".to_string(),
            },
            ranking: RankingConfig::default(),
            initial_admin: None,
            security: SecurityConfig {
                cookie_secure: false,
            },
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_count(key: &str, default: usize) -> Result<usize, String> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| format!("Invalid {} value: {}", key, value)),
        Err(_) => Ok(default),
    }
}

fn initial_admin_from_env() -> Option<InitialAdminConfig> {
    // 3つ全て揃っている場合のみ有効
    let username = env::var("INITIAL_ADMIN_USERNAME").ok()?;
    let email = env::var("INITIAL_ADMIN_EMAIL").ok()?;
    let password_hash = env::var("INITIAL_ADMIN_PASSWORD_HASH").ok()?;

    Some(InitialAdminConfig {
        username,
        email,
        password_hash,
    })
}
