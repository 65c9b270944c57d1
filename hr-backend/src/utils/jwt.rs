// src/utils/jwt.rs

//! HS256 アクセストークンの発行と検証

use crate::domain::user_model::UserClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

const MIN_SECRET_LENGTH: usize = 32;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid JWT: {0}")]
    Invalid(String),

    #[error("JWT token has expired")]
    Expired,

    #[error("Invalid JWT configuration: {0}")]
    Configuration(String),
}

/// トークンに載せるクレーム。`user` は認可判定にそのまま使う
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub user: UserClaims,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub access_token_expiry_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// `JWT_SECRET` は必須。それ以外は既定値あり
    pub fn from_env() -> Result<Self, JwtError> {
        let secret_key = env::var("JWT_SECRET")
            .map_err(|_| JwtError::Configuration("JWT_SECRET must be set".to_string()))?;

        let access_token_expiry_minutes = env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| {
                JwtError::Configuration("Invalid JWT_ACCESS_TOKEN_EXPIRY_MINUTES".to_string())
            })?;

        let config = Self {
            secret_key,
            access_token_expiry_minutes,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "hr-backend".to_string()),
            audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "hr-backend-users".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret_key.len() < MIN_SECRET_LENGTH {
            return Err(JwtError::Configuration(format!(
                "JWT secret key must be at least {} characters",
                MIN_SECRET_LENGTH
            )));
        }
        if self.access_token_expiry_minutes <= 0 {
            return Err(JwtError::Configuration(
                "Access token expiry must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
            config,
        })
    }

    pub fn generate_access_token(&self, user: UserClaims) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user.user_id,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.config.access_token_expiry_minutes)).timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            user,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?;

        // sub と埋め込みユーザーが食い違うトークンは受け付けない
        if token_data.claims.sub != token_data.claims.user.user_id {
            return Err(JwtError::Invalid("subject mismatch".to_string()));
        }

        Ok(token_data.claims)
    }

    /// サインインレスポンスの `expires_in`（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expiry_minutes * 60
    }
}
