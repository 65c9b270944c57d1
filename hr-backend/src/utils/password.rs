// src/utils/password.rs

//! Argon2id によるパスワードハッシュ

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::env;
use thiserror::Error;

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hashing(#[from] argon2::password_hash::Error),

    #[error("Invalid Argon2 parameters: {0}")]
    Params(#[from] argon2::Error),

    #[error("Weak password: {0}")]
    WeakPassword(String),
}

pub struct PasswordManager {
    argon2: Argon2<'static>,
}

impl PasswordManager {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_cost, time_cost, parallelism, None)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// `ARGON2_MEMORY_COST`（KiB）/ `ARGON2_TIME_COST` / `ARGON2_PARALLELISM`
    pub fn from_env() -> Result<Self, PasswordError> {
        Self::new(
            env_or("ARGON2_MEMORY_COST", 19_456),
            env_or("ARGON2_TIME_COST", 2),
            env_or("ARGON2_PARALLELISM", 1),
        )
    }

    /// 強度チェックを通ったパスワードだけをハッシュ化する
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        check_password_strength(password)?;

        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// 8〜128文字、大文字・小文字・数字・記号を各1文字以上、同じ文字の3連続は不可
pub fn check_password_strength(password: &str) -> Result<(), PasswordError> {
    let length = password.chars().count();
    let mut problems = Vec::new();

    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        problems.push(format!(
            "must be between {} and {} characters",
            MIN_LENGTH, MAX_LENGTH
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        problems.push("needs an uppercase letter".to_string());
    }
    if !password.chars().any(char::is_lowercase) {
        problems.push("needs a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("needs a digit".to_string());
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        problems.push("needs a special character".to_string());
    }

    let chars: Vec<char> = password.chars().collect();
    if chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]) {
        problems.push("cannot repeat a character 3 times in a row".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PasswordError::WeakPassword(format!(
            "password: {}",
            problems.join("; ")
        )))
    }
}

fn env_or(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
