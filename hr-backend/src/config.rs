// src/config.rs
pub mod app;

pub use app::{AppConfig, InitialAdminConfig, RankingConfig, SecurityConfig};

pub type Config = AppConfig;
