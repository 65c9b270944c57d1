// src/service/mod.rs
pub mod auth_service;
pub mod evaluation_service;
pub mod feedback_service;
pub mod notification_service;
pub mod organization_service;
pub mod ranking_service;
pub mod report_cache_service;
pub mod report_generator_service;
pub mod user_service;
