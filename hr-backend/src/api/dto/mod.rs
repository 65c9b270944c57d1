// src/api/dto/mod.rs
pub mod auth_dto;
pub mod common;
pub mod evaluation_dto;
pub mod feedback_dto;
pub mod notification_dto;
pub mod organization_dto;
pub mod report_dto;
pub mod user_dto;

// Re-export common response types
pub use common::OperationResult;
