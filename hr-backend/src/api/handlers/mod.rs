// src/api/handlers/mod.rs
pub mod auth_handler;
pub mod evaluation_handler;
pub mod feedback_handler;
pub mod notification_handler;
pub mod organization_handler;
pub mod report_handler;
pub mod system_handler;
pub mod user_handler;
