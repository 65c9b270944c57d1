// src/domain/mod.rs
pub mod cached_report_model;
pub mod department_model;
pub mod employee_model;
pub mod feedback_model;
pub mod notification_model;
pub mod performance_evaluation_model;
pub mod performance_metrics;
pub mod report_summary;
pub mod role_model;
pub mod user_model;
