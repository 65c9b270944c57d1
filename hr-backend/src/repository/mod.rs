// src/repository/mod.rs
pub mod cached_report_repository;
pub mod department_repository;
pub mod employee_repository;
pub mod feedback_repository;
pub mod notification_repository;
pub mod performance_evaluation_repository;
pub mod user_repository;
