// tests/integration/mod.rs

pub mod auth_tests;
pub mod evaluation_tests;
pub mod feedback_tests;
pub mod notification_tests;
pub mod organization_tests;
pub mod permission_tests;
pub mod report_tests;
pub mod system_tests;
pub mod user_tests;
