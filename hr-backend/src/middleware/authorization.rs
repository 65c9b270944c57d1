// src/middleware/authorization.rs

use crate::domain::role_model::RoleName;
use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::utils::error_helper::forbidden_error;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

const ANY: &[RoleName] = &[RoleName::Admin, RoleName::Manager, RoleName::Employee];
const ADMIN_OR_MANAGER: &[RoleName] = &[RoleName::Admin, RoleName::Manager];
const ADMIN: &[RoleName] = &[RoleName::Admin];

/// ルートごとに要求する操作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    ViewCurrentUser,
    ManageUsers,
    ReadDepartments,
    WriteDepartments,
    ReadDirectory,
    ReadOwnEmployeeRecord,
    WriteDirectory,
    ReadEvaluations,
    RecordEvaluation,
    DeleteEvaluation,
    ViewRanking,
    ReadReports,
    WriteReports,
    GiveFeedback,
    ReadFeedback,
    Notify,
    ManageOwnNotifications,
}

impl Operation {
    /// 操作を許可するロール
    pub fn allowed_roles(&self) -> &'static [RoleName] {
        match self {
            Self::ViewCurrentUser
            | Self::ReadDepartments
            | Self::ReadOwnEmployeeRecord
            | Self::ReadEvaluations
            | Self::GiveFeedback
            | Self::ReadFeedback
            | Self::ManageOwnNotifications => ANY,
            Self::ReadDirectory
            | Self::RecordEvaluation
            | Self::ViewRanking
            | Self::ReadReports
            | Self::Notify => ADMIN_OR_MANAGER,
            Self::ManageUsers
            | Self::WriteDepartments
            | Self::WriteDirectory
            | Self::DeleteEvaluation
            | Self::WriteReports => ADMIN,
        }
    }

    pub fn permits(&self, role: RoleName) -> bool {
        self.allowed_roles().contains(&role)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewCurrentUser => "view_current_user",
            Self::ManageUsers => "manage_users",
            Self::ReadDepartments => "read_departments",
            Self::WriteDepartments => "write_departments",
            Self::ReadDirectory => "read_directory",
            Self::ReadOwnEmployeeRecord => "read_own_employee_record",
            Self::WriteDirectory => "write_directory",
            Self::ReadEvaluations => "read_evaluations",
            Self::RecordEvaluation => "record_evaluation",
            Self::DeleteEvaluation => "delete_evaluation",
            Self::ViewRanking => "view_ranking",
            Self::ReadReports => "read_reports",
            Self::WriteReports => "write_reports",
            Self::GiveFeedback => "give_feedback",
            Self::ReadFeedback => "read_feedback",
            Self::Notify => "notify",
            Self::ManageOwnNotifications => "manage_own_notifications",
        }
    }
}

/// 操作チェックミドルウェアマクロ
#[macro_export]
macro_rules! require_operation {
    ($operation:expr) => {{
        use axum::middleware::from_fn_with_state;
        use $crate::middleware::authorization::check_operation_with_state;

        from_fn_with_state($operation, check_operation_with_state)
    }};
}

/// 状態として操作を受け取るミドルウェア関数
pub async fn check_operation_with_state(
    State(operation): State<Operation>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    check_operation(operation, &auth_user.claims)?;

    Ok(next.run(req).await)
}

/// ロールが操作を許可されているか判定する
pub fn check_operation(operation: Operation, claims: &UserClaims) -> Result<(), AppError> {
    let role = claims.effective_role();
    if operation.permits(role) {
        return Ok(());
    }

    Err(forbidden_error(
        &format!(
            "Role '{}' is not allowed to perform '{}'",
            role,
            operation.as_str()
        ),
        "authorization::check_operation",
        claims.user_id,
    ))
}
