// src/api/handlers/organization_handler.rs
use crate::api::dto::organization_dto::{
    CreateDepartmentRequest, CreateEmployeeRequest, DepartmentFilter, DepartmentResponse,
    EmployeeFilter, EmployeeResponse, UpdateDepartmentRequest, UpdateEmployeeRequest,
};
use crate::api::dto::OperationResult;
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::{ValidatedQuery, ValidatedUuid};
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::authorization::Operation;
use crate::require_operation;
use crate::shared::types::PageQuery;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Router,
};

// --- 部署 ---

pub async fn create_department_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, ApiResponse<DepartmentResponse>)> {
    let department = app_state
        .organization_service
        .create_department(payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(department)))
}

pub async fn list_departments_handler(
    State(app_state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<DepartmentFilter>,
) -> AppResult<ApiResponse<Vec<DepartmentResponse>>> {
    let departments = app_state
        .organization_service
        .list_departments(&filter)
        .await?;

    Ok(ApiResponse::success(departments))
}

pub async fn get_department_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    let department = app_state.organization_service.get_department(id).await?;
    Ok(ApiResponse::success(department))
}

pub async fn update_department_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateDepartmentRequest>,
) -> AppResult<ApiResponse<DepartmentResponse>> {
    let department = app_state
        .organization_service
        .update_department(id, payload)
        .await?;

    Ok(ApiResponse::success(department))
}

/// 部署の無効化
pub async fn delete_department_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<OperationResult>> {
    app_state.organization_service.delete_department(id).await?;
    Ok(ApiResponse::success(OperationResult::new(
        "Department deactivated",
    )))
}

// --- 従業員 ---

pub async fn create_employee_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, ApiResponse<EmployeeResponse>)> {
    let employee = app_state
        .organization_service
        .create_employee(payload)
        .await?;

    Ok((StatusCode::CREATED, ApiResponse::success(employee)))
}

pub async fn list_employees_handler(
    State(app_state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<EmployeeFilter>,
    ValidatedQuery(pagination): ValidatedQuery<PageQuery>,
) -> AppResult<ApiResponse<Vec<EmployeeResponse>>> {
    let (employees, meta) = app_state
        .organization_service
        .list_employees(&filter, &pagination)
        .await?;

    Ok(ApiResponse::paginated(employees, meta))
}

/// ログインユーザー自身の従業員レコード
pub async fn my_employee_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    let employee = app_state
        .organization_service
        .get_employee_by_user(user.user_id())
        .await?;

    Ok(ApiResponse::success(employee))
}

pub async fn get_employee_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    let employee = app_state.organization_service.get_employee(id).await?;
    Ok(ApiResponse::success(employee))
}

pub async fn update_employee_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> AppResult<ApiResponse<EmployeeResponse>> {
    let employee = app_state
        .organization_service
        .update_employee(id, payload)
        .await?;

    Ok(ApiResponse::success(employee))
}

pub async fn delete_employee_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<OperationResult>> {
    app_state.organization_service.delete_employee(id).await?;
    Ok(ApiResponse::success(OperationResult::new(
        "Employee record deleted",
    )))
}

// --- Router Setup ---

pub fn organization_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/departments",
            get(list_departments_handler)
                .route_layer(require_operation!(Operation::ReadDepartments))
                .merge(
                    post(create_department_handler)
                        .route_layer(require_operation!(Operation::WriteDepartments)),
                ),
        )
        .route(
            "/departments/{id}",
            get(get_department_handler)
                .route_layer(require_operation!(Operation::ReadDepartments))
                .merge(
                    patch(update_department_handler)
                        .merge(delete(delete_department_handler))
                        .route_layer(require_operation!(Operation::WriteDepartments)),
                ),
        )
        .route(
            "/employees",
            get(list_employees_handler)
                .route_layer(require_operation!(Operation::ReadDirectory))
                .merge(
                    post(create_employee_handler)
                        .route_layer(require_operation!(Operation::WriteDirectory)),
                ),
        )
        .route(
            "/employees/me",
            get(my_employee_handler)
                .route_layer(require_operation!(Operation::ReadOwnEmployeeRecord)),
        )
        .route(
            "/employees/{id}",
            get(get_employee_handler)
                .route_layer(require_operation!(Operation::ReadDirectory))
                .merge(
                    patch(update_employee_handler)
                        .merge(delete(delete_employee_handler))
                        .route_layer(require_operation!(Operation::WriteDirectory)),
                ),
        )
        .with_state(app_state)
}
