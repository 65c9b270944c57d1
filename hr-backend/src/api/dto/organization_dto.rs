// src/api/dto/organization_dto.rs

use super::common::double_option;
use crate::domain::employee_model::EmployeeStatus;
use crate::domain::{department_model, employee_model, user_model};
use crate::utils::validation::common;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// 部署
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    #[validate(
        length(
            min = common::department::NAME_MIN_LENGTH,
            max = common::department::NAME_MAX_LENGTH,
            message = "Department name must be between 1 and 100 characters"
        ),
        custom(function = common::validate_single_line)
    )]
    pub name: String,

    #[validate(length(
        max = common::department::DESCRIPTION_MAX_LENGTH,
        message = "Description must not exceed 1000 characters"
    ))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    #[validate(
        length(
            min = common::department::NAME_MIN_LENGTH,
            max = common::department::NAME_MAX_LENGTH,
            message = "Department name must be between 1 and 100 characters"
        ),
        custom(function = common::validate_single_line)
    )]
    pub name: Option<String>,

    /// null で説明を削除
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentFilter {
    /// 省略時は有効な部署のみ
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<department_model::Model> for DepartmentResponse {
    fn from(department: department_model::Model) -> Self {
        Self {
            id: department.id,
            name: department.name,
            description: department.description,
            is_active: department.is_active,
            created_at: department.created_at,
            updated_at: department.updated_at,
        }
    }
}

// =============================================================================
// 従業員
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    pub user_id: Uuid,

    pub department_id: Option<Uuid>,

    pub manager_id: Option<Uuid>,

    #[validate(length(
        max = common::employee::DESIGNATION_MAX_LENGTH,
        message = "Designation must not exceed 100 characters"
    ))]
    #[serde(default)]
    pub designation: String,

    pub status: Option<EmployeeStatus>,

    pub joining_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub department_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub manager_id: Option<Option<Uuid>>,

    #[validate(length(
        max = common::employee::DESIGNATION_MAX_LENGTH,
        message = "Designation must not exceed 100 characters"
    ))]
    pub designation: Option<String>,

    pub status: Option<EmployeeStatus>,

    pub joining_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeFilter {
    pub department_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
    pub manager_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
    pub manager_id: Option<Uuid>,
    pub designation: String,
    pub status: EmployeeStatus,
    pub joining_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeResponse {
    pub fn new(
        employee: employee_model::Model,
        user: &user_model::Model,
        department: Option<&department_model::Model>,
    ) -> Self {
        Self {
            status: employee.status(),
            id: employee.id,
            user_id: employee.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name(),
            department_id: employee.department_id,
            department_name: department.map(|d| d.name.clone()),
            manager_id: employee.manager_id,
            designation: employee.designation,
            joining_date: employee.joining_date,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        }
    }
}
