// src/service/organization_service.rs

use crate::api::dto::organization_dto::{
    CreateDepartmentRequest, CreateEmployeeRequest, DepartmentFilter, DepartmentResponse,
    EmployeeFilter, EmployeeResponse, UpdateDepartmentRequest, UpdateEmployeeRequest,
};
use crate::domain::department_model;
use crate::domain::employee_model::{self, creates_manager_cycle, EmployeeStatus};
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::DepartmentRepository;
use crate::repository::employee_repository::EmployeeRepository;
use crate::repository::user_repository::UserRepository;
use crate::shared::types::{PageMeta, PageQuery};
use crate::utils::error_helper::{
    conflict_error, convert_validation_errors, map_unique_violation, not_found_error,
    validation_error,
};
use crate::utils::validation::common;
use sea_orm::Set;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// 部署と従業員ディレクトリの管理
pub struct OrganizationService {
    department_repo: Arc<DepartmentRepository>,
    employee_repo: Arc<EmployeeRepository>,
    user_repo: Arc<UserRepository>,
}

impl OrganizationService {
    pub fn new(
        department_repo: Arc<DepartmentRepository>,
        employee_repo: Arc<EmployeeRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            department_repo,
            employee_repo,
            user_repo,
        }
    }

    // =========================================================================
    // 部署
    // =========================================================================

    pub async fn create_department(
        &self,
        request: CreateDepartmentRequest,
    ) -> AppResult<DepartmentResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "organization_service::create_department"))?;

        let name = request.name.trim().to_string();
        if self.department_repo.find_by_name(&name).await?.is_some() {
            return Err(conflict_error(
                "department name already exists",
                "organization_service::create_department",
            ));
        }

        let department = self
            .department_repo
            .create(name, request.description)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict("department name already exists".to_string())
                })
            })?;

        info!(department_id = %department.id, name = %department.name, "Department created");
        Ok(department.into())
    }

    pub async fn list_departments(
        &self,
        filter: &DepartmentFilter,
    ) -> AppResult<Vec<DepartmentResponse>> {
        let departments = self
            .department_repo
            .find_all(filter.include_inactive.unwrap_or(false))
            .await?;
        Ok(departments.into_iter().map(Into::into).collect())
    }

    pub async fn get_department(&self, id: Uuid) -> AppResult<DepartmentResponse> {
        Ok(self.find_department(id).await?.into())
    }

    pub async fn update_department(
        &self,
        id: Uuid,
        request: UpdateDepartmentRequest,
    ) -> AppResult<DepartmentResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "organization_service::update_department"))?;

        if let Some(Some(description)) = &request.description {
            if description.chars().count() as u64 > common::department::DESCRIPTION_MAX_LENGTH {
                return Err(validation_error(
                    "description",
                    "Description must not exceed 1000 characters",
                ));
            }
        }

        let department = self.find_department(id).await?;
        let mut active_model: department_model::ActiveModel = department.into();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if let Some(existing) = self.department_repo.find_by_name(&name).await? {
                if existing.id != id {
                    return Err(conflict_error(
                        "department name already exists",
                        "organization_service::update_department",
                    ));
                }
            }
            active_model.name = Set(name);
        }

        if let Some(description) = request.description {
            active_model.description = Set(description);
        }

        if let Some(is_active) = request.is_active {
            active_model.is_active = Set(is_active);
        }

        let department = self
            .department_repo
            .update(active_model)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    AppError::Conflict("department name already exists".to_string())
                })
            })?;

        info!(department_id = %department.id, "Department updated");
        Ok(department.into())
    }

    /// 部署の削除は無効化（参照元は残す）
    pub async fn delete_department(&self, id: Uuid) -> AppResult<()> {
        let department = self.find_department(id).await?;
        self.department_repo.deactivate(department).await?;

        info!(department_id = %id, "Department deactivated");
        Ok(())
    }

    async fn find_department(&self, id: Uuid) -> AppResult<department_model::Model> {
        self.department_repo.find_by_id(id).await?.ok_or_else(|| {
            not_found_error("Department", &id.to_string(), "organization_service")
        })
    }

    // =========================================================================
    // 従業員
    // =========================================================================

    pub async fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> AppResult<EmployeeResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "organization_service::create_employee"))?;

        self.user_repo.find_by_id(request.user_id).await?.ok_or_else(|| {
            not_found_error(
                "User",
                &request.user_id.to_string(),
                "organization_service::create_employee",
            )
        })?;

        if self
            .employee_repo
            .find_by_user_id(request.user_id)
            .await?
            .is_some()
        {
            return Err(conflict_error(
                "user already has an employee record",
                "organization_service::create_employee",
            ));
        }

        if let Some(department_id) = request.department_id {
            self.find_department(department_id).await?;
        }

        if let Some(manager_id) = request.manager_id {
            self.find_employee(manager_id).await?;
        }

        let employee = employee_model::ActiveModel {
            user_id: Set(request.user_id),
            department_id: Set(request.department_id),
            manager_id: Set(request.manager_id),
            designation: Set(request.designation.trim().to_string()),
            status: Set(request
                .status
                .unwrap_or(EmployeeStatus::Active)
                .as_str()
                .to_string()),
            joining_date: Set(request.joining_date),
            ..Default::default()
        };

        let employee = self.employee_repo.create(employee).await.map_err(|e| {
            map_unique_violation(e, || {
                AppError::Conflict("user already has an employee record".to_string())
            })
        })?;

        info!(
            employee_id = %employee.id,
            user_id = %employee.user_id,
            "Employee record created"
        );

        self.to_response(employee).await
    }

    pub async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        pagination: &PageQuery,
    ) -> AppResult<(Vec<EmployeeResponse>, PageMeta)> {
        let (page, per_page) = pagination.page_and_size();
        let (employees, total_count) = self
            .employee_repo
            .find_with_filter(filter, page, per_page)
            .await?;

        let responses = self.to_responses(employees).await?;
        Ok((
            responses,
            PageMeta::new(page, per_page, total_count),
        ))
    }

    pub async fn get_employee(&self, id: Uuid) -> AppResult<EmployeeResponse> {
        let employee = self.find_employee(id).await?;
        self.to_response(employee).await
    }

    /// ログインユーザー自身の従業員レコード
    pub async fn get_employee_by_user(&self, user_id: Uuid) -> AppResult<EmployeeResponse> {
        let employee = self
            .employee_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                not_found_error(
                    "Employee",
                    &user_id.to_string(),
                    "organization_service::get_employee_by_user",
                )
            })?;
        self.to_response(employee).await
    }

    pub async fn update_employee(
        &self,
        id: Uuid,
        request: UpdateEmployeeRequest,
    ) -> AppResult<EmployeeResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "organization_service::update_employee"))?;

        let employee = self.find_employee(id).await?;
        let mut active_model: employee_model::ActiveModel = employee.into();

        if let Some(department_id) = request.department_id {
            if let Some(department_id) = department_id {
                self.find_department(department_id).await?;
            }
            active_model.department_id = Set(department_id);
        }

        if let Some(manager_id) = request.manager_id {
            if let Some(manager_id) = manager_id {
                self.find_employee(manager_id).await?;
                self.ensure_acyclic(id, manager_id).await?;
            }
            active_model.manager_id = Set(manager_id);
        }

        if let Some(designation) = request.designation {
            active_model.designation = Set(designation.trim().to_string());
        }

        if let Some(status) = request.status {
            active_model.status = Set(status.as_str().to_string());
        }

        if let Some(joining_date) = request.joining_date {
            active_model.joining_date = Set(joining_date);
        }

        let employee = self.employee_repo.update(active_model).await?;

        info!(employee_id = %employee.id, "Employee record updated");
        self.to_response(employee).await
    }

    /// 部下の manager_id は外部キーにより NULL になる
    pub async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        self.find_employee(id).await?;
        self.employee_repo.delete(id).await?;

        info!(employee_id = %id, "Employee record deleted");
        Ok(())
    }

    /// 上長チェーンを辿り、自己管理や循環を拒否する
    async fn ensure_acyclic(&self, employee_id: Uuid, manager_id: Uuid) -> AppResult<()> {
        if employee_id == manager_id {
            return Err(validation_error(
                "manager_id",
                "an employee cannot be their own manager",
            ));
        }

        let links = self.employee_repo.manager_links().await?;
        let max_steps = links.len();

        if creates_manager_cycle(employee_id, manager_id, max_steps, |id| {
            links.get(&id).copied().flatten()
        }) {
            return Err(validation_error(
                "manager_id",
                "manager assignment would create a reporting cycle",
            ));
        }

        Ok(())
    }

    async fn find_employee(&self, id: Uuid) -> AppResult<employee_model::Model> {
        self.employee_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Employee", &id.to_string(), "organization_service"))
    }

    async fn to_response(&self, employee: employee_model::Model) -> AppResult<EmployeeResponse> {
        let mut responses = self.to_responses(vec![employee]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::InternalServerError("Employee user missing".to_string()))
    }

    /// ユーザー・部署情報を付与してレスポンスに変換
    async fn to_responses(
        &self,
        employees: Vec<employee_model::Model>,
    ) -> AppResult<Vec<EmployeeResponse>> {
        let user_ids: Vec<Uuid> = employees.iter().map(|e| e.user_id).collect();
        let department_ids: Vec<Uuid> = employees.iter().filter_map(|e| e.department_id).collect();

        let users: HashMap<Uuid, _> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let departments: HashMap<Uuid, _> = self
            .department_repo
            .find_by_ids(&department_ids)
            .await?
            .into_iter()
            .map(|department| (department.id, department))
            .collect();

        let responses = employees
            .into_iter()
            .filter_map(|employee| {
                let user = users.get(&employee.user_id)?;
                let department = employee.department_id.and_then(|id| departments.get(&id));
                Some(EmployeeResponse::new(employee, user, department))
            })
            .collect();

        Ok(responses)
    }
}
