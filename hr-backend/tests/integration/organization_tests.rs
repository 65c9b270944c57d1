// tests/integration/organization_tests.rs

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{app_helper, auth_helper, auth_helper::TestUser, test_data};
use axum::Router;

async fn create_department(app: &Router, admin: &TestUser, name: &str) -> Uuid {
    let (status, response) = auth_helper::send_authenticated(
        app,
        "POST",
        "/departments",
        admin,
        Some(test_data::create_department_data(name)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    Uuid::parse_str(response["data"]["id"].as_str().unwrap()).unwrap()
}

async fn create_employee_record(
    app: &Router,
    admin: &TestUser,
    user_id: Uuid,
    department_id: Option<Uuid>,
    manager_id: Option<Uuid>,
) -> Value {
    let (status, response) = auth_helper::send_authenticated(
        app,
        "POST",
        "/employees",
        admin,
        Some(test_data::create_employee_data(
            user_id,
            department_id,
            manager_id,
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", response);
    response["data"].clone()
}

#[tokio::test]
async fn test_department_lifecycle() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let department_id = create_department(&app, &admin, "Engineering").await;

    // 従業員も部署一覧は参照できる
    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/departments", &employee, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"].as_array().unwrap().len(), 1);

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/departments/{}", department_id),
        &admin,
        Some(json!({ "name": "Platform", "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["name"], "Platform");
    assert!(response["data"]["description"].is_null());

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "DELETE",
        &format!("/departments/{}", department_id),
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 無効化された部署は既定の一覧から外れる
    let (_, response) =
        auth_helper::send_authenticated(&app, "GET", "/departments", &admin, None).await;
    assert!(response["data"].as_array().unwrap().is_empty());

    let (_, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/departments?include_inactive=true",
        &admin,
        None,
    )
    .await;
    let departments = response["data"].as_array().unwrap();
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0]["is_active"], false);
}

#[tokio::test]
async fn test_duplicate_department_name_conflicts() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    create_department(&app, &admin, "Sales").await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/departments",
        &admin,
        Some(test_data::create_department_data("Sales")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error_type"], "conflict");
}

#[tokio::test]
async fn test_employee_cannot_write_departments() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/departments",
        &employee,
        Some(test_data::create_department_data("Marketing")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_employee_and_read_own_record() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let department_id = create_department(&app, &admin, "Support").await;

    let record = create_employee_record(&app, &admin, employee.id, Some(department_id), None).await;
    assert_eq!(record["user_id"], employee.id.to_string());
    assert_eq!(record["department_name"], "Support");
    assert_eq!(record["status"], "active");

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/employees/me", &employee, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["id"], record["id"]);

    // 一覧はマネージャー以上
    let (status, _) =
        auth_helper::send_authenticated(&app, "GET", "/employees", &employee, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_can_only_have_one_employee_record() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    create_employee_record(&app, &admin, employee.id, None, None).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/employees",
        &admin,
        Some(test_data::create_employee_data(employee.id, None, None)),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_manager_cycle_is_rejected() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let top = auth_helper::create_manager(&app, &app_state).await;
    let middle = auth_helper::create_manager(&app, &app_state).await;
    let bottom = auth_helper::create_employee(&app, &app_state).await;

    let top_record = create_employee_record(&app, &admin, top.id, None, None).await;
    let top_id = top_record["id"].as_str().unwrap().to_string();
    let middle_record = create_employee_record(
        &app,
        &admin,
        middle.id,
        None,
        Some(Uuid::parse_str(&top_id).unwrap()),
    )
    .await;
    let middle_id = middle_record["id"].as_str().unwrap().to_string();
    let bottom_record = create_employee_record(
        &app,
        &admin,
        bottom.id,
        None,
        Some(Uuid::parse_str(&middle_id).unwrap()),
    )
    .await;
    let bottom_id = bottom_record["id"].as_str().unwrap().to_string();

    // top -> bottom にすると bottom -> middle -> top -> bottom で循環する
    let (status, response) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/employees/{}", top_id),
        &admin,
        Some(json!({ "manager_id": bottom_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "validation_error");

    // 自分自身も不可
    let (status, _) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/employees/{}", middle_id),
        &admin,
        Some(json!({ "manager_id": middle_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 上長の解除は可能
    let (status, response) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/employees/{}", bottom_id),
        &admin,
        Some(json!({ "manager_id": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["data"]["manager_id"].is_null());
}

#[tokio::test]
async fn test_get_unknown_employee_returns_not_found() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        &format!("/employees/{}", Uuid::new_v4()),
        &manager,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error_type"], "not_found");
}

#[tokio::test]
async fn test_invalid_uuid_path_is_bad_request() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/employees/not-a-uuid", &manager, None)
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "bad_request");
}
