// tests/integration/user_tests.rs

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{app_helper, auth_helper};

#[tokio::test]
async fn test_admin_creates_user() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/users",
        &admin,
        Some(json!({
            "username": "new_manager",
            "email": "new.manager@example.com",
            "password": auth_helper::TEST_PASSWORD,
            "first_name": "New",
            "last_name": "Manager",
            "role": "manager",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["username"], "new_manager");
    assert_eq!(response["data"]["role"], "manager");
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let body = json!({
        "username": "duplicated",
        "email": "first@example.com",
        "password": auth_helper::TEST_PASSWORD,
    });
    let (status, _) =
        auth_helper::send_authenticated(&app, "POST", "/users", &admin, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/users",
        &admin,
        Some(json!({
            "username": "duplicated",
            "email": "second@example.com",
            "password": auth_helper::TEST_PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error_type"], "conflict");
}

#[tokio::test]
async fn test_list_users_filters_by_role() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    auth_helper::create_employee(&app, &app_state).await;
    auth_helper::create_employee(&app, &app_state).await;
    auth_helper::create_manager(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/users?role=employee&page=1&per_page=10",
        &admin,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let users = response["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|user| user["role"] == "employee"));
    assert_eq!(response["meta"]["pagination"]["total_items"], 2);
}

#[tokio::test]
async fn test_manager_cannot_manage_users() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/users", &manager, None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error_type"], "forbidden");
}
