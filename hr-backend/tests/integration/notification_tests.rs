// tests/integration/notification_tests.rs

use axum::http::StatusCode;
use axum::Router;
use uuid::Uuid;

use crate::common::{app_helper, auth_helper, auth_helper::TestUser, test_data};

async fn notify(app: &Router, sender: &TestUser, recipient: &TestUser) -> String {
    let (status, response) = auth_helper::send_authenticated(
        app,
        "POST",
        "/notifications",
        sender,
        Some(test_data::create_notification_data(recipient.id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", response);
    response["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_read_with_retain_marks_notification_read() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let id = notify(&app, &manager, &employee).await;
    notify(&app, &manager, &employee).await;

    let (_, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/notifications/unread-count",
        &employee,
        None,
    )
    .await;
    assert_eq!(response["data"]["unread_count"], 2);

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/notifications/{}/read", id),
        &employee,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["state"], "retained");
    assert_eq!(response["data"]["notification"]["is_read"], true);
    assert!(response["data"]["notification"]["read_at"].is_string());

    // 再度の既読は状態を変えない
    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/notifications/{}/read?policy=retain", id),
        &employee,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["state"], "retained");

    let (_, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/notifications?unread_only=true",
        &employee,
        None,
    )
    .await;
    assert_eq!(response["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_read_with_delete_policy_removes_notification() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let id = notify(&app, &admin, &employee).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/notifications/{}/read?policy=delete", id),
        &employee,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["state"], "deleted");
    assert!(response["data"]["notification"].is_null());

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/notifications/{}/read", id),
        &employee,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, response) =
        auth_helper::send_authenticated(&app, "GET", "/notifications", &employee, None).await;
    assert!(response["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_notifications_are_not_found() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let recipient = auth_helper::create_employee(&app, &app_state).await;
    let other = auth_helper::create_employee(&app, &app_state).await;
    let id = notify(&app, &manager, &recipient).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/notifications/{}/read", id),
        &other,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "DELETE",
        &format!("/notifications/{}", id),
        &other,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "DELETE",
        &format!("/notifications/{}", id),
        &recipient,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_employee_cannot_send_notifications() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let colleague = auth_helper::create_employee(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/notifications",
        &employee,
        Some(test_data::create_notification_data(colleague.id)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_notification_for_unknown_recipient() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/notifications",
        &manager,
        Some(test_data::create_notification_data(Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
