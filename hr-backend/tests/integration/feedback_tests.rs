// tests/integration/feedback_tests.rs

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{app_helper, auth_helper, test_data};

#[tokio::test]
async fn test_employee_gives_general_feedback() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let author = auth_helper::create_employee(&app, &app_state).await;
    let colleague = auth_helper::create_employee(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/feedback",
        &author,
        Some(test_data::create_feedback_data(colleague.id, "general")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["given_by"], author.id.to_string());
    assert_eq!(response["data"]["feedback_type"], "general");
    assert_eq!(response["data"]["rating"], 5);
}

#[tokio::test]
async fn test_manager_feedback_requires_manager_role() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let colleague = auth_helper::create_employee(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/feedback",
        &employee,
        Some(test_data::create_feedback_data(colleague.id, "manager")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/feedback",
        &manager,
        Some(test_data::create_feedback_data(employee.id, "manager")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_client_feedback_requires_client_name() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/feedback",
        &manager,
        Some(test_data::create_feedback_data(employee.id, "client")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "validation_error");

    let mut body = test_data::create_feedback_data(employee.id, "client");
    body["client_name"] = json!("Acme Corp");
    let (status, response) =
        auth_helper::send_authenticated(&app, "POST", "/feedback", &manager, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["client_name"], "Acme Corp");
}

#[tokio::test]
async fn test_rating_out_of_range_is_rejected() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let author = auth_helper::create_employee(&app, &app_state).await;
    let colleague = auth_helper::create_employee(&app, &app_state).await;

    let mut body = test_data::create_feedback_data(colleague.id, "general");
    body["rating"] = json!(6);

    let (status, response) =
        auth_helper::send_authenticated(&app, "POST", "/feedback", &author, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["validation_errors"]["rating"].is_array());
}

#[tokio::test]
async fn test_feedback_visibility() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let author = auth_helper::create_employee(&app, &app_state).await;
    let subject = auth_helper::create_employee(&app, &app_state).await;
    let outsider = auth_helper::create_employee(&app, &app_state).await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (_, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/feedback",
        &author,
        Some(test_data::create_feedback_data(subject.id, "general")),
    )
    .await;
    let uri = format!("/feedback/{}", response["data"]["id"].as_str().unwrap());

    for viewer in [&author, &subject, &manager] {
        let (status, _) = auth_helper::send_authenticated(&app, "GET", &uri, viewer, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = auth_helper::send_authenticated(&app, "GET", &uri, &outsider, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 一覧は自分宛てのみ
    let (_, response) =
        auth_helper::send_authenticated(&app, "GET", "/feedback", &subject, None).await;
    assert_eq!(response["data"].as_array().unwrap().len(), 1);

    let (_, response) =
        auth_helper::send_authenticated(&app, "GET", "/feedback", &outsider, None).await;
    assert!(response["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_only_author_or_admin_deletes_feedback() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let author = auth_helper::create_employee(&app, &app_state).await;
    let subject = auth_helper::create_employee(&app, &app_state).await;

    let (_, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/feedback",
        &author,
        Some(test_data::create_feedback_data(subject.id, "general")),
    )
    .await;
    let uri = format!("/feedback/{}", response["data"]["id"].as_str().unwrap());

    let (status, _) = auth_helper::send_authenticated(&app, "DELETE", &uri, &subject, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = auth_helper::send_authenticated(&app, "DELETE", &uri, &author, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = auth_helper::send_authenticated(&app, "GET", &uri, &author, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
