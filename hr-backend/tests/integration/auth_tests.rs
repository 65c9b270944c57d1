// tests/integration/auth_tests.rs

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use hr_backend::api::dto::auth_dto::SigninRequest;
use serde_json::json;
use tower::ServiceExt;

use crate::common::{app_helper, auth_helper};

#[tokio::test]
async fn test_signin_returns_token_and_cookie() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let user = app_state
        .user_service
        .create_user(auth_helper::create_test_user_data(
            hr_backend::domain::role_model::RoleName::Employee,
        ))
        .await
        .unwrap();

    let req = Request::builder()
        .uri("/auth/signin")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "identifier": user.email,
                "password": auth_helper::TEST_PASSWORD,
            })
            .to_string(),
        ))
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));

    let response = auth_helper::response_json(res).await;
    assert_eq!(response["success"], true);
    assert_eq!(response["data"]["token_type"], "Bearer");
    assert_eq!(response["data"]["user"]["id"], user.id.to_string());
    assert!(response["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signin_with_wrong_password() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let user = auth_helper::create_employee(&app, &app_state).await;

    let result = auth_helper::signin_test_user(
        &app,
        SigninRequest {
            identifier: user.username,
            password: "WrongP@ssw0rd123".to_string(),
        },
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_me_returns_effective_role() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/auth/me", &manager, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["user"]["id"], manager.id.to_string());
    assert_eq!(response["data"]["effective_role"], "manager");
}

#[tokio::test]
async fn test_me_accepts_cookie_token() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let req = Request::builder()
        .uri("/auth/me")
        .method("GET")
        .header(
            header::COOKIE,
            format!("access_token={}", employee.access_token),
        )
        .body(Body::empty())
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_without_token() {
    let (app, _app_state, _db) = app_helper::setup_full_app().await;

    let req = Request::builder()
        .uri("/auth/me")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let error = auth_helper::response_json(res).await;
    assert_eq!(error["error_type"], "unauthorized");
}

#[tokio::test]
async fn test_me_with_invalid_token() {
    let (app, _app_state, _db) = app_helper::setup_full_app().await;

    let req =
        auth_helper::create_authenticated_request("GET", "/auth/me", "invalid.jwt.token", None);
    let res = app.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
