// tests/integration/permission_tests.rs

use axum::http::StatusCode;
use hr_backend::api::dto::auth_dto::SigninRequest;
use hr_backend::domain::role_model::RoleName;
use serde_json::json;
use uuid::Uuid;

use crate::common::{app_helper, auth_helper};

#[tokio::test]
async fn test_employee_is_denied_admin_and_manager_routes() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let id = Uuid::new_v4();

    let denied = [
        ("GET", "/users".to_string()),
        ("GET", "/employees".to_string()),
        ("DELETE", format!("/employees/{}", id)),
        ("PATCH", format!("/departments/{}", id)),
        ("GET", "/evaluations/summary".to_string()),
        ("DELETE", format!("/evaluations/{}", id)),
        ("GET", format!("/reports/{}", id)),
        ("POST", format!("/reports/{}/archive", id)),
        ("POST", "/notifications".to_string()),
    ];

    for (method, uri) in denied {
        let (status, response) =
            auth_helper::send_authenticated(&app, method, &uri, &employee, Some(json!({})))
                .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(response["error_type"], "forbidden");
    }
}

#[tokio::test]
async fn test_superuser_acts_as_admin() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;

    let mut request = auth_helper::create_test_user_data(RoleName::Employee);
    request.is_superuser = true;
    let user = app_state.user_service.create_user(request).await.unwrap();
    let superuser = auth_helper::signin_test_user(
        &app,
        SigninRequest {
            identifier: user.username,
            password: auth_helper::TEST_PASSWORD.to_string(),
        },
    )
    .await
    .unwrap();

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/auth/me", &superuser, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["effective_role"], "admin");

    let (status, _) =
        auth_helper::send_authenticated(&app, "GET", "/users", &superuser, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_initial_admin_is_created_once() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;

    let password_hash = hr_backend::utils::password::PasswordManager::from_env()
        .unwrap()
        .hash_password(auth_helper::TEST_PASSWORD)
        .unwrap();
    let admin_config = hr_backend::config::InitialAdminConfig {
        username: "root_admin".to_string(),
        email: "root@example.com".to_string(),
        password_hash,
    };

    let created = app_state
        .user_service
        .ensure_initial_admin(&admin_config)
        .await
        .unwrap();
    assert!(created.is_some());

    let again = app_state
        .user_service
        .ensure_initial_admin(&admin_config)
        .await
        .unwrap();
    assert!(again.is_none());

    let admin = auth_helper::signin_test_user(
        &app,
        SigninRequest {
            identifier: "root_admin".to_string(),
            password: auth_helper::TEST_PASSWORD.to_string(),
        },
    )
    .await
    .unwrap();

    let (status, _) = auth_helper::send_authenticated(&app, "GET", "/users", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
}
