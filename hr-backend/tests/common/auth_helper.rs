// tests/common/auth_helper.rs

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use hr_backend::api::dto::auth_dto::SigninRequest;
use hr_backend::api::dto::user_dto::CreateUserRequest;
use hr_backend::api::AppState;
use hr_backend::domain::role_model::RoleName;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "MyUniqueP@ssw0rd91";

/// テスト用のユーザー情報
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub access_token: String,
}

/// ロールを指定したユーザー作成リクエスト
pub fn create_test_user_data(role: RoleName) -> CreateUserRequest {
    let suffix = &Uuid::new_v4().to_string()[..8];
    CreateUserRequest {
        username: format!("{}_{}", role.as_str(), suffix),
        email: format!("{}{}@example.com", role.as_str(), suffix),
        password: TEST_PASSWORD.to_string(),
        first_name: "Test".to_string(),
        last_name: role.as_str().to_string(),
        role,
        is_superuser: false,
    }
}

/// サービス経由でユーザーを作り、HTTP でログインしてトークンを得る
pub async fn create_user_with_role(app: &Router, app_state: &AppState, role: RoleName) -> TestUser {
    let user = app_state
        .user_service
        .create_user(create_test_user_data(role))
        .await
        .unwrap();

    signin_test_user(
        app,
        SigninRequest {
            identifier: user.username.clone(),
            password: TEST_PASSWORD.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_admin(app: &Router, app_state: &AppState) -> TestUser {
    create_user_with_role(app, app_state, RoleName::Admin).await
}

pub async fn create_manager(app: &Router, app_state: &AppState) -> TestUser {
    create_user_with_role(app, app_state, RoleName::Manager).await
}

pub async fn create_employee(app: &Router, app_state: &AppState) -> TestUser {
    create_user_with_role(app, app_state, RoleName::Employee).await
}

/// ユーザーログインを実行し、認証情報を返す
pub async fn signin_test_user(
    app: &Router,
    signin_data: SigninRequest,
) -> Result<TestUser, String> {
    let req = Request::builder()
        .uri("/auth/signin")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&signin_data).unwrap()))
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();

    if res.status() != StatusCode::OK {
        let error = response_json(res).await;
        return Err(format!("Signin failed: {:?}", error));
    }

    let response = response_json(res).await;
    let data = &response["data"];

    Ok(TestUser {
        id: Uuid::parse_str(data["user"]["id"].as_str().unwrap()).unwrap(),
        email: data["user"]["email"].as_str().unwrap().to_string(),
        username: data["user"]["username"].as_str().unwrap().to_string(),
        access_token: data["access_token"].as_str().unwrap().to_string(),
    })
}

/// 認証付きのHTTPリクエストを作成するヘルパー
pub fn create_authenticated_request(
    method: &str,
    uri: &str,
    access_token: &str,
    body: Option<String>,
) -> Request<Body> {
    let request_builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("Authorization", format!("Bearer {}", access_token))
        .header("Content-Type", "application/json");

    match body {
        Some(body_content) => request_builder.body(Body::from(body_content)).unwrap(),
        None => request_builder.body(Body::empty()).unwrap(),
    }
}

/// 認証付きリクエストを送ってステータスと JSON を返す
pub async fn send_authenticated(
    app: &Router,
    method: &str,
    uri: &str,
    user: &TestUser,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let req = create_authenticated_request(
        method,
        uri,
        &user.access_token,
        body.map(|value| value.to_string()),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, response_json(res).await)
}

pub async fn response_json(res: Response) -> Value {
    let body = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&body).unwrap()
}
