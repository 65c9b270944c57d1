// tests/integration/system_tests.rs

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use crate::common::{app_helper, auth_helper};

#[tokio::test]
async fn test_health_check_is_public() {
    let (app, _app_state, _db) = app_helper::setup_full_app().await;

    let req = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());

    let response = auth_helper::response_json(res).await;
    assert_eq!(response["data"]["status"], "ok");
    assert_eq!(response["data"]["database"], "connected");
    assert_eq!(response["data"]["environment"], "test");
}
