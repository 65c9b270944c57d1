// tests/integration/evaluation_tests.rs

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{app_helper, auth_helper, auth_helper::TestUser, test_data};

async fn record_evaluation(
    app: &Router,
    recorder: &TestUser,
    employee_id: Uuid,
    review_date: &str,
    score: i32,
) -> Value {
    let (status, response) = auth_helper::send_authenticated(
        app,
        "POST",
        "/evaluations",
        recorder,
        Some(test_data::create_evaluation_data(
            employee_id,
            review_date,
            score,
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", response);
    response["data"].clone()
}

#[tokio::test]
async fn test_manager_records_evaluation_with_computed_total() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let evaluation = record_evaluation(&app, &manager, employee.id, "2025-03-04", 80).await;

    assert_eq!(evaluation["total_score"], 80 * 15);
    assert_eq!(evaluation["employee_id"], employee.id.to_string());
    // 上長の省略時は登録者
    assert_eq!(evaluation["manager_id"], manager.id.to_string());
    assert_eq!(evaluation["communication_skills"], 80);
}

#[tokio::test]
async fn test_missing_metrics_default_to_zero() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/evaluations",
        &manager,
        Some(json!({
            "employee_id": employee.id,
            "review_date": "2025-03-04",
            "punctuality": 90,
            "attitude": 70,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["total_score"], 160);
    assert_eq!(response["data"]["creativity"], 0);
}

#[tokio::test]
async fn test_out_of_range_metric_is_rejected() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let mut body = test_data::create_evaluation_data(employee.id, "2025-03-04", 50);
    body["creativity"] = json!(150);
    body["punctuality"] = json!(-1);

    let (status, response) =
        auth_helper::send_authenticated(&app, "POST", "/evaluations", &manager, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "validation_errors");
    assert!(response["validation_errors"]["creativity"].is_array());
    assert!(response["validation_errors"]["punctuality"].is_array());
}

#[tokio::test]
async fn test_duplicate_evaluation_is_rejected() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    record_evaluation(&app, &manager, employee.id, "2025-03-04", 60).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/evaluations",
        &manager,
        Some(test_data::create_evaluation_data(
            employee.id,
            "2025-03-04",
            70,
        )),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "validation_error");
}

#[tokio::test]
async fn test_evaluation_for_unknown_user_is_not_found() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/evaluations",
        &manager,
        Some(test_data::create_evaluation_data(
            Uuid::new_v4(),
            "2025-03-04",
            70,
        )),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_recomputes_total() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let evaluation = record_evaluation(&app, &manager, employee.id, "2025-03-04", 50).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/evaluations/{}", evaluation["id"].as_str().unwrap()),
        &manager,
        Some(json!({ "creativity": 100, "remarks": "Improved a lot" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["creativity"], 100);
    assert_eq!(response["data"]["total_score"], 50 * 14 + 100);
    assert_eq!(response["data"]["remarks"], "Improved a lot");
}

#[tokio::test]
async fn test_client_supplied_total_score_is_ignored() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let mut body = test_data::create_evaluation_data(employee.id, "2025-03-04", 70);
    body["total_score"] = json!(9999);

    let (status, created) =
        auth_helper::send_authenticated(&app, "POST", "/evaluations", &manager, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{:?}", created);
    assert_eq!(created["data"]["total_score"], 70 * 15);

    let path = format!("/evaluations/{}", created["data"]["id"].as_str().unwrap());
    let (status, updated) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &path,
        &manager,
        Some(json!({ "total_score": 9999, "attitude": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", updated);
    assert_eq!(updated["data"]["total_score"], 70 * 14 + 100);

    // 保存値も指標の合計のまま
    let (status, stored) =
        auth_helper::send_authenticated(&app, "GET", &path, &manager, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["data"]["total_score"], 70 * 14 + 100);
}

#[tokio::test]
async fn test_employee_sees_only_own_evaluations() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let alice = auth_helper::create_employee(&app, &app_state).await;
    let bob = auth_helper::create_employee(&app, &app_state).await;

    record_evaluation(&app, &manager, alice.id, "2025-03-04", 70).await;
    let bobs = record_evaluation(&app, &manager, bob.id, "2025-03-04", 60).await;

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/evaluations", &alice, None).await;
    assert_eq!(status, StatusCode::OK);
    let evaluations = response["data"].as_array().unwrap();
    assert_eq!(evaluations.len(), 1);
    assert_eq!(evaluations[0]["employee_id"], alice.id.to_string());

    // 他人の employee_id を指定しても自分の分だけ
    let (_, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        &format!("/evaluations?employee_id={}", bob.id),
        &alice,
        None,
    )
    .await;
    let evaluations = response["data"].as_array().unwrap();
    assert!(evaluations
        .iter()
        .all(|evaluation| evaluation["employee_id"] == alice.id.to_string()));

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "GET",
        &format!("/evaluations/{}", bobs["id"].as_str().unwrap()),
        &alice,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_employee_cannot_record_evaluation() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/evaluations",
        &employee,
        Some(test_data::create_evaluation_data(
            employee.id,
            "2025-03-04",
            100,
        )),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_admin_deletes_evaluations() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;
    let evaluation = record_evaluation(&app, &manager, employee.id, "2025-03-04", 40).await;
    let uri = format!("/evaluations/{}", evaluation["id"].as_str().unwrap());

    let (status, _) = auth_helper::send_authenticated(&app, "DELETE", &uri, &manager, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = auth_helper::send_authenticated(&app, "DELETE", &uri, &admin, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = auth_helper::send_authenticated(&app, "DELETE", &uri, &admin, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_performance_summary_uses_latest_evaluations() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let strong = auth_helper::create_employee(&app, &app_state).await;
    let average = auth_helper::create_employee(&app, &app_state).await;
    let weak = auth_helper::create_employee(&app, &app_state).await;

    // 古い高得点は最新の評価で置き換わる
    record_evaluation(&app, &manager, weak.id, "2025-01-10", 100).await;
    record_evaluation(&app, &manager, weak.id, "2025-03-10", 20).await;
    record_evaluation(&app, &manager, strong.id, "2025-03-10", 90).await;
    record_evaluation(&app, &manager, average.id, "2025-03-10", 60).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/evaluations/summary?top_n=1&bottom_n=1",
        &manager,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let top = response["data"]["top_performers"].as_array().unwrap();
    let bottom = response["data"]["weak_performers"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(bottom.len(), 1);
    assert_eq!(top[0]["employee_id"], strong.id.to_string());
    assert_eq!(top[0]["total_score"], 90 * 15);
    assert_eq!(top[0]["department"], "N/A");
    assert_eq!(bottom[0]["employee_id"], weak.id.to_string());
    assert_eq!(bottom[0]["total_score"], 20 * 15);
}

#[tokio::test]
async fn test_performance_summary_validates_counts() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/evaluations/summary?top_n=0",
        &manager,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        auth_helper::send_authenticated(&app, "GET", "/evaluations/summary", &employee, None)
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
