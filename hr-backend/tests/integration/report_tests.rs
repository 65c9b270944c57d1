// tests/integration/report_tests.rs

use axum::http::StatusCode;
use hr_backend::api::dto::report_dto::ReportFilter;
use hr_backend::domain::cached_report_model::ReportKey;
use hr_backend::error::AppError;
use hr_backend::service::report_cache_service::ReportCacheService;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::{app_helper, auth_helper, db::TestDatabase, test_data};

fn weekly_report_body(week: i32) -> serde_json::Value {
    json!({
        "report_type": "weekly",
        "year": 2025,
        "week_number": week,
        "payload": {
            "records": [
                { "employee_name": "A", "average_score": 1200.0 },
                { "employee_name": "B", "average_score": 900.0 },
            ]
        }
    })
}

#[tokio::test]
async fn test_create_report_derives_label_and_summary() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(weekly_report_body(10)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{:?}", response);
    let report = &response["data"];
    assert_eq!(report["period_label"], "Week 10, 2025");
    assert_eq!(report["summary"]["total_records"], 2);
    assert_eq!(report["summary"]["average_score"], 1050.0);
    assert_eq!(report["summary"]["top_record"]["employee_name"], "A");
    assert_eq!(report["generated_by"], admin.id.to_string());
    assert_eq!(report["is_active"], true);
}

#[tokio::test]
async fn test_duplicate_report_key_is_rejected() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(weekly_report_body(10)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(weekly_report_body(10)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "validation_error");
}

#[tokio::test]
async fn test_report_key_requires_period_fields() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(json!({ "report_type": "weekly", "year": 2025 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(json!({ "report_type": "monthly", "year": 2025, "month": 13 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_report_rejects_out_of_range_year() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    for year in [0, 10000] {
        let (status, response) = auth_helper::send_authenticated(
            &app,
            "POST",
            "/reports",
            &admin,
            Some(json!({ "report_type": "monthly", "year": year, "month": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error_type"], "validation_errors");
        assert!(response["validation_errors"]["year"].is_array());
    }
}

#[tokio::test]
async fn test_archive_hides_report_until_restored() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (_, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(weekly_report_body(12)),
    )
    .await;
    let report_id = response["data"]["id"].as_str().unwrap().to_string();
    let lookup = "/reports/lookup?report_type=weekly&year=2025&week_number=12";

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", lookup, &manager, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["id"], report_id);

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/reports/{}/archive", report_id),
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["is_active"], false);

    let (_, response) = auth_helper::send_authenticated(&app, "GET", lookup, &manager, None).await;
    assert!(response["data"].is_null());

    let (_, response) =
        auth_helper::send_authenticated(&app, "GET", "/reports/latest/weekly", &manager, None)
            .await;
    assert!(response["data"].is_null());

    // 無効化済みの一覧
    let (_, response) = auth_helper::send_authenticated(
        &app,
        "GET",
        "/reports?is_active=false",
        &manager,
        None,
    )
    .await;
    assert_eq!(response["data"].as_array().unwrap().len(), 1);

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        &format!("/reports/{}/restore", report_id),
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, response) =
        auth_helper::send_authenticated(&app, "GET", "/reports/latest/weekly", &manager, None)
            .await;
    assert_eq!(response["data"]["id"], report_id);
}

#[tokio::test]
async fn test_latest_report_rejects_unknown_type() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;

    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/reports/latest/yearly", &manager, None)
            .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error_type"], "bad_request");
}

#[tokio::test]
async fn test_update_report_onto_existing_key_conflicts() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    auth_helper::send_authenticated(&app, "POST", "/reports", &admin, Some(weekly_report_body(1)))
        .await;
    let (_, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(weekly_report_body(2)),
    )
    .await;
    let second_id = response["data"]["id"].as_str().unwrap().to_string();

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/reports/{}", second_id),
        &admin,
        Some(json!({ "week_number": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error_type"], "conflict");

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "PATCH",
        &format!("/reports/{}", second_id),
        &admin,
        Some(json!({ "week_number": 3, "payload": { "records": [] } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["period_label"], "Week 3, 2025");
    assert_eq!(response["data"]["summary"]["total_records"], 0);
}

#[tokio::test]
async fn test_manager_reads_but_cannot_write_reports() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let employee = auth_helper::create_employee(&app, &app_state).await;

    let (status, _) =
        auth_helper::send_authenticated(&app, "GET", "/reports", &manager, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &manager,
        Some(weekly_report_body(5)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        auth_helper::send_authenticated(&app, "GET", "/reports", &employee, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_generate_weekly_report_aggregates_evaluations() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;
    let manager = auth_helper::create_manager(&app, &app_state).await;
    let alice = auth_helper::create_employee(&app, &app_state).await;
    let bob = auth_helper::create_employee(&app, &app_state).await;

    // 2025年第10週は 3/3(月)〜3/9(日)
    for (user, date, score) in [
        (&alice, "2025-03-03", 80),
        (&alice, "2025-03-09", 60),
        (&bob, "2025-03-05", 50),
        (&bob, "2025-03-10", 100),
    ] {
        let (status, _) = auth_helper::send_authenticated(
            &app,
            "POST",
            "/evaluations",
            &manager,
            Some(test_data::create_evaluation_data(user.id, date, score)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let body = json!({ "report_type": "weekly", "year": 2025, "week_number": 10 });
    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports/generate",
        &admin,
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{:?}", response);

    let report = &response["data"];
    let records = report["payload"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["employee_id"], alice.id.to_string());
    assert_eq!(records[0]["evaluation_count"], 2);
    assert_eq!(records[0]["average_score"], 1050.0);
    assert_eq!(records[0]["latest_score"], 900);
    assert_eq!(records[1]["employee_id"], bob.id.to_string());
    assert_eq!(records[1]["evaluation_count"], 1);
    assert_eq!(records[1]["department"], "N/A");
    assert_eq!(report["summary"]["total_records"], 2);

    // 再生成は同じ行を上書きする
    let (status, again) =
        auth_helper::send_authenticated(&app, "POST", "/reports/generate", &admin, Some(body))
            .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["data"]["id"], report["id"]);
}

#[tokio::test]
async fn test_generate_requires_scope_ids_and_valid_week() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports/generate",
        &admin,
        Some(json!({ "report_type": "manager", "year": 2025, "week_number": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 2025年に第53週は無い
    let (status, _) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports/generate",
        &admin,
        Some(json!({ "report_type": "weekly", "year": 2025, "week_number": 53 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_writes_reject_unknown_manager_or_department() {
    let (app, app_state, _db) = app_helper::setup_full_app().await;
    let admin = auth_helper::create_admin(&app, &app_state).await;

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports",
        &admin,
        Some(json!({
            "report_type": "manager",
            "year": 2025,
            "week_number": 10,
            "manager_id": Uuid::new_v4(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{:?}", response);
    assert_eq!(response["error_type"], "not_found");

    let (status, response) = auth_helper::send_authenticated(
        &app,
        "POST",
        "/reports/generate",
        &admin,
        Some(json!({
            "report_type": "department",
            "year": 2025,
            "week_number": 10,
            "department_id": Uuid::new_v4(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{:?}", response);
    assert_eq!(response["error_type"], "not_found");

    // 何も書き込まれていない
    let (status, response) =
        auth_helper::send_authenticated(&app, "GET", "/reports", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upsert_same_key_keeps_one_row_and_refreshes_timestamp() {
    crate::common::init_test_env();
    let db = TestDatabase::new().await;
    let service = ReportCacheService::new(db.connection.clone());

    let first = service
        .upsert(ReportKey::weekly(2025, 10), json!({ "records": [] }), None)
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = service
        .upsert(
            ReportKey::weekly(2025, 10),
            json!({ "records": [{ "employee_name": "A", "average_score": 700.0 }] }),
            None,
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.generated_at > first.generated_at);
    assert_eq!(second.summary().total_records, 1);

    let reports = service.list(&ReportFilter::default()).await.unwrap();
    assert_eq!(reports.len(), 1);
}

#[tokio::test]
async fn test_monthly_report_without_month_writes_nothing() {
    crate::common::init_test_env();
    let db = TestDatabase::new().await;
    let service = ReportCacheService::new(db.connection.clone());

    let mut key = ReportKey::monthly(2025, 1);
    key.month = None;

    let result = service.create(key, json!({ "records": [] }), None).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    let reports = service
        .list(&ReportFilter {
            is_active: None,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(reports.is_empty());
}

#[tokio::test]
#[ignore = "requires docker for the PostgreSQL container"]
async fn test_concurrent_report_creation_leaves_single_row() {
    crate::common::init_test_env();
    let db = TestDatabase::postgres().await;
    let service = Arc::new(ReportCacheService::new(db.connection.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create(ReportKey::weekly(2025, 20), json!({ "records": [] }), None)
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::ValidationError(_)) | Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(created, 1);

    // upsert の並行実行も 1 行に収束する
    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .upsert(
                    ReportKey::weekly(2025, 21),
                    json!({ "records": [{ "average_score": i }] }),
                    None,
                )
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
}
