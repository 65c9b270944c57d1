// tests/common/test_data.rs

use hr_backend::domain::performance_metrics::METRIC_NAMES;
use serde_json::{json, Map, Value};
use uuid::Uuid;

pub fn create_department_data(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} department", name),
    })
}

pub fn create_employee_data(
    user_id: Uuid,
    department_id: Option<Uuid>,
    manager_id: Option<Uuid>,
) -> Value {
    json!({
        "user_id": user_id,
        "department_id": department_id,
        "manager_id": manager_id,
        "designation": "Engineer",
        "joining_date": "2024-04-01",
    })
}

/// 全指標を同じ点数にした評価
pub fn create_evaluation_data(employee_id: Uuid, review_date: &str, score: i32) -> Value {
    let mut body = Map::new();
    body.insert("employee_id".to_string(), json!(employee_id));
    body.insert("review_date".to_string(), json!(review_date));
    body.insert("evaluation_period".to_string(), json!("Q1"));
    for name in METRIC_NAMES {
        body.insert(name.to_string(), json!(score));
    }
    Value::Object(body)
}

pub fn create_feedback_data(employee_id: Uuid, feedback_type: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "feedback_type": feedback_type,
        "content": "Great work on the release",
        "rating": 5,
    })
}

pub fn create_notification_data(recipient_id: Uuid) -> Value {
    json!({
        "recipient_id": recipient_id,
        "title": "Review scheduled",
        "message": "Your quarterly review is next week",
    })
}
