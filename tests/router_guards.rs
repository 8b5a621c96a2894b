//! Requests rejected before any query runs: authentication, role guards,
//! body parsing and validation. The pool behind these apps never connects.

mod common;

use axum::http::StatusCode;
use common::{offline_app, send, token};
use schoolyard_models::UserRole;
use serde_json::{Value, json};
use uuid::Uuid;

fn quiz_body() -> Value {
    json!({
        "kind": "quiz",
        "title": "Fractions check",
        "targeting": {"mode": "grade_section", "grades": ["grade5"]},
        "due_at": "2026-03-10T12:00:00Z",
        "total_points": 20
    })
}

fn year_body(terms: Value) -> Value {
    json!({
        "label": "2025-2026",
        "terms": terms
    })
}

fn three_terms() -> Value {
    json!([
        {"name": "First Term", "start_month": "September", "end_month": "December"},
        {"name": "Second Term", "start_month": "January", "end_month": "March"},
        {"name": "Third Term", "start_month": "April", "end_month": "July"}
    ])
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(offline_app(), "GET", "/api/content", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let (status, _) = send(
        offline_app(),
        "GET",
        "/api/academic-years",
        Some("not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_students_cannot_publish() {
    let (status, _) = send(
        offline_app(),
        "POST",
        "/api/content",
        Some(&token(UserRole::Student)),
        Some(quiz_body()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_parents_cannot_publish() {
    let (status, _) = send(
        offline_app(),
        "POST",
        "/api/content",
        Some(&token(UserRole::Parent)),
        Some(quiz_body()),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_quiz_without_due_date_is_unprocessable() {
    let mut body = quiz_body();
    body.as_object_mut().unwrap().remove("due_at");

    let (status, body) = send(
        offline_app(),
        "POST",
        "/api/content",
        Some(&token(UserRole::Teacher)),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"].as_str().unwrap().contains("due_at"),
        "{}",
        body
    );
}

#[tokio::test]
async fn test_announcement_with_points_is_unprocessable() {
    let body = json!({
        "kind": "announcement",
        "title": "Sports day",
        "targeting": {"target_all": true},
        "total_points": 5
    });

    let (status, _) = send(
        offline_app(),
        "POST",
        "/api/content",
        Some(&token(UserRole::Admin)),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, body) = send(
        offline_app(),
        "POST",
        "/api/content",
        Some(&token(UserRole::Teacher)),
        Some(json!({"kind": "poster", "title": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_teachers_cannot_create_academic_years() {
    let (status, _) = send(
        offline_app(),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Teacher)),
        Some(year_body(three_terms())),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_overlapping_terms_are_rejected() {
    let terms = json!([
        {"name": "First Term", "start_month": "September", "end_month": "December"},
        {"name": "Second Term", "start_month": "November", "end_month": "March"}
    ]);

    let (status, body) = send(
        offline_app(),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Admin)),
        Some(year_body(terms)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"].as_str().unwrap().contains("terms 1 and 2"),
        "{}",
        body
    );
}

#[tokio::test]
async fn test_unknown_month_is_rejected() {
    let terms = json!([
        {"name": "First Term", "start_month": "Septembre", "end_month": "December"},
        {"name": "Second Term", "start_month": "January", "end_month": "July"}
    ]);

    let (status, _) = send(
        offline_app(),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Admin)),
        Some(year_body(terms)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_weights_must_sum_to_100() {
    let mut body = year_body(three_terms());
    body["weights"] = json!({"exam": 50, "quiz": 30, "assignment": 30});

    let (status, body) = send(
        offline_app(),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Admin)),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("sum to 100"));
}

#[tokio::test]
async fn test_student_directory_is_staff_only() {
    let (status, _) = send(
        offline_app(),
        "GET",
        "/api/students",
        Some(&token(UserRole::Student)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_teachers_cannot_create_students() {
    let body = json!({
        "first_name": "Tobi",
        "last_name": "Ade",
        "email": "tobi@school.test",
        "grade": "grade5",
        "section": "a"
    });

    let (status, _) = send(
        offline_app(),
        "POST",
        "/api/students",
        Some(&token(UserRole::Teacher)),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_students_submit() {
    let uri = format!("/api/content/{}/submissions", Uuid::new_v4());

    let (status, _) = send(
        offline_app(),
        "POST",
        &uri,
        Some(&token(UserRole::Teacher)),
        Some(json!({"text_response": "done"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_students_cannot_grade() {
    let uri = format!("/api/submissions/{}/grade", Uuid::new_v4());

    let (status, _) = send(
        offline_app(),
        "POST",
        &uri,
        Some(&token(UserRole::Student)),
        Some(json!({"grade": 10.0})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_negative_grade_is_unprocessable() {
    let uri = format!("/api/submissions/{}/grade", Uuid::new_v4());

    let (status, _) = send(
        offline_app(),
        "POST",
        &uri,
        Some(&token(UserRole::Teacher)),
        Some(json!({"grade": -1.0})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_multiple_choice_needs_answer_among_options() {
    let uri = format!("/api/content/{}/questions", Uuid::new_v4());
    let body = json!({
        "question_type": "multiple_choice",
        "prompt": "3 + 4 = ?",
        "options": ["6", "8"],
        "correct_answer": "7",
        "points": 10
    });

    let (status, _) = send(
        offline_app(),
        "POST",
        &uri,
        Some(&token(UserRole::Teacher)),
        Some(body),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = send(offline_app(), "GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/content/{id}/submissions"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn test_terms_out_of_order_are_rejected() {
    let terms = json!([
        {"name": "Spring Term", "start_month": "January", "end_month": "March"},
        {"name": "Autumn Term", "start_month": "September", "end_month": "December"}
    ]);

    let (status, body) = send(
        offline_app(),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Admin)),
        Some(year_body(terms)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("terms 1 and 2 are out of order"),
        "{}",
        body
    );
}
