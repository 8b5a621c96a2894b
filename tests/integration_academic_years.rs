#![cfg(feature = "integration")]

mod common;

use axum::http::StatusCode;
use common::{send, test_app, token};
use schoolyard_models::UserRole;
use serde_json::{Value, json};
use sqlx::PgPool;

fn year_body(label: &str, is_current: bool) -> Value {
    json!({
        "label": label,
        "is_current": is_current,
        "terms": [
            {"name": "First Term", "start_month": "September", "end_month": "December"},
            {"name": "Second Term", "start_month": "January", "end_month": "March"},
            {"name": "Third Term", "start_month": "April", "end_month": "July"}
        ]
    })
}

async fn create_year(pool: &PgPool, label: &str, is_current: bool) -> Value {
    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Admin)),
        Some(year_body(label, is_current)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_resolves_term_dates(pool: PgPool) {
    let body = create_year(&pool, "2025-2026", true).await;

    assert_eq!(body["label"], "2025-2026");
    assert_eq!(body["exam_weight"], 60);
    assert_eq!(body["terms"][0]["start_date"], "2025-09-01");
    assert_eq!(body["terms"][0]["end_date"], "2025-12-31");
    assert_eq!(body["terms"][1]["start_date"], "2026-01-01");
    assert_eq!(body["terms"][1]["end_date"], "2026-03-31");
    assert_eq!(body["terms"][2]["end_date"], "2026-07-31");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_label_conflicts(pool: PgPool) {
    create_year(&pool, "2025-2026", false).await;

    let (status, _) = send(
        test_app(pool.clone()),
        "POST",
        "/api/academic-years",
        Some(&token(UserRole::Admin)),
        Some(year_body("2025-2026", false)),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_current_term_follows_the_clock(pool: PgPool) {
    create_year(&pool, "2025-2026", true).await;

    let (status, body) = send(
        test_app(pool.clone()),
        "GET",
        "/api/academic-years/current",
        Some(&token(UserRole::Parent)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["current_term"], 2);
    assert_eq!(body["current_term_range"]["name"], "Second Term");
    let progress = body["term_progress_percent"].as_u64().unwrap();
    assert!(progress > 0 && progress < 50, "{}", progress);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_override_wins_until_cleared(pool: PgPool) {
    let year = create_year(&pool, "2025-2026", true).await;
    let id = year["id"].as_str().unwrap();
    let admin = token(UserRole::Admin);

    let (status, body) = send(
        test_app(pool.clone()),
        "PATCH",
        &format!("/api/academic-years/{}", id),
        Some(&admin),
        Some(json!({"current_term_override": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["current_term_override"], 3);

    let (_, current) = send(
        test_app(pool.clone()),
        "GET",
        "/api/academic-years/current",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(current["current_term"], 3);

    let (status, _) = send(
        test_app(pool.clone()),
        "PATCH",
        &format!("/api/academic-years/{}", id),
        Some(&admin),
        Some(json!({"current_term_override": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        test_app(pool.clone()),
        "PATCH",
        &format!("/api/academic-years/{}", id),
        Some(&admin),
        Some(json!({"clear_current_term_override": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["current_term_override"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_replacing_terms_drops_stale_override(pool: PgPool) {
    let year = create_year(&pool, "2025-2026", true).await;
    let id = year["id"].as_str().unwrap();
    let admin = token(UserRole::Admin);

    send(
        test_app(pool.clone()),
        "PATCH",
        &format!("/api/academic-years/{}", id),
        Some(&admin),
        Some(json!({"current_term_override": 3})),
    )
    .await;

    let (status, terms) = send(
        test_app(pool.clone()),
        "PUT",
        &format!("/api/academic-years/{}/terms", id),
        Some(&admin),
        Some(json!({"terms": [
            {"name": "Autumn", "start_month": "September", "end_month": "January"},
            {"name": "Spring", "start_month": "February", "end_month": "June"}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", terms);
    assert_eq!(terms.as_array().unwrap().len(), 2);
    assert_eq!(terms[0]["end_date"], "2026-01-31");

    let (_, body) = send(
        test_app(pool.clone()),
        "GET",
        &format!("/api/academic-years/{}", id),
        Some(&admin),
        None,
    )
    .await;
    assert!(body["current_term_override"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_one_current_year(pool: PgPool) {
    let old = create_year(&pool, "2024-2025", true).await;
    let new = create_year(&pool, "2025-2026", false).await;

    let (status, body) = send(
        test_app(pool.clone()),
        "POST",
        &format!("/api/academic-years/{}/set-current", new["id"].as_str().unwrap()),
        Some(&token(UserRole::Admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_current"], true);

    let (_, old) = send(
        test_app(pool.clone()),
        "GET",
        &format!("/api/academic-years/{}", old["id"].as_str().unwrap()),
        Some(&token(UserRole::Teacher)),
        None,
    )
    .await;
    assert_eq!(old["is_current"], false);
}
