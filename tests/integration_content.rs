#![cfg(feature = "integration")]

mod common;

use axum::http::StatusCode;
use common::{create_user, send, test_app, token_for};
use schoolyard_models::UserRole;
use schoolyard_models::ids::UserId;
use serde_json::{Value, json};
use sqlx::PgPool;

struct School {
    teacher: UserId,
    grade5_a: Vec<UserId>,
    grade5_b: Vec<UserId>,
    grade6_a: Vec<UserId>,
}

async fn seed_school(pool: &PgPool) -> School {
    let teacher = create_user(pool, UserRole::Teacher, None, None).await;
    let mut school = School {
        teacher,
        grade5_a: Vec::new(),
        grade5_b: Vec::new(),
        grade6_a: Vec::new(),
    };
    for _ in 0..3 {
        school
            .grade5_a
            .push(create_user(pool, UserRole::Student, Some("grade5"), Some("a")).await);
        school
            .grade5_b
            .push(create_user(pool, UserRole::Student, Some("grade5"), Some("b")).await);
        school
            .grade6_a
            .push(create_user(pool, UserRole::Student, Some("grade6"), Some("a")).await);
    }
    school
}

async fn publish(pool: &PgPool, teacher: UserId, targeting: Value) -> (StatusCode, Value) {
    send(
        test_app(pool.clone()),
        "POST",
        "/api/content",
        Some(&token_for(teacher, UserRole::Teacher)),
        Some(json!({
            "kind": "announcement",
            "title": "Field trip",
            "body": "Bring a packed lunch.",
            "targeting": targeting
        })),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_targeting_reaches_every_section(pool: PgPool) {
    let school = seed_school(&pool).await;

    let (status, body) = publish(
        &pool,
        school.teacher,
        json!({"mode": "grade_section", "grades": ["grade5"]}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["recipient_count"], 6);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_and_section_intersect(pool: PgPool) {
    let school = seed_school(&pool).await;

    let (_, body) = publish(
        &pool,
        school.teacher,
        json!({"target_all": false, "grades": ["grade5"], "sections": ["a"]}),
    )
    .await;

    assert_eq!(body["recipient_count"], 3);

    let (_, recipients) = send(
        test_app(pool.clone()),
        "GET",
        &format!("/api/content/{}/recipients", body["id"].as_str().unwrap()),
        Some(&token_for(school.teacher, UserRole::Teacher)),
        None,
    )
    .await;
    let mut expected: Vec<String> = school.grade5_a.iter().map(|id| id.to_string()).collect();
    expected.sort();
    let actual: Vec<String> = recipients["student_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(actual, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_all_students_skips_staff(pool: PgPool) {
    let school = seed_school(&pool).await;
    create_user(&pool, UserRole::Parent, None, None).await;

    let (_, body) = publish(&pool, school.teacher, json!({"mode": "all_students"})).await;

    assert_eq!(body["recipient_count"], 9);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_audience_is_rejected(pool: PgPool) {
    let school = seed_school(&pool).await;

    let (status, _) = publish(
        &pool,
        school.teacher,
        json!({"mode": "grade_section", "grades": ["grade9"]}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_specific_students_must_be_students(pool: PgPool) {
    let school = seed_school(&pool).await;

    let (status, body) = publish(
        &pool,
        school.teacher,
        json!({"student_ids": [school.grade6_a[0], school.teacher]}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains(&school.teacher.to_string())
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_students_only_see_what_they_received(pool: PgPool) {
    let school = seed_school(&pool).await;
    let (_, body) = publish(
        &pool,
        school.teacher,
        json!({"student_ids": [school.grade5_b[1]]}),
    )
    .await;
    let uri = format!("/api/content/{}", body["id"].as_str().unwrap());

    let (status, _) = send(
        test_app(pool.clone()),
        "GET",
        &uri,
        Some(&token_for(school.grade5_b[1], UserRole::Student)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        test_app(pool.clone()),
        "GET",
        &uri,
        Some(&token_for(school.grade5_b[0], UserRole::Student)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, mine) = send(
        test_app(pool.clone()),
        "GET",
        "/api/content/mine",
        Some(&token_for(school.grade5_b[1], UserRole::Student)),
        None,
    )
    .await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
    assert_eq!(mine["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recipients_fixed_at_publish_time(pool: PgPool) {
    let school = seed_school(&pool).await;
    let (_, body) = publish(
        &pool,
        school.teacher,
        json!({"mode": "grade_section", "grades": ["grade6"]}),
    )
    .await;

    let late_joiner = create_user(&pool, UserRole::Student, Some("grade6"), Some("a")).await;

    let (status, _) = send(
        test_app(pool.clone()),
        "GET",
        &format!("/api/content/{}", body["id"].as_str().unwrap()),
        Some(&token_for(late_joiner, UserRole::Student)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
