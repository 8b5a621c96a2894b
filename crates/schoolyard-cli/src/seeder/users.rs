//! User seeding.
//!
//! Generates fake staff and students in parallel and inserts them in
//! batched multi-row `INSERT`s.

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use schoolyard_db::reserve_counter_block;
use schoolyard_models::UserRole;
use schoolyard_models::ids::UserId;
use schoolyard_models::students::{STUDENT_NUMBER_COUNTER, format_student_number};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::UserSeed;

/// Seeded accounts share this domain so they can be cleared again.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

// 8 params per user
const BATCH_SIZE: usize = 800;

/// Generates `count` students numbered from `first_number`.
///
/// Students are spread over `grades` round robin and, within a grade, over
/// `sections`. An empty list leaves that column unset.
pub fn generate_students(
    count: usize,
    first_number: i64,
    grades: &[String],
    sections: &[String],
) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let grade = (!grades.is_empty()).then(|| grades[idx % grades.len()].clone());
            let section = (!sections.is_empty())
                .then(|| sections[(idx / grades.len().max(1)) % sections.len()].clone());

            UserSeed {
                student_number: Some(format_student_number(first_number + idx as i64)),
                grade,
                section,
                ..generate_user(UserRole::Student, idx)
            }
        })
        .collect()
}

/// Generates admin and teacher accounts.
pub fn generate_staff(admins: usize, teachers: usize) -> Vec<UserSeed> {
    let admins = (0..admins)
        .into_par_iter()
        .map(|idx| generate_user(UserRole::Admin, idx));
    let teachers = (0..teachers)
        .into_par_iter()
        .map(|idx| generate_user(UserRole::Teacher, idx));
    admins.chain(teachers).collect()
}

fn generate_user(role: UserRole, idx: usize) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role.as_str(),
        idx,
        SEED_EMAIL_DOMAIN
    );

    UserSeed {
        first_name,
        last_name,
        email,
        role,
        student_number: None,
        grade: None,
        section: None,
    }
}

/// Seeds students, drawing their numbers from the shared counter.
pub async fn seed_students(
    db: &PgPool,
    count: usize,
    grades: &[String],
    sections: &[String],
) -> anyhow::Result<Vec<UserId>> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students across {} grades and {} sections...",
        count,
        grades.len(),
        sections.len()
    );

    let mut tx = db.begin().await?;
    let first_number = reserve_counter_block(&mut *tx, STUDENT_NUMBER_COUNTER, count as i64).await?;
    let users = generate_students(count, first_number, grades, sections);
    let ids = insert_users(&mut tx, &users).await?;
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Seeds admins and teachers.
pub async fn seed_staff(db: &PgPool, admins: usize, teachers: usize) -> anyhow::Result<Vec<UserId>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} admins and {} teachers...", admins, teachers);

    let users = generate_staff(admins, teachers);
    let mut tx = db.begin().await?;
    let ids = insert_users(&mut tx, &users).await?;
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} staff users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

async fn insert_users(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> anyhow::Result<Vec<UserId>> {
    let mut ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        ids.extend(insert_users_chunk(tx, chunk).await?);
    }
    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> anyhow::Result<Vec<UserId>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (id, first_name, last_name, email, role, student_number, grade, section) VALUES ",
    );

    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 8;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7,
            p + 8
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(UserId::new())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(user.role)
            .bind(&user.student_number)
            .bind(&user.grade)
            .bind(&user.section);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes seeded accounts that never authored content.
pub async fn clear_users(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query(
        r#"DELETE FROM users u
           WHERE u.email LIKE ('%@' || $1)
             AND NOT EXISTS (SELECT 1 FROM content_items c WHERE c.created_by = u.id)
             AND NOT EXISTS (SELECT 1 FROM submissions s WHERE s.graded_by = u.id)"#,
    )
    .bind(SEED_EMAIL_DOMAIN)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
