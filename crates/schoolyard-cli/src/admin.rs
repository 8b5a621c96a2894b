//! One-off administrative writes: accounts and academic years.

use anyhow::{Context, anyhow, bail};
use schoolyard_db::next_counter_value;
use schoolyard_models::ids::{AcademicYearId, TermId, UserId};
use schoolyard_models::students::{STUDENT_NUMBER_COUNTER, format_student_number};
use schoolyard_models::{AssessmentWeights, UserRole};
use sqlx::PgPool;

/// Three-term layout used for years created from the CLI.
pub const DEFAULT_TERMS: [(&str, &str, &str); 3] = [
    ("First Term", "September", "December"),
    ("Second Term", "January", "March"),
    ("Third Term", "April", "July"),
];

/// Creates an account. Students get the next student number.
pub async fn create_user(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    role: UserRole,
) -> anyhow::Result<UserId> {
    let mut tx = db.begin().await?;

    let student_number = if role == UserRole::Student {
        let value = next_counter_value(&mut *tx, STUDENT_NUMBER_COUNTER).await?;
        Some(format_student_number(value))
    } else {
        None
    };

    let user_id = sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users (id, first_name, last_name, email, role, student_number)
           VALUES ($1, $2, $3, $4, $5, $6)
           ON CONFLICT (email) DO NOTHING
           RETURNING id"#,
    )
    .bind(UserId::new())
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(role)
    .bind(&student_number)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(user_id) = user_id else {
        tx.rollback().await?;
        bail!("A user with email {} already exists", email);
    };

    tx.commit().await?;
    Ok(user_id)
}

/// Looks up the id and role a token should carry.
pub async fn find_user_by_email(db: &PgPool, email: &str) -> anyhow::Result<(UserId, UserRole)> {
    sqlx::query_as::<_, (UserId, UserRole)>("SELECT id, role FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| anyhow!("No user with email {}", email))
}

/// Checks a `"YYYY-YYYY"` label naming two consecutive years.
pub fn check_label(label: &str) -> anyhow::Result<()> {
    let (first, second) = label
        .split_once('-')
        .ok_or_else(|| anyhow!("Label must look like 2025-2026"))?;
    if first.len() != 4 || second.len() != 4 {
        bail!("Label must look like 2025-2026");
    }
    let first: i32 = first.parse().context("Label must look like 2025-2026")?;
    let second: i32 = second.parse().context("Label must look like 2025-2026")?;
    if second != first + 1 {
        bail!("{} must be followed by {}", first, first + 1);
    }
    Ok(())
}

/// Creates an academic year with [`DEFAULT_TERMS`] and default weights.
pub async fn create_academic_year(
    db: &PgPool,
    label: &str,
    make_current: bool,
) -> anyhow::Result<AcademicYearId> {
    check_label(label)?;
    let weights = AssessmentWeights::default();
    let year_id = AcademicYearId::new();

    let mut tx = db.begin().await?;

    if make_current {
        sqlx::query("UPDATE academic_years SET is_current = FALSE WHERE is_current")
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        r#"INSERT INTO academic_years (id, label, is_current, exam_weight, quiz_weight, assignment_weight)
           VALUES ($1, $2, $3, $4, $5, $6)"#,
    )
    .bind(year_id)
    .bind(label)
    .bind(make_current)
    .bind(weights.exam)
    .bind(weights.quiz)
    .bind(weights.assignment)
    .execute(&mut *tx)
    .await
    .with_context(|| format!("Could not create academic year {}", label))?;

    for (idx, (name, start_month, end_month)) in DEFAULT_TERMS.iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO terms (id, academic_year_id, number, name, start_month, end_month)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(TermId::new())
        .bind(year_id)
        .bind(idx as i32 + 1)
        .bind(name)
        .bind(start_month)
        .bind(end_month)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(year_id)
}
