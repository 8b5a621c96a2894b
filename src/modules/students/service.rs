use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use schoolyard_core::{AppError, PaginationMeta};
use schoolyard_db::next_counter_value;
use schoolyard_models::ids::UserId;
use schoolyard_models::students::{STUDENT_NUMBER_COUNTER, format_student_number};

use crate::metrics::track_students_created;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, Student, StudentFilterParams, UpdateStudentDto,
};

fn email_taken(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow!("A user with this email already exists"));
    }
    AppError::database(err)
}

pub struct StudentService;

impl StudentService {
    /// Create a student and assign the next student number.
    ///
    /// The number is drawn inside the insert transaction, so a failed insert
    /// does not burn a number.
    #[instrument(skip(db))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let number = next_counter_value(&mut *tx, STUDENT_NUMBER_COUNTER).await?;
        let student_number = format_student_number(number);

        let student = sqlx::query_as::<_, Student>(
            r#"INSERT INTO users (id, first_name, last_name, email, role, student_number, grade, section)
               VALUES ($1, $2, $3, $4, 'student', $5, $6, $7)
               RETURNING id, student_number, first_name, last_name, email, grade, section, created_at, updated_at"#,
        )
        .bind(UserId::new())
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.to_lowercase())
        .bind(&student_number)
        .bind(&dto.grade)
        .bind(&dto.section)
        .fetch_one(&mut *tx)
        .await
        .map_err(email_taken)?;

        tx.commit().await?;

        track_students_created(1);
        info!(student_id = %student.id, %student_number, "Student created");

        Ok(student)
    }

    /// List students, optionally narrowed by grade and section.
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM users
               WHERE role = 'student'
                 AND ($1::text IS NULL OR grade = $1)
                 AND ($2::text IS NULL OR section = $2)"#,
        )
        .bind(&filters.grade)
        .bind(&filters.section)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, student_number, first_name, last_name, email, grade, section, created_at, updated_at
               FROM users
               WHERE role = 'student'
                 AND ($1::text IS NULL OR grade = $1)
                 AND ($2::text IS NULL OR section = $2)
               ORDER BY student_number
               LIMIT $3 OFFSET $4"#,
        )
        .bind(&filters.grade)
        .bind(&filters.section)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta::for_offset(&filters.pagination, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, student_id: UserId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"SELECT id, student_number, first_name, last_name, email, grade, section, created_at, updated_at
               FROM users
               WHERE id = $1 AND role = 'student'"#,
        )
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_student(
        db: &PgPool,
        student_id: UserId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(
            r#"UPDATE users
               SET first_name = COALESCE($2, first_name),
                   last_name = COALESCE($3, last_name),
                   email = COALESCE($4, email),
                   grade = COALESCE($5, grade),
                   section = COALESCE($6, section),
                   updated_at = NOW()
               WHERE id = $1 AND role = 'student'
               RETURNING id, student_number, first_name, last_name, email, grade, section, created_at, updated_at"#,
        )
        .bind(student_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.as_deref().map(str::to_lowercase))
        .bind(&dto.grade)
        .bind(&dto.section)
        .fetch_optional(db)
        .await
        .map_err(email_taken)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Delete a student. Their recipient rows and submissions go with them.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, student_id: UserId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'student'")
            .bind(student_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        info!(%student_id, "Student deleted");
        Ok(())
    }
}
