//! Submission persistence with a one-per-learner guarantee.
//!
//! Uniqueness is enforced by the store in a single atomic step, never by a
//! read-then-write in the caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use thiserror::Error;
use tracing::instrument;

use schoolyard_models::ids::{ContentId, SubmissionId, UserId};
use schoolyard_models::{AnswerRecord, Submission, SubmissionStatus};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("a submission for this content already exists")]
    Duplicate,
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// A submission about to be stored.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub content_id: ContentId,
    pub student_id: UserId,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    pub answers: Vec<AnswerRecord>,
    pub text_response: Option<String>,
    pub is_late: bool,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Stores `new` unless the learner already submitted for this content.
    /// Returns `None` in that case and leaves the existing row untouched.
    async fn insert_if_absent(
        &self,
        new: NewSubmission,
    ) -> Result<Option<Submission>, sqlx::Error>;
}

#[async_trait]
impl SubmissionStore for PgPool {
    #[instrument(skip(self, new), fields(content_id = %new.content_id, student_id = %new.student_id))]
    async fn insert_if_absent(
        &self,
        new: NewSubmission,
    ) -> Result<Option<Submission>, sqlx::Error> {
        sqlx::query_as::<_, Submission>(
            r#"INSERT INTO submissions (id, content_id, student_id, status, grade, answers, text_response, is_late, submitted_at, graded_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               ON CONFLICT (content_id, student_id) DO NOTHING
               RETURNING id, content_id, student_id, status, grade, answers, text_response, is_late, feedback, graded_by, submitted_at, graded_at"#,
        )
        .bind(SubmissionId::new())
        .bind(new.content_id)
        .bind(new.student_id)
        .bind(new.status)
        .bind(new.grade)
        .bind(Json(&new.answers))
        .bind(&new.text_response)
        .bind(new.is_late)
        .bind(new.submitted_at)
        .bind(new.graded_at)
        .fetch_optional(self)
        .await
    }
}

/// Stores `new`, turning an existing submission into [`SubmissionError::Duplicate`].
pub async fn submit_once<S>(store: &S, new: NewSubmission) -> Result<Submission, SubmissionError>
where
    S: SubmissionStore + ?Sized,
{
    store
        .insert_if_absent(new)
        .await?
        .ok_or(SubmissionError::Duplicate)
}
