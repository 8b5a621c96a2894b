use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use schoolyard_core::{AppError, PaginationMeta, PaginationParams};
use schoolyard_models::ContentKind;
use schoolyard_models::ids::{ContentId, SubmissionId, UserId};

use crate::metrics::{track_submission, track_submission_rejected};
use crate::modules::content::model::ContentItem;
use crate::modules::content::service::ContentService;
use crate::modules::questions::service::QuestionService;
use crate::modules::submissions::grader::{self, GradingError, GradingOptions};
use crate::modules::submissions::model::{
    CreateSubmissionDto, GradeSubmissionDto, PaginatedSubmissionsResponse, Submission,
    SubmissionStatus,
};
use crate::modules::submissions::store::{NewSubmission, SubmissionError, submit_once};

pub fn grading_error(err: GradingError) -> AppError {
    AppError::unprocessable(anyhow!(err))
}

pub fn submission_error(err: SubmissionError) -> AppError {
    match err {
        SubmissionError::Duplicate => {
            track_submission_rejected("duplicate");
            AppError::conflict(anyhow!(SubmissionError::Duplicate))
        }
        SubmissionError::Storage(e) => AppError::database(e),
    }
}

/// Late means strictly after the due instant.
pub fn is_late(content: &ContentItem, now: DateTime<Utc>) -> bool {
    content.due_at.is_some_and(|due_at| now > due_at)
}

/// Announcements take no submissions and assignments take free text only.
fn check_submittable(content: &ContentItem, dto: &CreateSubmissionDto) -> Result<(), AppError> {
    match content.kind {
        ContentKind::Announcement => Err(AppError::unprocessable(anyhow!(
            "Announcements do not accept submissions"
        ))),
        ContentKind::Assignment if !dto.answers.is_empty() => Err(AppError::unprocessable(
            anyhow!("Assignments take a text response, not quiz answers"),
        )),
        _ => Ok(()),
    }
}

pub struct SubmissionService;

impl SubmissionService {
    /// Submit work for a content item.
    ///
    /// The student must be a recipient. Quiz answers are auto-graded; when
    /// every question of the quiz is auto-gradable the submission is stored
    /// already graded with the auto score as its grade.
    #[instrument(skip(db))]
    pub async fn create_submission(
        db: &PgPool,
        now: DateTime<Utc>,
        options: GradingOptions,
        student_id: UserId,
        content_id: ContentId,
        dto: CreateSubmissionDto,
    ) -> Result<Submission, AppError> {
        let content = ContentService::get_content_item(db, content_id).await?;

        if !ContentService::is_recipient(db, content_id, student_id).await? {
            track_submission_rejected("not_recipient");
            return Err(AppError::forbidden(anyhow!(
                "This content was not published to you"
            )));
        }

        check_submittable(&content, &dto)?;

        let is_late = is_late(&content, now);
        let mut new = NewSubmission {
            content_id,
            student_id,
            status: SubmissionStatus::Submitted,
            grade: None,
            answers: Vec::new(),
            text_response: dto.text_response,
            is_late,
            submitted_at: now,
            graded_at: None,
        };

        if content.kind == ContentKind::Quiz {
            let questions = QuestionService::get_questions(db, content_id).await?;
            if questions.is_empty() {
                return Err(AppError::unprocessable(anyhow!("Quiz has no questions yet")));
            }

            let graded = grader::grade_submission(&questions, &dto.answers, options)
                .map_err(grading_error)?;

            if graded.all_auto_graded {
                new.status = SubmissionStatus::Graded;
                new.grade = Some(f64::from(graded.total_auto_score));
                new.graded_at = Some(now);
            }
            new.answers = graded.answer_records;
        }

        let submission = submit_once(db, new).await.map_err(submission_error)?;

        track_submission(submission.status, submission.is_late);
        info!(
            submission_id = %submission.id,
            %content_id,
            %student_id,
            status = ?submission.status,
            is_late,
            "Submission received"
        );

        Ok(submission)
    }

    /// Submissions for one content item, oldest first.
    #[instrument(skip(db))]
    pub async fn get_submissions(
        db: &PgPool,
        content_id: ContentId,
        params: PaginationParams,
    ) -> Result<PaginatedSubmissionsResponse, AppError> {
        ContentService::get_content_item(db, content_id).await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE content_id = $1")
                .bind(content_id)
                .fetch_one(db)
                .await?;

        let submissions = sqlx::query_as::<_, Submission>(
            r#"SELECT id, content_id, student_id, status, grade, answers, text_response, is_late, feedback, graded_by, submitted_at, graded_at
               FROM submissions
               WHERE content_id = $1
               ORDER BY submitted_at
               LIMIT $2 OFFSET $3"#,
        )
        .bind(content_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedSubmissionsResponse {
            data: submissions,
            meta: PaginationMeta::for_offset(&params, total),
        })
    }

    /// The student's own submission for a content item.
    #[instrument(skip(db))]
    pub async fn get_submission_for_student(
        db: &PgPool,
        content_id: ContentId,
        student_id: UserId,
    ) -> Result<Submission, AppError> {
        sqlx::query_as::<_, Submission>(
            r#"SELECT id, content_id, student_id, status, grade, answers, text_response, is_late, feedback, graded_by, submitted_at, graded_at
               FROM submissions
               WHERE content_id = $1 AND student_id = $2"#,
        )
        .bind(content_id)
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Submission not found")))
    }

    /// Fetch a submission. Students only see their own.
    #[instrument(skip(db))]
    pub async fn get_submission(
        db: &PgPool,
        submission_id: SubmissionId,
        viewer: UserId,
        is_staff: bool,
    ) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"SELECT id, content_id, student_id, status, grade, answers, text_response, is_late, feedback, graded_by, submitted_at, graded_at
               FROM submissions
               WHERE id = $1"#,
        )
        .bind(submission_id)
        .fetch_optional(db)
        .await?
        .filter(|s| is_staff || s.student_id == viewer)
        .ok_or_else(|| AppError::not_found(anyhow!("Submission not found")))?;

        Ok(submission)
    }

    /// Set or replace the grade of a submission.
    ///
    /// Any status moves to `graded`; grading an already graded submission
    /// overwrites the previous grade.
    #[instrument(skip(db))]
    pub async fn set_grade(
        db: &PgPool,
        now: DateTime<Utc>,
        submission_id: SubmissionId,
        graded_by: UserId,
        dto: GradeSubmissionDto,
    ) -> Result<Submission, AppError> {
        let total_points = sqlx::query_scalar::<_, Option<i32>>(
            r#"SELECT c.total_points
               FROM submissions s
               JOIN content_items c ON c.id = s.content_id
               WHERE s.id = $1"#,
        )
        .bind(submission_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Submission not found")))?;

        if let Some(total_points) = total_points
            && dto.grade > f64::from(total_points)
        {
            return Err(AppError::unprocessable(anyhow!(
                "Grade {} exceeds the total of {} points",
                dto.grade,
                total_points
            )));
        }

        let submission = sqlx::query_as::<_, Submission>(
            r#"UPDATE submissions
               SET status = 'graded',
                   grade = $2,
                   feedback = COALESCE($3, feedback),
                   graded_by = $4,
                   graded_at = $5
               WHERE id = $1
               RETURNING id, content_id, student_id, status, grade, answers, text_response, is_late, feedback, graded_by, submitted_at, graded_at"#,
        )
        .bind(submission_id)
        .bind(dto.grade)
        .bind(&dto.feedback)
        .bind(graded_by)
        .bind(now)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            warn!(%submission_id, "Submission deleted while grading");
            AppError::not_found(anyhow!("Submission not found"))
        })?;

        info!(%submission_id, grade = dto.grade, %graded_by, "Submission graded");

        Ok(submission)
    }
}
