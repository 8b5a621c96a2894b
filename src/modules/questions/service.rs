use anyhow::anyhow;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{info, instrument};

use schoolyard_core::AppError;
use schoolyard_models::ContentKind;
use schoolyard_models::ids::{ContentId, QuestionId};

use crate::modules::content::service::ContentService;
use crate::modules::questions::model::{CreateQuestionDto, Question};

/// Two adds racing for the same position surface as a retryable conflict.
pub fn question_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return AppError::conflict(anyhow!(
            "Another question was added at the same time, please retry"
        ));
    }
    AppError::database(err)
}

pub struct QuestionService;

impl QuestionService {
    /// Append a question to a quiz.
    ///
    /// Questions are frozen once the quiz has a submission, since stored
    /// answer records point at them.
    #[instrument(skip(db))]
    pub async fn add_question(
        db: &PgPool,
        content_id: ContentId,
        dto: CreateQuestionDto,
    ) -> Result<Question, AppError> {
        let content = ContentService::get_content_item(db, content_id).await?;
        if content.kind != ContentKind::Quiz {
            return Err(AppError::unprocessable(anyhow!(
                "Questions can only be added to quizzes, not to a {}",
                content.kind
            )));
        }

        // Freeze check and position numbering happen in the same statement.
        let question = sqlx::query_as::<_, Question>(
            r#"INSERT INTO questions (id, content_id, position, question_type, prompt, options, correct_answer, points)
               SELECT $1, $2,
                      (SELECT COALESCE(MAX(position) + 1, 0) FROM questions WHERE content_id = $2),
                      $3, $4, $5, $6, $7
               WHERE NOT EXISTS (SELECT 1 FROM submissions WHERE content_id = $2)
               RETURNING id, content_id, position, question_type, prompt, options, correct_answer, points, created_at"#,
        )
        .bind(QuestionId::new())
        .bind(content_id)
        .bind(dto.question_type)
        .bind(&dto.prompt)
        .bind(Json(&dto.options))
        .bind(&dto.correct_answer)
        .bind(dto.points)
        .fetch_optional(db)
        .await
        .map_err(question_write_error)?
        .ok_or_else(|| {
            AppError::conflict(anyhow!(
                "Quiz already has submissions; questions can no longer be added"
            ))
        })?;

        info!(%content_id, question_id = %question.id, position = question.position, "Question added");

        Ok(question)
    }

    /// Questions of a quiz in order.
    #[instrument(skip(db))]
    pub async fn get_questions(
        db: &PgPool,
        content_id: ContentId,
    ) -> Result<Vec<Question>, AppError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT id, content_id, position, question_type, prompt, options, correct_answer, points, created_at
               FROM questions
               WHERE content_id = $1
               ORDER BY position"#,
        )
        .bind(content_id)
        .fetch_all(db)
        .await?;

        Ok(questions)
    }
}
