//! Submission models.
//!
//! A learner submits at most once per content item. Quiz answers are stored
//! as [`AnswerRecord`]s carrying a tri-state [`Correctness`].

use crate::ids::{ContentId, QuestionId, SubmissionId, UserId};
use chrono::{DateTime, Utc};
use schoolyard_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
    Late,
    Returned,
}

/// Outcome of checking one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Correctness {
    Correct,
    Incorrect,
    /// Waiting for a human grader
    Pending,
}

impl Correctness {
    pub fn is_pending(&self) -> bool {
        matches!(self, Correctness::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub answer: String,
    pub correctness: Correctness,
    pub points_earned: i32,
}

/// An answer as sent by the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmittedAnswer {
    pub question_id: Option<QuestionId>,
    #[validate(length(max = 20000))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Submission {
    pub id: SubmissionId,
    pub content_id: ContentId,
    pub student_id: UserId,
    pub status: SubmissionStatus,
    pub grade: Option<f64>,
    #[schema(value_type = Vec<AnswerRecord>)]
    pub answers: Json<Vec<AnswerRecord>>,
    pub text_response: Option<String>,
    pub is_late: bool,
    pub feedback: Option<String>,
    pub graded_by: Option<UserId>,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionDto {
    #[serde(default)]
    #[validate(length(max = 200))]
    #[validate(nested)]
    pub answers: Vec<SubmittedAnswer>,
    #[validate(length(max = 20000))]
    pub text_response: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    #[validate(range(min = 0.0))]
    pub grade: f64,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedSubmissionsResponse {
    pub data: Vec<Submission>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correctness_is_tri_state_on_the_wire() {
        assert_eq!(
            serde_json::to_value(Correctness::Pending).unwrap(),
            serde_json::json!("pending")
        );
        assert!(Correctness::Pending.is_pending());
        assert!(!Correctness::Incorrect.is_pending());
    }

    #[test]
    fn test_submitted_answer_without_question_id() {
        let answer: SubmittedAnswer = serde_json::from_str(r#"{"answer":"7"}"#).unwrap();
        assert!(answer.question_id.is_none());
        assert_eq!(answer.answer, "7");
    }

    #[test]
    fn test_grade_dto_validation() {
        let ok = GradeSubmissionDto {
            grade: 8.5,
            feedback: Some("Good work".to_string()),
        };
        assert!(ok.validate().is_ok());

        let negative = GradeSubmissionDto {
            grade: -1.0,
            feedback: None,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_create_submission_defaults() {
        let dto: CreateSubmissionDto = serde_json::from_str("{}").unwrap();
        assert!(dto.answers.is_empty());
        assert!(dto.validate().is_ok());
    }
}
