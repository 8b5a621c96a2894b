//! Quiz question models.

use crate::ids::{ContentId, QuestionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    /// Multiple-choice and true/false answers are scored without a human.
    pub fn is_auto_gradable(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: QuestionId,
    pub content_id: ContentId,
    /// Zero-based order within the quiz
    pub position: i32,
    pub question_type: QuestionType,
    pub prompt: String,
    #[schema(value_type = Vec<String>)]
    pub options: Json<Vec<String>>,
    pub correct_answer: Option<String>,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

/// A question as shown to students, without the answer key.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionView {
    pub id: QuestionId,
    pub position: i32,
    pub question_type: QuestionType,
    pub prompt: String,
    pub options: Vec<String>,
    pub points: i32,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            position: q.position,
            question_type: q.question_type,
            prompt: q.prompt,
            options: q.options.0,
            points: q.points,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_answer_key"))]
pub struct CreateQuestionDto {
    pub question_type: QuestionType,
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    pub points: i32,
}

fn validate_answer_key(dto: &CreateQuestionDto) -> Result<(), ValidationError> {
    match dto.question_type {
        QuestionType::MultipleChoice => {
            if dto.options.len() < 2 {
                return Err(ValidationError::new("answer_key")
                    .with_message("multiple choice questions need at least two options".into()));
            }
            match &dto.correct_answer {
                Some(answer) if dto.options.contains(answer) => Ok(()),
                _ => Err(ValidationError::new("answer_key")
                    .with_message("correct_answer must be one of the options".into())),
            }
        }
        QuestionType::TrueFalse => match dto.correct_answer.as_deref() {
            Some("true") | Some("false") => Ok(()),
            _ => Err(ValidationError::new("answer_key")
                .with_message("correct_answer must be \"true\" or \"false\"".into())),
        },
        QuestionType::ShortAnswer | QuestionType::Essay => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(
        question_type: QuestionType,
        options: &[&str],
        answer: Option<&str>,
    ) -> CreateQuestionDto {
        CreateQuestionDto {
            question_type,
            prompt: "What is 3 + 4?".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: answer.map(str::to_string),
            points: 10,
        }
    }

    #[test]
    fn test_auto_gradable_types() {
        assert!(QuestionType::MultipleChoice.is_auto_gradable());
        assert!(QuestionType::TrueFalse.is_auto_gradable());
        assert!(!QuestionType::ShortAnswer.is_auto_gradable());
        assert!(!QuestionType::Essay.is_auto_gradable());
    }

    #[test]
    fn test_multiple_choice_answer_key() {
        assert!(dto(QuestionType::MultipleChoice, &["6", "7"], Some("7")).validate().is_ok());
        assert!(dto(QuestionType::MultipleChoice, &["6", "7"], Some("8")).validate().is_err());
        assert!(dto(QuestionType::MultipleChoice, &["6", "7"], None).validate().is_err());
        assert!(dto(QuestionType::MultipleChoice, &["7"], Some("7")).validate().is_err());
    }

    #[test]
    fn test_true_false_answer_key() {
        assert!(dto(QuestionType::TrueFalse, &[], Some("true")).validate().is_ok());
        assert!(dto(QuestionType::TrueFalse, &[], Some("True")).validate().is_err());
        assert!(dto(QuestionType::TrueFalse, &[], None).validate().is_err());
    }

    #[test]
    fn test_open_questions_need_no_key() {
        assert!(dto(QuestionType::Essay, &[], None).validate().is_ok());
        assert!(dto(QuestionType::ShortAnswer, &[], None).validate().is_ok());
    }

    #[test]
    fn test_view_hides_answer_key() {
        let question = Question {
            id: QuestionId::from_u128(1),
            content_id: ContentId::from_u128(2),
            position: 0,
            question_type: QuestionType::MultipleChoice,
            prompt: "Pick one".to_string(),
            options: Json(vec!["a".to_string(), "b".to_string()]),
            correct_answer: Some("b".to_string()),
            points: 5,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(QuestionView::from(question)).unwrap();
        assert!(json.get("correct_answer").is_none());
        assert_eq!(json["options"], serde_json::json!(["a", "b"]));
    }
}
