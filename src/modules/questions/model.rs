//! Question data models and DTOs.
//!
//! Re-exports question models from the `schoolyard-models` crate and adds
//! the role-dependent listing shape.

use serde::Serialize;
use utoipa::ToSchema;

pub use schoolyard_models::questions::*;

/// Staff see the answer key; students do not.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum QuestionList {
    Full(Vec<Question>),
    Student(Vec<QuestionView>),
}

impl QuestionList {
    pub fn for_viewer(questions: Vec<Question>, is_staff: bool) -> Self {
        if is_staff {
            QuestionList::Full(questions)
        } else {
            QuestionList::Student(questions.into_iter().map(QuestionView::from).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schoolyard_models::ids::{ContentId, QuestionId};
    use sqlx::types::Json;

    fn question() -> Question {
        Question {
            id: QuestionId::from_u128(1),
            content_id: ContentId::from_u128(2),
            position: 0,
            question_type: QuestionType::TrueFalse,
            prompt: "The earth is round".to_string(),
            options: Json(vec![]),
            correct_answer: Some("true".to_string()),
            points: 5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_students_never_see_the_answer_key() {
        let json = serde_json::to_value(QuestionList::for_viewer(vec![question()], false)).unwrap();
        assert!(json[0].get("correct_answer").is_none());
        assert_eq!(json[0]["points"], 5);
    }

    #[test]
    fn test_staff_see_the_answer_key() {
        let json = serde_json::to_value(QuestionList::for_viewer(vec![question()], true)).unwrap();
        assert_eq!(json[0]["correct_answer"], "true");
    }
}
