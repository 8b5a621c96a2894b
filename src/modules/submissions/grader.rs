//! Quiz auto-grading.
//!
//! Multiple-choice and true/false answers are compared to the stored answer
//! with exact, case-sensitive string equality. Short-answer and essay
//! answers are recorded as [`Correctness::Pending`] for a human grader.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use schoolyard_config::GradingConfig;
use schoolyard_models::ids::QuestionId;
use schoolyard_models::{AnswerRecord, Correctness, Question, SubmittedAnswer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradingOptions {
    /// Match an answer to the question at the same position when its
    /// question id is missing or unknown.
    pub positional_fallback: bool,
}

impl From<GradingConfig> for GradingOptions {
    fn from(config: GradingConfig) -> Self {
        Self {
            positional_fallback: config.positional_fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradedSubmission {
    pub answer_records: Vec<AnswerRecord>,
    /// Points from correctly answered auto-gradable questions
    pub total_auto_score: i32,
    /// No question in the quiz needs a human grader
    pub all_auto_graded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradingError {
    #[error("answer {index} references question {question_id}, which is not part of this quiz")]
    UnknownQuestion { index: usize, question_id: QuestionId },
    #[error("answer {index} does not name a question")]
    MissingQuestionId { index: usize },
    #[error("question {0} is answered more than once")]
    DuplicateAnswer(QuestionId),
}

/// Grades `answers` against `questions`, which must be in position order.
///
/// `all_auto_graded` depends on the quiz, not on which questions were
/// answered: one essay question anywhere keeps the submission open for
/// manual grading.
pub fn grade_submission(
    questions: &[Question],
    answers: &[SubmittedAnswer],
    options: GradingOptions,
) -> Result<GradedSubmission, GradingError> {
    let by_id: HashMap<QuestionId, &Question> = questions.iter().map(|q| (q.id, q)).collect();
    let mut answered = HashSet::with_capacity(answers.len());
    let mut answer_records = Vec::with_capacity(answers.len());
    let mut total_auto_score = 0;

    for (index, submitted) in answers.iter().enumerate() {
        let question = locate_question(questions, &by_id, index, submitted, options)?;

        if !answered.insert(question.id) {
            return Err(GradingError::DuplicateAnswer(question.id));
        }

        let (correctness, points_earned) = if question.question_type.is_auto_gradable() {
            if question.correct_answer.as_deref() == Some(submitted.answer.as_str()) {
                (Correctness::Correct, question.points)
            } else {
                (Correctness::Incorrect, 0)
            }
        } else {
            (Correctness::Pending, 0)
        };

        total_auto_score += points_earned;
        answer_records.push(AnswerRecord {
            question_id: question.id,
            answer: submitted.answer.clone(),
            correctness,
            points_earned,
        });
    }

    Ok(GradedSubmission {
        answer_records,
        total_auto_score,
        all_auto_graded: questions.iter().all(|q| q.question_type.is_auto_gradable()),
    })
}

fn locate_question<'q>(
    questions: &'q [Question],
    by_id: &HashMap<QuestionId, &'q Question>,
    index: usize,
    submitted: &SubmittedAnswer,
    options: GradingOptions,
) -> Result<&'q Question, GradingError> {
    if let Some(question) = submitted.question_id.and_then(|id| by_id.get(&id).copied()) {
        return Ok(question);
    }

    if options.positional_fallback
        && let Some(question) = questions.get(index)
    {
        return Ok(question);
    }

    Err(match submitted.question_id {
        Some(question_id) => GradingError::UnknownQuestion { index, question_id },
        None => GradingError::MissingQuestionId { index },
    })
}
