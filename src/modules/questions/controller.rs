use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolyard_core::AppError;
use schoolyard_models::ids::ContentId;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_staff;
use crate::modules::content::service::ContentService;
use crate::modules::questions::model::{CreateQuestionDto, Question, QuestionList};
use crate::modules::questions::service::QuestionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Add a question to a quiz
#[utoipa::path(
    post,
    path = "/api/content/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question added", body = Question),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Content not found"),
        (status = 409, description = "Quiz already has submissions"),
        (status = 422, description = "Not a quiz or invalid answer key")
    ),
    tag = "Questions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_question(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateQuestionDto>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    check_staff(&auth_user)?;

    let question = QuestionService::add_question(&state.db, ContentId::from(id), dto).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// List the questions of a quiz
///
/// Students who received the quiz get the questions without correct answers.
#[utoipa::path(
    get,
    path = "/api/content/{id}/questions",
    params(
        ("id" = Uuid, Path, description = "Quiz ID")
    ),
    responses(
        (status = 200, description = "Questions in order", body = QuestionList),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not a recipient")
    ),
    tag = "Questions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_questions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionList>, AppError> {
    let content_id = ContentId::from(id);
    ContentService::get_visible_content_item(
        &state.db,
        content_id,
        auth_user.user_id(),
        auth_user.is_staff(),
    )
    .await?;

    let questions = QuestionService::get_questions(&state.db, content_id).await?;
    Ok(Json(QuestionList::for_viewer(questions, auth_user.is_staff())))
}
