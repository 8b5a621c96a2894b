use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolyard_core::{AppError, PaginationParams};
use schoolyard_models::ids::{ContentId, SubmissionId};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_staff, check_student};
use crate::modules::submissions::model::{
    CreateSubmissionDto, GradeSubmissionDto, PaginatedSubmissionsResponse, Submission,
};
use crate::modules::submissions::service::SubmissionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Submit work for an assignment or quiz
///
/// Quiz answers are graded on arrival. A quiz made only of multiple-choice
/// and true/false questions comes back already `graded`.
#[utoipa::path(
    post,
    path = "/api/content/{id}/submissions",
    params(
        ("id" = Uuid, Path, description = "Content ID")
    ),
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission stored", body = Submission),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a student or not a recipient"),
        (status = 404, description = "Content not found"),
        (status = 409, description = "Already submitted"),
        (status = 422, description = "Content takes no submissions or answers are invalid")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    check_student(&auth_user)?;

    let submission = SubmissionService::create_submission(
        &state.db,
        state.clock.now(),
        state.grading_config.into(),
        auth_user.user_id(),
        ContentId::from(id),
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// List submissions for a content item
#[utoipa::path(
    get,
    path = "/api/content/{id}/submissions",
    params(
        ("id" = Uuid, Path, description = "Content ID"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number, overrides offset")
    ),
    responses(
        (status = 200, description = "Submissions", body = PaginatedSubmissionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Content not found")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_submissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedSubmissionsResponse>, AppError> {
    check_staff(&auth_user)?;

    let submissions =
        SubmissionService::get_submissions(&state.db, ContentId::from(id), params).await?;
    Ok(Json(submissions))
}

/// Get the signed-in student's submission for a content item
#[utoipa::path(
    get,
    path = "/api/content/{id}/submissions/mine",
    params(
        ("id" = Uuid, Path, description = "Content ID")
    ),
    responses(
        (status = 200, description = "Own submission", body = Submission),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - students only"),
        (status = 404, description = "Nothing submitted yet")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, AppError> {
    check_student(&auth_user)?;

    let submission = SubmissionService::get_submission_for_student(
        &state.db,
        ContentId::from(id),
        auth_user.user_id(),
    )
    .await?;
    Ok(Json(submission))
}

/// Get a submission
#[utoipa::path(
    get,
    path = "/api/submissions/{id}",
    params(
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission", body = Submission),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not yours")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Submission>, AppError> {
    let submission = SubmissionService::get_submission(
        &state.db,
        SubmissionId::from(id),
        auth_user.user_id(),
        auth_user.is_staff(),
    )
    .await?;
    Ok(Json(submission))
}

/// Grade or re-grade a submission
#[utoipa::path(
    post,
    path = "/api/submissions/{id}/grade",
    params(
        ("id" = Uuid, Path, description = "Submission ID")
    ),
    request_body = GradeSubmissionDto,
    responses(
        (status = 200, description = "Submission graded", body = Submission),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Submission not found"),
        (status = 422, description = "Grade out of range")
    ),
    tag = "Submissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn grade_submission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<GradeSubmissionDto>,
) -> Result<Json<Submission>, AppError> {
    check_staff(&auth_user)?;

    let submission = SubmissionService::set_grade(
        &state.db,
        state.clock.now(),
        SubmissionId::from(id),
        auth_user.user_id(),
        dto,
    )
    .await?;
    Ok(Json(submission))
}
