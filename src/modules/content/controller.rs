use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolyard_core::AppError;
use schoolyard_models::ids::ContentId;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{check_staff, check_student};
use crate::modules::content::model::{
    ContentFilterParams, ContentItem, ContentRecipientsResponse, CreateContentDto,
    PaginatedContentResponse, PublishedContent,
};
use crate::modules::content::service::ContentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Publish an announcement, assignment or quiz
///
/// Targeting is either tagged (`{"mode": "grade_section", "grades": [...]}`)
/// or the flat form (`{"target_all": false, "grades": [...], "student_ids": [...]}`).
#[utoipa::path(
    post,
    path = "/api/content",
    request_body = CreateContentDto,
    responses(
        (status = 201, description = "Content published", body = PublishedContent),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 422, description = "Invalid shape, empty audience or unknown student ids")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateContentDto>,
) -> Result<(StatusCode, Json<PublishedContent>), AppError> {
    check_staff(&auth_user)?;

    let published = ContentService::publish_content(&state.db, auth_user.user_id(), dto).await?;

    Ok((StatusCode::CREATED, Json(published)))
}

/// List all content
#[utoipa::path(
    get,
    path = "/api/content",
    params(ContentFilterParams),
    responses(
        (status = 200, description = "Content items", body = PaginatedContentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<ContentFilterParams>,
) -> Result<Json<PaginatedContentResponse>, AppError> {
    check_staff(&auth_user)?;

    let content = ContentService::get_content(&state.db, filters).await?;
    Ok(Json(content))
}

/// List content the signed-in student received
#[utoipa::path(
    get,
    path = "/api/content/mine",
    params(ContentFilterParams),
    responses(
        (status = 200, description = "Content items", body = PaginatedContentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - students only")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<ContentFilterParams>,
) -> Result<Json<PaginatedContentResponse>, AppError> {
    check_student(&auth_user)?;

    let content =
        ContentService::get_content_for_student(&state.db, auth_user.user_id(), filters).await?;
    Ok(Json(content))
}

/// Get a content item
#[utoipa::path(
    get,
    path = "/api/content/{id}",
    params(
        ("id" = Uuid, Path, description = "Content ID")
    ),
    responses(
        (status = 200, description = "Content item", body = ContentItem),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not a recipient")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_content_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentItem>, AppError> {
    let item = ContentService::get_visible_content_item(
        &state.db,
        ContentId::from(id),
        auth_user.user_id(),
        auth_user.is_staff(),
    )
    .await?;
    Ok(Json(item))
}

/// List the students a content item was published to
#[utoipa::path(
    get,
    path = "/api/content/{id}/recipients",
    params(
        ("id" = Uuid, Path, description = "Content ID")
    ),
    responses(
        (status = 200, description = "Recipient ids", body = ContentRecipientsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Content not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_recipients(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentRecipientsResponse>, AppError> {
    check_staff(&auth_user)?;

    let recipients = ContentService::get_recipients(&state.db, ContentId::from(id)).await?;
    Ok(Json(recipients))
}

/// Delete a content item
#[utoipa::path(
    delete,
    path = "/api/content/{id}",
    params(
        ("id" = Uuid, Path, description = "Content ID")
    ),
    responses(
        (status = 204, description = "Content deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Content not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_content(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    check_staff(&auth_user)?;

    ContentService::delete_content(&state.db, ContentId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
