use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use schoolyard_core::{AppError, PaginationParams};
use schoolyard_models::ids::AcademicYearId;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::check_admin;
use crate::modules::academic_years::model::{
    AcademicYear, AcademicYearWithTerms, CreateAcademicYearDto, CurrentAcademicYearResponse,
    PaginatedAcademicYearsResponse, ReplaceTermsDto, ResolvedTerm, UpdateAcademicYearDto,
};
use crate::modules::academic_years::service::AcademicYearService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create an academic year with its terms
#[utoipa::path(
    post,
    path = "/api/academic-years",
    request_body = CreateAcademicYearDto,
    responses(
        (status = 201, description = "Academic year created", body = AcademicYearWithTerms),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 409, description = "Label already exists"),
        (status = 422, description = "Invalid label, weights or term set")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_academic_year(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAcademicYearDto>,
) -> Result<(StatusCode, Json<AcademicYearWithTerms>), AppError> {
    check_admin(&auth_user)?;

    let academic_year = AcademicYearService::create_academic_year(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(academic_year)))
}

/// List academic years, newest first
#[utoipa::path(
    get,
    path = "/api/academic-years",
    params(
        ("limit" = Option<i64>, Query, description = "Items per page (1-100, default 10)"),
        ("offset" = Option<i64>, Query, description = "Items to skip"),
        ("page" = Option<i64>, Query, description = "Page number, overrides offset")
    ),
    responses(
        (status = 200, description = "Academic years", body = PaginatedAcademicYearsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_academic_years(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedAcademicYearsResponse>, AppError> {
    let years = AcademicYearService::get_academic_years(&state.db, params).await?;
    Ok(Json(years))
}

/// Get the current academic year with its current term and progress
#[utoipa::path(
    get,
    path = "/api/academic-years/current",
    responses(
        (status = 200, description = "Current academic year", body = CurrentAcademicYearResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No academic year is current")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_current_academic_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<CurrentAcademicYearResponse>, AppError> {
    let today = state.clock.today();
    let current = AcademicYearService::get_current_academic_year(&state.db, today).await?;
    Ok(Json(current))
}

/// Get an academic year with its resolved terms
#[utoipa::path(
    get,
    path = "/api/academic-years/{id}",
    params(
        ("id" = Uuid, Path, description = "Academic year ID")
    ),
    responses(
        (status = 200, description = "Academic year", body = AcademicYearWithTerms),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_academic_year(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AcademicYearWithTerms>, AppError> {
    let academic_year =
        AcademicYearService::get_academic_year(&state.db, AcademicYearId::from(id)).await?;
    Ok(Json(academic_year))
}

/// Update assessment weights or the current-term override
#[utoipa::path(
    patch,
    path = "/api/academic-years/{id}",
    params(
        ("id" = Uuid, Path, description = "Academic year ID")
    ),
    request_body = UpdateAcademicYearDto,
    responses(
        (status = 200, description = "Academic year updated", body = AcademicYear),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Academic year not found"),
        (status = 422, description = "Invalid weights or unknown term")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_academic_year(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicYearDto>,
) -> Result<Json<AcademicYear>, AppError> {
    check_admin(&auth_user)?;

    let academic_year =
        AcademicYearService::update_academic_year(&state.db, AcademicYearId::from(id), dto)
            .await?;
    Ok(Json(academic_year))
}

/// Make an academic year the current one
#[utoipa::path(
    post,
    path = "/api/academic-years/{id}/set-current",
    params(
        ("id" = Uuid, Path, description = "Academic year ID")
    ),
    responses(
        (status = 200, description = "Academic year is now current", body = AcademicYear),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_current_academic_year(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AcademicYear>, AppError> {
    check_admin(&auth_user)?;

    let academic_year =
        AcademicYearService::set_current_academic_year(&state.db, AcademicYearId::from(id))
            .await?;
    Ok(Json(academic_year))
}

/// List the terms of an academic year with resolved dates
#[utoipa::path(
    get,
    path = "/api/academic-years/{id}/terms",
    params(
        ("id" = Uuid, Path, description = "Academic year ID")
    ),
    responses(
        (status = 200, description = "Terms in order", body = Vec<ResolvedTerm>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Academic year not found")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_terms(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ResolvedTerm>>, AppError> {
    let terms = AcademicYearService::get_terms(&state.db, AcademicYearId::from(id)).await?;
    Ok(Json(terms))
}

/// Replace the term set of an academic year
#[utoipa::path(
    put,
    path = "/api/academic-years/{id}/terms",
    params(
        ("id" = Uuid, Path, description = "Academic year ID")
    ),
    request_body = ReplaceTermsDto,
    responses(
        (status = 200, description = "New terms in order", body = Vec<ResolvedTerm>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 404, description = "Academic year not found"),
        (status = 422, description = "Invalid month name or conflicting terms")
    ),
    tag = "Academic Years",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn replace_terms(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ReplaceTermsDto>,
) -> Result<Json<Vec<ResolvedTerm>>, AppError> {
    check_admin(&auth_user)?;

    let terms =
        AcademicYearService::replace_terms(&state.db, AcademicYearId::from(id), dto).await?;
    Ok(Json(terms))
}
