//! Role guards.
//!
//! `require_staff` is a route layer built with
//! `axum::middleware::from_fn_with_state`. The `check_*` helpers serve
//! handlers that need a finer rule than their router's layer.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use schoolyard_core::AppError;
use schoolyard_models::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fails with 403 unless the user holds one of `allowed`.
pub fn check_any_role(auth_user: &AuthUser, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&auth_user.role()) {
        return Ok(());
    }
    Err(AppError::forbidden(anyhow!(
        "Access denied for role {}",
        auth_user.role()
    )))
}

pub fn check_admin(auth_user: &AuthUser) -> Result<(), AppError> {
    check_any_role(auth_user, &[UserRole::Admin])
}

pub fn check_staff(auth_user: &AuthUser) -> Result<(), AppError> {
    check_any_role(auth_user, &[UserRole::Admin, UserRole::Teacher])
}

pub fn check_student(auth_user: &AuthUser) -> Result<(), AppError> {
    check_any_role(auth_user, &[UserRole::Student])
}

async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    check_any_role(&auth_user, allowed)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Route layer: admins and teachers.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(state, req, next, &[UserRole::Admin, UserRole::Teacher])
        .await
        .unwrap_or_else(IntoResponse::into_response)
}
