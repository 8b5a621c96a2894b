use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_submission, grade_submission};

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_submission))
        .route("/{id}/grade", post(grade_submission))
}
