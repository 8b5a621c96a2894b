use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_academic_year, get_academic_year, get_academic_years, get_current_academic_year,
    get_terms, replace_terms, set_current_academic_year, update_academic_year,
};

pub fn init_academic_years_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_academic_year).get(get_academic_years))
        .route("/current", get(get_current_academic_year))
        .route(
            "/{id}",
            get(get_academic_year).patch(update_academic_year),
        )
        .route("/{id}/set-current", post(set_current_academic_year))
        .route("/{id}/terms", get(get_terms).put(replace_terms))
}
