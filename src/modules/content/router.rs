use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::questions::controller::{add_question, get_questions};
use crate::modules::submissions::controller::{
    create_submission, get_my_submission, get_submissions,
};
use crate::state::AppState;

use super::controller::{
    create_content, delete_content, get_content, get_content_item, get_my_content, get_recipients,
};

pub fn init_content_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_content).get(get_content))
        .route("/mine", get(get_my_content))
        .route("/{id}", get(get_content_item).delete(delete_content))
        .route("/{id}/recipients", get(get_recipients))
        .route("/{id}/questions", post(add_question).get(get_questions))
        .route(
            "/{id}/submissions",
            post(create_submission).get(get_submissions),
        )
        .route("/{id}/submissions/mine", get(get_my_submission))
}
