use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::verifications::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tasks).post(handlers::create_task))
        .route("/:id", get(handlers::get_task))
        .route("/:id/status", put(handlers::update_status))
        .route("/:id/evidence", post(handlers::add_evidence))
}
