use axum::{
    Router,
    routing::{get, put},
};

use crate::modules::donations::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_donations).post(handlers::create_donation),
        )
        .route("/:id", get(handlers::get_donation))
        .route("/:id/status", put(handlers::update_status))
        .route("/:id/verification", put(handlers::review_verification))
}
