use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::deliveries::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_deliveries).post(handlers::create_delivery),
        )
        .route("/:id", get(handlers::get_delivery))
        .route("/:id/status", put(handlers::update_status))
        .route("/:id/verify", post(handlers::verify_delivery))
}
