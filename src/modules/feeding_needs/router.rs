use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::feeding_needs::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_needs).post(handlers::create_need))
        .route("/:id", get(handlers::get_need))
        .route("/:id/fund", post(handlers::fund_need))
}
