use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::food_packs::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_packs).post(handlers::create_pack))
        .route("/:id", get(handlers::get_pack))
        .route("/:id/quantity", put(handlers::update_quantity))
        .route("/:id/sponsor", post(handlers::sponsor_pack))
}
