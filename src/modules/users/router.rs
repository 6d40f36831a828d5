use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::users::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_user))
        .route("/me", get(handlers::get_me).put(handlers::update_me))
        .route("/:id", get(handlers::get_user))
        .route("/:id/kyc", put(handlers::review_kyc))
}
