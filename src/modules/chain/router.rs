use axum::{Router, routing::get};

use crate::modules::chain::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:address", get(handlers::get_contract))
}
