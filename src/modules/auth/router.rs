use axum::{Router, routing::post};

use crate::modules::auth::handlers;
use crate::shared::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/token", post(handlers::issue_token))
}
