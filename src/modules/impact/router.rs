use axum::{Router, routing::get};

use crate::modules::impact::handlers;
use crate::shared::state::AppState;

/// Routes under /api/impact.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_impact).post(handlers::record_impact),
    )
}

/// Routes under /api/statistics.
pub fn stats_router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(handlers::overview))
        .route("/donations", get(handlers::donation_distributions))
        .route("/timeline", get(handlers::timeline))
}
