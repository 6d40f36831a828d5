use axum::{Router, routing::get};

use crate::modules;
use crate::shared::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api/auth", modules::auth::router::router())
        .nest("/api/users", modules::users::router::router())
        .nest("/api/donations", modules::donations::router::router())
        .nest("/api/deliveries", modules::deliveries::router::router())
        .nest(
            "/api/feeding-needs",
            modules::feeding_needs::router::router(),
        )
        .nest("/api/food-packs", modules::food_packs::router::router())
        .nest(
            "/api/verifications",
            modules::verifications::router::router(),
        )
        .nest("/api/impact", modules::impact::router::router())
        .nest("/api/statistics", modules::impact::router::stats_router())
        .nest("/api/contracts", modules::chain::router::router())
        .with_state(state)
}
