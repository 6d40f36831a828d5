pub mod database;
pub mod repositories;
pub mod services;

use crate::shared::{config::Config, state::AppState};
use std::sync::Arc;

pub async fn create_app_state(config: &Config) -> AppState {
    let db = if config.app_env == "dev" {
        None
    } else {
        Some(database::connect_postgres(config).await)
    };

    let repo_manager = repositories::init_repo_manager(config, db).await;
    let chain = services::init_chain_adapter(config);

    AppState {
        config: Arc::new(config.clone()),
        repo_manager,
        chain,
    }
}
