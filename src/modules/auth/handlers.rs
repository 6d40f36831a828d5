use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::modules::auth::service::AuthService;
use crate::modules::users::repository::UserRepository;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user_repo = state.repo_manager.get::<Arc<dyn UserRepository>>().ok_or(
        AppError::InternalServerError("UserRepository not registered".to_string()),
    )?;

    let issued = AuthService::issue_token(user_repo.as_ref(), &state.config, &req.email).await?;

    Ok(Json(TokenResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
    }))
}
