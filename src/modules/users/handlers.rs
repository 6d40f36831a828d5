use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::users::entities::enums::{AccountStatus, KycStatus, Role};
use crate::modules::users::entities::user;
use crate::modules::users::repository::UserRepository;
use crate::modules::users::service::{RegisterUserInput, UpdateProfileInput, UserService};
use crate::shared::{
    error::{AppError, AppResult},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct KycReviewRequest {
    pub verdict: KycStatus,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub kyc_status: KycStatus,
    pub account_status: AccountStatus,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub last_login_at: Option<chrono::NaiveDateTime>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            uuid: user.uuid,
            username: user.username,
            email: user.email,
            role: user.role,
            kyc_status: user.kyc_status,
            account_status: user.account_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login_at: user.last_login_at,
        }
    }
}

fn user_repo(state: &AppState) -> AppResult<&Arc<dyn UserRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn UserRepository>>()
        .ok_or(AppError::InternalServerError(
            "UserRepository not registered".to_string(),
        ))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let repo = user_repo(&state)?;
    let user = UserService::register(
        repo.as_ref(),
        RegisterUserInput {
            username: req.username,
            email: req.email,
            role: req.role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let repo = user_repo(&state)?;
    let user = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

pub async fn get_me(
    State(state): State<AppState>,
    claims: Claims,
) -> AppResult<Json<UserResponse>> {
    let repo = user_repo(&state)?;
    let user = repo
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

pub async fn update_me(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let repo = user_repo(&state)?;
    let user = UserService::update_profile(
        repo.as_ref(),
        &claims.sub,
        UpdateProfileInput {
            username: req.username,
            email: req.email,
        },
    )
    .await?;
    Ok(Json(user.into()))
}

pub async fn review_kyc(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<KycReviewRequest>,
) -> AppResult<Json<UserResponse>> {
    policy::require(&claims.role, Action::ReviewKyc)?;

    let repo = user_repo(&state)?;
    let user = UserService::review_kyc(repo.as_ref(), id, req.verdict).await?;
    Ok(Json(user.into()))
}
