use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::feeding_needs::entities::feeding_need::{self, NeedStatus};
use crate::modules::feeding_needs::repository::FeedingNeedRepository;
use crate::modules::feeding_needs::service::{CreateNeedInput, FeedingNeedService};
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::{
    error::{AppError, AppResult},
    pagination::{PageParams, Paginated},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateNeedRequest {
    /// Admins may create on behalf of an NGO.
    pub ngo_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    #[serde(default)]
    pub meals_target: i32,
}

#[derive(Deserialize)]
pub struct FundRequest {
    pub amount: i64,
}

#[derive(Deserialize)]
pub struct ListNeedsQuery {
    pub ngo_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct NeedResponse {
    pub id: i32,
    pub ngo_id: i32,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    pub funded_amount: i64,
    pub meals_target: i32,
    pub status: NeedStatus,
    pub percent_funded: u8,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<feeding_need::Model> for NeedResponse {
    fn from(need: feeding_need::Model) -> Self {
        let status = need.status();
        let percent_funded = need.percent_funded();
        Self {
            id: need.id,
            ngo_id: need.ngo_id,
            title: need.title,
            description: need.description,
            target_amount: need.target_amount,
            funded_amount: need.funded_amount,
            meals_target: need.meals_target,
            status,
            percent_funded,
            created_at: need.created_at,
            updated_at: need.updated_at,
        }
    }
}

fn need_repo(state: &AppState) -> AppResult<&Arc<dyn FeedingNeedRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn FeedingNeedRepository>>()
        .ok_or(AppError::InternalServerError(
            "FeedingNeedRepository not registered".to_string(),
        ))
}

fn user_repo(state: &AppState) -> AppResult<&Arc<dyn UserRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn UserRepository>>()
        .ok_or(AppError::InternalServerError(
            "UserRepository not registered".to_string(),
        ))
}

pub async fn create_need(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreateNeedRequest>,
) -> AppResult<(StatusCode, Json<NeedResponse>)> {
    policy::require(&claims.role, Action::CreateFeedingNeed)?;

    let users = user_repo(&state)?;
    let caller = users
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("Unknown user".to_string()))?;

    let ngo_id = match req.ngo_id {
        Some(id) if caller.role == Role::Admin => id,
        _ => caller.id,
    };

    let need = FeedingNeedService::create(
        need_repo(&state)?.as_ref(),
        users.as_ref(),
        CreateNeedInput {
            ngo_id,
            title: req.title,
            description: req.description,
            target_amount: req.target_amount,
            meals_target: req.meals_target,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(need.into())))
}

pub async fn fund_need(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<FundRequest>,
) -> AppResult<Json<NeedResponse>> {
    policy::require(&claims.role, Action::FundFeedingNeed)?;

    let need = FeedingNeedService::fund(need_repo(&state)?.as_ref(), id, req.amount).await?;
    Ok(Json(need.into()))
}

pub async fn get_need(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> AppResult<Json<NeedResponse>> {
    let need = need_repo(&state)?
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(need.into()))
}

pub async fn list_needs(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<ListNeedsQuery>,
) -> AppResult<Json<Paginated<NeedResponse>>> {
    let params = PageParams {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(20),
    };
    let page = FeedingNeedService::list(need_repo(&state)?.as_ref(), query.ngo_id, params).await?;
    Ok(Json(page.map(Into::into)))
}
