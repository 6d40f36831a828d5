use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::food_packs::entities::food_pack;
use crate::modules::food_packs::repository::FoodPackRepository;
use crate::modules::food_packs::service::{CreatePackInput, FoodPackService};
use crate::modules::impact::repository::ImpactRepository;
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::{
    error::{AppError, AppResult},
    pagination::{PageParams, Paginated},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreatePackRequest {
    /// Admins may create on behalf of a provider.
    pub provider_id: Option<i32>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub price: i64,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct SponsorRequest {
    pub count: i32,
}

#[derive(Deserialize)]
pub struct ListPacksQuery {
    pub provider_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn pack_repo(state: &AppState) -> AppResult<&Arc<dyn FoodPackRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn FoodPackRepository>>()
        .ok_or(AppError::InternalServerError(
            "FoodPackRepository not registered".to_string(),
        ))
}

fn impact_repo(state: &AppState) -> AppResult<&Arc<dyn ImpactRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn ImpactRepository>>()
        .ok_or(AppError::InternalServerError(
            "ImpactRepository not registered".to_string(),
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

pub async fn create_pack(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreatePackRequest>,
) -> AppResult<(StatusCode, Json<food_pack::Model>)> {
    policy::require(&claims.role, Action::CreateFoodPack)?;

    let users = user_repo(&state)?;
    let caller = users
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("Unknown user".to_string()))?;

    let provider_id = match req.provider_id {
        Some(id) if caller.role == Role::Admin => id,
        _ => caller.id,
    };

    let pack = FoodPackService::create(
        pack_repo(&state)?.as_ref(),
        users.as_ref(),
        CreatePackInput {
            provider_id,
            name: req.name,
            description: req.description,
            price: req.price,
            quantity: req.quantity,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(pack)))
}

pub async fn get_pack(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> AppResult<Json<food_pack::Model>> {
    let pack = pack_repo(&state)?
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(pack))
}

pub async fn list_packs(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<ListPacksQuery>,
) -> AppResult<Json<Paginated<food_pack::Model>>> {
    let params = PageParams {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(20),
    };
    let page =
        FoodPackService::list(pack_repo(&state)?.as_ref(), query.provider_id, params).await?;
    Ok(Json(page))
}

pub async fn update_quantity(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<UpdateQuantityRequest>,
) -> AppResult<Json<food_pack::Model>> {
    policy::require(&claims.role, Action::UpdateFoodPackQuantity)?;

    let pack =
        FoodPackService::update_quantity(pack_repo(&state)?.as_ref(), id, req.quantity).await?;
    Ok(Json(pack))
}

pub async fn sponsor_pack(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<SponsorRequest>,
) -> AppResult<Json<food_pack::Model>> {
    policy::require(&claims.role, Action::SponsorFoodPack)?;

    let users = user_repo(&state)?;
    let caller = users
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("Unknown user".to_string()))?;

    let pack = FoodPackService::sponsor(
        state.repo_manager.as_ref(),
        pack_repo(&state)?.as_ref(),
        impact_repo(&state)?.as_ref(),
        users.as_ref(),
        caller.id,
        id,
        req.count,
    )
    .await?;
    Ok(Json(pack))
}
