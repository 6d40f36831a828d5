use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::deliveries::entities::{delivery, enums::DeliveryStatus};
use crate::modules::deliveries::repository::{DeliveryFilter, DeliveryRepository};
use crate::modules::deliveries::service::{
    CreateDeliveryInput, DeliveryService, VerifyDeliveryInput,
};
use crate::modules::donations::repository::DonationRepository;
use crate::modules::users::repository::UserRepository;
use crate::shared::{
    error::{AppError, AppResult},
    pagination::{PageParams, Paginated},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateDeliveryRequest {
    /// Defaults to the caller for logistics users.
    pub logistics_id: Option<i32>,
    pub donation_id: Option<i32>,
    pub food_pack_id: Option<i32>,
    pub feeding_need_id: Option<i32>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub scheduled_at: Option<chrono::NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DeliveryStatus,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub verified: bool,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct ListDeliveriesQuery {
    pub status: Option<DeliveryStatus>,
    pub logistics_id: Option<i32>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn delivery_repo(state: &AppState) -> AppResult<&Arc<dyn DeliveryRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn DeliveryRepository>>()
        .ok_or(AppError::InternalServerError(
            "DeliveryRepository not registered".to_string(),
        ))
}

fn donation_repo(state: &AppState) -> AppResult<&Arc<dyn DonationRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn DonationRepository>>()
        .ok_or(AppError::InternalServerError(
            "DonationRepository not registered".to_string(),
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

pub async fn create_delivery(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreateDeliveryRequest>,
) -> AppResult<(StatusCode, Json<delivery::Model>)> {
    policy::require(&claims.role, Action::CreateDelivery)?;

    let users = user_repo(&state)?;
    let caller = users
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("Unknown user".to_string()))?;

    let logistics_id = req.logistics_id.unwrap_or(caller.id);

    let record = DeliveryService::create(
        delivery_repo(&state)?.as_ref(),
        users.as_ref(),
        donation_repo(&state)?.as_ref(),
        CreateDeliveryInput {
            logistics_id,
            donation_id: req.donation_id,
            food_pack_id: req.food_pack_id,
            feeding_need_id: req.feeding_need_id,
            pickup_address: req.pickup_address,
            dropoff_address: req.dropoff_address,
            scheduled_at: req.scheduled_at,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_delivery(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> AppResult<Json<delivery::Model>> {
    let record = delivery_repo(&state)?
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

pub async fn list_deliveries(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<ListDeliveriesQuery>,
) -> AppResult<Json<Paginated<delivery::Model>>> {
    let filter = DeliveryFilter {
        status: query.status,
        logistics_id: query.logistics_id,
    };
    let params = PageParams {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(20),
    };

    let page = DeliveryService::list(delivery_repo(&state)?.as_ref(), &filter, params).await?;
    Ok(Json(page))
}

pub async fn update_status(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<delivery::Model>> {
    policy::require(&claims.role, Action::UpdateDeliveryStatus)?;

    let record = DeliveryService::update_status(
        delivery_repo(&state)?.as_ref(),
        state.chain.as_ref(),
        id,
        req.status,
    )
    .await?;
    Ok(Json(record))
}

pub async fn verify_delivery(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<VerifyRequest>,
) -> AppResult<Json<delivery::Model>> {
    policy::require(&claims.role, Action::VerifyDelivery)?;

    let users = user_repo(&state)?;
    let caller = users
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("Unknown user".to_string()))?;

    let record = DeliveryService::verify(
        delivery_repo(&state)?.as_ref(),
        users.as_ref(),
        state.chain.as_ref(),
        id,
        VerifyDeliveryInput {
            verifier_id: caller.id,
            verified: req.verified,
            note: req.note,
        },
    )
    .await?;
    Ok(Json(record))
}
