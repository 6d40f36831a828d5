use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::deliveries::repository::DeliveryRepository;
use crate::modules::donations::repository::DonationRepository;
use crate::modules::feeding_needs::repository::FeedingNeedRepository;
use crate::modules::impact::entities::impact::{self, EntityType, ImpactCategory};
use crate::modules::impact::repository::ImpactRepository;
use crate::modules::impact::service::{
    DayActivity, DonationDistributions, OverviewStats, RecordImpactInput, StatisticsService,
};
use crate::modules::users::repository::UserRepository;
use crate::shared::{
    error::{AppError, AppResult},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct RecordImpactRequest {
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub category: ImpactCategory,
    pub value: i64,
    pub unit: String,
}

#[derive(Deserialize)]
pub struct ListImpactQuery {
    pub entity_type: EntityType,
    pub entity_id: i32,
}

#[derive(Deserialize)]
pub struct TimelineQuery {
    pub days: Option<i64>,
}

fn impact_repo(state: &AppState) -> AppResult<&Arc<dyn ImpactRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn ImpactRepository>>()
        .ok_or(AppError::InternalServerError(
            "ImpactRepository not registered".to_string(),
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

fn delivery_repo(state: &AppState) -> AppResult<&Arc<dyn DeliveryRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn DeliveryRepository>>()
        .ok_or(AppError::InternalServerError(
            "DeliveryRepository not registered".to_string(),
        ))
}

pub async fn record_impact(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<RecordImpactRequest>,
) -> AppResult<(StatusCode, Json<impact::Model>)> {
    policy::require(&claims.role, Action::RecordImpact)?;

    let record = StatisticsService::record(
        impact_repo(&state)?.as_ref(),
        RecordImpactInput {
            entity_type: req.entity_type,
            entity_id: req.entity_id,
            category: req.category,
            value: req.value,
            unit: req.unit,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_impact(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<ListImpactQuery>,
) -> AppResult<Json<Vec<impact::Model>>> {
    let records = impact_repo(&state)?
        .list_for_entity(query.entity_type, query.entity_id)
        .await?;
    Ok(Json(records))
}

pub async fn overview(
    State(state): State<AppState>,
    _claims: Claims,
) -> AppResult<Json<OverviewStats>> {
    let users = state.repo_manager.get::<Arc<dyn UserRepository>>().ok_or(
        AppError::InternalServerError("UserRepository not registered".to_string()),
    )?;
    let needs = state
        .repo_manager
        .get::<Arc<dyn FeedingNeedRepository>>()
        .ok_or(AppError::InternalServerError(
            "FeedingNeedRepository not registered".to_string(),
        ))?;

    let stats = StatisticsService::overview(
        donation_repo(&state)?.as_ref(),
        delivery_repo(&state)?.as_ref(),
        users.as_ref(),
        needs.as_ref(),
        impact_repo(&state)?.as_ref(),
    )
    .await?;
    Ok(Json(stats))
}

pub async fn donation_distributions(
    State(state): State<AppState>,
    _claims: Claims,
) -> AppResult<Json<DonationDistributions>> {
    let dist = StatisticsService::donation_distributions(donation_repo(&state)?.as_ref()).await?;
    Ok(Json(dist))
}

pub async fn timeline(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<TimelineQuery>,
) -> AppResult<Json<Vec<DayActivity>>> {
    let timeline = StatisticsService::timeline(
        donation_repo(&state)?.as_ref(),
        delivery_repo(&state)?.as_ref(),
        query.days,
    )
    .await?;
    Ok(Json(timeline))
}
