use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::chain::repository::ContractRepository;
use crate::modules::donations::entities::enums::{
    ChainSync, DonationCategory, DonationStatus, VerificationStatus,
};
use crate::modules::donations::repository::{DonationFilter, DonationRepository};
use crate::modules::donations::service::{CreateDonationInput, DonationService, DonationWithChain};
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::{
    error::{AppError, AppResult},
    pagination::{PageParams, Paginated},
    policy::{self, Action},
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateDonationRequest {
    pub category: DonationCategory,
    pub description: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    /// Admins may create on behalf of a donor.
    pub donor_id: Option<i32>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: DonationStatus,
}

#[derive(Deserialize)]
pub struct VerificationRequest {
    pub verdict: VerificationStatus,
}

#[derive(Deserialize)]
pub struct ListDonationsQuery {
    pub status: Option<DonationStatus>,
    pub category: Option<DonationCategory>,
    pub donor_id: Option<i32>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct DonationResponse {
    pub id: i32,
    pub donor_id: i32,
    pub category: DonationCategory,
    pub description: String,
    pub amount: i64,
    pub quantity: i32,
    pub status: DonationStatus,
    pub verification_status: VerificationStatus,
    pub contract_address: Option<String>,
    pub chain_sync: ChainSync,
    pub chain_status: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<DonationWithChain> for DonationResponse {
    fn from(row: DonationWithChain) -> Self {
        let d = row.donation;
        Self {
            id: d.id,
            donor_id: d.donor_id,
            category: d.category,
            description: d.description,
            amount: d.amount,
            quantity: d.quantity,
            status: d.status,
            verification_status: d.verification_status,
            contract_address: d.contract_address,
            chain_sync: d.chain_sync,
            chain_status: row.chain_status,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
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

fn contract_repo(state: &AppState) -> AppResult<&Arc<dyn ContractRepository>> {
    state
        .repo_manager
        .get::<Arc<dyn ContractRepository>>()
        .ok_or(AppError::InternalServerError(
            "ContractRepository not registered".to_string(),
        ))
}

pub async fn create_donation(
    State(state): State<AppState>,
    claims: Claims,
    Json(req): Json<CreateDonationRequest>,
) -> AppResult<(StatusCode, Json<DonationResponse>)> {
    policy::require(&claims.role, Action::CreateDonation)?;

    let users = user_repo(&state)?;
    let caller = users
        .find_by_uuid(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("Unknown user".to_string()))?;

    let donor_id = match req.donor_id {
        Some(id) if caller.role == Role::Admin => id,
        _ => caller.id,
    };

    let record = DonationService::create(
        donation_repo(&state)?.as_ref(),
        users.as_ref(),
        contract_repo(&state)?.as_ref(),
        state.chain.as_ref(),
        &state.config.chain_network,
        CreateDonationInput {
            donor_id,
            category: req.category,
            description: req.description,
            amount: req.amount,
            quantity: req.quantity,
        },
    )
    .await?;

    let chain_status = match &record.contract_address {
        Some(address) => state.chain.fetch_status(address).await?,
        None => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(
            DonationWithChain {
                donation: record,
                chain_status,
            }
            .into(),
        ),
    ))
}

pub async fn get_donation(
    State(state): State<AppState>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> AppResult<Json<DonationResponse>> {
    let row = DonationService::get_enriched(
        donation_repo(&state)?.as_ref(),
        state.chain.as_ref(),
        id,
    )
    .await?;
    Ok(Json(row.into()))
}

pub async fn list_donations(
    State(state): State<AppState>,
    _claims: Claims,
    Query(query): Query<ListDonationsQuery>,
) -> AppResult<Json<Paginated<DonationResponse>>> {
    let filter = DonationFilter {
        status: query.status,
        category: query.category,
        donor_id: query.donor_id,
        search: query.search,
    };
    let params = PageParams {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(20),
    };

    let page = DonationService::list(
        donation_repo(&state)?.as_ref(),
        state.chain.as_ref(),
        &filter,
        params,
    )
    .await?;

    Ok(Json(page.map(Into::into)))
}

pub async fn update_status(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<DonationResponse>> {
    policy::require(&claims.role, Action::UpdateDonationStatus)?;

    let record = DonationService::update_status(
        donation_repo(&state)?.as_ref(),
        state.chain.as_ref(),
        id,
        req.status,
    )
    .await?;

    let chain_status = match &record.contract_address {
        Some(address) => state.chain.fetch_status(address).await?,
        None => None,
    };

    Ok(Json(
        DonationWithChain {
            donation: record,
            chain_status,
        }
        .into(),
    ))
}

pub async fn review_verification(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(req): Json<VerificationRequest>,
) -> AppResult<Json<DonationResponse>> {
    policy::require(&claims.role, Action::VerifyDonation)?;

    let record =
        DonationService::review_verification(donation_repo(&state)?.as_ref(), id, req.verdict)
            .await?;

    Ok(Json(
        DonationWithChain {
            donation: record,
            chain_status: None,
        }
        .into(),
    ))
}
