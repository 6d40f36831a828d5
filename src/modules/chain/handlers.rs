use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use crate::modules::auth::service::Claims;
use crate::modules::chain::entities::contract;
use crate::modules::chain::repository::ContractRepository;
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Serialize)]
pub struct ContractResponse {
    pub address: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub network: String,
    pub created_at: chrono::NaiveDateTime,
    /// Gateway-reported status, when the gateway still knows the address.
    pub chain_status: Option<String>,
}

pub async fn get_contract(
    State(state): State<AppState>,
    _claims: Claims,
    Path(address): Path<String>,
) -> AppResult<Json<ContractResponse>> {
    let repo = state
        .repo_manager
        .get::<Arc<dyn ContractRepository>>()
        .ok_or(AppError::InternalServerError(
            "ContractRepository not registered".to_string(),
        ))?;

    let record: contract::Model = repo
        .find_by_address(&address)
        .await?
        .ok_or(AppError::NotFound)?;

    let chain_status = state.chain.fetch_status(&record.address).await?;

    Ok(Json(ContractResponse {
        address: record.address,
        entity_type: record.entity_type,
        entity_id: record.entity_id,
        network: record.network,
        created_at: record.created_at,
        chain_status,
    }))
}
