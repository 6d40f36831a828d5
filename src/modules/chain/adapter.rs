use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::shared::error::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainEntityKind {
    Donation,
    Delivery,
}

impl ChainEntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainEntityKind::Donation => "donation",
            ChainEntityKind::Delivery => "delivery",
        }
    }
}

/// Client-side mirror of the contract gateway. Deploys a contract per
/// tracked entity and mirrors lifecycle events onto it. All contract
/// semantics live on the gateway side; this adapter only calls and
/// records.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    async fn deploy_contract(&self, kind: ChainEntityKind, entity_id: i32) -> AppResult<String>;

    async fn mirror_status(&self, address: &str, status: &str) -> AppResult<()>;

    async fn record_verification(
        &self,
        address: &str,
        verified: bool,
        note: Option<&str>,
    ) -> AppResult<()>;

    /// Gateway-reported status, or None when the gateway does not know
    /// the address.
    async fn fetch_status(&self, address: &str) -> AppResult<Option<String>>;
}

pub struct HttpChainAdapter {
    base_url: String,
    api_key: String,
    network: String,
    client: Client,
}

impl HttpChainAdapter {
    pub fn new(base_url: String, api_key: String, network: String) -> Self {
        Self {
            base_url,
            api_key,
            network,
            client: Client::new(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct DeployResponse {
    address: String,
}

#[derive(Deserialize, Debug)]
struct StatusResponse {
    status: Option<String>,
}

#[async_trait]
impl ChainAdapter for HttpChainAdapter {
    async fn deploy_contract(&self, kind: ChainEntityKind, entity_id: i32) -> AppResult<String> {
        let res = self
            .client
            .post(format!("{}/contracts", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "entity_type": kind.as_str(),
                "entity_id": entity_id,
                "network": self.network,
            }))
            .send()
            .await
            .map_err(|e| AppError::ChainError(format!("Deploy request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::ChainError(format!("Deploy rejected: {}", e)))?
            .json::<DeployResponse>()
            .await
            .map_err(|e| AppError::ChainError(format!("Deploy response parse failed: {}", e)))?;

        Ok(res.address)
    }

    async fn mirror_status(&self, address: &str, status: &str) -> AppResult<()> {
        self.client
            .post(format!("{}/contracts/{}/status", self.base_url, address))
            .bearer_auth(&self.api_key)
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(|e| AppError::ChainError(format!("Status mirror failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::ChainError(format!("Status mirror rejected: {}", e)))?;

        Ok(())
    }

    async fn record_verification(
        &self,
        address: &str,
        verified: bool,
        note: Option<&str>,
    ) -> AppResult<()> {
        self.client
            .post(format!(
                "{}/contracts/{}/verification",
                self.base_url, address
            ))
            .bearer_auth(&self.api_key)
            .json(&json!({ "verified": verified, "note": note }))
            .send()
            .await
            .map_err(|e| AppError::ChainError(format!("Verification call failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AppError::ChainError(format!("Verification rejected: {}", e)))?;

        Ok(())
    }

    async fn fetch_status(&self, address: &str) -> AppResult<Option<String>> {
        let res = self
            .client
            .get(format!("{}/contracts/{}", self.base_url, address))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::ChainError(format!("Status fetch failed: {}", e)))?;

        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let res = res
            .error_for_status()
            .map_err(|e| AppError::ChainError(format!("Status fetch rejected: {}", e)))?
            .json::<StatusResponse>()
            .await
            .map_err(|e| AppError::ChainError(format!("Status parse failed: {}", e)))?;

        Ok(res.status)
    }
}
