use async_trait::async_trait;
use sha2::{Digest, Sha512};
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use super::adapter::{ChainAdapter, ChainEntityKind};
use crate::shared::error::{AppError, AppResult};

/// Gateway stand-in for dev and tests. Derives deterministic addresses
/// and keeps mirrored statuses in memory.
#[derive(Default)]
pub struct MockChainAdapter {
    statuses: Arc<Mutex<HashMap<String, String>>>,
    nonce: AtomicU64,
    failing: AtomicBool,
}

impl MockChainAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail, for exercising failure paths.
    pub fn fail_next_calls(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ChainError("Gateway unavailable".to_string()));
        }
        Ok(())
    }

    fn derive_address(kind: ChainEntityKind, entity_id: i32, nonce: u64) -> String {
        let raw = format!("{}|{}|{}", kind.as_str(), entity_id, nonce);
        let mut hasher = Sha512::new();
        hasher.update(raw);
        let digest = hasher.finalize();
        format!("0x{:x}", digest)[..42].to_string()
    }
}

#[async_trait]
impl ChainAdapter for MockChainAdapter {
    async fn deploy_contract(&self, kind: ChainEntityKind, entity_id: i32) -> AppResult<String> {
        self.check_available()?;
        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let address = Self::derive_address(kind, entity_id, nonce);
        self.statuses
            .lock()
            .unwrap()
            .insert(address.clone(), "PENDING".to_string());
        Ok(address)
    }

    async fn mirror_status(&self, address: &str, status: &str) -> AppResult<()> {
        self.check_available()?;
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.get_mut(address) {
            Some(existing) => {
                *existing = status.to_string();
                Ok(())
            }
            None => Err(AppError::ChainError(format!(
                "Unknown contract address {}",
                address
            ))),
        }
    }

    async fn record_verification(
        &self,
        address: &str,
        verified: bool,
        _note: Option<&str>,
    ) -> AppResult<()> {
        self.check_available()?;
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.get_mut(address) {
            Some(existing) => {
                *existing = if verified {
                    "VERIFIED".to_string()
                } else {
                    "REJECTED".to_string()
                };
                Ok(())
            }
            None => Err(AppError::ChainError(format!(
                "Unknown contract address {}",
                address
            ))),
        }
    }

    async fn fetch_status(&self, address: &str) -> AppResult<Option<String>> {
        self.check_available()?;
        Ok(self.statuses.lock().unwrap().get(address).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deploy_yields_unique_addresses_and_tracks_status() {
        let adapter = MockChainAdapter::new();

        let a = adapter
            .deploy_contract(ChainEntityKind::Donation, 1)
            .await
            .unwrap();
        let b = adapter
            .deploy_contract(ChainEntityKind::Donation, 1)
            .await
            .unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("0x") && a.len() == 42);

        adapter.mirror_status(&a, "CONFIRMED").await.unwrap();
        assert_eq!(
            adapter.fetch_status(&a).await.unwrap(),
            Some("CONFIRMED".to_string())
        );
        assert_eq!(adapter.fetch_status("0xdead").await.unwrap(), None);
    }

    #[tokio::test]
    async fn mirroring_unknown_address_fails() {
        let adapter = MockChainAdapter::new();
        let err = adapter.mirror_status("0xdead", "CONFIRMED").await.unwrap_err();
        assert!(matches!(err, AppError::ChainError(_)));
    }

    #[tokio::test]
    async fn failure_mode_rejects_deploys() {
        let adapter = MockChainAdapter::new();
        adapter.fail_next_calls(true);
        let err = adapter
            .deploy_contract(ChainEntityKind::Delivery, 7)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ChainError(_)));
    }
}
