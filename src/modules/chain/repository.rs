use async_trait::async_trait;

use super::entities::contract;
use crate::shared::error::AppResult;

#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn find_by_address(&self, address: &str) -> AppResult<Option<contract::Model>>;

    async fn insert(&self, contract: contract::ActiveModel) -> AppResult<contract::Model>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn ContractRepository>>;
}
