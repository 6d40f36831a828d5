use async_trait::async_trait;
use sea_orm::*;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::chain::entities::contract;
use crate::modules::chain::repository::ContractRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresContractRepository = SeaOrmRepository<contract::Entity>;

impl_sea_orm_repo!(PostgresContractRepository, ContractRepository, {
    async fn find_by_address(&self, address: &str) -> AppResult<Option<contract::Model>> {
        let query = contract::Entity::find().filter(contract::Column::Address.eq(address));
        match &self.conn {
            DbOrTxn::Conn(c) => query.one(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query.one(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn insert(&self, contract: contract::ActiveModel) -> AppResult<contract::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => contract.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                contract.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }
});

// =========================================================================
// InMemory Implementation
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryContractRepository {
    contracts: Arc<Mutex<Vec<contract::Model>>>,
    counter: Arc<Mutex<i32>>,
}

#[async_trait]
impl ContractRepository for InMemoryContractRepository {
    async fn find_by_address(&self, address: &str) -> AppResult<Option<contract::Model>> {
        let contracts = self.contracts.lock().unwrap();
        Ok(contracts.iter().find(|c| c.address == address).cloned())
    }

    async fn insert(&self, contract: contract::ActiveModel) -> AppResult<contract::Model> {
        let mut contracts = self.contracts.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = contract::Model {
            id: *counter,
            address: contract.address.unwrap(),
            entity_type: contract.entity_type.unwrap(),
            entity_id: contract.entity_id.unwrap(),
            network: contract.network.unwrap(),
            created_at: contract.created_at.unwrap(),
        };
        contracts.push(model.clone());
        Ok(model)
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn ContractRepository>> {
        Some(Box::new(self.clone()))
    }
}
