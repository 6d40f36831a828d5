use async_trait::async_trait;
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::food_packs::entities::food_pack;
use crate::modules::food_packs::repository::FoodPackRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::pagination::PageParams;
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresFoodPackRepository = SeaOrmRepository<food_pack::Entity>;

impl_sea_orm_repo!(PostgresFoodPackRepository, FoodPackRepository, {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<food_pack::Model>> {
        let query = food_pack::Entity::find_by_id(id);
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

    async fn insert(&self, pack: food_pack::ActiveModel) -> AppResult<food_pack::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => pack.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                pack.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn update(&self, pack: food_pack::ActiveModel) -> AppResult<food_pack::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => pack.update(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                pack.update(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn list(
        &self,
        provider_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<food_pack::Model>, u64)> {
        match &self.conn {
            DbOrTxn::Conn(c) => Self::list_internal(c.as_ref(), provider_id, params).await,
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                Self::list_internal(txn, provider_id, params).await
            }
        }
    }
});

impl SeaOrmRepository<food_pack::Entity> {
    async fn list_internal<C>(
        db: &C,
        provider_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<food_pack::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let mut query = food_pack::Entity::find();
        if let Some(provider_id) = provider_id {
            query = query.filter(food_pack::Column::ProviderId.eq(provider_id));
        }

        let paginator = query
            .order_by_desc(food_pack::Column::CreatedAt)
            .paginate(db, params.limit);
        let total = paginator.num_items().await.map_err(AppError::DbError)?;
        let rows = paginator
            .fetch_page(params.page - 1)
            .await
            .map_err(AppError::DbError)?;
        Ok((rows, total))
    }
}

// =========================================================================
// InMemory Implementation
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryFoodPackRepository {
    packs: Arc<Mutex<HashMap<i32, food_pack::Model>>>,
    counter: Arc<Mutex<i32>>,
}

#[async_trait]
impl FoodPackRepository for InMemoryFoodPackRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<food_pack::Model>> {
        let packs = self.packs.lock().unwrap();
        Ok(packs.get(&id).cloned())
    }

    async fn insert(&self, pack: food_pack::ActiveModel) -> AppResult<food_pack::Model> {
        let mut packs = self.packs.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = food_pack::Model {
            id: *counter,
            provider_id: pack.provider_id.unwrap(),
            name: pack.name.unwrap(),
            description: pack.description.unwrap(),
            price: pack.price.unwrap(),
            quantity: pack.quantity.unwrap(),
            available_quantity: pack.available_quantity.unwrap(),
            sponsored_quantity: pack.sponsored_quantity.unwrap(),
            created_at: pack.created_at.unwrap(),
            updated_at: pack.updated_at.unwrap(),
        };
        packs.insert(*counter, model.clone());
        Ok(model)
    }

    async fn update(&self, pack: food_pack::ActiveModel) -> AppResult<food_pack::Model> {
        let mut packs = self.packs.lock().unwrap();
        let id = pack.id.clone().unwrap();
        let existing = packs.get_mut(&id).ok_or(AppError::NotFound)?;

        if let ActiveValue::Set(v) = pack.name {
            existing.name = v;
        }
        if let ActiveValue::Set(v) = pack.description {
            existing.description = v;
        }
        if let ActiveValue::Set(v) = pack.price {
            existing.price = v;
        }
        if let ActiveValue::Set(v) = pack.quantity {
            existing.quantity = v;
        }
        if let ActiveValue::Set(v) = pack.available_quantity {
            existing.available_quantity = v;
        }
        if let ActiveValue::Set(v) = pack.sponsored_quantity {
            existing.sponsored_quantity = v;
        }
        if let ActiveValue::Set(v) = pack.updated_at {
            existing.updated_at = v;
        }
        Ok(existing.clone())
    }

    async fn list(
        &self,
        provider_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<food_pack::Model>, u64)> {
        let packs = self.packs.lock().unwrap();
        let mut matching: Vec<food_pack::Model> = packs
            .values()
            .filter(|p| provider_id.map_or(true, |id| p.provider_id == id))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit as usize)
            .collect();
        Ok((page, total))
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn FoodPackRepository>> {
        Some(Box::new(self.clone()))
    }
}
