use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::feeding_needs::entities::feeding_need;
use crate::modules::feeding_needs::repository::FeedingNeedRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::pagination::PageParams;
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresFeedingNeedRepository = SeaOrmRepository<feeding_need::Entity>;

impl_sea_orm_repo!(PostgresFeedingNeedRepository, FeedingNeedRepository, {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<feeding_need::Model>> {
        let query = feeding_need::Entity::find_by_id(id);
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

    async fn insert(&self, need: feeding_need::ActiveModel) -> AppResult<feeding_need::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => need.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                need.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn update(&self, need: feeding_need::ActiveModel) -> AppResult<feeding_need::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => need.update(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                need.update(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn list(
        &self,
        ngo_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<feeding_need::Model>, u64)> {
        match &self.conn {
            DbOrTxn::Conn(c) => Self::list_internal(c.as_ref(), ngo_id, params).await,
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                Self::list_internal(txn, ngo_id, params).await
            }
        }
    }

    async fn total_funded(&self) -> AppResult<i64> {
        let query = feeding_need::Entity::find().select_only().column_as(
            Expr::col((feeding_need::Entity, feeding_need::Column::FundedAmount))
                .sum()
                .cast_as(Alias::new("BIGINT")),
            "total",
        );
        let total = match &self.conn {
            DbOrTxn::Conn(c) => query
                .into_tuple::<Option<i64>>()
                .one(c.as_ref())
                .await
                .map_err(AppError::DbError)?,
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query
                    .into_tuple::<Option<i64>>()
                    .one(txn)
                    .await
                    .map_err(AppError::DbError)?
            }
        };
        Ok(total.flatten().unwrap_or(0))
    }
});

impl SeaOrmRepository<feeding_need::Entity> {
    async fn list_internal<C>(
        db: &C,
        ngo_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<feeding_need::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let mut query = feeding_need::Entity::find();
        if let Some(ngo_id) = ngo_id {
            query = query.filter(feeding_need::Column::NgoId.eq(ngo_id));
        }

        let paginator = query
            .order_by_desc(feeding_need::Column::CreatedAt)
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
pub struct InMemoryFeedingNeedRepository {
    needs: Arc<Mutex<HashMap<i32, feeding_need::Model>>>,
    counter: Arc<Mutex<i32>>,
}

#[async_trait]
impl FeedingNeedRepository for InMemoryFeedingNeedRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<feeding_need::Model>> {
        let needs = self.needs.lock().unwrap();
        Ok(needs.get(&id).cloned())
    }

    async fn insert(&self, need: feeding_need::ActiveModel) -> AppResult<feeding_need::Model> {
        let mut needs = self.needs.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = feeding_need::Model {
            id: *counter,
            ngo_id: need.ngo_id.unwrap(),
            title: need.title.unwrap(),
            description: need.description.unwrap(),
            target_amount: need.target_amount.unwrap(),
            funded_amount: need.funded_amount.unwrap(),
            meals_target: need.meals_target.unwrap(),
            created_at: need.created_at.unwrap(),
            updated_at: need.updated_at.unwrap(),
        };
        needs.insert(*counter, model.clone());
        Ok(model)
    }

    async fn update(&self, need: feeding_need::ActiveModel) -> AppResult<feeding_need::Model> {
        let mut needs = self.needs.lock().unwrap();
        let id = need.id.clone().unwrap();
        let existing = needs.get_mut(&id).ok_or(AppError::NotFound)?;

        if let ActiveValue::Set(v) = need.title {
            existing.title = v;
        }
        if let ActiveValue::Set(v) = need.description {
            existing.description = v;
        }
        if let ActiveValue::Set(v) = need.target_amount {
            existing.target_amount = v;
        }
        if let ActiveValue::Set(v) = need.funded_amount {
            existing.funded_amount = v;
        }
        if let ActiveValue::Set(v) = need.meals_target {
            existing.meals_target = v;
        }
        if let ActiveValue::Set(v) = need.updated_at {
            existing.updated_at = v;
        }
        Ok(existing.clone())
    }

    async fn list(
        &self,
        ngo_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<feeding_need::Model>, u64)> {
        let needs = self.needs.lock().unwrap();
        let mut matching: Vec<feeding_need::Model> = needs
            .values()
            .filter(|n| ngo_id.map_or(true, |id| n.ngo_id == id))
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

    async fn total_funded(&self) -> AppResult<i64> {
        let needs = self.needs.lock().unwrap();
        Ok(needs.values().map(|n| n.funded_amount).sum())
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn FeedingNeedRepository>> {
        Some(Box::new(self.clone()))
    }
}
