use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::deliveries::entities::{delivery, enums::DeliveryStatus};
use crate::modules::deliveries::repository::{DeliveryFilter, DeliveryRepository};
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::pagination::PageParams;
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresDeliveryRepository = SeaOrmRepository<delivery::Entity>;

impl_sea_orm_repo!(PostgresDeliveryRepository, DeliveryRepository, {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<delivery::Model>> {
        let query = delivery::Entity::find_by_id(id);
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

    async fn insert(&self, delivery: delivery::ActiveModel) -> AppResult<delivery::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => delivery.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                delivery.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn update(&self, delivery: delivery::ActiveModel) -> AppResult<delivery::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => delivery.update(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                delivery.update(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn list(
        &self,
        filter: &DeliveryFilter,
        params: PageParams,
    ) -> AppResult<(Vec<delivery::Model>, u64)> {
        match &self.conn {
            DbOrTxn::Conn(c) => Self::list_internal(c.as_ref(), filter, params).await,
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                Self::list_internal(txn, filter, params).await
            }
        }
    }

    async fn find_active_by_donation(
        &self,
        donation_id: i32,
    ) -> AppResult<Option<delivery::Model>> {
        let query = delivery::Entity::find()
            .filter(delivery::Column::DonationId.eq(donation_id))
            .filter(delivery::Column::Status.is_not_in([
                DeliveryStatus::Delivered,
                DeliveryStatus::Cancelled,
            ]));
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

    async fn count_by_status(&self) -> AppResult<Vec<(DeliveryStatus, i64)>> {
        let query = delivery::Entity::find()
            .select_only()
            .column(delivery::Column::Status)
            .column_as(delivery::Column::Id.count(), "count")
            .group_by(delivery::Column::Status);
        match &self.conn {
            DbOrTxn::Conn(c) => query
                .into_tuple::<(DeliveryStatus, i64)>()
                .all(c.as_ref())
                .await
                .map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query
                    .into_tuple::<(DeliveryStatus, i64)>()
                    .all(txn)
                    .await
                    .map_err(AppError::DbError)
            }
        }
    }

    async fn created_since(&self, since: NaiveDateTime) -> AppResult<Vec<delivery::Model>> {
        let query = delivery::Entity::find()
            .filter(delivery::Column::CreatedAt.gte(since))
            .order_by_asc(delivery::Column::CreatedAt);
        match &self.conn {
            DbOrTxn::Conn(c) => query.all(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query.all(txn).await.map_err(AppError::DbError)
            }
        }
    }
});

impl SeaOrmRepository<delivery::Entity> {
    async fn list_internal<C>(
        db: &C,
        filter: &DeliveryFilter,
        params: PageParams,
    ) -> AppResult<(Vec<delivery::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let mut query = delivery::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(delivery::Column::Status.eq(status));
        }
        if let Some(logistics_id) = filter.logistics_id {
            query = query.filter(delivery::Column::LogisticsId.eq(logistics_id));
        }

        let paginator = query
            .order_by_desc(delivery::Column::CreatedAt)
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
pub struct InMemoryDeliveryRepository {
    deliveries: Arc<Mutex<HashMap<i32, delivery::Model>>>,
    counter: Arc<Mutex<i32>>,
}

impl InMemoryDeliveryRepository {
    fn apply(existing: &mut delivery::Model, am: delivery::ActiveModel) {
        if let ActiveValue::Set(v) = am.logistics_id {
            existing.logistics_id = v;
        }
        if let ActiveValue::Set(v) = am.scheduled_at {
            existing.scheduled_at = v;
        }
        if let ActiveValue::Set(v) = am.status {
            existing.status = v;
        }
        if let ActiveValue::Set(v) = am.contract_address {
            existing.contract_address = v;
        }
        if let ActiveValue::Set(v) = am.verification_status {
            existing.verification_status = v;
        }
        if let ActiveValue::Set(v) = am.verified_by {
            existing.verified_by = v;
        }
        if let ActiveValue::Set(v) = am.verified_at {
            existing.verified_at = v;
        }
        if let ActiveValue::Set(v) = am.verification_note {
            existing.verification_note = v;
        }
        if let ActiveValue::Set(v) = am.updated_at {
            existing.updated_at = v;
        }
    }

    fn unwrap_opt<T>(value: ActiveValue<Option<T>>) -> Option<T>
    where
        Option<T>: Into<sea_orm::Value>,
    {
        match value {
            ActiveValue::Set(v) => v,
            _ => None,
        }
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryDeliveryRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<delivery::Model>> {
        let deliveries = self.deliveries.lock().unwrap();
        Ok(deliveries.get(&id).cloned())
    }

    async fn insert(&self, delivery: delivery::ActiveModel) -> AppResult<delivery::Model> {
        let mut deliveries = self.deliveries.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = delivery::Model {
            id: *counter,
            logistics_id: delivery.logistics_id.unwrap(),
            donation_id: Self::unwrap_opt(delivery.donation_id),
            food_pack_id: Self::unwrap_opt(delivery.food_pack_id),
            feeding_need_id: Self::unwrap_opt(delivery.feeding_need_id),
            pickup_address: delivery.pickup_address.unwrap(),
            dropoff_address: delivery.dropoff_address.unwrap(),
            scheduled_at: Self::unwrap_opt(delivery.scheduled_at),
            status: delivery.status.unwrap(),
            contract_address: Self::unwrap_opt(delivery.contract_address),
            verification_status: delivery.verification_status.unwrap(),
            verified_by: None,
            verified_at: None,
            verification_note: None,
            created_at: delivery.created_at.unwrap(),
            updated_at: delivery.updated_at.unwrap(),
        };
        deliveries.insert(*counter, model.clone());
        Ok(model)
    }

    async fn update(&self, delivery: delivery::ActiveModel) -> AppResult<delivery::Model> {
        let mut deliveries = self.deliveries.lock().unwrap();
        let id = delivery.id.clone().unwrap();
        let existing = deliveries.get_mut(&id).ok_or(AppError::NotFound)?;
        Self::apply(existing, delivery);
        Ok(existing.clone())
    }

    async fn list(
        &self,
        filter: &DeliveryFilter,
        params: PageParams,
    ) -> AppResult<(Vec<delivery::Model>, u64)> {
        let deliveries = self.deliveries.lock().unwrap();
        let mut matching: Vec<delivery::Model> = deliveries
            .values()
            .filter(|d| filter.status.map_or(true, |s| d.status == s))
            .filter(|d| filter.logistics_id.map_or(true, |id| d.logistics_id == id))
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

    async fn find_active_by_donation(
        &self,
        donation_id: i32,
    ) -> AppResult<Option<delivery::Model>> {
        let deliveries = self.deliveries.lock().unwrap();
        Ok(deliveries
            .values()
            .find(|d| d.donation_id == Some(donation_id) && !d.status.is_terminal())
            .cloned())
    }

    async fn count_by_status(&self) -> AppResult<Vec<(DeliveryStatus, i64)>> {
        let deliveries = self.deliveries.lock().unwrap();
        let mut counts: HashMap<DeliveryStatus, i64> = HashMap::new();
        for d in deliveries.values() {
            *counts.entry(d.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn created_since(&self, since: NaiveDateTime) -> AppResult<Vec<delivery::Model>> {
        let deliveries = self.deliveries.lock().unwrap();
        let mut rows: Vec<delivery::Model> = deliveries
            .values()
            .filter(|d| d.created_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn DeliveryRepository>> {
        Some(Box::new(self.clone()))
    }
}
