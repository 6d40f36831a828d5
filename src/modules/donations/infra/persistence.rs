use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::donations::entities::{
    donation,
    enums::{DonationCategory, DonationStatus},
};
use crate::modules::donations::repository::{DonationFilter, DonationRepository};
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::pagination::PageParams;
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresDonationRepository = SeaOrmRepository<donation::Entity>;

impl_sea_orm_repo!(PostgresDonationRepository, DonationRepository, {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<donation::Model>> {
        let query = donation::Entity::find_by_id(id);
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

    async fn insert(&self, donation: donation::ActiveModel) -> AppResult<donation::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => donation.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                donation.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn update(&self, donation: donation::ActiveModel) -> AppResult<donation::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => donation.update(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                donation.update(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn list(
        &self,
        filter: &DonationFilter,
        params: PageParams,
    ) -> AppResult<(Vec<donation::Model>, u64)> {
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

    async fn count_by_status(&self) -> AppResult<Vec<(DonationStatus, i64)>> {
        let query = donation::Entity::find()
            .select_only()
            .column(donation::Column::Status)
            .column_as(donation::Column::Id.count(), "count")
            .group_by(donation::Column::Status);
        match &self.conn {
            DbOrTxn::Conn(c) => query
                .into_tuple::<(DonationStatus, i64)>()
                .all(c.as_ref())
                .await
                .map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query
                    .into_tuple::<(DonationStatus, i64)>()
                    .all(txn)
                    .await
                    .map_err(AppError::DbError)
            }
        }
    }

    async fn count_by_category(&self) -> AppResult<Vec<(DonationCategory, i64)>> {
        let query = donation::Entity::find()
            .select_only()
            .column(donation::Column::Category)
            .column_as(donation::Column::Id.count(), "count")
            .group_by(donation::Column::Category);
        match &self.conn {
            DbOrTxn::Conn(c) => query
                .into_tuple::<(DonationCategory, i64)>()
                .all(c.as_ref())
                .await
                .map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query
                    .into_tuple::<(DonationCategory, i64)>()
                    .all(txn)
                    .await
                    .map_err(AppError::DbError)
            }
        }
    }

    async fn total_amount(&self) -> AppResult<i64> {
        // SUM(bigint) comes back as numeric, so cast before decoding.
        let query = donation::Entity::find().select_only().column_as(
            Expr::col((donation::Entity, donation::Column::Amount))
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

    async fn created_since(&self, since: NaiveDateTime) -> AppResult<Vec<donation::Model>> {
        let query = donation::Entity::find()
            .filter(donation::Column::CreatedAt.gte(since))
            .order_by_asc(donation::Column::CreatedAt);
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

impl SeaOrmRepository<donation::Entity> {
    async fn list_internal<C>(
        db: &C,
        filter: &DonationFilter,
        params: PageParams,
    ) -> AppResult<(Vec<donation::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let mut query = donation::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(donation::Column::Status.eq(status));
        }
        if let Some(category) = filter.category {
            query = query.filter(donation::Column::Category.eq(category));
        }
        if let Some(donor_id) = filter.donor_id {
            query = query.filter(donation::Column::DonorId.eq(donor_id));
        }
        if let Some(search) = &filter.search {
            query = query.filter(donation::Column::Description.contains(search));
        }

        let paginator = query
            .order_by_desc(donation::Column::CreatedAt)
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
pub struct InMemoryDonationRepository {
    donations: Arc<Mutex<HashMap<i32, donation::Model>>>,
    counter: Arc<Mutex<i32>>,
}

impl InMemoryDonationRepository {
    fn matches(filter: &DonationFilter, d: &donation::Model) -> bool {
        if let Some(status) = filter.status {
            if d.status != status {
                return false;
            }
        }
        if let Some(category) = filter.category {
            if d.category != category {
                return false;
            }
        }
        if let Some(donor_id) = filter.donor_id {
            if d.donor_id != donor_id {
                return false;
            }
        }
        if let Some(search) = &filter.search {
            if !d.description.contains(search.as_str()) {
                return false;
            }
        }
        true
    }

    fn apply(existing: &mut donation::Model, am: donation::ActiveModel) {
        if let ActiveValue::Set(v) = am.category {
            existing.category = v;
        }
        if let ActiveValue::Set(v) = am.description {
            existing.description = v;
        }
        if let ActiveValue::Set(v) = am.amount {
            existing.amount = v;
        }
        if let ActiveValue::Set(v) = am.quantity {
            existing.quantity = v;
        }
        if let ActiveValue::Set(v) = am.status {
            existing.status = v;
        }
        if let ActiveValue::Set(v) = am.verification_status {
            existing.verification_status = v;
        }
        if let ActiveValue::Set(v) = am.contract_address {
            existing.contract_address = v;
        }
        if let ActiveValue::Set(v) = am.chain_sync {
            existing.chain_sync = v;
        }
        if let ActiveValue::Set(v) = am.updated_at {
            existing.updated_at = v;
        }
    }
}

#[async_trait]
impl DonationRepository for InMemoryDonationRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<donation::Model>> {
        let donations = self.donations.lock().unwrap();
        Ok(donations.get(&id).cloned())
    }

    async fn insert(&self, donation: donation::ActiveModel) -> AppResult<donation::Model> {
        let mut donations = self.donations.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = donation::Model {
            id: *counter,
            donor_id: donation.donor_id.unwrap(),
            category: donation.category.unwrap(),
            description: donation.description.unwrap(),
            amount: donation.amount.unwrap(),
            quantity: donation.quantity.unwrap(),
            status: donation.status.unwrap(),
            verification_status: donation.verification_status.unwrap(),
            contract_address: match donation.contract_address {
                ActiveValue::Set(v) => v,
                _ => None,
            },
            chain_sync: donation.chain_sync.unwrap(),
            created_at: donation.created_at.unwrap(),
            updated_at: donation.updated_at.unwrap(),
        };
        donations.insert(*counter, model.clone());
        Ok(model)
    }

    async fn update(&self, donation: donation::ActiveModel) -> AppResult<donation::Model> {
        let mut donations = self.donations.lock().unwrap();
        let id = donation.id.clone().unwrap();
        let existing = donations.get_mut(&id).ok_or(AppError::NotFound)?;
        Self::apply(existing, donation);
        Ok(existing.clone())
    }

    async fn list(
        &self,
        filter: &DonationFilter,
        params: PageParams,
    ) -> AppResult<(Vec<donation::Model>, u64)> {
        let donations = self.donations.lock().unwrap();
        let mut matching: Vec<donation::Model> = donations
            .values()
            .filter(|d| Self::matches(filter, d))
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

    async fn count_by_status(&self) -> AppResult<Vec<(DonationStatus, i64)>> {
        let donations = self.donations.lock().unwrap();
        let mut counts: HashMap<DonationStatus, i64> = HashMap::new();
        for d in donations.values() {
            *counts.entry(d.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn count_by_category(&self) -> AppResult<Vec<(DonationCategory, i64)>> {
        let donations = self.donations.lock().unwrap();
        let mut counts: HashMap<DonationCategory, i64> = HashMap::new();
        for d in donations.values() {
            *counts.entry(d.category).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn total_amount(&self) -> AppResult<i64> {
        let donations = self.donations.lock().unwrap();
        Ok(donations.values().map(|d| d.amount).sum())
    }

    async fn created_since(&self, since: NaiveDateTime) -> AppResult<Vec<donation::Model>> {
        let donations = self.donations.lock().unwrap();
        let mut rows: Vec<donation::Model> = donations
            .values()
            .filter(|d| d.created_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn DonationRepository>> {
        Some(Box::new(self.clone()))
    }
}
