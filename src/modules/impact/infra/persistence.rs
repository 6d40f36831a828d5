use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::impact::entities::impact::{self, EntityType, ImpactCategory};
use crate::modules::impact::repository::ImpactRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresImpactRepository = SeaOrmRepository<impact::Entity>;

impl_sea_orm_repo!(PostgresImpactRepository, ImpactRepository, {
    async fn insert(&self, record: impact::ActiveModel) -> AppResult<impact::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => record.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                record.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<Vec<impact::Model>> {
        let query = impact::Entity::find()
            .filter(impact::Column::EntityType.eq(entity_type))
            .filter(impact::Column::EntityId.eq(entity_id))
            .order_by_desc(impact::Column::RecordedAt);
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

    async fn sum_by_category(&self) -> AppResult<Vec<(ImpactCategory, i64)>> {
        let query = impact::Entity::find()
            .select_only()
            .column(impact::Column::Category)
            .column_as(
                Expr::col((impact::Entity, impact::Column::Value))
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "total",
            )
            .group_by(impact::Column::Category);
        match &self.conn {
            DbOrTxn::Conn(c) => query
                .into_tuple::<(ImpactCategory, i64)>()
                .all(c.as_ref())
                .await
                .map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query
                    .into_tuple::<(ImpactCategory, i64)>()
                    .all(txn)
                    .await
                    .map_err(AppError::DbError)
            }
        }
    }
});

// =========================================================================
// InMemory Implementation
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryImpactRepository {
    records: Arc<Mutex<Vec<impact::Model>>>,
    counter: Arc<Mutex<i32>>,
}

#[async_trait]
impl ImpactRepository for InMemoryImpactRepository {
    async fn insert(&self, record: impact::ActiveModel) -> AppResult<impact::Model> {
        let mut records = self.records.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = impact::Model {
            id: *counter,
            entity_type: record.entity_type.unwrap(),
            entity_id: record.entity_id.unwrap(),
            category: record.category.unwrap(),
            value: record.value.unwrap(),
            unit: record.unit.unwrap(),
            recorded_at: record.recorded_at.unwrap(),
        };
        records.push(model.clone());
        Ok(model)
    }

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<Vec<impact::Model>> {
        let records = self.records.lock().unwrap();
        let mut rows: Vec<impact::Model> = records
            .iter()
            .filter(|r| r.entity_type == entity_type && r.entity_id == entity_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(rows)
    }

    async fn sum_by_category(&self) -> AppResult<Vec<(ImpactCategory, i64)>> {
        let records = self.records.lock().unwrap();
        let mut sums: HashMap<ImpactCategory, i64> = HashMap::new();
        for r in records.iter() {
            *sums.entry(r.category).or_insert(0) += r.value;
        }
        Ok(sums.into_iter().collect())
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn ImpactRepository>> {
        Some(Box::new(self.clone()))
    }
}
