use async_trait::async_trait;
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::impact::entities::impact::EntityType;
use crate::modules::verifications::entities::verification;
use crate::modules::verifications::repository::VerificationRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresVerificationRepository = SeaOrmRepository<verification::Entity>;

impl_sea_orm_repo!(PostgresVerificationRepository, VerificationRepository, {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<verification::Model>> {
        let query = verification::Entity::find_by_id(id);
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

    async fn insert(&self, task: verification::ActiveModel) -> AppResult<verification::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => task.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                task.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn update(&self, task: verification::ActiveModel) -> AppResult<verification::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => task.update(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                task.update(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<Vec<verification::Model>> {
        let query = verification::Entity::find()
            .filter(verification::Column::EntityType.eq(entity_type))
            .filter(verification::Column::EntityId.eq(entity_id))
            .order_by_asc(verification::Column::DueDate);
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

// =========================================================================
// InMemory Implementation
// =========================================================================

#[derive(Clone, Default)]
pub struct InMemoryVerificationRepository {
    tasks: Arc<Mutex<HashMap<i32, verification::Model>>>,
    counter: Arc<Mutex<i32>>,
}

#[async_trait]
impl VerificationRepository for InMemoryVerificationRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<verification::Model>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.get(&id).cloned())
    }

    async fn insert(&self, task: verification::ActiveModel) -> AppResult<verification::Model> {
        let mut tasks = self.tasks.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = verification::Model {
            id: *counter,
            kind: task.kind.unwrap(),
            entity_type: task.entity_type.unwrap(),
            entity_id: task.entity_id.unwrap(),
            status: task.status.unwrap(),
            due_date: task.due_date.unwrap(),
            evidence: task.evidence.unwrap(),
            assigned_to: match task.assigned_to {
                ActiveValue::Set(v) => v,
                _ => None,
            },
            created_at: task.created_at.unwrap(),
            updated_at: task.updated_at.unwrap(),
        };
        tasks.insert(*counter, model.clone());
        Ok(model)
    }

    async fn update(&self, task: verification::ActiveModel) -> AppResult<verification::Model> {
        let mut tasks = self.tasks.lock().unwrap();
        let id = task.id.clone().unwrap();
        let existing = tasks.get_mut(&id).ok_or(AppError::NotFound)?;

        if let ActiveValue::Set(v) = task.status {
            existing.status = v;
        }
        if let ActiveValue::Set(v) = task.evidence {
            existing.evidence = v;
        }
        if let ActiveValue::Set(v) = task.assigned_to {
            existing.assigned_to = v;
        }
        if let ActiveValue::Set(v) = task.due_date {
            existing.due_date = v;
        }
        if let ActiveValue::Set(v) = task.updated_at {
            existing.updated_at = v;
        }
        Ok(existing.clone())
    }

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<Vec<verification::Model>> {
        let tasks = self.tasks.lock().unwrap();
        let mut rows: Vec<verification::Model> = tasks
            .values()
            .filter(|t| t.entity_type == entity_type && t.entity_id == entity_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        Ok(rows)
    }

    fn with_transaction(
        &self,
        _uow: &dyn UnitOfWork,
    ) -> Option<Box<dyn VerificationRepository>> {
        Some(Box::new(self.clone()))
    }
}
