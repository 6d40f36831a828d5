use async_trait::async_trait;
use sea_orm::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::impl_sea_orm_repo;
use crate::modules::users::entities::{enums::Role, user};
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::infra::repository::{DbOrTxn, SeaOrmRepository};
use crate::shared::repository::UnitOfWork;

// =========================================================================
// Postgres Implementation
// =========================================================================

pub type PostgresUserRepository = SeaOrmRepository<user::Entity>;

impl_sea_orm_repo!(PostgresUserRepository, UserRepository, {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        let query = user::Entity::find_by_id(id);
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

    async fn find_by_uuid(&self, uuid: &str) -> AppResult<Option<user::Model>> {
        let query = user::Entity::find().filter(user::Column::Uuid.eq(uuid));
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

    async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        let query = user::Entity::find().filter(user::Column::Email.eq(email));
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

    async fn insert(&self, user: user::ActiveModel) -> AppResult<user::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => user.insert(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                user.insert(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn update(&self, user: user::ActiveModel) -> AppResult<user::Model> {
        match &self.conn {
            DbOrTxn::Conn(c) => user.update(c.as_ref()).await.map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                user.update(txn).await.map_err(AppError::DbError)
            }
        }
    }

    async fn count_by_role(&self) -> AppResult<Vec<(Role, i64)>> {
        let query = user::Entity::find()
            .select_only()
            .column(user::Column::Role)
            .column_as(user::Column::Id.count(), "count")
            .group_by(user::Column::Role);
        match &self.conn {
            DbOrTxn::Conn(c) => query
                .into_tuple::<(Role, i64)>()
                .all(c.as_ref())
                .await
                .map_err(AppError::DbError),
            DbOrTxn::Txn(mutex) => {
                let lock = mutex.lock().await;
                let txn = lock.as_ref().ok_or(AppError::InternalServerError(
                    "Transaction unavailable".to_string(),
                ))?;
                query
                    .into_tuple::<(Role, i64)>()
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
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<i32, user::Model>>>,
    counter: Arc<Mutex<i32>>,
}

impl InMemoryUserRepository {
    fn apply(existing: &mut user::Model, am: user::ActiveModel) {
        if let ActiveValue::Set(v) = am.username {
            existing.username = v;
        }
        if let ActiveValue::Set(v) = am.email {
            existing.email = v;
        }
        if let ActiveValue::Set(v) = am.role {
            existing.role = v;
        }
        if let ActiveValue::Set(v) = am.kyc_status {
            existing.kyc_status = v;
        }
        if let ActiveValue::Set(v) = am.account_status {
            existing.account_status = v;
        }
        if let ActiveValue::Set(v) = am.updated_at {
            existing.updated_at = v;
        }
        if let ActiveValue::Set(v) = am.last_login_at {
            existing.last_login_at = v;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn find_by_uuid(&self, uuid: &str) -> AppResult<Option<user::Model>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.uuid == uuid).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: user::ActiveModel) -> AppResult<user::Model> {
        let mut users = self.users.lock().unwrap();
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;

        let model = user::Model {
            id: *counter,
            uuid: user.uuid.unwrap(),
            username: user.username.unwrap(),
            email: user.email.unwrap(),
            role: user.role.unwrap(),
            kyc_status: user.kyc_status.unwrap(),
            account_status: user.account_status.unwrap(),
            created_at: user.created_at.unwrap(),
            updated_at: user.updated_at.unwrap(),
            last_login_at: match user.last_login_at {
                ActiveValue::Set(v) => v,
                _ => None,
            },
        };
        users.insert(*counter, model.clone());
        Ok(model)
    }

    async fn update(&self, user: user::ActiveModel) -> AppResult<user::Model> {
        let mut users = self.users.lock().unwrap();
        let id = user.id.clone().unwrap();
        let existing = users.get_mut(&id).ok_or(AppError::NotFound)?;
        Self::apply(existing, user);
        Ok(existing.clone())
    }

    async fn count_by_role(&self) -> AppResult<Vec<(Role, i64)>> {
        let users = self.users.lock().unwrap();
        let mut counts: HashMap<Role, i64> = HashMap::new();
        for u in users.values() {
            *counts.entry(u.role).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }

    fn with_transaction(&self, _uow: &dyn UnitOfWork) -> Option<Box<dyn UserRepository>> {
        Some(Box::new(self.clone()))
    }
}
