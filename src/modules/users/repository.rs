use async_trait::async_trait;

use super::entities::{enums::Role, user};
use crate::shared::error::AppResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<user::Model>>;
    async fn find_by_uuid(&self, uuid: &str) -> AppResult<Option<user::Model>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>>;

    async fn insert(&self, user: user::ActiveModel) -> AppResult<user::Model>;
    async fn update(&self, user: user::ActiveModel) -> AppResult<user::Model>;

    async fn count_by_role(&self) -> AppResult<Vec<(Role, i64)>>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn UserRepository>>;
}
