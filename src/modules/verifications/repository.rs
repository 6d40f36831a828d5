use async_trait::async_trait;

use super::entities::verification;
use crate::modules::impact::entities::impact::EntityType;
use crate::shared::error::AppResult;

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<verification::Model>>;

    async fn insert(&self, task: verification::ActiveModel) -> AppResult<verification::Model>;
    async fn update(&self, task: verification::ActiveModel) -> AppResult<verification::Model>;

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<Vec<verification::Model>>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn VerificationRepository>>;
}
