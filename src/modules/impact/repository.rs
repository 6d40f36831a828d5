use async_trait::async_trait;

use super::entities::impact::{self, EntityType, ImpactCategory};
use crate::shared::error::AppResult;

#[async_trait]
pub trait ImpactRepository: Send + Sync {
    async fn insert(&self, record: impact::ActiveModel) -> AppResult<impact::Model>;

    async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<Vec<impact::Model>>;

    async fn sum_by_category(&self) -> AppResult<Vec<(ImpactCategory, i64)>>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn ImpactRepository>>;
}
