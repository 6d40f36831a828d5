use async_trait::async_trait;

use super::entities::feeding_need;
use crate::shared::error::AppResult;
use crate::shared::pagination::PageParams;

#[async_trait]
pub trait FeedingNeedRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<feeding_need::Model>>;

    async fn insert(&self, need: feeding_need::ActiveModel) -> AppResult<feeding_need::Model>;
    async fn update(&self, need: feeding_need::ActiveModel) -> AppResult<feeding_need::Model>;

    async fn list(
        &self,
        ngo_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<feeding_need::Model>, u64)>;

    async fn total_funded(&self) -> AppResult<i64>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn FeedingNeedRepository>>;
}
