use async_trait::async_trait;

use super::entities::food_pack;
use crate::shared::error::AppResult;
use crate::shared::pagination::PageParams;

#[async_trait]
pub trait FoodPackRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<food_pack::Model>>;

    async fn insert(&self, pack: food_pack::ActiveModel) -> AppResult<food_pack::Model>;
    async fn update(&self, pack: food_pack::ActiveModel) -> AppResult<food_pack::Model>;

    async fn list(
        &self,
        provider_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<(Vec<food_pack::Model>, u64)>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn FoodPackRepository>>;
}
