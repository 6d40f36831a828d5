use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::entities::{delivery, enums::DeliveryStatus};
use crate::shared::error::AppResult;
use crate::shared::pagination::PageParams;

#[derive(Clone, Debug, Default)]
pub struct DeliveryFilter {
    pub status: Option<DeliveryStatus>,
    pub logistics_id: Option<i32>,
}

#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<delivery::Model>>;

    async fn insert(&self, delivery: delivery::ActiveModel) -> AppResult<delivery::Model>;
    async fn update(&self, delivery: delivery::ActiveModel) -> AppResult<delivery::Model>;

    async fn list(
        &self,
        filter: &DeliveryFilter,
        params: PageParams,
    ) -> AppResult<(Vec<delivery::Model>, u64)>;

    /// The non-terminal delivery currently attached to a donation, if any.
    async fn find_active_by_donation(
        &self,
        donation_id: i32,
    ) -> AppResult<Option<delivery::Model>>;

    async fn count_by_status(&self) -> AppResult<Vec<(DeliveryStatus, i64)>>;
    async fn created_since(&self, since: NaiveDateTime) -> AppResult<Vec<delivery::Model>>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn DeliveryRepository>>;
}
