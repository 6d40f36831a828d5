use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::entities::{
    donation,
    enums::{DonationCategory, DonationStatus},
};
use crate::shared::error::AppResult;
use crate::shared::pagination::PageParams;

#[derive(Clone, Debug, Default)]
pub struct DonationFilter {
    pub status: Option<DonationStatus>,
    pub category: Option<DonationCategory>,
    pub donor_id: Option<i32>,
    /// Case-sensitive substring match on the description.
    pub search: Option<String>,
}

#[async_trait]
pub trait DonationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<donation::Model>>;

    async fn insert(&self, donation: donation::ActiveModel) -> AppResult<donation::Model>;
    async fn update(&self, donation: donation::ActiveModel) -> AppResult<donation::Model>;

    /// Filters are combined as a logical AND; returns the page plus the
    /// total row count matching the filter.
    async fn list(
        &self,
        filter: &DonationFilter,
        params: PageParams,
    ) -> AppResult<(Vec<donation::Model>, u64)>;

    async fn count_by_status(&self) -> AppResult<Vec<(DonationStatus, i64)>>;
    async fn count_by_category(&self) -> AppResult<Vec<(DonationCategory, i64)>>;
    async fn total_amount(&self) -> AppResult<i64>;
    async fn created_since(&self, since: NaiveDateTime) -> AppResult<Vec<donation::Model>>;

    fn with_transaction(
        &self,
        uow: &dyn crate::shared::repository::UnitOfWork,
    ) -> Option<Box<dyn DonationRepository>>;
}
