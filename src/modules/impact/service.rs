use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::Set;
use serde::Serialize;
use std::collections::BTreeMap;

use super::entities::impact::{self, EntityType, ImpactCategory};
use super::repository::ImpactRepository;
use crate::modules::deliveries::repository::DeliveryRepository;
use crate::modules::donations::repository::DonationRepository;
use crate::modules::feeding_needs::repository::FeedingNeedRepository;
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};

pub const DEFAULT_TIMELINE_DAYS: i64 = 30;
pub const MAX_TIMELINE_DAYS: i64 = 365;

pub struct RecordImpactInput {
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub category: ImpactCategory,
    pub value: i64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct OverviewStats {
    pub total_donations: i64,
    pub total_donation_amount: i64,
    pub donations_by_status: BTreeMap<String, i64>,
    pub deliveries_by_status: BTreeMap<String, i64>,
    pub users_by_role: BTreeMap<String, i64>,
    pub total_funded: i64,
    pub impact_totals: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct DonationDistributions {
    pub by_status: BTreeMap<String, i64>,
    pub by_category: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct DayActivity {
    pub date: String,
    pub donations: i64,
    pub deliveries: i64,
}

pub struct StatisticsService;

impl StatisticsService {
    pub async fn record(
        impacts: &dyn ImpactRepository,
        input: RecordImpactInput,
    ) -> AppResult<impact::Model> {
        if input.value <= 0 {
            return Err(AppError::BadRequest(
                "Impact value must be positive".to_string(),
            ));
        }
        if input.unit.trim().is_empty() {
            return Err(AppError::BadRequest("Unit must not be empty".to_string()));
        }

        let am = impact::ActiveModel {
            entity_type: Set(input.entity_type),
            entity_id: Set(input.entity_id),
            category: Set(input.category),
            value: Set(input.value),
            unit: Set(input.unit),
            recorded_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        impacts.insert(am).await
    }

    /// Dashboard headline numbers. Recomputed from full scans on every
    /// call, as the dashboards poll infrequently.
    pub async fn overview(
        donations: &dyn DonationRepository,
        deliveries: &dyn DeliveryRepository,
        users: &dyn UserRepository,
        needs: &dyn FeedingNeedRepository,
        impacts: &dyn ImpactRepository,
    ) -> AppResult<OverviewStats> {
        let donations_by_status: BTreeMap<String, i64> = donations
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| (status.as_str().to_string(), count))
            .collect();
        let total_donations = donations_by_status.values().sum();

        let deliveries_by_status: BTreeMap<String, i64> = deliveries
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| (status.as_str().to_string(), count))
            .collect();

        let users_by_role: BTreeMap<String, i64> = users
            .count_by_role()
            .await?
            .into_iter()
            .map(|(role, count)| (role.as_str().to_string(), count))
            .collect();

        let impact_totals: BTreeMap<String, i64> = impacts
            .sum_by_category()
            .await?
            .into_iter()
            .map(|(category, total)| (category.as_str().to_string(), total))
            .collect();

        Ok(OverviewStats {
            total_donations,
            total_donation_amount: donations.total_amount().await?,
            donations_by_status,
            deliveries_by_status,
            users_by_role,
            total_funded: needs.total_funded().await?,
            impact_totals,
        })
    }

    pub async fn donation_distributions(
        donations: &dyn DonationRepository,
    ) -> AppResult<DonationDistributions> {
        let by_status = donations
            .count_by_status()
            .await?
            .into_iter()
            .map(|(status, count)| (status.as_str().to_string(), count))
            .collect();
        let by_category = donations
            .count_by_category()
            .await?
            .into_iter()
            .map(|(category, count)| (category.as_str().to_string(), count))
            .collect();

        Ok(DonationDistributions {
            by_status,
            by_category,
        })
    }

    /// Day-bucketed creation activity over the trailing window, built by
    /// scanning the rows and bucketing on the created-at date.
    pub async fn timeline(
        donations: &dyn DonationRepository,
        deliveries: &dyn DeliveryRepository,
        days: Option<i64>,
    ) -> AppResult<Vec<DayActivity>> {
        let days = days
            .unwrap_or(DEFAULT_TIMELINE_DAYS)
            .clamp(1, MAX_TIMELINE_DAYS);
        let since = Utc::now().naive_utc() - Duration::days(days);

        let mut buckets: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for row in donations.created_since(since).await? {
            buckets.entry(Self::day_key(row.created_at)).or_default().0 += 1;
        }
        for row in deliveries.created_since(since).await? {
            buckets.entry(Self::day_key(row.created_at)).or_default().1 += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|(date, (donations, deliveries))| DayActivity {
                date,
                donations,
                deliveries,
            })
            .collect())
    }

    fn day_key(at: NaiveDateTime) -> String {
        at.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::deliveries::infra::persistence::InMemoryDeliveryRepository;
    use crate::modules::donations::entities::donation;
    use crate::modules::donations::entities::enums::{
        ChainSync, DonationCategory, DonationStatus, VerificationStatus,
    };
    use crate::modules::donations::infra::persistence::InMemoryDonationRepository;
    use crate::modules::feeding_needs::infra::persistence::InMemoryFeedingNeedRepository;
    use crate::modules::impact::infra::persistence::InMemoryImpactRepository;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;

    async fn seed_donation(
        repo: &InMemoryDonationRepository,
        status: DonationStatus,
        category: DonationCategory,
        amount: i64,
        created_at: NaiveDateTime,
    ) {
        repo.insert(donation::ActiveModel {
            donor_id: Set(1),
            category: Set(category),
            description: Set("seed".to_string()),
            amount: Set(amount),
            quantity: Set(1),
            status: Set(status),
            verification_status: Set(VerificationStatus::Pending),
            contract_address: Set(None),
            chain_sync: Set(ChainSync::Confirmed),
            created_at: Set(created_at),
            updated_at: Set(created_at),
            ..Default::default()
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn overview_sums_counts_and_amounts() {
        let donations = InMemoryDonationRepository::default();
        let deliveries = InMemoryDeliveryRepository::default();
        let users = InMemoryUserRepository::default();
        let needs = InMemoryFeedingNeedRepository::default();
        let impacts = InMemoryImpactRepository::default();

        let now = Utc::now().naive_utc();
        seed_donation(&donations, DonationStatus::Pending, DonationCategory::Food, 100, now).await;
        seed_donation(&donations, DonationStatus::Pending, DonationCategory::Funds, 250, now).await;
        seed_donation(
            &donations,
            DonationStatus::Completed,
            DonationCategory::Food,
            50,
            now,
        )
        .await;

        let stats = StatisticsService::overview(&donations, &deliveries, &users, &needs, &impacts)
            .await
            .unwrap();

        assert_eq!(stats.total_donations, 3);
        assert_eq!(stats.total_donation_amount, 400);
        assert_eq!(stats.donations_by_status.get("PENDING"), Some(&2));
        assert_eq!(stats.donations_by_status.get("COMPLETED"), Some(&1));
        assert!(stats.deliveries_by_status.is_empty());
    }

    #[tokio::test]
    async fn distributions_group_by_status_and_category() {
        let donations = InMemoryDonationRepository::default();
        let now = Utc::now().naive_utc();
        seed_donation(&donations, DonationStatus::Pending, DonationCategory::Food, 0, now).await;
        seed_donation(&donations, DonationStatus::Pending, DonationCategory::Food, 0, now).await;
        seed_donation(
            &donations,
            DonationStatus::Cancelled,
            DonationCategory::Supplies,
            0,
            now,
        )
        .await;

        let dist = StatisticsService::donation_distributions(&donations)
            .await
            .unwrap();
        assert_eq!(dist.by_status.get("PENDING"), Some(&2));
        assert_eq!(dist.by_status.get("CANCELLED"), Some(&1));
        assert_eq!(dist.by_category.get("FOOD"), Some(&2));
        assert_eq!(dist.by_category.get("SUPPLIES"), Some(&1));
    }

    #[tokio::test]
    async fn timeline_buckets_by_day_and_respects_the_window() {
        let donations = InMemoryDonationRepository::default();
        let deliveries = InMemoryDeliveryRepository::default();

        let now = Utc::now().naive_utc();
        seed_donation(&donations, DonationStatus::Pending, DonationCategory::Food, 0, now).await;
        seed_donation(
            &donations,
            DonationStatus::Pending,
            DonationCategory::Food,
            0,
            now - Duration::days(1),
        )
        .await;
        seed_donation(
            &donations,
            DonationStatus::Pending,
            DonationCategory::Food,
            0,
            now - Duration::days(1),
        )
        .await;
        // Outside the 7-day window.
        seed_donation(
            &donations,
            DonationStatus::Pending,
            DonationCategory::Food,
            0,
            now - Duration::days(30),
        )
        .await;

        let timeline = StatisticsService::timeline(&donations, &deliveries, Some(7))
            .await
            .unwrap();

        assert_eq!(timeline.len(), 2);
        let total: i64 = timeline.iter().map(|d| d.donations).sum();
        assert_eq!(total, 3);
        // Buckets are sorted ascending by date.
        assert!(timeline[0].date < timeline[1].date);
        assert_eq!(timeline[0].donations, 2);
        assert_eq!(timeline[1].donations, 1);
    }
}
