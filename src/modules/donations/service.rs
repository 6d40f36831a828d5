use chrono::Utc;
use sea_orm::Set;

use super::entities::{
    donation,
    enums::{ChainSync, DonationCategory, DonationStatus, VerificationStatus},
};
use super::repository::{DonationFilter, DonationRepository};
use crate::modules::chain::adapter::{ChainAdapter, ChainEntityKind};
use crate::modules::chain::entities::contract;
use crate::modules::chain::repository::ContractRepository;
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::pagination::{PageParams, Paginated};

pub struct CreateDonationInput {
    pub donor_id: i32,
    pub category: DonationCategory,
    pub description: String,
    pub amount: i64,
    pub quantity: i32,
}

/// Donation plus the gateway-reported contract status.
pub struct DonationWithChain {
    pub donation: donation::Model,
    pub chain_status: Option<String>,
}

pub struct DonationService;

impl DonationService {
    /// Two-phase create: the row is persisted before the gateway call and
    /// finalized (or marked failed) afterwards, so a gateway outage never
    /// leaves an orphaned write on either side.
    pub async fn create(
        donations: &dyn DonationRepository,
        users: &dyn UserRepository,
        contracts: &dyn ContractRepository,
        chain: &dyn ChainAdapter,
        network: &str,
        input: CreateDonationInput,
    ) -> AppResult<donation::Model> {
        let donor = users
            .find_by_id(input.donor_id)
            .await?
            .filter(|u| u.role == Role::Donor)
            .ok_or(AppError::BadRequest("Donor not found".to_string()))?;

        if input.description.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Description must not be empty".to_string(),
            ));
        }
        if input.amount < 0 {
            return Err(AppError::BadRequest("Invalid amount".to_string()));
        }
        if input.quantity < 1 {
            return Err(AppError::BadRequest(
                "Quantity must be positive".to_string(),
            ));
        }
        if input.category == DonationCategory::Funds && input.amount == 0 {
            return Err(AppError::BadRequest(
                "Funds donations require a positive amount".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let pending = donation::ActiveModel {
            donor_id: Set(donor.id),
            category: Set(input.category),
            description: Set(input.description),
            amount: Set(input.amount),
            quantity: Set(input.quantity),
            status: Set(DonationStatus::Pending),
            verification_status: Set(VerificationStatus::Pending),
            contract_address: Set(None),
            chain_sync: Set(ChainSync::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let record = donations.insert(pending).await?;

        let address = match chain
            .deploy_contract(ChainEntityKind::Donation, record.id)
            .await
        {
            Ok(address) => address,
            Err(err) => {
                tracing::warn!(donation_id = record.id, "Contract deploy failed: {}", err);
                let failed = donation::ActiveModel {
                    id: Set(record.id),
                    chain_sync: Set(ChainSync::Failed),
                    updated_at: Set(Utc::now().naive_utc()),
                    ..Default::default()
                };
                donations.update(failed).await?;
                return Err(err);
            }
        };

        let confirmed = donation::ActiveModel {
            id: Set(record.id),
            contract_address: Set(Some(address.clone())),
            chain_sync: Set(ChainSync::Confirmed),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        let record = donations.update(confirmed).await?;

        contracts
            .insert(contract::ActiveModel {
                address: Set(address),
                entity_type: Set(ChainEntityKind::Donation.as_str().to_string()),
                entity_id: Set(record.id),
                network: Set(network.to_string()),
                created_at: Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .await?;

        Ok(record)
    }

    pub async fn update_status(
        donations: &dyn DonationRepository,
        chain: &dyn ChainAdapter,
        id: i32,
        new_status: DonationStatus,
    ) -> AppResult<donation::Model> {
        let existing = donations.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        if existing.verification_status == VerificationStatus::Verified
            && new_status != DonationStatus::Completed
        {
            return Err(AppError::Conflict(
                "Verified donations cannot change status".to_string(),
            ));
        }
        if !existing.status.can_transition(new_status) {
            return Err(AppError::Conflict(format!(
                "Invalid status transition from {} to {}",
                existing.status.as_str(),
                new_status.as_str()
            )));
        }

        if let Some(address) = &existing.contract_address {
            chain.mirror_status(address, new_status.as_str()).await?;
        }

        let am = donation::ActiveModel {
            id: Set(existing.id),
            status: Set(new_status),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        donations.update(am).await
    }

    pub async fn review_verification(
        donations: &dyn DonationRepository,
        id: i32,
        verdict: VerificationStatus,
    ) -> AppResult<donation::Model> {
        if verdict == VerificationStatus::Pending {
            return Err(AppError::BadRequest(
                "Verification verdict must be VERIFIED or REJECTED".to_string(),
            ));
        }

        let existing = donations.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if existing.verification_status != VerificationStatus::Pending {
            return Err(AppError::Conflict(
                "Donation verification already resolved".to_string(),
            ));
        }

        let am = donation::ActiveModel {
            id: Set(existing.id),
            verification_status: Set(verdict),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        donations.update(am).await
    }

    pub async fn get_enriched(
        donations: &dyn DonationRepository,
        chain: &dyn ChainAdapter,
        id: i32,
    ) -> AppResult<DonationWithChain> {
        let record = donations.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        let chain_status = match &record.contract_address {
            Some(address) => chain.fetch_status(address).await?,
            None => None,
        };
        Ok(DonationWithChain {
            donation: record,
            chain_status,
        })
    }

    /// One gateway round-trip per row with a contract address; the
    /// gateway exposes no batch endpoint.
    pub async fn list(
        donations: &dyn DonationRepository,
        chain: &dyn ChainAdapter,
        filter: &DonationFilter,
        params: PageParams,
    ) -> AppResult<Paginated<DonationWithChain>> {
        let params = params.normalized();
        let (rows, total) = donations.list(filter, params).await?;

        let mut enriched = Vec::with_capacity(rows.len());
        for row in rows {
            let chain_status = match &row.contract_address {
                Some(address) => chain.fetch_status(address).await?,
                None => None,
            };
            enriched.push(DonationWithChain {
                donation: row,
                chain_status,
            });
        }

        Ok(Paginated::new(enriched, total, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chain::infra::persistence::InMemoryContractRepository;
    use crate::modules::chain::mock::MockChainAdapter;
    use crate::modules::donations::infra::persistence::InMemoryDonationRepository;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;
    use crate::modules::users::service::{RegisterUserInput, UserService};

    struct Fixture {
        donations: InMemoryDonationRepository,
        users: InMemoryUserRepository,
        contracts: InMemoryContractRepository,
        chain: MockChainAdapter,
        donor_id: i32,
    }

    async fn fixture() -> Fixture {
        let users = InMemoryUserRepository::default();
        let donor = UserService::register(
            &users,
            RegisterUserInput {
                username: "alice".to_string(),
                email: "alice@example.org".to_string(),
                role: Role::Donor,
            },
        )
        .await
        .unwrap();

        Fixture {
            donations: InMemoryDonationRepository::default(),
            users,
            contracts: InMemoryContractRepository::default(),
            chain: MockChainAdapter::new(),
            donor_id: donor.id,
        }
    }

    fn input(donor_id: i32) -> CreateDonationInput {
        CreateDonationInput {
            donor_id,
            category: DonationCategory::Food,
            description: "50 trays of rice".to_string(),
            amount: 0,
            quantity: 50,
        }
    }

    #[tokio::test]
    async fn create_deploys_contract_and_confirms_sync() {
        let f = fixture().await;
        let record = DonationService::create(
            &f.donations,
            &f.users,
            &f.contracts,
            &f.chain,
            "testnet",
            input(f.donor_id),
        )
        .await
        .unwrap();

        assert_eq!(record.status, DonationStatus::Pending);
        assert_eq!(record.chain_sync, ChainSync::Confirmed);
        let address = record.contract_address.expect("address persisted");

        let contract = f
            .contracts
            .find_by_address(&address)
            .await
            .unwrap()
            .expect("contract registry row");
        assert_eq!(contract.entity_id, record.id);
        assert_eq!(contract.network, "testnet");
    }

    #[tokio::test]
    async fn create_with_unknown_donor_fails() {
        let f = fixture().await;
        let err = DonationService::create(
            &f.donations,
            &f.users,
            &f.contracts,
            &f.chain,
            "testnet",
            input(999),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Donor not found");
    }

    #[tokio::test]
    async fn create_marks_row_failed_when_gateway_is_down() {
        let f = fixture().await;
        f.chain.fail_next_calls(true);

        let err = DonationService::create(
            &f.donations,
            &f.users,
            &f.contracts,
            &f.chain,
            "testnet",
            input(f.donor_id),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ChainError(_)));

        // The pending row survives, marked failed, with no address.
        let record = f.donations.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(record.chain_sync, ChainSync::Failed);
        assert!(record.contract_address.is_none());
    }

    #[tokio::test]
    async fn update_status_walks_the_transition_table() {
        let f = fixture().await;
        let record = DonationService::create(
            &f.donations,
            &f.users,
            &f.contracts,
            &f.chain,
            "testnet",
            input(f.donor_id),
        )
        .await
        .unwrap();

        let updated = DonationService::update_status(
            &f.donations,
            &f.chain,
            record.id,
            DonationStatus::Confirmed,
        )
        .await
        .unwrap();
        assert_eq!(updated.status, DonationStatus::Confirmed);

        // Mirrored to the gateway as well.
        let address = updated.contract_address.as_deref().unwrap();
        assert_eq!(
            f.chain.fetch_status(address).await.unwrap(),
            Some("CONFIRMED".to_string())
        );

        // Skipping states is rejected.
        let err = DonationService::update_status(
            &f.donations,
            &f.chain,
            record.id,
            DonationStatus::Completed,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Redundant writes are rejected, so updated_at never moves.
        let before = f.donations.find_by_id(record.id).await.unwrap().unwrap();
        let err = DonationService::update_status(
            &f.donations,
            &f.chain,
            record.id,
            DonationStatus::Confirmed,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let after = f.donations.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(before.updated_at, after.updated_at);
    }

    #[tokio::test]
    async fn verified_donations_only_complete() {
        let f = fixture().await;
        let record = DonationService::create(
            &f.donations,
            &f.users,
            &f.contracts,
            &f.chain,
            "testnet",
            input(f.donor_id),
        )
        .await
        .unwrap();

        for status in [DonationStatus::Confirmed, DonationStatus::InTransit] {
            DonationService::update_status(&f.donations, &f.chain, record.id, status)
                .await
                .unwrap();
        }
        DonationService::review_verification(&f.donations, record.id, VerificationStatus::Verified)
            .await
            .unwrap();

        let err = DonationService::update_status(
            &f.donations,
            &f.chain,
            record.id,
            DonationStatus::Cancelled,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err =
            DonationService::review_verification(&f.donations, record.id, VerificationStatus::Verified)
                .await
                .unwrap_err();
        assert_eq!(err.to_string(), "Conflict: Donation verification already resolved");
    }

    #[tokio::test]
    async fn list_applies_filters_as_logical_and() {
        let f = fixture().await;
        for (category, description) in [
            (DonationCategory::Food, "rice trays"),
            (DonationCategory::Food, "bread crates"),
            (DonationCategory::Supplies, "rice cookers"),
        ] {
            DonationService::create(
                &f.donations,
                &f.users,
                &f.contracts,
                &f.chain,
                "testnet",
                CreateDonationInput {
                    donor_id: f.donor_id,
                    category,
                    description: description.to_string(),
                    amount: 0,
                    quantity: 1,
                },
            )
            .await
            .unwrap();
        }

        let filter = DonationFilter {
            category: Some(DonationCategory::Food),
            search: Some("rice".to_string()),
            ..Default::default()
        };
        let page = DonationService::list(
            &f.donations,
            &f.chain,
            &filter,
            PageParams { page: 1, limit: 10 },
        )
        .await
        .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.data[0].donation.description, "rice trays");
        // Enriched from the gateway.
        assert_eq!(page.data[0].chain_status.as_deref(), Some("PENDING"));
    }

    #[tokio::test]
    async fn list_reports_consistent_pagination_metadata() {
        let f = fixture().await;
        for i in 0..5 {
            DonationService::create(
                &f.donations,
                &f.users,
                &f.contracts,
                &f.chain,
                "testnet",
                CreateDonationInput {
                    donor_id: f.donor_id,
                    category: DonationCategory::Food,
                    description: format!("batch {}", i),
                    amount: 0,
                    quantity: 1,
                },
            )
            .await
            .unwrap();
        }

        let page = DonationService::list(
            &f.donations,
            &f.chain,
            &DonationFilter::default(),
            PageParams { page: 2, limit: 2 },
        )
        .await
        .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.data.len(), 2);
    }
}
