use chrono::{NaiveDateTime, Utc};
use sea_orm::Set;

use super::entities::{delivery, enums::DeliveryStatus};
use super::repository::{DeliveryFilter, DeliveryRepository};
use crate::modules::chain::adapter::ChainAdapter;
use crate::modules::donations::entities::enums::VerificationStatus;
use crate::modules::donations::repository::DonationRepository;
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::pagination::{PageParams, Paginated};

pub struct CreateDeliveryInput {
    pub logistics_id: i32,
    pub donation_id: Option<i32>,
    pub food_pack_id: Option<i32>,
    pub feeding_need_id: Option<i32>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub scheduled_at: Option<NaiveDateTime>,
}

pub struct VerifyDeliveryInput {
    pub verifier_id: i32,
    pub verified: bool,
    pub note: Option<String>,
}

pub struct DeliveryService;

impl DeliveryService {
    pub async fn create(
        deliveries: &dyn DeliveryRepository,
        users: &dyn UserRepository,
        donations: &dyn DonationRepository,
        input: CreateDeliveryInput,
    ) -> AppResult<delivery::Model> {
        users
            .find_by_id(input.logistics_id)
            .await?
            .filter(|u| u.role == Role::Logistics)
            .ok_or(AppError::BadRequest(
                "Logistics provider not found".to_string(),
            ))?;

        if input.donation_id.is_none()
            && input.food_pack_id.is_none()
            && input.feeding_need_id.is_none()
        {
            return Err(AppError::BadRequest(
                "Delivery must reference a donation, food pack, or feeding need".to_string(),
            ));
        }

        // A delivery attached to a donation rides on the donation's
        // contract.
        let mut contract_address = None;
        if let Some(donation_id) = input.donation_id {
            let donation = donations
                .find_by_id(donation_id)
                .await?
                .ok_or(AppError::BadRequest("Donation not found".to_string()))?;

            if deliveries
                .find_active_by_donation(donation_id)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(
                    "Donation already has an active delivery".to_string(),
                ));
            }
            contract_address = donation.contract_address;
        }

        let now = Utc::now().naive_utc();
        let pending = delivery::ActiveModel {
            logistics_id: Set(input.logistics_id),
            donation_id: Set(input.donation_id),
            food_pack_id: Set(input.food_pack_id),
            feeding_need_id: Set(input.feeding_need_id),
            pickup_address: Set(input.pickup_address),
            dropoff_address: Set(input.dropoff_address),
            scheduled_at: Set(input.scheduled_at),
            status: Set(DeliveryStatus::Pending),
            contract_address: Set(contract_address),
            verification_status: Set(VerificationStatus::Pending),
            verified_by: Set(None),
            verified_at: Set(None),
            verification_note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        deliveries.insert(pending).await
    }

    pub async fn update_status(
        deliveries: &dyn DeliveryRepository,
        chain: &dyn ChainAdapter,
        id: i32,
        new_status: DeliveryStatus,
    ) -> AppResult<delivery::Model> {
        let existing = deliveries.find_by_id(id).await?.ok_or(AppError::NotFound)?;

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

        let am = delivery::ActiveModel {
            id: Set(existing.id),
            status: Set(new_status),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        deliveries.update(am).await
    }

    pub async fn verify(
        deliveries: &dyn DeliveryRepository,
        users: &dyn UserRepository,
        chain: &dyn ChainAdapter,
        id: i32,
        input: VerifyDeliveryInput,
    ) -> AppResult<delivery::Model> {
        let existing = deliveries.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        users
            .find_by_id(input.verifier_id)
            .await?
            .ok_or(AppError::BadRequest("Verifier not found".to_string()))?;

        if existing.status != DeliveryStatus::Delivered {
            return Err(AppError::BadRequest(
                "Only delivered deliveries can be verified".to_string(),
            ));
        }
        if existing.verification_status == VerificationStatus::Verified {
            return Err(AppError::Conflict(
                "Delivery is already verified".to_string(),
            ));
        }

        if let Some(address) = &existing.contract_address {
            chain
                .record_verification(address, input.verified, input.note.as_deref())
                .await?;
        }

        let verdict = if input.verified {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Rejected
        };
        let am = delivery::ActiveModel {
            id: Set(existing.id),
            verification_status: Set(verdict),
            verified_by: Set(Some(input.verifier_id)),
            verified_at: Set(Some(Utc::now().naive_utc())),
            verification_note: Set(input.note),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        deliveries.update(am).await
    }

    pub async fn list(
        deliveries: &dyn DeliveryRepository,
        filter: &DeliveryFilter,
        params: PageParams,
    ) -> AppResult<Paginated<delivery::Model>> {
        let params = params.normalized();
        let (rows, total) = deliveries.list(filter, params).await?;
        Ok(Paginated::new(rows, total, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chain::infra::persistence::InMemoryContractRepository;
    use crate::modules::chain::mock::MockChainAdapter;
    use crate::modules::donations::entities::enums::DonationCategory;
    use crate::modules::donations::infra::persistence::InMemoryDonationRepository;
    use crate::modules::donations::service::{CreateDonationInput, DonationService};
    use crate::modules::users::infra::persistence::InMemoryUserRepository;
    use crate::modules::users::service::{RegisterUserInput, UserService};

    struct Fixture {
        deliveries: InMemoryDeliveryRepository,
        donations: InMemoryDonationRepository,
        users: InMemoryUserRepository,
        chain: MockChainAdapter,
        logistics_id: i32,
        volunteer_id: i32,
        donation_id: i32,
    }

    use crate::modules::deliveries::infra::persistence::InMemoryDeliveryRepository;

    async fn register(users: &InMemoryUserRepository, name: &str, role: Role) -> i32 {
        UserService::register(
            users,
            RegisterUserInput {
                username: name.to_string(),
                email: format!("{}@example.org", name),
                role,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn fixture() -> Fixture {
        let users = InMemoryUserRepository::default();
        let donor_id = register(&users, "alice", Role::Donor).await;
        let logistics_id = register(&users, "truck", Role::Logistics).await;
        let volunteer_id = register(&users, "val", Role::Volunteer).await;

        let donations = InMemoryDonationRepository::default();
        let contracts = InMemoryContractRepository::default();
        let chain = MockChainAdapter::new();
        let donation = DonationService::create(
            &donations,
            &users,
            &contracts,
            &chain,
            "testnet",
            CreateDonationInput {
                donor_id,
                category: DonationCategory::Food,
                description: "20 crates of produce".to_string(),
                amount: 0,
                quantity: 20,
            },
        )
        .await
        .unwrap();

        Fixture {
            deliveries: InMemoryDeliveryRepository::default(),
            donations,
            users,
            chain,
            logistics_id,
            volunteer_id,
            donation_id: donation.id,
        }
    }

    fn input(f: &Fixture) -> CreateDeliveryInput {
        CreateDeliveryInput {
            logistics_id: f.logistics_id,
            donation_id: Some(f.donation_id),
            food_pack_id: None,
            feeding_need_id: None,
            pickup_address: "12 Market St".to_string(),
            dropoff_address: "3 Shelter Rd".to_string(),
            scheduled_at: None,
        }
    }

    async fn drive_to_delivered(f: &Fixture, id: i32) {
        for status in [
            DeliveryStatus::Assigned,
            DeliveryStatus::PickedUp,
            DeliveryStatus::InTransit,
            DeliveryStatus::Delivered,
        ] {
            DeliveryService::update_status(&f.deliveries, &f.chain, id, status)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn create_requires_a_logistics_user() {
        let f = fixture().await;

        let mut bad = input(&f);
        bad.logistics_id = 999;
        let err = DeliveryService::create(&f.deliveries, &f.users, &f.donations, bad)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Logistics provider not found");

        // A user with the wrong role does not count either.
        let mut bad = input(&f);
        bad.logistics_id = f.volunteer_id;
        let err = DeliveryService::create(&f.deliveries, &f.users, &f.donations, bad)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Logistics provider not found");
    }

    #[tokio::test]
    async fn create_requires_an_existing_donation() {
        let f = fixture().await;
        let mut bad = input(&f);
        bad.donation_id = Some(999);
        let err = DeliveryService::create(&f.deliveries, &f.users, &f.donations, bad)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Donation not found");
    }

    #[tokio::test]
    async fn create_requires_at_least_one_reference() {
        let f = fixture().await;
        let mut bad = input(&f);
        bad.donation_id = None;
        let err = DeliveryService::create(&f.deliveries, &f.users, &f.donations, bad)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn create_inherits_the_donation_contract_and_is_unique_while_active() {
        let f = fixture().await;
        let delivery = DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap();

        assert_eq!(delivery.status, DeliveryStatus::Pending);
        let donation = f.donations.find_by_id(f.donation_id).await.unwrap().unwrap();
        assert_eq!(delivery.contract_address, donation.contract_address);

        let err = DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conflict: Donation already has an active delivery"
        );

        // Once the first leg terminates, a new one may be scheduled.
        drive_to_delivered(&f, delivery.id).await;
        DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn only_delivered_deliveries_can_be_verified() {
        let f = fixture().await;
        let delivery = DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap();

        let err = DeliveryService::verify(
            &f.deliveries,
            &f.users,
            &f.chain,
            delivery.id,
            VerifyDeliveryInput {
                verifier_id: f.volunteer_id,
                verified: true,
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Only delivered deliveries can be verified"
        );
    }

    #[tokio::test]
    async fn verification_is_recorded_once() {
        let f = fixture().await;
        let delivery = DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap();
        drive_to_delivered(&f, delivery.id).await;

        let verified = DeliveryService::verify(
            &f.deliveries,
            &f.users,
            &f.chain,
            delivery.id,
            VerifyDeliveryInput {
                verifier_id: f.volunteer_id,
                verified: true,
                note: Some("photo attached".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(verified.verification_status, VerificationStatus::Verified);
        assert_eq!(verified.verified_by, Some(f.volunteer_id));
        assert!(verified.verified_at.is_some());

        // The contract mirror reflects the verdict.
        let address = verified.contract_address.as_deref().unwrap();
        assert_eq!(
            f.chain.fetch_status(address).await.unwrap(),
            Some("VERIFIED".to_string())
        );

        let err = DeliveryService::verify(
            &f.deliveries,
            &f.users,
            &f.chain,
            delivery.id,
            VerifyDeliveryInput {
                verifier_id: f.volunteer_id,
                verified: true,
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Conflict: Delivery is already verified");
    }

    #[tokio::test]
    async fn verify_requires_a_known_verifier() {
        let f = fixture().await;
        let delivery = DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap();
        drive_to_delivered(&f, delivery.id).await;

        let err = DeliveryService::verify(
            &f.deliveries,
            &f.users,
            &f.chain,
            delivery.id,
            VerifyDeliveryInput {
                verifier_id: 999,
                verified: true,
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Verifier not found");
    }

    #[tokio::test]
    async fn status_updates_respect_the_transition_table() {
        let f = fixture().await;
        let delivery = DeliveryService::create(&f.deliveries, &f.users, &f.donations, input(&f))
            .await
            .unwrap();

        let err = DeliveryService::update_status(
            &f.deliveries,
            &f.chain,
            delivery.id,
            DeliveryStatus::Delivered,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let updated = DeliveryService::update_status(
            &f.deliveries,
            &f.chain,
            delivery.id,
            DeliveryStatus::Assigned,
        )
        .await
        .unwrap();
        assert_eq!(updated.status, DeliveryStatus::Assigned);
    }
}
