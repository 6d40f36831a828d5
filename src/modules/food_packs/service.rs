use chrono::Utc;
use sea_orm::Set;

use super::entities::food_pack;
use super::repository::FoodPackRepository;
use crate::modules::impact::entities::impact::{self, EntityType, ImpactCategory};
use crate::modules::impact::repository::ImpactRepository;
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::pagination::{PageParams, Paginated};
use crate::shared::repository::RepositoryManager;

pub struct CreatePackInput {
    pub provider_id: i32,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub quantity: i32,
}

pub struct FoodPackService;

impl FoodPackService {
    pub async fn create(
        packs: &dyn FoodPackRepository,
        users: &dyn UserRepository,
        input: CreatePackInput,
    ) -> AppResult<food_pack::Model> {
        users
            .find_by_id(input.provider_id)
            .await?
            .filter(|u| u.role == Role::ServiceProvider)
            .ok_or(AppError::BadRequest(
                "Service provider not found".to_string(),
            ))?;

        if input.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name must not be empty".to_string()));
        }
        if input.quantity < 0 {
            return Err(AppError::BadRequest("Invalid quantity".to_string()));
        }
        if input.price < 0 {
            return Err(AppError::BadRequest("Invalid price".to_string()));
        }

        let now = Utc::now().naive_utc();
        let am = food_pack::ActiveModel {
            provider_id: Set(input.provider_id),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            quantity: Set(input.quantity),
            available_quantity: Set(input.quantity),
            sponsored_quantity: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        packs.insert(am).await
    }

    pub async fn update_quantity(
        packs: &dyn FoodPackRepository,
        id: i32,
        quantity: i32,
    ) -> AppResult<food_pack::Model> {
        if quantity < 0 {
            return Err(AppError::BadRequest("Invalid quantity".to_string()));
        }

        let existing = packs.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if quantity < existing.sponsored_quantity {
            return Err(AppError::BadRequest(
                "Quantity cannot drop below sponsored packs".to_string(),
            ));
        }

        let am = food_pack::ActiveModel {
            id: Set(existing.id),
            quantity: Set(quantity),
            available_quantity: Set(quantity - existing.sponsored_quantity),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        packs.update(am).await
    }

    /// Sponsorship decrements availability and records the corresponding
    /// impact metric inside one unit of work.
    pub async fn sponsor(
        manager: &dyn RepositoryManager,
        packs: &dyn FoodPackRepository,
        impacts: &dyn ImpactRepository,
        users: &dyn UserRepository,
        donor_id: i32,
        id: i32,
        count: i32,
    ) -> AppResult<food_pack::Model> {
        users
            .find_by_id(donor_id)
            .await?
            .filter(|u| u.role == Role::Donor || u.role == Role::Admin)
            .ok_or(AppError::BadRequest("Donor not found".to_string()))?;

        if count <= 0 {
            return Err(AppError::BadRequest(
                "Sponsor count must be positive".to_string(),
            ));
        }

        let existing = packs.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if count > existing.available_quantity {
            return Err(AppError::Conflict(format!(
                "Only {} packs available",
                existing.available_quantity
            )));
        }

        let uow = manager.begin().await?;
        let packs_txn = packs
            .with_transaction(uow.as_ref())
            .ok_or(AppError::InternalServerError(
                "FoodPackRepository does not support transactions".to_string(),
            ))?;
        let impacts_txn = impacts
            .with_transaction(uow.as_ref())
            .ok_or(AppError::InternalServerError(
                "ImpactRepository does not support transactions".to_string(),
            ))?;

        let now = Utc::now().naive_utc();
        let update = food_pack::ActiveModel {
            id: Set(existing.id),
            available_quantity: Set(existing.available_quantity - count),
            sponsored_quantity: Set(existing.sponsored_quantity + count),
            updated_at: Set(now),
            ..Default::default()
        };
        let updated = match packs_txn.update(update).await {
            Ok(updated) => updated,
            Err(err) => {
                uow.rollback().await?;
                return Err(err);
            }
        };

        let metric = impact::ActiveModel {
            entity_type: Set(EntityType::FoodPack),
            entity_id: Set(existing.id),
            category: Set(ImpactCategory::MealsServed),
            value: Set(count as i64),
            unit: Set("packs".to_string()),
            recorded_at: Set(now),
            ..Default::default()
        };
        if let Err(err) = impacts_txn.insert(metric).await {
            uow.rollback().await?;
            return Err(err);
        }

        uow.commit().await?;
        Ok(updated)
    }

    pub async fn list(
        packs: &dyn FoodPackRepository,
        provider_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<Paginated<food_pack::Model>> {
        let params = params.normalized();
        let (rows, total) = packs.list(provider_id, params).await?;
        Ok(Paginated::new(rows, total, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::food_packs::infra::persistence::InMemoryFoodPackRepository;
    use crate::modules::impact::infra::persistence::InMemoryImpactRepository;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;
    use crate::modules::users::service::{RegisterUserInput, UserService};
    use crate::shared::infra::repository::InMemoryRepositoryManager;

    struct Fixture {
        manager: InMemoryRepositoryManager,
        packs: InMemoryFoodPackRepository,
        impacts: InMemoryImpactRepository,
        users: InMemoryUserRepository,
        provider_id: i32,
        donor_id: i32,
    }

    async fn fixture() -> Fixture {
        let users = InMemoryUserRepository::default();
        let provider = UserService::register(
            &users,
            RegisterUserInput {
                username: "kitchen".to_string(),
                email: "kitchen@example.org".to_string(),
                role: Role::ServiceProvider,
            },
        )
        .await
        .unwrap();
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
            manager: InMemoryRepositoryManager::new(),
            packs: InMemoryFoodPackRepository::default(),
            impacts: InMemoryImpactRepository::default(),
            users,
            provider_id: provider.id,
            donor_id: donor.id,
        }
    }

    fn input(provider_id: i32, quantity: i32) -> CreatePackInput {
        CreatePackInput {
            provider_id,
            name: "Family pack".to_string(),
            description: "Staples for a family of four".to_string(),
            price: 1_500,
            quantity,
        }
    }

    #[tokio::test]
    async fn create_starts_fully_available() {
        let f = fixture().await;
        let pack = FoodPackService::create(&f.packs, &f.users, input(f.provider_id, 40))
            .await
            .unwrap();
        assert_eq!(pack.quantity, 40);
        assert_eq!(pack.available_quantity, 40);
        assert_eq!(pack.sponsored_quantity, 0);
    }

    #[tokio::test]
    async fn negative_quantity_is_invalid() {
        let f = fixture().await;
        let err = FoodPackService::create(&f.packs, &f.users, input(f.provider_id, -1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Invalid quantity");

        let pack = FoodPackService::create(&f.packs, &f.users, input(f.provider_id, 10))
            .await
            .unwrap();
        let err = FoodPackService::update_quantity(&f.packs, pack.id, -5)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Invalid quantity");
    }

    #[tokio::test]
    async fn sponsorship_never_drives_availability_negative() {
        let f = fixture().await;
        let pack = FoodPackService::create(&f.packs, &f.users, input(f.provider_id, 10))
            .await
            .unwrap();

        let updated = FoodPackService::sponsor(
            &f.manager, &f.packs, &f.impacts, &f.users, f.donor_id, pack.id, 7,
        )
        .await
        .unwrap();
        assert_eq!(updated.available_quantity, 3);
        assert_eq!(updated.sponsored_quantity, 7);

        let err = FoodPackService::sponsor(
            &f.manager, &f.packs, &f.impacts, &f.users, f.donor_id, pack.id, 4,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Conflict: Only 3 packs available");

        // The failed attempt recorded nothing.
        let metrics = f
            .impacts
            .list_for_entity(EntityType::FoodPack, pack.id)
            .await
            .unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].value, 7);
    }

    #[tokio::test]
    async fn update_quantity_preserves_sponsored_packs() {
        let f = fixture().await;
        let pack = FoodPackService::create(&f.packs, &f.users, input(f.provider_id, 10))
            .await
            .unwrap();
        FoodPackService::sponsor(
            &f.manager, &f.packs, &f.impacts, &f.users, f.donor_id, pack.id, 4,
        )
        .await
        .unwrap();

        let updated = FoodPackService::update_quantity(&f.packs, pack.id, 20)
            .await
            .unwrap();
        assert_eq!(updated.quantity, 20);
        assert_eq!(updated.available_quantity, 16);
        assert_eq!(updated.sponsored_quantity, 4);

        let err = FoodPackService::update_quantity(&f.packs, pack.id, 3)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Quantity cannot drop below sponsored packs"
        );
    }
}
