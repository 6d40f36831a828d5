use chrono::Utc;
use sea_orm::Set;

use super::entities::feeding_need::{self, NeedStatus};
use super::repository::FeedingNeedRepository;
use crate::modules::users::entities::enums::Role;
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::pagination::{PageParams, Paginated};

pub struct CreateNeedInput {
    pub ngo_id: i32,
    pub title: String,
    pub description: String,
    pub target_amount: i64,
    pub meals_target: i32,
}

pub struct FeedingNeedService;

impl FeedingNeedService {
    pub async fn create(
        needs: &dyn FeedingNeedRepository,
        users: &dyn UserRepository,
        input: CreateNeedInput,
    ) -> AppResult<feeding_need::Model> {
        users
            .find_by_id(input.ngo_id)
            .await?
            .filter(|u| u.role == Role::Ngo)
            .ok_or(AppError::BadRequest("NGO not found".to_string()))?;

        if input.title.trim().is_empty() {
            return Err(AppError::BadRequest("Title must not be empty".to_string()));
        }
        if input.target_amount <= 0 {
            return Err(AppError::BadRequest(
                "Target amount must be positive".to_string(),
            ));
        }
        if input.meals_target < 0 {
            return Err(AppError::BadRequest(
                "Meals target must not be negative".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let am = feeding_need::ActiveModel {
            ngo_id: Set(input.ngo_id),
            title: Set(input.title),
            description: Set(input.description),
            target_amount: Set(input.target_amount),
            funded_amount: Set(0),
            meals_target: Set(input.meals_target),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        needs.insert(am).await
    }

    pub async fn fund(
        needs: &dyn FeedingNeedRepository,
        id: i32,
        amount: i64,
    ) -> AppResult<feeding_need::Model> {
        if amount <= 0 {
            return Err(AppError::BadRequest(
                "Funding amount must be positive".to_string(),
            ));
        }

        let existing = needs.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if existing.status() == NeedStatus::Funded {
            return Err(AppError::Conflict(
                "Feeding need is already fully funded".to_string(),
            ));
        }

        let am = feeding_need::ActiveModel {
            id: Set(existing.id),
            funded_amount: Set(existing.funded_amount + amount),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        needs.update(am).await
    }

    pub async fn list(
        needs: &dyn FeedingNeedRepository,
        ngo_id: Option<i32>,
        params: PageParams,
    ) -> AppResult<Paginated<feeding_need::Model>> {
        let params = params.normalized();
        let (rows, total) = needs.list(ngo_id, params).await?;
        Ok(Paginated::new(rows, total, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::feeding_needs::infra::persistence::InMemoryFeedingNeedRepository;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;
    use crate::modules::users::service::{RegisterUserInput, UserService};

    async fn fixture() -> (InMemoryFeedingNeedRepository, InMemoryUserRepository, i32) {
        let users = InMemoryUserRepository::default();
        let ngo = UserService::register(
            &users,
            RegisterUserInput {
                username: "shelter".to_string(),
                email: "shelter@example.org".to_string(),
                role: Role::Ngo,
            },
        )
        .await
        .unwrap();
        (InMemoryFeedingNeedRepository::default(), users, ngo.id)
    }

    fn input(ngo_id: i32) -> CreateNeedInput {
        CreateNeedInput {
            ngo_id,
            title: "School lunches".to_string(),
            description: "Daily lunches for 100 children".to_string(),
            target_amount: 10_000,
            meals_target: 100,
        }
    }

    #[tokio::test]
    async fn create_requires_an_ngo_and_a_positive_target() {
        let (needs, users, ngo_id) = fixture().await;

        let err = FeedingNeedService::create(&needs, &users, input(999))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: NGO not found");

        let mut bad = input(ngo_id);
        bad.target_amount = 0;
        let err = FeedingNeedService::create(&needs, &users, bad)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn funding_accumulates_and_derives_funded_exactly_at_target() {
        let (needs, users, ngo_id) = fixture().await;
        let need = FeedingNeedService::create(&needs, &users, input(ngo_id))
            .await
            .unwrap();
        assert_eq!(need.status(), NeedStatus::Active);

        let need = FeedingNeedService::fund(&needs, need.id, 4_000).await.unwrap();
        assert_eq!(need.funded_amount, 4_000);
        assert_eq!(need.status(), NeedStatus::Active);

        let need = FeedingNeedService::fund(&needs, need.id, 6_000).await.unwrap();
        assert_eq!(need.funded_amount, 10_000);
        assert_eq!(need.status(), NeedStatus::Funded);
        assert_eq!(need.percent_funded(), 100);

        let err = FeedingNeedService::fund(&needs, need.id, 1).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conflict: Feeding need is already fully funded"
        );
    }

    #[tokio::test]
    async fn funding_rejects_non_positive_amounts() {
        let (needs, users, ngo_id) = fixture().await;
        let need = FeedingNeedService::create(&needs, &users, input(ngo_id))
            .await
            .unwrap();

        for amount in [0, -50] {
            let err = FeedingNeedService::fund(&needs, need.id, amount)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }
}
