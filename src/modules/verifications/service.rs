use chrono::{NaiveDateTime, Utc};
use sea_orm::Set;
use serde_json::json;
use std::sync::Arc;

use super::entities::verification::{self, TaskKind, TaskStatus};
use super::repository::VerificationRepository;
use crate::modules::deliveries::repository::DeliveryRepository;
use crate::modules::donations::repository::DonationRepository;
use crate::modules::feeding_needs::repository::FeedingNeedRepository;
use crate::modules::food_packs::repository::FoodPackRepository;
use crate::modules::impact::entities::impact::EntityType;
use crate::modules::users::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::repository::RepositoryManager;

pub struct CreateTaskInput {
    pub kind: TaskKind,
    pub entity_type: EntityType,
    pub entity_id: i32,
    pub due_date: NaiveDateTime,
    pub assigned_to: Option<i32>,
}

pub struct VerificationService;

impl VerificationService {
    pub async fn create(
        tasks: &dyn VerificationRepository,
        manager: &dyn RepositoryManager,
        input: CreateTaskInput,
    ) -> AppResult<verification::Model> {
        if input.due_date <= Utc::now().naive_utc() {
            return Err(AppError::BadRequest(
                "Due date must be in the future".to_string(),
            ));
        }
        if !Self::entity_exists(manager, input.entity_type, input.entity_id).await? {
            return Err(AppError::BadRequest(
                "Referenced entity not found".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let am = verification::ActiveModel {
            kind: Set(input.kind),
            entity_type: Set(input.entity_type),
            entity_id: Set(input.entity_id),
            status: Set(TaskStatus::Pending),
            due_date: Set(input.due_date),
            evidence: Set(json!([])),
            assigned_to: Set(input.assigned_to),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        tasks.insert(am).await
    }

    pub async fn update_status(
        tasks: &dyn VerificationRepository,
        id: i32,
        new_status: TaskStatus,
    ) -> AppResult<verification::Model> {
        let existing = tasks.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        if existing.status.is_terminal() {
            return Err(AppError::Conflict(
                "Completed verification tasks cannot be modified".to_string(),
            ));
        }
        if !existing.status.can_transition(new_status) {
            return Err(AppError::Conflict(
                "Invalid verification status transition".to_string(),
            ));
        }

        let am = verification::ActiveModel {
            id: Set(existing.id),
            status: Set(new_status),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        tasks.update(am).await
    }

    pub async fn add_evidence(
        tasks: &dyn VerificationRepository,
        id: i32,
        evidence: String,
    ) -> AppResult<verification::Model> {
        if evidence.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Evidence must not be empty".to_string(),
            ));
        }

        let existing = tasks.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if existing.status.is_terminal() {
            return Err(AppError::Conflict(
                "Completed verification tasks cannot be modified".to_string(),
            ));
        }

        let mut list = existing.evidence_list();
        list.push(evidence);

        let am = verification::ActiveModel {
            id: Set(existing.id),
            evidence: Set(json!(list)),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        tasks.update(am).await
    }

    async fn entity_exists(
        manager: &dyn RepositoryManager,
        entity_type: EntityType,
        entity_id: i32,
    ) -> AppResult<bool> {
        let missing =
            || AppError::InternalServerError("Repository not registered".to_string());

        match entity_type {
            EntityType::Donation => {
                let repo = manager
                    .get::<Arc<dyn DonationRepository>>()
                    .ok_or_else(missing)?;
                Ok(repo.find_by_id(entity_id).await?.is_some())
            }
            EntityType::Delivery => {
                let repo = manager
                    .get::<Arc<dyn DeliveryRepository>>()
                    .ok_or_else(missing)?;
                Ok(repo.find_by_id(entity_id).await?.is_some())
            }
            EntityType::FoodPack => {
                let repo = manager
                    .get::<Arc<dyn FoodPackRepository>>()
                    .ok_or_else(missing)?;
                Ok(repo.find_by_id(entity_id).await?.is_some())
            }
            EntityType::FeedingNeed => {
                let repo = manager
                    .get::<Arc<dyn FeedingNeedRepository>>()
                    .ok_or_else(missing)?;
                Ok(repo.find_by_id(entity_id).await?.is_some())
            }
            EntityType::User => {
                let repo = manager
                    .get::<Arc<dyn UserRepository>>()
                    .ok_or_else(missing)?;
                Ok(repo.find_by_id(entity_id).await?.is_some())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::entities::enums::Role;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;
    use crate::modules::users::service::{RegisterUserInput, UserService};
    use crate::modules::verifications::infra::persistence::InMemoryVerificationRepository;
    use crate::shared::infra::repository::InMemoryRepositoryManager;
    use chrono::Duration;

    struct Fixture {
        tasks: InMemoryVerificationRepository,
        manager: InMemoryRepositoryManager,
        user_id: i32,
    }

    async fn fixture() -> Fixture {
        let users = InMemoryUserRepository::default();
        let user = UserService::register(
            &users,
            RegisterUserInput {
                username: "alice".to_string(),
                email: "alice@example.org".to_string(),
                role: Role::Donor,
            },
        )
        .await
        .unwrap();

        let mut manager = InMemoryRepositoryManager::new();
        manager.register::<Arc<dyn UserRepository>>(Arc::new(users));

        Fixture {
            tasks: InMemoryVerificationRepository::default(),
            manager,
            user_id: user.id,
        }
    }

    fn input(user_id: i32, due_in_days: i64) -> CreateTaskInput {
        CreateTaskInput {
            kind: TaskKind::KycReview,
            entity_type: EntityType::User,
            entity_id: user_id,
            due_date: Utc::now().naive_utc() + Duration::days(due_in_days),
            assigned_to: None,
        }
    }

    #[tokio::test]
    async fn create_requires_a_future_due_date() {
        let f = fixture().await;
        let err = VerificationService::create(&f.tasks, &f.manager, input(f.user_id, -1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Due date must be in the future");
    }

    #[tokio::test]
    async fn create_requires_an_existing_entity() {
        let f = fixture().await;
        let err = VerificationService::create(&f.tasks, &f.manager, input(999, 7))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Referenced entity not found");
    }

    #[tokio::test]
    async fn evidence_accumulates_until_the_task_completes() {
        let f = fixture().await;
        let task = VerificationService::create(&f.tasks, &f.manager, input(f.user_id, 7))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.evidence_list().is_empty());

        let err = VerificationService::add_evidence(&f.tasks, task.id, "  ".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Evidence must not be empty");

        VerificationService::add_evidence(&f.tasks, task.id, "id-card.png".to_string())
            .await
            .unwrap();
        let task = VerificationService::add_evidence(&f.tasks, task.id, "lease.pdf".to_string())
            .await
            .unwrap();
        assert_eq!(task.evidence_list(), vec!["id-card.png", "lease.pdf"]);

        VerificationService::update_status(&f.tasks, task.id, TaskStatus::Completed)
            .await
            .unwrap();

        let err = VerificationService::add_evidence(&f.tasks, task.id, "late.png".to_string())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conflict: Completed verification tasks cannot be modified"
        );
    }

    #[tokio::test]
    async fn terminal_tasks_are_immutable() {
        let f = fixture().await;
        let task = VerificationService::create(&f.tasks, &f.manager, input(f.user_id, 7))
            .await
            .unwrap();

        VerificationService::update_status(&f.tasks, task.id, TaskStatus::Rejected)
            .await
            .unwrap();

        let err = VerificationService::update_status(&f.tasks, task.id, TaskStatus::InProgress)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conflict: Completed verification tasks cannot be modified"
        );
    }
}
