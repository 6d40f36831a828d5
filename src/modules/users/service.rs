use chrono::Utc;
use sea_orm::Set;

use super::entities::{
    enums::{AccountStatus, KycStatus, Role},
    user,
};
use super::repository::UserRepository;
use crate::shared::error::{AppError, AppResult};

pub struct RegisterUserInput {
    pub username: String,
    pub email: String,
    pub role: Role,
}

pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub email: Option<String>,
}

pub struct UserService;

impl UserService {
    pub async fn register(
        repo: &dyn UserRepository,
        input: RegisterUserInput,
    ) -> AppResult<user::Model> {
        if input.username.trim().is_empty() {
            return Err(AppError::BadRequest("Username must not be empty".to_string()));
        }
        if !input.email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now().naive_utc();
        let new_user = user::ActiveModel {
            uuid: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(input.username),
            email: Set(input.email),
            role: Set(input.role),
            kyc_status: Set(KycStatus::Pending),
            account_status: Set(AccountStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
            ..Default::default()
        };

        repo.insert(new_user).await
    }

    pub async fn update_profile(
        repo: &dyn UserRepository,
        uuid: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        let existing = repo.find_by_uuid(uuid).await?.ok_or(AppError::NotFound)?;

        if let Some(email) = &input.email {
            if !email.contains('@') {
                return Err(AppError::BadRequest("Invalid email address".to_string()));
            }
            if let Some(other) = repo.find_by_email(email).await? {
                if other.id != existing.id {
                    return Err(AppError::Conflict("Email already registered".to_string()));
                }
            }
        }

        let mut am = user::ActiveModel {
            id: Set(existing.id),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        if let Some(username) = input.username {
            if username.trim().is_empty() {
                return Err(AppError::BadRequest("Username must not be empty".to_string()));
            }
            am.username = Set(username);
        }
        if let Some(email) = input.email {
            am.email = Set(email);
        }

        repo.update(am).await
    }

    pub async fn review_kyc(
        repo: &dyn UserRepository,
        user_id: i32,
        verdict: KycStatus,
    ) -> AppResult<user::Model> {
        if verdict == KycStatus::Pending {
            return Err(AppError::BadRequest(
                "KYC review must be VERIFIED or REJECTED".to_string(),
            ));
        }

        let existing = repo.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        if existing.kyc_status == verdict {
            return Err(AppError::Conflict("KYC status unchanged".to_string()));
        }

        let am = user::ActiveModel {
            id: Set(existing.id),
            kyc_status: Set(verdict),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        repo.update(am).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;

    fn donor_input(email: &str) -> RegisterUserInput {
        RegisterUserInput {
            username: "alice".to_string(),
            email: email.to_string(),
            role: Role::Donor,
        }
    }

    #[tokio::test]
    async fn register_creates_pending_kyc_user() {
        let repo = InMemoryUserRepository::default();
        let user = UserService::register(&repo, donor_input("alice@example.org"))
            .await
            .unwrap();

        assert_eq!(user.role, Role::Donor);
        assert_eq!(user.kyc_status, KycStatus::Pending);
        assert_eq!(user.account_status, AccountStatus::Active);
        assert!(!user.uuid.is_empty());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::default();
        UserService::register(&repo, donor_input("alice@example.org"))
            .await
            .unwrap();

        let err = UserService::register(&repo, donor_input("alice@example.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn kyc_review_rejects_pending_verdict_and_noop_writes() {
        let repo = InMemoryUserRepository::default();
        let user = UserService::register(&repo, donor_input("alice@example.org"))
            .await
            .unwrap();

        let err = UserService::review_kyc(&repo, user.id, KycStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let reviewed = UserService::review_kyc(&repo, user.id, KycStatus::Verified)
            .await
            .unwrap();
        assert_eq!(reviewed.kyc_status, KycStatus::Verified);

        let err = UserService::review_kyc(&repo, user.id, KycStatus::Verified)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
