use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::modules::users::entities::enums::{AccountStatus, Role};
use crate::modules::users::entities::user;
use crate::modules::users::repository::UserRepository;
use crate::shared::config::Config;
use crate::shared::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User UUID.
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

pub struct AuthService;

impl AuthService {
    /// Issues a bearer token for a registered email. This stands in for a
    /// real identity provider; the rest of the API only consumes the
    /// resulting claims.
    pub async fn issue_token(
        repo: &dyn UserRepository,
        config: &Config,
        email: &str,
    ) -> AppResult<IssuedToken> {
        let user = repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized("Unknown email".to_string()))?;

        if user.account_status != AccountStatus::Active {
            return Err(AppError::Forbidden("Account is suspended".to_string()));
        }

        let token = Self::generate_jwt(config, &user)?;

        let am = user::ActiveModel {
            id: Set(user.id),
            last_login_at: Set(Some(Utc::now().naive_utc())),
            ..Default::default()
        };
        repo.update(am).await?;

        Ok(IssuedToken {
            token,
            expires_in: config.jwt_ttl_hours * 3600,
        })
    }

    fn generate_jwt(config: &Config, user: &user::Model) -> AppResult<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(config.jwt_ttl_hours))
            .ok_or(AppError::InternalServerError(
                "Token expiry overflow".to_string(),
            ))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.uuid.clone(),
            role: user.role,
            exp: expiration,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(format!("JWT generation failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::infra::persistence::InMemoryUserRepository;
    use crate::modules::users::service::{RegisterUserInput, UserService};
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[tokio::test]
    async fn issued_token_round_trips_role_claims() {
        let repo = InMemoryUserRepository::default();
        let config = Config::for_tests();
        UserService::register(
            &repo,
            RegisterUserInput {
                username: "driver".to_string(),
                email: "driver@example.org".to_string(),
                role: Role::Logistics,
            },
        )
        .await
        .unwrap();

        let issued = AuthService::issue_token(&repo, &config, "driver@example.org")
            .await
            .unwrap();

        let decoded = decode::<Claims>(
            &issued.token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.role, Role::Logistics);

        let user = repo
            .find_by_email("driver@example.org")
            .await
            .unwrap()
            .unwrap();
        assert!(user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let repo = InMemoryUserRepository::default();
        let config = Config::for_tests();
        let err = AuthService::issue_token(&repo, &config, "nobody@example.org")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
