use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::modules::chain::infra::persistence::{
    InMemoryContractRepository, PostgresContractRepository,
};
use crate::modules::chain::repository::ContractRepository;
use crate::modules::deliveries::infra::persistence::{
    InMemoryDeliveryRepository, PostgresDeliveryRepository,
};
use crate::modules::deliveries::repository::DeliveryRepository;
use crate::modules::donations::infra::persistence::{
    InMemoryDonationRepository, PostgresDonationRepository,
};
use crate::modules::donations::repository::DonationRepository;
use crate::modules::feeding_needs::infra::persistence::{
    InMemoryFeedingNeedRepository, PostgresFeedingNeedRepository,
};
use crate::modules::feeding_needs::repository::FeedingNeedRepository;
use crate::modules::food_packs::infra::persistence::{
    InMemoryFoodPackRepository, PostgresFoodPackRepository,
};
use crate::modules::food_packs::repository::FoodPackRepository;
use crate::modules::impact::infra::persistence::{
    InMemoryImpactRepository, PostgresImpactRepository,
};
use crate::modules::impact::repository::ImpactRepository;
use crate::modules::users::infra::persistence::{InMemoryUserRepository, PostgresUserRepository};
use crate::modules::users::repository::UserRepository;
use crate::modules::verifications::infra::persistence::{
    InMemoryVerificationRepository, PostgresVerificationRepository,
};
use crate::modules::verifications::repository::VerificationRepository;
use crate::shared::config::Config;
use crate::shared::infra::repository::{InMemoryRepositoryManager, PostgresRepositoryManager};
use crate::shared::repository::RepositoryManager;

pub async fn init_repo_manager(
    config: &Config,
    db: Option<DatabaseConnection>,
) -> Arc<dyn RepositoryManager> {
    if config.app_env == "dev" {
        tracing::warn!("Using in-memory repositories for dev env");
        let mut manager = InMemoryRepositoryManager::new();

        manager.register::<Arc<dyn UserRepository>>(Arc::new(InMemoryUserRepository::default()));
        manager.register::<Arc<dyn DonationRepository>>(Arc::new(
            InMemoryDonationRepository::default(),
        ));
        manager.register::<Arc<dyn DeliveryRepository>>(Arc::new(
            InMemoryDeliveryRepository::default(),
        ));
        manager.register::<Arc<dyn FeedingNeedRepository>>(Arc::new(
            InMemoryFeedingNeedRepository::default(),
        ));
        manager.register::<Arc<dyn FoodPackRepository>>(Arc::new(
            InMemoryFoodPackRepository::default(),
        ));
        manager.register::<Arc<dyn VerificationRepository>>(Arc::new(
            InMemoryVerificationRepository::default(),
        ));
        manager
            .register::<Arc<dyn ImpactRepository>>(Arc::new(InMemoryImpactRepository::default()));
        manager.register::<Arc<dyn ContractRepository>>(Arc::new(
            InMemoryContractRepository::default(),
        ));

        Arc::new(manager) as Arc<dyn RepositoryManager>
    } else {
        tracing::info!("Using PostgreSQL repositories");
        let db = Arc::new(db.expect("Database connection is required outside dev"));
        let mut manager = PostgresRepositoryManager::new(db.clone());

        manager.register::<Arc<dyn UserRepository>>(Arc::new(PostgresUserRepository::new(
            db.clone(),
        )));
        manager.register::<Arc<dyn DonationRepository>>(Arc::new(
            PostgresDonationRepository::new(db.clone()),
        ));
        manager.register::<Arc<dyn DeliveryRepository>>(Arc::new(
            PostgresDeliveryRepository::new(db.clone()),
        ));
        manager.register::<Arc<dyn FeedingNeedRepository>>(Arc::new(
            PostgresFeedingNeedRepository::new(db.clone()),
        ));
        manager.register::<Arc<dyn FoodPackRepository>>(Arc::new(
            PostgresFoodPackRepository::new(db.clone()),
        ));
        manager.register::<Arc<dyn VerificationRepository>>(Arc::new(
            PostgresVerificationRepository::new(db.clone()),
        ));
        manager.register::<Arc<dyn ImpactRepository>>(Arc::new(PostgresImpactRepository::new(
            db.clone(),
        )));
        manager.register::<Arc<dyn ContractRepository>>(Arc::new(
            PostgresContractRepository::new(db.clone()),
        ));

        Arc::new(manager) as Arc<dyn RepositoryManager>
    }
}
