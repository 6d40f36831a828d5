use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;
use super::m20250301_000002_create_donation_tables::Donations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deliveries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deliveries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Deliveries::LogisticsId).integer().not_null())
                    .col(ColumnDef::new(Deliveries::DonationId).integer())
                    .col(ColumnDef::new(Deliveries::FoodPackId).integer())
                    .col(ColumnDef::new(Deliveries::FeedingNeedId).integer())
                    .col(
                        ColumnDef::new(Deliveries::PickupAddress)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Deliveries::DropoffAddress)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deliveries::ScheduledAt).timestamp())
                    .col(ColumnDef::new(Deliveries::Status).string().not_null())
                    .col(ColumnDef::new(Deliveries::ContractAddress).string())
                    .col(
                        ColumnDef::new(Deliveries::VerificationStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Deliveries::VerifiedBy).integer())
                    .col(ColumnDef::new(Deliveries::VerifiedAt).timestamp())
                    .col(ColumnDef::new(Deliveries::VerificationNote).text())
                    .col(
                        ColumnDef::new(Deliveries::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Deliveries::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_logistics")
                            .from(Deliveries::Table, Deliveries::LogisticsId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deliveries_donation")
                            .from(Deliveries::Table, Deliveries::DonationId)
                            .to(Donations::Table, Donations::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deliveries_logistics_id")
                    .table(Deliveries::Table)
                    .col(Deliveries::LogisticsId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deliveries_donation_id")
                    .table(Deliveries::Table)
                    .col(Deliveries::DonationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deliveries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Deliveries {
    Table,
    Id,
    LogisticsId,
    DonationId,
    FoodPackId,
    FeedingNeedId,
    PickupAddress,
    DropoffAddress,
    ScheduledAt,
    Status,
    ContractAddress,
    VerificationStatus,
    VerifiedBy,
    VerifiedAt,
    VerificationNote,
    CreatedAt,
    UpdatedAt,
}
