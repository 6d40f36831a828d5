use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::DonorId).integer().not_null())
                    .col(ColumnDef::new(Donations::Category).string().not_null())
                    .col(ColumnDef::new(Donations::Description).text().not_null())
                    .col(ColumnDef::new(Donations::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Donations::Quantity).integer().not_null())
                    .col(ColumnDef::new(Donations::Status).string().not_null())
                    .col(
                        ColumnDef::new(Donations::VerificationStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::ContractAddress).string())
                    .col(ColumnDef::new(Donations::ChainSync).string().not_null())
                    .col(
                        ColumnDef::new(Donations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Donations::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_donations_donor")
                            .from(Donations::Table, Donations::DonorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_donations_donor_id")
                    .table(Donations::Table)
                    .col(Donations::DonorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contracts::Address)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Contracts::EntityType).string().not_null())
                    .col(ColumnDef::new(Contracts::EntityId).integer().not_null())
                    .col(ColumnDef::new(Contracts::Network).string().not_null())
                    .col(
                        ColumnDef::new(Contracts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contracts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Donations {
    Table,
    Id,
    DonorId,
    Category,
    Description,
    Amount,
    Quantity,
    Status,
    VerificationStatus,
    ContractAddress,
    ChainSync,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contracts {
    Table,
    Id,
    Address,
    EntityType,
    EntityId,
    Network,
    CreatedAt,
}
