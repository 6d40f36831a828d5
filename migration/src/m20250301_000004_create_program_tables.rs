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
                    .table(FeedingNeeds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeedingNeeds::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeedingNeeds::NgoId).integer().not_null())
                    .col(ColumnDef::new(FeedingNeeds::Title).string().not_null())
                    .col(ColumnDef::new(FeedingNeeds::Description).text().not_null())
                    .col(
                        ColumnDef::new(FeedingNeeds::TargetAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeedingNeeds::FundedAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FeedingNeeds::MealsTarget)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FeedingNeeds::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FeedingNeeds::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feeding_needs_ngo")
                            .from(FeedingNeeds::Table, FeedingNeeds::NgoId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodPacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodPacks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FoodPacks::ProviderId).integer().not_null())
                    .col(ColumnDef::new(FoodPacks::Name).string().not_null())
                    .col(ColumnDef::new(FoodPacks::Description).text().not_null())
                    .col(ColumnDef::new(FoodPacks::Price).big_integer().not_null())
                    .col(ColumnDef::new(FoodPacks::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(FoodPacks::AvailableQuantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FoodPacks::SponsoredQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(FoodPacks::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FoodPacks::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_food_packs_provider")
                            .from(FoodPacks::Table, FoodPacks::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodPacks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeedingNeeds::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FeedingNeeds {
    Table,
    Id,
    NgoId,
    Title,
    Description,
    TargetAmount,
    FundedAmount,
    MealsTarget,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FoodPacks {
    Table,
    Id,
    ProviderId,
    Name,
    Description,
    Price,
    Quantity,
    AvailableQuantity,
    SponsoredQuantity,
    CreatedAt,
    UpdatedAt,
}
