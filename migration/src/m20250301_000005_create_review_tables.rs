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
                    .table(Verifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Verifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Verifications::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Verifications::EntityType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Verifications::EntityId).integer().not_null())
                    .col(ColumnDef::new(Verifications::Status).string().not_null())
                    .col(ColumnDef::new(Verifications::DueDate).timestamp().not_null())
                    .col(ColumnDef::new(Verifications::Evidence).json().not_null())
                    .col(ColumnDef::new(Verifications::AssignedTo).integer())
                    .col(
                        ColumnDef::new(Verifications::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Verifications::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verifications_assignee")
                            .from(Verifications::Table, Verifications::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_verifications_entity")
                    .table(Verifications::Table)
                    .col(Verifications::EntityType)
                    .col(Verifications::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Impacts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Impacts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Impacts::EntityType).string().not_null())
                    .col(ColumnDef::new(Impacts::EntityId).integer().not_null())
                    .col(ColumnDef::new(Impacts::Category).string().not_null())
                    .col(ColumnDef::new(Impacts::Value).big_integer().not_null())
                    .col(ColumnDef::new(Impacts::Unit).string().not_null())
                    .col(
                        ColumnDef::new(Impacts::RecordedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_impacts_entity")
                    .table(Impacts::Table)
                    .col(Impacts::EntityType)
                    .col(Impacts::EntityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Impacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Verifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Verifications {
    Table,
    Id,
    Kind,
    EntityType,
    EntityId,
    Status,
    DueDate,
    Evidence,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Impacts {
    Table,
    Id,
    EntityType,
    EntityId,
    Category,
    Value,
    Unit,
    RecordedAt,
}
