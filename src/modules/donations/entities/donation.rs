use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{ChainSync, DonationCategory, DonationStatus, VerificationStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(index)]
    pub donor_id: i32,
    pub category: DonationCategory,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Monetary value in minor units; 0 for pure goods donations.
    pub amount: i64,
    pub quantity: i32,
    pub status: DonationStatus,
    pub verification_status: VerificationStatus,
    pub contract_address: Option<String>,
    pub chain_sync: ChainSync,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::modules::users::entities::user::Entity",
        from = "Column::DonorId",
        to = "crate::modules::users::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Donor,
}

impl Related<crate::modules::users::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
