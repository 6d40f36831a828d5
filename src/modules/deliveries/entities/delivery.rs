use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::DeliveryStatus;
use crate::modules::donations::entities::enums::VerificationStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(index)]
    pub logistics_id: i32,
    // At least one of the three references is required; enforced in the
    // service layer.
    pub donation_id: Option<i32>,
    pub food_pack_id: Option<i32>,
    pub feeding_need_id: Option<i32>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub scheduled_at: Option<DateTime>,
    pub status: DeliveryStatus,
    pub contract_address: Option<String>,
    pub verification_status: VerificationStatus,
    pub verified_by: Option<i32>,
    pub verified_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub verification_note: Option<String>,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::modules::users::entities::user::Entity",
        from = "Column::LogisticsId",
        to = "crate::modules::users::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Logistics,
    #[sea_orm(
        belongs_to = "crate::modules::donations::entities::donation::Entity",
        from = "Column::DonationId",
        to = "crate::modules::donations::entities::donation::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Donation,
}

impl Related<crate::modules::users::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Logistics.def()
    }
}

impl Related<crate::modules::donations::entities::donation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
