use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "food_packs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(index)]
    pub provider_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Unit price in minor units.
    pub price: i64,
    pub quantity: i32,
    /// Invariant: 0 <= available_quantity <= quantity, and
    /// available_quantity + sponsored_quantity == quantity.
    pub available_quantity: i32,
    pub sponsored_quantity: i32,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::modules::users::entities::user::Entity",
        from = "Column::ProviderId",
        to = "crate::modules::users::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Provider,
}

impl Related<crate::modules::users::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
