use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registry of contracts the gateway has deployed for local entities.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_serializing)]
    pub id: i32,
    #[sea_orm(unique, index)]
    pub address: String,
    pub entity_type: String,
    pub entity_id: i32,
    pub network: String,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
