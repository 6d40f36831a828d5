use sea_orm::entity::prelude::*;
use sea_orm::prelude::StringLen;
use serde::{Deserialize, Serialize};

/// Entities a metric or review task may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EntityType {
    #[sea_orm(string_value = "DONATION")]
    #[serde(rename = "DONATION")]
    Donation,
    #[sea_orm(string_value = "DELIVERY")]
    #[serde(rename = "DELIVERY")]
    Delivery,
    #[sea_orm(string_value = "FOOD_PACK")]
    #[serde(rename = "FOOD_PACK")]
    FoodPack,
    #[sea_orm(string_value = "FEEDING_NEED")]
    #[serde(rename = "FEEDING_NEED")]
    FeedingNeed,
    #[sea_orm(string_value = "USER")]
    #[serde(rename = "USER")]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ImpactCategory {
    #[sea_orm(string_value = "MEALS_SERVED")]
    #[serde(rename = "MEALS_SERVED")]
    MealsServed,
    #[sea_orm(string_value = "KG_RESCUED")]
    #[serde(rename = "KG_RESCUED")]
    KgRescued,
    #[sea_orm(string_value = "FAMILIES_REACHED")]
    #[serde(rename = "FAMILIES_REACHED")]
    FamiliesReached,
}

impl ImpactCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactCategory::MealsServed => "MEALS_SERVED",
            ImpactCategory::KgRescued => "KG_RESCUED",
            ImpactCategory::FamiliesReached => "FAMILIES_REACHED",
        }
    }
}

/// Denormalized metric attached to an entity for reporting.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "impacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub entity_type: EntityType,
    #[sea_orm(index)]
    pub entity_id: i32,
    pub category: ImpactCategory,
    pub value: i64,
    pub unit: String,
    #[serde(skip_deserializing)]
    pub recorded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
