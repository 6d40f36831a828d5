use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{AccountStatus, KycStatus, Role};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[serde(skip_serializing)]
    pub id: i32,
    #[sea_orm(unique, index)]
    pub uuid: String,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: Role,
    pub kyc_status: KycStatus,
    pub account_status: AccountStatus,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
    pub last_login_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
