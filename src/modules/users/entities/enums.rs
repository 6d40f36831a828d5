use sea_orm::{DeriveActiveEnum, EnumIter, prelude::StringLen};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Role {
    #[sea_orm(string_value = "DONOR")]
    #[serde(rename = "DONOR")]
    Donor,
    #[sea_orm(string_value = "NGO")]
    #[serde(rename = "NGO")]
    Ngo,
    #[sea_orm(string_value = "SERVICE_PROVIDER")]
    #[serde(rename = "SERVICE_PROVIDER")]
    ServiceProvider,
    #[sea_orm(string_value = "LOGISTICS")]
    #[serde(rename = "LOGISTICS")]
    Logistics,
    #[sea_orm(string_value = "VOLUNTEER")]
    #[serde(rename = "VOLUNTEER")]
    Volunteer,
    #[sea_orm(string_value = "ADMIN")]
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "DONOR",
            Role::Ngo => "NGO",
            Role::ServiceProvider => "SERVICE_PROVIDER",
            Role::Logistics => "LOGISTICS",
            Role::Volunteer => "VOLUNTEER",
            Role::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum KycStatus {
    #[sea_orm(string_value = "PENDING")]
    #[serde(rename = "PENDING")]
    Pending,
    #[sea_orm(string_value = "VERIFIED")]
    #[serde(rename = "VERIFIED")]
    Verified,
    #[sea_orm(string_value = "REJECTED")]
    #[serde(rename = "REJECTED")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AccountStatus {
    #[sea_orm(string_value = "ACTIVE")]
    #[serde(rename = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "SUSPENDED")]
    #[serde(rename = "SUSPENDED")]
    Suspended,
}
