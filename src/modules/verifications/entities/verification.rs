use sea_orm::entity::prelude::*;
use sea_orm::prelude::StringLen;
use serde::{Deserialize, Serialize};

use crate::modules::impact::entities::impact::EntityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TaskKind {
    #[sea_orm(string_value = "KYC_REVIEW")]
    #[serde(rename = "KYC_REVIEW")]
    KycReview,
    #[sea_orm(string_value = "DONATION_AUDIT")]
    #[serde(rename = "DONATION_AUDIT")]
    DonationAudit,
    #[sea_orm(string_value = "DELIVERY_PROOF")]
    #[serde(rename = "DELIVERY_PROOF")]
    DeliveryProof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TaskStatus {
    #[sea_orm(string_value = "PENDING")]
    #[serde(rename = "PENDING")]
    Pending,
    #[sea_orm(string_value = "IN_PROGRESS")]
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    #[serde(rename = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "REJECTED")]
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Rejected)
    }

    pub fn can_transition(&self, to: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, to) {
            (Pending, InProgress) | (Pending, Completed) | (Pending, Rejected) => true,
            (InProgress, Completed) | (InProgress, Rejected) => true,
            _ => false,
        }
    }
}

/// Generic review task pointing at any tracked entity, with an
/// accumulated evidence list stored as a JSON array of strings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "verifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: TaskKind,
    pub entity_type: EntityType,
    #[sea_orm(index)]
    pub entity_id: i32,
    pub status: TaskStatus,
    pub due_date: DateTime,
    pub evidence: Json,
    pub assigned_to: Option<i32>,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

impl Model {
    pub fn evidence_list(&self) -> Vec<String> {
        self.evidence
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use TaskStatus::*;

    #[test]
    fn tasks_accept_only_listed_edges() {
        assert!(Pending.can_transition(InProgress));
        assert!(Pending.can_transition(Completed));
        assert!(Pending.can_transition(Rejected));
        assert!(InProgress.can_transition(Completed));
        assert!(InProgress.can_transition(Rejected));

        assert!(!Completed.can_transition(Pending));
        assert!(!Completed.can_transition(InProgress));
        assert!(!Rejected.can_transition(Completed));
        assert!(!InProgress.can_transition(Pending));
    }
}
