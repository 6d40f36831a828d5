use sea_orm::{DeriveActiveEnum, EnumIter, prelude::StringLen};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DonationStatus {
    #[sea_orm(string_value = "PENDING")]
    #[serde(rename = "PENDING")]
    Pending,
    #[sea_orm(string_value = "CONFIRMED")]
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "IN_TRANSIT")]
    #[serde(rename = "IN_TRANSIT")]
    InTransit,
    #[sea_orm(string_value = "DELIVERED")]
    #[serde(rename = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "COMPLETED")]
    #[serde(rename = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl DonationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Completed | DonationStatus::Cancelled)
    }

    /// Transition table for the donation lifecycle. Same-status writes are
    /// not transitions and are rejected.
    pub fn can_transition(&self, to: DonationStatus) -> bool {
        use DonationStatus::*;
        match (self, to) {
            (Pending, Confirmed) | (Pending, Cancelled) => true,
            (Confirmed, InTransit) | (Confirmed, Cancelled) => true,
            (InTransit, Delivered) | (InTransit, Cancelled) => true,
            (Delivered, Completed) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "PENDING",
            DonationStatus::Confirmed => "CONFIRMED",
            DonationStatus::InTransit => "IN_TRANSIT",
            DonationStatus::Delivered => "DELIVERED",
            DonationStatus::Completed => "COMPLETED",
            DonationStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DonationCategory {
    #[sea_orm(string_value = "FOOD")]
    #[serde(rename = "FOOD")]
    Food,
    #[sea_orm(string_value = "FUNDS")]
    #[serde(rename = "FUNDS")]
    Funds,
    #[sea_orm(string_value = "SUPPLIES")]
    #[serde(rename = "SUPPLIES")]
    Supplies,
}

impl DonationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationCategory::Food => "FOOD",
            DonationCategory::Funds => "FUNDS",
            DonationCategory::Supplies => "SUPPLIES",
        }
    }
}

/// Review outcome shared by donations and deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum VerificationStatus {
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

/// Outcome of the two-phase contract write: the row is inserted PENDING,
/// then finalized to CONFIRMED or FAILED after the gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ChainSync {
    #[sea_orm(string_value = "PENDING")]
    #[serde(rename = "PENDING")]
    Pending,
    #[sea_orm(string_value = "CONFIRMED")]
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[sea_orm(string_value = "FAILED")]
    #[serde(rename = "FAILED")]
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use DonationStatus::*;

    #[test]
    fn lifecycle_accepts_only_listed_edges() {
        assert!(Pending.can_transition(Confirmed));
        assert!(Pending.can_transition(Cancelled));
        assert!(Confirmed.can_transition(InTransit));
        assert!(InTransit.can_transition(Delivered));
        assert!(Delivered.can_transition(Completed));

        assert!(!Pending.can_transition(Delivered));
        assert!(!Delivered.can_transition(Cancelled));
        assert!(!Completed.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Pending));
    }

    #[test]
    fn same_status_writes_are_not_transitions() {
        for status in [Pending, Confirmed, InTransit, Delivered, Completed, Cancelled] {
            assert!(!status.can_transition(status));
        }
    }

    #[test]
    fn terminal_states() {
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Delivered.is_terminal());
    }
}
