use sea_orm::{DeriveActiveEnum, EnumIter, prelude::StringLen};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "PENDING")]
    #[serde(rename = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ASSIGNED")]
    #[serde(rename = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "PICKED_UP")]
    #[serde(rename = "PICKED_UP")]
    PickedUp,
    #[sea_orm(string_value = "IN_TRANSIT")]
    #[serde(rename = "IN_TRANSIT")]
    InTransit,
    #[sea_orm(string_value = "DELIVERED")]
    #[serde(rename = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCELLED")]
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl DeliveryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Cancelled)
    }

    /// Transition table for the delivery leg; CANCELLED is reachable from
    /// every non-terminal state.
    pub fn can_transition(&self, to: DeliveryStatus) -> bool {
        use DeliveryStatus::*;
        match (self, to) {
            (Pending, Assigned) => true,
            (Assigned, PickedUp) => true,
            (PickedUp, InTransit) => true,
            (InTransit, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Assigned => "ASSIGNED",
            DeliveryStatus::PickedUp => "PICKED_UP",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Cancelled => "CANCELLED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeliveryStatus::*;

    #[test]
    fn leg_accepts_only_listed_edges() {
        assert!(Pending.can_transition(Assigned));
        assert!(Assigned.can_transition(PickedUp));
        assert!(PickedUp.can_transition(InTransit));
        assert!(InTransit.can_transition(Delivered));

        assert!(!Pending.can_transition(Delivered));
        assert!(!Assigned.can_transition(InTransit));
        assert!(!Delivered.can_transition(Pending));
    }

    #[test]
    fn cancel_from_any_non_terminal_state() {
        for status in [Pending, Assigned, PickedUp, InTransit] {
            assert!(status.can_transition(Cancelled));
        }
        assert!(!Delivered.can_transition(Cancelled));
        assert!(!Cancelled.can_transition(Cancelled));
    }
}
