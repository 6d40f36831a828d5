use crate::modules::users::entities::enums::Role;
use crate::shared::error::{AppError, AppResult};

/// Every privileged operation in the API. Handlers consult the table once
/// via [`require`] instead of comparing role strings inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ReviewKyc,
    CreateDonation,
    UpdateDonationStatus,
    VerifyDonation,
    CreateDelivery,
    UpdateDeliveryStatus,
    VerifyDelivery,
    CreateFeedingNeed,
    FundFeedingNeed,
    CreateFoodPack,
    UpdateFoodPackQuantity,
    SponsorFoodPack,
    CreateVerification,
    UpdateVerification,
    AddEvidence,
    RecordImpact,
}

pub fn allows(role: &Role, action: Action) -> bool {
    use Action::*;
    use Role::*;

    if *role == Admin {
        return true;
    }

    match action {
        ReviewKyc => false,
        CreateDonation => *role == Donor,
        UpdateDonationStatus => matches!(role, Donor | Logistics),
        VerifyDonation => *role == Ngo,
        CreateDelivery => *role == Logistics,
        UpdateDeliveryStatus => *role == Logistics,
        VerifyDelivery => matches!(role, Ngo | Volunteer),
        CreateFeedingNeed => *role == Ngo,
        FundFeedingNeed => *role == Donor,
        CreateFoodPack => *role == ServiceProvider,
        UpdateFoodPackQuantity => *role == ServiceProvider,
        SponsorFoodPack => *role == Donor,
        CreateVerification => *role == Ngo,
        UpdateVerification => matches!(role, Ngo | Volunteer),
        AddEvidence => matches!(role, Ngo | Volunteer | Logistics),
        RecordImpact => false,
    }
}

pub fn require(role: &Role, action: Action) -> AppResult<()> {
    if allows(role, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Role {:?} may not perform {:?}",
            role, action
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_allowed_everything() {
        for action in [
            Action::ReviewKyc,
            Action::CreateDonation,
            Action::VerifyDelivery,
            Action::RecordImpact,
        ] {
            assert!(allows(&Role::Admin, action));
        }
    }

    #[test]
    fn donor_actions() {
        assert!(allows(&Role::Donor, Action::CreateDonation));
        assert!(allows(&Role::Donor, Action::FundFeedingNeed));
        assert!(allows(&Role::Donor, Action::SponsorFoodPack));
        assert!(!allows(&Role::Donor, Action::CreateDelivery));
        assert!(!allows(&Role::Donor, Action::ReviewKyc));
    }

    #[test]
    fn logistics_cannot_verify_own_deliveries() {
        assert!(allows(&Role::Logistics, Action::CreateDelivery));
        assert!(allows(&Role::Logistics, Action::UpdateDeliveryStatus));
        assert!(!allows(&Role::Logistics, Action::VerifyDelivery));
    }

    #[test]
    fn require_maps_to_forbidden() {
        let err = require(&Role::Volunteer, Action::CreateDonation).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
