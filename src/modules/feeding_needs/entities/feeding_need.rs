use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "feeding_needs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(index)]
    pub ngo_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Funding goal in minor units.
    pub target_amount: i64,
    /// Running total of received funding; compared to the target to
    /// derive the status, which is never stored.
    pub funded_amount: i64,
    pub meals_target: i32,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeedStatus {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "FUNDED")]
    Funded,
}

impl Model {
    pub fn status(&self) -> NeedStatus {
        if self.funded_amount >= self.target_amount {
            NeedStatus::Funded
        } else {
            NeedStatus::Active
        }
    }

    pub fn percent_funded(&self) -> u8 {
        if self.target_amount <= 0 {
            return 100;
        }
        ((self.funded_amount * 100 / self.target_amount).min(100)) as u8
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::modules::users::entities::user::Entity",
        from = "Column::NgoId",
        to = "crate::modules::users::entities::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Ngo,
}

impl Related<crate::modules::users::entities::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ngo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn need(target: i64, funded: i64) -> Model {
        Model {
            id: 1,
            ngo_id: 1,
            title: "School lunches".to_string(),
            description: "".to_string(),
            target_amount: target,
            funded_amount: funded,
            meals_target: 100,
            created_at: Default::default(),
            updated_at: Default::default(),
        }
    }

    #[test]
    fn status_flips_exactly_at_target() {
        assert_eq!(need(10_000, 9_999).status(), NeedStatus::Active);
        assert_eq!(need(10_000, 10_000).status(), NeedStatus::Funded);
        assert_eq!(need(10_000, 10_001).status(), NeedStatus::Funded);
    }

    #[test]
    fn percent_funded_is_clamped() {
        assert_eq!(need(10_000, 2_500).percent_funded(), 25);
        assert_eq!(need(10_000, 20_000).percent_funded(), 100);
        assert_eq!(need(10_000, 0).percent_funded(), 0);
    }
}
