//! Voter entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registered voter model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// First name as registered.
    pub first_name: String,

    /// Last name as registered.
    pub last_name: String,

    /// Government-issued 8-digit voter number. Used as the login identifier.
    #[sea_orm(unique)]
    pub gov_id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 hash of the voter's password.
    pub password_hash: String,

    /// Constituency the voter is enrolled in, derived from their postcode.
    #[sea_orm(indexed)]
    pub constituency_id: i32,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::constituency::Entity",
        from = "Column::ConstituencyId",
        to = "super::constituency::Column::Id",
        on_delete = "Restrict"
    )]
    Constituency,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::constituency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Constituency.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
