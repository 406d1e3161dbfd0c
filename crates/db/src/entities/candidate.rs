//! Candidate entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Election candidate model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "candidate")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    /// Party the candidate stands for.
    #[sea_orm(indexed)]
    pub party_id: String,

    /// Constituency the candidate stands in.
    #[sea_orm(indexed)]
    pub constituency_id: i32,

    /// Portrait URL shown on the ballot.
    pub image: String,

    /// Personal statement text.
    #[sea_orm(column_type = "Text")]
    pub statement: String,

    /// Running tally: signed sum of all votes cast for this candidate.
    #[sea_orm(default_value = 0)]
    pub vote_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::party::Entity",
        from = "Column::PartyId",
        to = "super::party::Column::Id",
        on_delete = "Cascade"
    )]
    Party,

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

impl Related<super::party::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Party.def()
    }
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
