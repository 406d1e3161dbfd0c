//! Constituency entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Electoral constituency model.
///
/// Constituencies are seeded by migration; ids are stable and referenced by
/// the postcode lookup table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "constituency")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::voter::Entity")]
    Voters,

    #[sea_orm(has_many = "super::candidate::Entity")]
    Candidates,
}

impl Related<super::voter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voters.def()
    }
}

impl Related<super::candidate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
