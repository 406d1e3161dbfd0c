//! Pending verification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outstanding email verification code.
///
/// One row per address: requesting a new code overwrites the previous row,
/// invalidating the old code. Rows are consumed by successful registration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_verification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// 6-digit code the applicant must echo back when registering.
    pub otp_code: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
