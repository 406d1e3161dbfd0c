//! Constituency repository.

use std::sync::Arc;

use crate::entities::{Constituency, constituency};
use crate::map_db_err;
use hustings_common::AppResult;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

/// Constituency repository for database operations.
///
/// Constituencies are seeded reference data, so this repository is read-only.
#[derive(Clone)]
pub struct ConstituencyRepository {
    db: Arc<DatabaseConnection>,
}

impl ConstituencyRepository {
    /// Create a new constituency repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a constituency by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<constituency::Model>> {
        Constituency::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List all constituencies, ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<constituency::Model>> {
        Constituency::find()
            .order_by_asc(constituency::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}
