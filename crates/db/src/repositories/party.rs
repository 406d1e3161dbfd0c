//! Party repository.

use std::sync::Arc;

use crate::entities::{Candidate, Party, Vote, candidate, party, vote};
use crate::map_db_err;
use hustings_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Party repository for database operations.
#[derive(Clone)]
pub struct PartyRepository {
    db: Arc<DatabaseConnection>,
}

impl PartyRepository {
    /// Create a new party repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a party by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<party::Model>> {
        Party::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List all parties, ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<party::Model>> {
        Party::find()
            .order_by_asc(party::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check whether a party with this name already exists.
    pub async fn exists_by_name(&self, name: &str) -> AppResult<bool> {
        let found = Party::find()
            .filter(party::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(found.is_some())
    }

    /// Create a new party.
    pub async fn create(&self, model: party::ActiveModel) -> AppResult<party::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Update a party.
    pub async fn update(&self, model: party::ActiveModel) -> AppResult<party::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Delete a party, its candidates and every vote cast for them.
    pub async fn delete_with_candidates(&self, id: &str) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(party) = Party::find_by_id(id).one(&txn).await.map_err(map_db_err)? else {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::NotFound(format!("party {id}")));
        };

        let candidate_ids: Vec<String> = Candidate::find()
            .select_only()
            .column(candidate::Column::Id)
            .filter(candidate::Column::PartyId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        if !candidate_ids.is_empty() {
            Vote::delete_many()
                .filter(vote::Column::CandidateId.is_in(candidate_ids))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;

            Candidate::delete_many()
                .filter(candidate::Column::PartyId.eq(id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        party.delete(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}
