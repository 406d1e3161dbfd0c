//! Candidate repository.

use std::sync::Arc;

use crate::entities::{Candidate, Vote, candidate, vote};
use crate::map_db_err;
use hustings_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

/// Candidate repository for database operations.
#[derive(Clone)]
pub struct CandidateRepository {
    db: Arc<DatabaseConnection>,
}

impl CandidateRepository {
    /// Create a new candidate repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a candidate by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<candidate::Model>> {
        Candidate::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List all candidates, ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<candidate::Model>> {
        Candidate::find()
            .order_by_asc(candidate::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List candidates standing for a party.
    pub async fn find_by_party(&self, party_id: &str) -> AppResult<Vec<candidate::Model>> {
        Candidate::find()
            .filter(candidate::Column::PartyId.eq(party_id))
            .order_by_asc(candidate::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check whether a candidate with this exact name already stands.
    pub async fn exists_by_name(&self, first_name: &str, last_name: &str) -> AppResult<bool> {
        let found = Candidate::find()
            .filter(candidate::Column::FirstName.eq(first_name))
            .filter(candidate::Column::LastName.eq(last_name))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        Ok(found.is_some())
    }

    /// Create a new candidate.
    pub async fn create(&self, model: candidate::ActiveModel) -> AppResult<candidate::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Update a candidate.
    pub async fn update(&self, model: candidate::ActiveModel) -> AppResult<candidate::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Delete a candidate along with every vote cast for them.
    pub async fn delete_with_votes(&self, id: &str) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(candidate) = Candidate::find_by_id(id).one(&txn).await.map_err(map_db_err)?
        else {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::CandidateNotFound(id.to_string()));
        };

        Vote::delete_many()
            .filter(vote::Column::CandidateId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        candidate.delete(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_candidate(id: &str) -> candidate::Model {
        candidate::Model {
            id: id.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            party_id: "p1".to_string(),
            constituency_id: 1,
            image: "https://example.com/grace.png".to_string(),
            statement: "Count what counts.".to_string(),
            vote_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_candidate("c1")]])
                .into_connection(),
        );

        let repo = CandidateRepository::new(db);
        let result = repo.find_by_id("c1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().last_name, "Hopper");
    }

    #[tokio::test]
    async fn test_exists_by_name_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_candidate("c1")]])
                .into_connection(),
        );

        let repo = CandidateRepository::new(db);
        assert!(repo.exists_by_name("Grace", "Hopper").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_by_name_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .into_connection(),
        );

        let repo = CandidateRepository::new(db);
        assert!(!repo.exists_by_name("Jean", "Bartik").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_with_votes_missing_candidate() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<candidate::Model>::new()])
                .into_connection(),
        );

        let repo = CandidateRepository::new(db);
        let result = repo.delete_with_votes("ghost").await;

        assert!(matches!(result, Err(AppError::CandidateNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_with_votes_removes_ledger_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_candidate("c1")]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 3,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = CandidateRepository::new(db);
        repo.delete_with_votes("c1").await.unwrap();
    }
}
