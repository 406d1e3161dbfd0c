//! Voter repository.

use std::sync::Arc;

use crate::entities::{Candidate, Vote, Voter, candidate, vote, voter};
use crate::map_db_err;
use hustings_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

/// Voter repository for database operations.
#[derive(Clone)]
pub struct VoterRepository {
    db: Arc<DatabaseConnection>,
}

impl VoterRepository {
    /// Create a new voter repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a voter by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<voter::Model>> {
        Voter::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a voter by government ID.
    pub async fn find_by_gov_id(&self, gov_id: &str) -> AppResult<Option<voter::Model>> {
        Voter::find()
            .filter(voter::Column::GovId.eq(gov_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Find a voter by email address.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<voter::Model>> {
        Voter::find()
            .filter(voter::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Check whether a government ID has already been issued.
    pub async fn gov_id_exists(&self, gov_id: &str) -> AppResult<bool> {
        Ok(self.find_by_gov_id(gov_id).await?.is_some())
    }

    /// Check whether an email address is already registered.
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// List all voters, oldest registration first.
    pub async fn find_all(&self) -> AppResult<Vec<voter::Model>> {
        Voter::find()
            .order_by_asc(voter::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Create a new voter.
    pub async fn create(&self, model: voter::ActiveModel) -> AppResult<voter::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Update a voter.
    pub async fn update(&self, model: voter::ActiveModel) -> AppResult<voter::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// Delete a voter along with every vote they have cast, keeping candidate
    /// tallies consistent.
    ///
    /// Runs in a single transaction: the voter's votes are removed, each
    /// affected candidate's tally is recomputed from the surviving ledger
    /// rows, and finally the voter row itself goes.
    pub async fn delete_with_votes(&self, id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(voter) = Voter::find_by_id(id).one(&txn).await.map_err(map_db_err)? else {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::VoterNotFound(id.to_string()));
        };

        let votes = Vote::find()
            .filter(vote::Column::VoterId.eq(id))
            .all(&txn)
            .await
            .map_err(map_db_err)?;

        let mut affected: Vec<String> = votes.into_iter().map(|v| v.candidate_id).collect();
        affected.sort_unstable();
        affected.dedup();

        Vote::delete_many()
            .filter(vote::Column::VoterId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        for candidate_id in affected {
            let candidate = Candidate::find_by_id(&candidate_id)
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(map_db_err)?;
            if candidate.is_none() {
                continue;
            }

            let surviving = Vote::find()
                .filter(vote::Column::CandidateId.eq(&candidate_id))
                .all(&txn)
                .await
                .map_err(map_db_err)?;
            let total: i32 = surviving.iter().map(|v| v.vote_type.weight()).sum();

            Candidate::update_many()
                .col_expr(candidate::Column::VoteCount, Expr::value(total))
                .filter(candidate::Column::Id.eq(&candidate_id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        voter.delete(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    fn create_test_voter(id: &str, gov_id: &str, email: &str) -> voter::Model {
        voter::Model {
            id: id.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            gov_id: gov_id.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            constituency_id: 1,
            is_admin: false,
            created_at: Utc::now().into(),
        }
    }

    fn test_candidate(id: &str, vote_count: i32) -> candidate::Model {
        candidate::Model {
            id: id.to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            party_id: "p1".to_string(),
            constituency_id: 1,
            image: "https://example.com/grace.png".to_string(),
            statement: "Count what counts.".to_string(),
            vote_count,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_gov_id_found() {
        let voter = create_test_voter("v1", "12345678", "ada@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[voter.clone()]])
                .into_connection(),
        );

        let repo = VoterRepository::new(db);
        let result = repo.find_by_gov_id("12345678").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_find_by_gov_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<voter::Model>::new()])
                .into_connection(),
        );

        let repo = VoterRepository::new(db);
        let result = repo.find_by_gov_id("00000000").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_email_exists() {
        let voter = create_test_voter("v1", "12345678", "ada@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[voter.clone()]])
                .into_connection(),
        );

        let repo = VoterRepository::new(db);
        assert!(repo.email_exists("ada@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_voter() {
        let voter = create_test_voter("v1", "12345678", "ada@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[voter.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = VoterRepository::new(db);
        let model = voter::ActiveModel {
            id: Set(voter.id.clone()),
            first_name: Set(voter.first_name.clone()),
            last_name: Set(voter.last_name.clone()),
            gov_id: Set(voter.gov_id.clone()),
            email: Set(voter.email.clone()),
            password_hash: Set(voter.password_hash.clone()),
            constituency_id: Set(voter.constituency_id),
            is_admin: Set(voter.is_admin),
            created_at: Set(voter.created_at),
        };
        let created = repo.create(model).await.unwrap();

        assert_eq!(created.gov_id, "12345678");
    }

    #[tokio::test]
    async fn test_delete_with_votes_missing_voter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<voter::Model>::new()])
                .into_connection(),
        );

        let repo = VoterRepository::new(db);
        let result = repo.delete_with_votes("missing").await;

        assert!(matches!(result, Err(AppError::VoterNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_with_votes_recounts_tallies() {
        let voter = create_test_voter("v1", "12345678", "ada@example.com");
        let votes = vec![
            vote::Model {
                id: "b1".to_string(),
                voter_id: "v1".to_string(),
                candidate_id: "c1".to_string(),
                vote_type: vote::VoteType::Positive,
                created_at: Utc::now().into(),
            },
            vote::Model {
                id: "b2".to_string(),
                voter_id: "v1".to_string(),
                candidate_id: "c1".to_string(),
                vote_type: vote::VoteType::Positive,
                created_at: Utc::now().into(),
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[voter.clone()]])
                .append_query_results([votes])
                .append_query_results([[test_candidate("c1", 2)]])
                // No votes for c1 survive the cascade
                .append_query_results([Vec::<vote::Model>::new()])
                .append_exec_results([
                    // Vote rows removed
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    // Tally rewritten for c1
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    // Voter row removed
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let repo = VoterRepository::new(db);
        repo.delete_with_votes("v1").await.unwrap();
    }
}
