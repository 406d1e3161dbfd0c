//! Vote repository.
//!
//! All tally-touching operations run inside a single transaction with the
//! rows they read locked, so the cached `vote_count` can never drift from
//! the vote ledger under concurrent requests.

use std::sync::Arc;

use crate::entities::{Candidate, Vote, Voter, candidate, vote, vote::VoteType};
use crate::map_db_err;
use hustings_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Cast a vote and apply its weight to the candidate tally.
    ///
    /// The voter row is locked while the per-polarity cap is checked and the
    /// candidate row is locked while the tally guard and update run, so two
    /// concurrent submissions from the same voter serialize: one commits, the
    /// other sees the committed count and fails its cap check.
    pub async fn submit(
        &self,
        id: &str,
        voter_id: &str,
        candidate_id: &str,
        vote_type: VoteType,
        cap: u64,
    ) -> AppResult<vote::Model> {
        use sea_orm::sea_query::Expr;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let voter = Voter::find_by_id(voter_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if voter.is_none() {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::VoterNotFound(voter_id.to_string()));
        }

        let cast = Vote::find()
            .filter(vote::Column::VoterId.eq(voter_id))
            .filter(vote::Column::VoteType.eq(vote_type))
            .count(&txn)
            .await
            .map_err(map_db_err)?;
        if cast >= cap {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::CapExceeded(format!(
                "limit of {cap} {} votes already reached",
                vote_type.as_str()
            )));
        }

        let Some(candidate) = Candidate::find_by_id(candidate_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::CandidateNotFound(candidate_id.to_string()));
        };

        if vote_type == VoteType::Negative && candidate.vote_count == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::InvalidVote(
                "cannot cast a negative vote against a zero tally".to_string(),
            ));
        }

        let model = vote::ActiveModel {
            id: Set(id.to_string()),
            voter_id: Set(voter_id.to_string()),
            candidate_id: Set(candidate_id.to_string()),
            vote_type: Set(vote_type),
            created_at: Set(chrono::Utc::now().into()),
        };
        let created = model.insert(&txn).await.map_err(map_db_err)?;

        Candidate::update_many()
            .col_expr(
                candidate::Column::VoteCount,
                Expr::col(candidate::Column::VoteCount).add(vote_type.weight()),
            )
            .filter(candidate::Column::Id.eq(candidate_id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(created)
    }

    /// Delete a vote and recompute the candidate's tally from the surviving
    /// ledger rows.
    ///
    /// The tally is rebuilt as the signed sum of remaining vote weights, not
    /// decremented, so a tally that ever drifted is repaired rather than
    /// compounded.
    pub async fn delete_and_recount(&self, vote_id: &str) -> AppResult<()> {
        use sea_orm::sea_query::Expr;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(vote) = Vote::find_by_id(vote_id).one(&txn).await.map_err(map_db_err)? else {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(AppError::NotFound(format!("vote {vote_id}")));
        };
        let candidate_id = vote.candidate_id.clone();

        vote.delete(&txn).await.map_err(map_db_err)?;

        let candidate = Candidate::find_by_id(&candidate_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?;

        if candidate.is_some() {
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

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }

    /// Wipe the ledger and zero every candidate tally.
    ///
    /// Returns the number of votes removed. Idempotent: an empty election
    /// resets to an empty election.
    pub async fn reset(&self) -> AppResult<u64> {
        use sea_orm::sea_query::Expr;

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let deleted = Vote::delete_many().exec(&txn).await.map_err(map_db_err)?;

        Candidate::update_many()
            .col_expr(candidate::Column::VoteCount, Expr::value(0))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(deleted.rows_affected)
    }

    /// Count votes of one polarity cast by a voter.
    pub async fn count_by_voter_and_type(
        &self,
        voter_id: &str,
        vote_type: VoteType,
    ) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::VoterId.eq(voter_id))
            .filter(vote::Column::VoteType.eq(vote_type))
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    /// List a voter's votes, oldest first.
    pub async fn find_by_voter(&self, voter_id: &str) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::VoterId.eq(voter_id))
            .order_by_asc(vote::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }
}
