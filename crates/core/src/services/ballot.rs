//! Ballot casting, tallying, and election reset.

use std::collections::HashMap;

use serde::Serialize;

use hustings_common::{AppError, AppResult, IdGenerator};
use hustings_db::{
    entities::vote::{self, VoteType},
    repositories::{CandidateRepository, PartyRepository, VoteRepository, VoterRepository},
};

/// Maximum number of positive votes a voter may cast.
pub const MAX_POSITIVE_VOTES: u64 = 2;
/// Maximum number of negative votes a voter may cast.
pub const MAX_NEGATIVE_VOTES: u64 = 1;

/// Unused ballot budget per polarity. Counts above the cap clamp to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemainingVotes {
    pub remaining_positive_votes: u64,
    pub remaining_negative_votes: u64,
}

/// One row of the public results board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateStanding {
    pub candidate_id: String,
    pub candidate_name: String,
    pub party_id: String,
    pub party_name: String,
    pub vote_count: i32,
    pub candidate_image: String,
    pub vote_percentage: f64,
}

/// Vote submission and removal, remaining budgets, the public results board,
/// and the election reset.
#[derive(Clone)]
pub struct BallotService {
    vote_repo: VoteRepository,
    voter_repo: VoterRepository,
    candidate_repo: CandidateRepository,
    party_repo: PartyRepository,
    id_gen: IdGenerator,
}

impl BallotService {
    /// Create a new ballot service.
    pub fn new(
        vote_repo: VoteRepository,
        voter_repo: VoterRepository,
        candidate_repo: CandidateRepository,
        party_repo: PartyRepository,
    ) -> Self {
        Self {
            vote_repo,
            voter_repo,
            candidate_repo,
            party_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Per-polarity vote cap.
    #[must_use]
    pub const fn cap(vote_type: VoteType) -> u64 {
        match vote_type {
            VoteType::Positive => MAX_POSITIVE_VOTES,
            VoteType::Negative => MAX_NEGATIVE_VOTES,
        }
    }

    /// Cast a vote for a candidate on behalf of a voter.
    ///
    /// Enforces the per-polarity cap and rejects a negative vote against a
    /// candidate whose tally is already zero.
    pub async fn submit_vote(
        &self,
        voter_id: &str,
        candidate_id: &str,
        vote_type: VoteType,
    ) -> AppResult<vote::Model> {
        let vote = self
            .vote_repo
            .submit(
                &self.id_gen.generate(),
                voter_id,
                candidate_id,
                vote_type,
                Self::cap(vote_type),
            )
            .await?;

        tracing::info!(
            vote_id = %vote.id,
            %candidate_id,
            vote_type = vote_type.as_str(),
            "Vote submitted"
        );
        Ok(vote)
    }

    /// Remove a vote from the ledger and repair the candidate's tally.
    pub async fn delete_vote(&self, vote_id: &str) -> AppResult<()> {
        self.vote_repo.delete_and_recount(vote_id).await?;
        tracing::info!(%vote_id, "Vote deleted");
        Ok(())
    }

    /// How many votes of each polarity a voter can still cast.
    pub async fn remaining_votes(&self, voter_id: &str) -> AppResult<RemainingVotes> {
        if self.voter_repo.find_by_id(voter_id).await?.is_none() {
            return Err(AppError::VoterNotFound(voter_id.to_string()));
        }

        let positive = self
            .vote_repo
            .count_by_voter_and_type(voter_id, VoteType::Positive)
            .await?;
        let negative = self
            .vote_repo
            .count_by_voter_and_type(voter_id, VoteType::Negative)
            .await?;

        Ok(RemainingVotes {
            remaining_positive_votes: MAX_POSITIVE_VOTES.saturating_sub(positive),
            remaining_negative_votes: MAX_NEGATIVE_VOTES.saturating_sub(negative),
        })
    }

    /// Remove every vote and zero all candidate tallies.
    ///
    /// Returns the number of votes removed. Resetting an election with no
    /// votes is a no-op that reports zero.
    pub async fn reset_election(&self) -> AppResult<u64> {
        let removed = self.vote_repo.reset().await?;
        tracing::info!(removed, "Election reset");
        Ok(removed)
    }

    /// The public results board, one row per candidate in id order.
    ///
    /// Percentages are taken against the sum of cached tallies. When that sum
    /// is zero every percentage is reported as zero.
    pub async fn voting_summary(&self) -> AppResult<Vec<CandidateStanding>> {
        let candidates = self.candidate_repo.find_all().await?;
        let parties = self.party_repo.find_all().await?;
        let party_names: HashMap<&str, &str> = parties
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();

        let total: i64 = candidates.iter().map(|c| i64::from(c.vote_count)).sum();

        let mut board = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            // Inner-join semantics: a candidate whose party row is gone is
            // not shown rather than shown with a blank party.
            let Some(party_name) = party_names.get(candidate.party_id.as_str()) else {
                continue;
            };

            let vote_percentage = if total == 0 {
                0.0
            } else {
                f64::from(candidate.vote_count) / total as f64 * 100.0
            };

            board.push(CandidateStanding {
                candidate_id: candidate.id.clone(),
                candidate_name: format!("{} {}", candidate.first_name, candidate.last_name),
                party_id: candidate.party_id.clone(),
                party_name: (*party_name).to_string(),
                vote_count: candidate.vote_count,
                candidate_image: candidate.image.clone(),
                vote_percentage,
            });
        }

        Ok(board)
    }
}
