//! Ballot endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use hustings_common::AppResult;
use hustings_core::{CandidateStanding, RemainingVotes};
use hustings_db::entities::vote::VoteType;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AdminVoter, AuthVoter},
    middleware::AppState,
    response::{MessageResponse, message},
};

/// Vote submission request.
#[derive(Debug, Deserialize)]
pub struct SubmitVoteRequest {
    pub candidate_id: String,
    pub vote_type: VoteType,
}

/// Vote submission response.
#[derive(Serialize)]
pub struct SubmitVoteResponse {
    pub message: &'static str,
    pub vote_id: String,
}

/// Cast a vote. The voter is the one named by the access token.
async fn submit_vote(
    AuthVoter(voter): AuthVoter,
    State(state): State<AppState>,
    Json(req): Json<SubmitVoteRequest>,
) -> AppResult<(StatusCode, Json<SubmitVoteResponse>)> {
    let vote = state
        .ballot_service
        .submit_vote(&voter.id, &req.candidate_id, req.vote_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitVoteResponse {
            message: "Vote submitted",
            vote_id: vote.id,
        }),
    ))
}

/// Wipe the ledger and zero every candidate tally.
async fn reset_election(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, "Resetting election");
    state.ballot_service.reset_election().await?;
    Ok(message("Election Reset"))
}

/// Delete vote response.
#[derive(Serialize)]
pub struct DeleteVoteResponse {
    pub message: &'static str,
    pub vote_id: String,
}

/// Remove a single vote and recount the affected candidate.
async fn delete_vote(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(vote_id): Path<String>,
) -> AppResult<Json<DeleteVoteResponse>> {
    info!(admin_id = %admin.id, %vote_id, "Deleting vote");
    state.ballot_service.delete_vote(&vote_id).await?;

    Ok(Json(DeleteVoteResponse {
        message: "Vote deleted",
        vote_id,
    }))
}

/// How many votes of each polarity a voter may still cast.
async fn remaining_votes(
    AuthVoter(_voter): AuthVoter,
    State(state): State<AppState>,
    Path(voter_id): Path<String>,
) -> AppResult<Json<RemainingVotes>> {
    let remaining = state.ballot_service.remaining_votes(&voter_id).await?;
    Ok(Json(remaining))
}

/// Current standings for every candidate.
async fn voting_data(State(state): State<AppState>) -> AppResult<Json<Vec<CandidateStanding>>> {
    let standings = state.ballot_service.voting_summary().await?;
    Ok(Json(standings))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/votes", post(submit_vote).delete(reset_election))
        .route("/votes/{vote_id}", delete(delete_vote))
        .route("/remaining-votes/{voter_id}", get(remaining_votes))
        .route("/voting-data", get(voting_data))
}
