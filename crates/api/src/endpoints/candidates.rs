//! Candidate endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use hustings_common::AppResult;
use hustings_core::{CandidateDetail, CandidateInput, CandidateWithParty};
use serde::Serialize;
use tracing::info;

use crate::{
    extractors::AdminVoter,
    middleware::AppState,
    response::{MessageResponse, message},
};

/// All candidates with their party names.
async fn list_candidates(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CandidateWithParty>>> {
    let candidates = state.candidate_service.list().await?;
    Ok(Json(candidates))
}

/// One candidate with party and constituency details.
async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CandidateDetail>> {
    let candidate = state.candidate_service.get(&id).await?;
    Ok(Json(candidate))
}

/// Create candidate response.
#[derive(Serialize)]
pub struct CreateCandidateResponse {
    pub message: &'static str,
    pub candidate_id: String,
}

/// Stand a new candidate.
async fn create_candidate(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Json(input): Json<CandidateInput>,
) -> AppResult<(StatusCode, Json<CreateCandidateResponse>)> {
    info!(
        admin_id = %admin.id,
        first_name = %input.candidate_firstname,
        last_name = %input.candidate_lastname,
        "Creating candidate"
    );
    let candidate = state.candidate_service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCandidateResponse {
            message: "Candidate added",
            candidate_id: candidate.id,
        }),
    ))
}

/// Replace a candidate's details.
async fn update_candidate(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CandidateInput>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, candidate_id = %id, "Updating candidate");
    state.candidate_service.update(&id, input).await?;
    Ok(message("Candidate updated"))
}

/// Withdraw a candidate along with their votes.
async fn delete_candidate(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, candidate_id = %id, "Deleting candidate");
    state.candidate_service.delete(&id).await?;
    Ok(message("Candidate deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_candidates).post(create_candidate))
        .route(
            "/{id}",
            get(get_candidate)
                .put(update_candidate)
                .delete(delete_candidate),
        )
}
