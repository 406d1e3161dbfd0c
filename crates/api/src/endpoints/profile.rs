//! Voter profile endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch},
};
use hustings_common::AppResult;
use hustings_core::{PasswordChangeInput, VoterProfile};
use serde::Serialize;
use tracing::info;

use crate::{
    extractors::{AdminVoter, AuthVoter},
    middleware::AppState,
    response::{MessageResponse, message},
};

/// The calling voter's profile.
async fn profile(
    AuthVoter(voter): AuthVoter,
    State(state): State<AppState>,
) -> AppResult<Json<VoterProfile>> {
    let profile = state.voter_service.profile(&voter.gov_id).await?;
    Ok(Json(profile))
}

/// Password update response.
#[derive(Serialize)]
pub struct UpdatePasswordResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Change the calling voter's password.
async fn update_password(
    AuthVoter(voter): AuthVoter,
    State(state): State<AppState>,
    Json(input): Json<PasswordChangeInput>,
) -> AppResult<Json<UpdatePasswordResponse>> {
    let warning = state
        .voter_service
        .update_password(&voter.gov_id, input)
        .await?;

    Ok(Json(UpdatePasswordResponse {
        message: "Password successfully updated!",
        warning,
    }))
}

/// Remove a voter along with their votes.
async fn delete_voter(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(gov_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, %gov_id, "Deleting voter");
    state.voter_service.delete(&gov_id).await?;
    Ok(message("User deleted"))
}

/// Promote a voter to administrator.
async fn make_admin(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(gov_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, %gov_id, "Promoting voter to admin");
    state.voter_service.make_admin(&gov_id).await?;
    Ok(message("User is now an admin"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(profile).put(update_password))
        .route("/{gov_id}", delete(delete_voter))
        .route("/{gov_id}/make-admin", patch(make_admin))
}
