//! Voter roll endpoint.

use axum::{Json, Router, extract::State, routing::get};
use hustings_common::AppResult;
use hustings_db::entities::voter;
use serde::Serialize;

use crate::{extractors::AdminVoter, middleware::AppState};

/// Voter record as served to administrators. The password hash never leaves
/// the store.
#[derive(Serialize)]
pub struct VoterRecord {
    pub voter_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gov_id: String,
    pub email: String,
    pub constituency_id: i32,
    pub is_admin: bool,
}

impl From<voter::Model> for VoterRecord {
    fn from(model: voter::Model) -> Self {
        Self {
            voter_id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            gov_id: model.gov_id,
            email: model.email,
            constituency_id: model.constituency_id,
            is_admin: model.is_admin,
        }
    }
}

/// The full voter roll.
async fn list_voters(
    AdminVoter(_admin): AdminVoter,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<VoterRecord>>> {
    let voters = state.voter_service.list().await?;
    Ok(Json(voters.into_iter().map(VoterRecord::from).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_voters))
}
