//! Party endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use hustings_common::AppResult;
use hustings_core::PartyInput;
use hustings_db::entities::party;
use serde::Serialize;
use tracing::info;

use crate::{
    extractors::AdminVoter,
    middleware::AppState,
    response::{MessageResponse, message},
};

/// Party record as served to clients.
#[derive(Serialize)]
pub struct PartyRecord {
    pub party_id: String,
    pub party_name: String,
    pub image: String,
    pub manifesto: String,
}

impl From<party::Model> for PartyRecord {
    fn from(model: party::Model) -> Self {
        Self {
            party_id: model.id,
            party_name: model.name,
            image: model.image,
            manifesto: model.manifesto,
        }
    }
}

/// All parties.
async fn list_parties(State(state): State<AppState>) -> AppResult<Json<Vec<PartyRecord>>> {
    let parties = state.party_service.list().await?;
    Ok(Json(parties.into_iter().map(PartyRecord::from).collect()))
}

/// One party by id.
async fn get_party(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PartyRecord>> {
    let party = state.party_service.get(&id).await?;
    Ok(Json(party.into()))
}

/// Create party response.
#[derive(Serialize)]
pub struct CreatePartyResponse {
    pub message: &'static str,
    pub party_id: String,
}

/// Register a new party.
async fn create_party(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Json(input): Json<PartyInput>,
) -> AppResult<(StatusCode, Json<CreatePartyResponse>)> {
    info!(admin_id = %admin.id, party_name = %input.party_name, "Creating party");
    let party = state.party_service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePartyResponse {
            message: "Party created",
            party_id: party.id,
        }),
    ))
}

/// Replace a party's details.
async fn update_party(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PartyInput>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, party_id = %id, "Updating party");
    state.party_service.update(&id, input).await?;
    Ok(message("Party updated"))
}

/// Remove a party along with its candidates and their votes.
async fn delete_party(
    AdminVoter(admin): AdminVoter,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, party_id = %id, "Deleting party");
    state.party_service.delete(&id).await?;
    Ok(message("Party deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parties).post(create_party))
        .route(
            "/{id}",
            get(get_party).put(update_party).delete(delete_party),
        )
}
