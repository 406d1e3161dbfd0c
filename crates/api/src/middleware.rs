//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use hustings_core::{
    AuthService, BallotService, CandidateService, PartyService, RegistrationService, VoterService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub ballot_service: BallotService,
    pub candidate_service: CandidateService,
    pub party_service: PartyService,
    pub registration_service: RegistrationService,
    pub voter_service: VoterService,
}

/// Authentication middleware.
///
/// Resolves a Bearer access token into the voter it names and stores the
/// model in request extensions. Requests without a valid token pass through
/// unchanged; the extractors decide whether a route requires one.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(voter) = state.auth_service.authenticate(token).await
    {
        req.extensions_mut().insert(voter);
    }

    next.run(req).await
}
