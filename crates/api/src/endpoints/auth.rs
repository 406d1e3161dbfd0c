//! Registration, verification and login endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use hustings_common::AppResult;
use hustings_core::RegisterInput;
use serde::{Deserialize, Serialize};

use crate::{
    middleware::AppState,
    response::{MessageResponse, message},
};

/// Verification request.
#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    pub email: String,
}

/// Issue a one-time passcode to a prospective voter's email address.
async fn request_verification(
    State(state): State<AppState>,
    Json(req): Json<VerificationRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .registration_service
        .request_verification(&req.email)
        .await?;

    Ok(message("OTP sent"))
}

/// Register response.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub gov_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Register a new voter.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let outcome = state.registration_service.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Success",
            gov_id: outcome.gov_id,
            warning: outcome.warning,
        }),
    ))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub gov_id: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_data: UserData,
}

/// Voter summary returned alongside a fresh access token.
#[derive(Serialize)]
pub struct UserData {
    pub voter_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gov_id: String,
    pub email: String,
    pub constituency_id: i32,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Sign in with a government id and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (access_token, voter) = state.auth_service.login(&req.gov_id, &req.password).await?;

    Ok(Json(LoginResponse {
        access_token,
        user_data: UserData {
            voter_id: voter.id,
            first_name: voter.first_name,
            last_name: voter.last_name,
            gov_id: voter.gov_id,
            email: voter.email,
            constituency_id: voter.constituency_id,
            is_admin: voter.is_admin,
        },
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verification", post(request_verification))
        .route("/login", post(login))
}
