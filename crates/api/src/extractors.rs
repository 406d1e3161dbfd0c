//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use hustings_db::entities::voter;

/// Authenticated voter extractor.
#[derive(Debug, Clone)]
pub struct AuthVoter(pub voter::Model);

impl<S> FromRequestParts<S> for AuthVoter
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the voter from request extensions (set by the auth middleware)
        parts
            .extensions
            .get::<voter::Model>()
            .cloned()
            .map(AuthVoter)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Authenticated administrator extractor.
#[derive(Debug, Clone)]
pub struct AdminVoter(pub voter::Model);

impl<S> FromRequestParts<S> for AdminVoter
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let voter = parts
            .extensions
            .get::<voter::Model>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        if !voter.is_admin {
            return Err((StatusCode::FORBIDDEN, "Admin access required"));
        }

        Ok(Self(voter))
    }
}
