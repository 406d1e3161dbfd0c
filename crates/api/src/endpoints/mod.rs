//! API endpoints.

mod auth;
mod candidates;
mod parties;
mod profile;
mod voters;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(votes::router())
        .nest("/profile", profile::router())
        .nest("/parties", parties::router())
        .nest("/candidates", candidates::router())
        .nest("/voters", voters::router())
}
