//! HTTP API layer for hustings.
//!
//! This crate provides the REST surface of the election platform:
//!
//! - **Endpoints**: registration, login, profile, ballot, party and
//!   candidate administration
//! - **Extractors**: voter and administrator authentication
//! - **Middleware**: Bearer-token resolution into request extensions
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
