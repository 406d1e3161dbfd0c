//! Core business logic for hustings.

pub mod services;

pub use services::*;
