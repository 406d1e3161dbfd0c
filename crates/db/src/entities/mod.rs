//! Database entities.

pub mod candidate;
pub mod constituency;
pub mod party;
pub mod pending_verification;
pub mod vote;
pub mod voter;

pub use candidate::Entity as Candidate;
pub use constituency::Entity as Constituency;
pub use party::Entity as Party;
pub use pending_verification::Entity as PendingVerification;
pub use vote::Entity as Vote;
pub use voter::Entity as Voter;
