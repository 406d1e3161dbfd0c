//! Data access repositories.

pub mod candidate;
pub mod constituency;
pub mod party;
pub mod pending_verification;
pub mod vote;
pub mod voter;

pub use candidate::CandidateRepository;
pub use constituency::ConstituencyRepository;
pub use party::PartyRepository;
pub use pending_verification::PendingVerificationRepository;
pub use vote::VoteRepository;
pub use voter::VoterRepository;
