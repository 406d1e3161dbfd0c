//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod ballot;
pub mod candidate;
pub mod constituency;
pub mod email;
pub mod party;
pub mod registration;
pub mod voter;

pub use auth::{AuthService, Claims, hash_password, verify_password};
pub use ballot::{BallotService, CandidateStanding, RemainingVotes};
pub use candidate::{CandidateDetail, CandidateInput, CandidateService, CandidateWithParty};
pub use constituency::ConstituencyDirectory;
pub use email::EmailService;
pub use party::{PartyInput, PartyService};
pub use registration::{RegisterInput, RegistrationOutcome, RegistrationService};
pub use voter::{PasswordChangeInput, VoterProfile, VoterService};
