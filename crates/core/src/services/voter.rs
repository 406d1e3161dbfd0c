//! Voter profile, password changes, and admin voter management.

use sea_orm::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use validator::Validate;

use hustings_common::{AppError, AppResult};
use hustings_db::{
    entities::voter,
    repositories::{ConstituencyRepository, VoterRepository},
};

use super::auth::hash_password;
use super::email::EmailService;

/// A voter's own view of their record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoterProfile {
    pub first_name: String,
    pub last_name: String,
    pub gov_id: String,
    pub constituency_name: String,
    pub email: String,
}

/// Input for a self-service password change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordChangeInput {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Voter lookups and mutations outside the ballot path.
#[derive(Clone)]
pub struct VoterService {
    voter_repo: VoterRepository,
    constituency_repo: ConstituencyRepository,
    email: EmailService,
}

impl VoterService {
    /// Create a new voter service.
    pub fn new(
        voter_repo: VoterRepository,
        constituency_repo: ConstituencyRepository,
        email: EmailService,
    ) -> Self {
        Self {
            voter_repo,
            constituency_repo,
            email,
        }
    }

    /// A voter's profile with their constituency resolved to its name.
    pub async fn profile(&self, gov_id: &str) -> AppResult<VoterProfile> {
        let voter = self.require_voter(gov_id).await?;

        let constituency = self
            .constituency_repo
            .find_by_id(voter.constituency_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "constituency {} missing for voter {}",
                    voter.constituency_id, voter.id
                ))
            })?;

        Ok(VoterProfile {
            first_name: voter.first_name,
            last_name: voter.last_name,
            gov_id: voter.gov_id,
            constituency_name: constituency.name,
            email: voter.email,
        })
    }

    /// Change a voter's password.
    ///
    /// The submitted email must match the voter's registered address. The
    /// change is committed before the notification email goes out; a failed
    /// send is returned as a warning, not an error.
    pub async fn update_password(
        &self,
        gov_id: &str,
        input: PasswordChangeInput,
    ) -> AppResult<Option<String>> {
        input.validate()?;

        let voter = self.require_voter(gov_id).await?;

        if voter.email != input.email {
            return Err(AppError::BadRequest(
                "Email address does not match".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let model = voter::ActiveModel {
            id: Unchanged(voter.id.clone()),
            password_hash: Set(password_hash),
            ..Default::default()
        };
        self.voter_repo.update(model).await?;

        let warning = match self.email.send_password_changed(&voter.email).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(voter_id = %voter.id, error = %e, "Password change email failed");
                Some("password changed but the notification email could not be sent".to_string())
            }
        };

        tracing::info!(voter_id = %voter.id, "Password updated");
        Ok(warning)
    }

    /// Every registered voter. Password hashes never leave this layer.
    pub async fn list(&self) -> AppResult<Vec<voter::Model>> {
        self.voter_repo.find_all().await
    }

    /// Grant a voter the admin role.
    pub async fn make_admin(&self, gov_id: &str) -> AppResult<voter::Model> {
        let voter = self.require_voter(gov_id).await?;

        let model = voter::ActiveModel {
            id: Unchanged(voter.id.clone()),
            is_admin: Set(true),
            ..Default::default()
        };
        let updated = self.voter_repo.update(model).await?;

        tracing::info!(voter_id = %updated.id, "Voter promoted to admin");
        Ok(updated)
    }

    /// Delete a voter along with their votes, repairing candidate tallies.
    pub async fn delete(&self, gov_id: &str) -> AppResult<()> {
        let voter = self.require_voter(gov_id).await?;
        self.voter_repo.delete_with_votes(&voter.id).await?;

        tracing::info!(voter_id = %voter.id, "Voter deleted");
        Ok(())
    }

    async fn require_voter(&self, gov_id: &str) -> AppResult<voter::Model> {
        self.voter_repo
            .find_by_gov_id(gov_id)
            .await?
            .ok_or_else(|| AppError::VoterNotFound(gov_id.to_string()))
    }
}
